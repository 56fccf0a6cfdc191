//! Input normalisation and validation helpers.

use validator::Validate;

use crate::error::{DomainError, DomainResult};

/// Trim surrounding whitespace in place.
pub fn normalize_text(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trim and lower-case an email address in place.
pub fn normalize_email(value: &mut String) {
    *value = value.trim().to_lowercase();
}

/// Run derived validation rules and report the first failure.
///
/// Fields are visited in name order so the reported message is stable.
pub fn validate_input<T: Validate>(value: &T) -> DomainResult<()> {
    value.validate().map_err(|errors| {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .first()
            .and_then(|(field, errs)| {
                errs.first().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .unwrap_or_else(|| "Validation failed".to_string());

        DomainError::validation(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(email(message = "Email must be a valid email address"))]
        email: String,
    }

    #[test]
    fn test_normalize_text_trims() {
        let mut value = "  Computer Science \n".to_string();
        normalize_text(&mut value);
        assert_eq!(value, "Computer Science");
    }

    #[test]
    fn test_normalize_email_lowercases() {
        let mut value = " A.Student@School.EDU ".to_string();
        normalize_email(&mut value);
        assert_eq!(value, "a.student@school.edu");
    }

    #[test]
    fn test_validate_input_ok() {
        let sample = Sample {
            name: "Ada".to_string(),
            email: "ada@school.edu".to_string(),
        };
        assert!(validate_input(&sample).is_ok());
    }

    #[test]
    fn test_validate_input_reports_first_field_by_name() {
        let sample = Sample {
            name: String::new(),
            email: "not-an-email".to_string(),
        };

        // "email" sorts before "name"
        assert_eq!(
            validate_input(&sample),
            Err(DomainError::validation("Email must be a valid email address"))
        );
    }
}

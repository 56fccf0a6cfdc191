//! ID card request entity, its status lifecycle tags and request types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::DomainError;

/// Processing status of an ID card request.
///
/// Any status may be stored after any other; [`RequestStatus::is_forward_transition`]
/// only describes the usual path through the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Processing,
    Ready,
    Delivered,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 6] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Processing,
        RequestStatus::Ready,
        RequestStatus::Delivered,
    ];

    /// Stored tag value
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => STATUS_PENDING,
            RequestStatus::Approved => STATUS_APPROVED,
            RequestStatus::Rejected => STATUS_REJECTED,
            RequestStatus::Processing => STATUS_PROCESSING,
            RequestStatus::Ready => STATUS_READY,
            RequestStatus::Delivered => STATUS_DELIVERED,
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Processing => "Processing",
            RequestStatus::Ready => "Ready for Pickup",
            RequestStatus::Delivered => "Delivered",
        }
    }

    /// Whether `next` follows the usual workflow:
    /// PENDING -> APPROVED | REJECTED, APPROVED -> PROCESSING -> READY -> DELIVERED.
    /// Setting the same status again counts as forward.
    pub fn is_forward_transition(&self, next: RequestStatus) -> bool {
        use RequestStatus::*;

        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Rejected)
                | (Approved, Processing)
                | (Processing, Ready)
                | (Ready, Delivered)
        )
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RequestStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let valid: Vec<&str> = RequestStatus::ALL.iter().map(|st| st.as_str()).collect();
                DomainError::validation(format!(
                    "Invalid status '{}'. Must be one of: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    New,
    Replacement,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::New => TYPE_NEW,
            RequestType::Replacement => TYPE_REPLACEMENT,
        }
    }
}

impl FromStr for RequestType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(TYPE_NEW) {
            Ok(RequestType::New)
        } else if s.eq_ignore_ascii_case(TYPE_REPLACEMENT) {
            Ok(RequestType::Replacement)
        } else {
            Err(DomainError::validation(format!(
                "Invalid request type '{}'. Must be one of: {}, {}",
                s, TYPE_NEW, TYPE_REPLACEMENT
            )))
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ID card request domain entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdRequest {
    pub id: i32,
    pub user_id: i32,
    pub status: RequestStatus,
    #[serde(rename = "type")]
    pub request_type: Option<RequestType>,
    pub photo_url: Option<String>,
    pub reason: Option<String>,
    pub comments: Option<String>,
    pub paid: bool,
    pub request_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New request as handed to the store.
///
/// Unset `status`, `paid` and `request_date` take their defaults
/// (PENDING, false, now).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewIdRequest {
    pub user_id: i32,
    pub status: Option<RequestStatus>,
    #[serde(rename = "type")]
    pub request_type: Option<RequestType>,
    pub photo_url: Option<String>,
    pub reason: Option<String>,
    pub comments: Option<String>,
    pub paid: Option<bool>,
    pub request_date: Option<DateTime<Utc>>,
}

impl NewIdRequest {
    pub fn for_user(user_id: i32) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    /// Trim optional text and drop values that are blank.
    pub fn normalize(&mut self) {
        for field in [&mut self.photo_url, &mut self.reason, &mut self.comments] {
            normalize_optional(field);
        }
    }
}

/// Partial request update. `None` leaves a field unchanged; a blank
/// `photo_url`, `reason` or `comments` clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateIdRequest {
    pub status: Option<RequestStatus>,
    #[serde(rename = "type")]
    pub request_type: Option<RequestType>,
    pub photo_url: Option<String>,
    pub reason: Option<String>,
    pub comments: Option<String>,
    pub paid: Option<bool>,
}

impl UpdateIdRequest {
    pub fn status(status: RequestStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Trim optional text. Blank values stay as `Some("")`.
    pub fn normalize(&mut self) {
        for value in [&mut self.photo_url, &mut self.reason, &mut self.comments]
            .into_iter()
            .flatten()
        {
            *value = value.trim().to_string();
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &UpdateIdRequest::default()
    }
}

/// Stored value for an updated optional text field; blank means cleared.
pub fn cleared_if_blank(value: String) -> Option<String> {
    Some(value).filter(|v| !v.trim().is_empty())
}

fn normalize_optional(field: &mut Option<String>) {
    *field = field
        .take()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(RequestStatus::default(), RequestStatus::Pending);
    }

    #[test]
    fn test_status_parse_and_display() {
        for status in RequestStatus::ALL {
            assert_eq!(status.to_string().parse::<RequestStatus>().unwrap(), status);
        }
        assert_eq!("ready".parse::<RequestStatus>().unwrap(), RequestStatus::Ready);
        assert!("shipped".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(RequestStatus::Ready.label(), "Ready for Pickup");
        assert_eq!(RequestStatus::Pending.label(), "Pending");
    }

    #[test]
    fn test_forward_transitions() {
        use RequestStatus::*;

        assert!(Pending.is_forward_transition(Approved));
        assert!(Pending.is_forward_transition(Rejected));
        assert!(Approved.is_forward_transition(Processing));
        assert!(Processing.is_forward_transition(Ready));
        assert!(Ready.is_forward_transition(Delivered));
        assert!(Ready.is_forward_transition(Ready));

        assert!(!Delivered.is_forward_transition(Pending));
        assert!(!Rejected.is_forward_transition(Approved));
        assert!(!Pending.is_forward_transition(Delivered));
    }

    #[test]
    fn test_request_type_parse() {
        assert_eq!("new".parse::<RequestType>().unwrap(), RequestType::New);
        assert_eq!(
            "Replacement".parse::<RequestType>().unwrap(),
            RequestType::Replacement
        );
        assert!("renewal".parse::<RequestType>().is_err());
    }

    #[test]
    fn test_new_request_normalize_drops_blank() {
        let mut request = NewIdRequest {
            reason: Some("  lost card ".to_string()),
            comments: Some("   ".to_string()),
            ..NewIdRequest::for_user(7)
        };
        request.normalize();

        assert_eq!(request.user_id, 7);
        assert_eq!(request.reason.as_deref(), Some("lost card"));
        assert_eq!(request.comments, None);
    }

    #[test]
    fn test_update_keeps_blank_as_clear() {
        let mut changes = UpdateIdRequest {
            comments: Some("   ".to_string()),
            reason: Some(" lost ".to_string()),
            ..Default::default()
        };
        changes.normalize();

        assert!(!changes.is_empty());
        assert_eq!(changes.comments.as_deref(), Some(""));
        assert_eq!(changes.reason.as_deref(), Some("lost"));
        assert_eq!(cleared_if_blank(String::new()), None);
        assert_eq!(cleared_if_blank("x".to_string()), Some("x".to_string()));
    }

    #[test]
    fn test_request_serializes_type_field() {
        let now = Utc::now();
        let request = IdRequest {
            id: 1,
            user_id: 1,
            status: RequestStatus::Pending,
            request_type: Some(RequestType::Replacement),
            photo_url: None,
            reason: None,
            comments: None,
            paid: false,
            request_date: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "REPLACEMENT");
        assert_eq!(json["status"], "PENDING");
    }
}

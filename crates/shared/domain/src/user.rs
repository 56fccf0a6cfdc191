//! User domain entity and related types.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::*;
use crate::error::DomainError;
use crate::password::Password;
use crate::validation::{normalize_email, normalize_text};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    /// Stored tag value
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => ROLE_STUDENT,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ROLE_STUDENT) {
            Ok(Role::Student)
        } else if s.eq_ignore_ascii_case(ROLE_ADMIN) {
            Ok(Role::Admin)
        } else {
            Err(DomainError::validation(format!(
                "Invalid role '{}'. Must be one of: {}, {}",
                s, ROLE_STUDENT, ROLE_ADMIN
            )))
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i32,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub department: String,
    pub program: String,
    pub roles: BTreeSet<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Stored credential as a verifiable value object
    pub fn password(&self) -> Password {
        Password::from_hash(self.password_hash.clone())
    }
}

/// User registration input (plain text password)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Student ID is required"))]
    pub student_id: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email must be a valid email address")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
    #[validate(length(min = 1, message = "Program is required"))]
    pub program: String,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

impl CreateUser {
    /// Trim text fields and lower-case the email.
    ///
    /// The password is left untouched, only blankness is checked on it.
    pub fn normalize(&mut self) {
        normalize_text(&mut self.student_id);
        normalize_text(&mut self.first_name);
        normalize_text(&mut self.last_name);
        normalize_email(&mut self.email);
        normalize_text(&mut self.department);
        normalize_text(&mut self.program);
    }

    pub fn into_new_user(self, password: Password) -> NewUser {
        NewUser {
            student_id: self.student_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: password.into_string(),
            department: self.department,
            program: self.program,
            roles: self.roles,
        }
    }
}

/// User record as handed to the store (password already hashed)
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "Student ID is required"))]
    pub student_id: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email must be a valid email address")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password_hash: String,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
    #[validate(length(min = 1, message = "Program is required"))]
    pub program: String,
    pub roles: BTreeSet<Role>,
}

impl NewUser {
    pub fn normalize(&mut self) {
        normalize_text(&mut self.student_id);
        normalize_text(&mut self.first_name);
        normalize_text(&mut self.last_name);
        normalize_email(&mut self.email);
        normalize_text(&mut self.department);
        normalize_text(&mut self.program);
    }
}

/// Partial user update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "Student ID is required"))]
    pub student_id: Option<String>,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: Option<String>,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email must be a valid email address")
    )]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: Option<String>,
    #[validate(length(min = 1, message = "Program is required"))]
    pub program: Option<String>,
    /// Replaces the whole role set
    pub roles: Option<BTreeSet<Role>>,
}

impl UpdateUser {
    pub fn normalize(&mut self) {
        for field in [
            &mut self.student_id,
            &mut self.first_name,
            &mut self.last_name,
            &mut self.department,
            &mut self.program,
        ] {
            if let Some(value) = field.as_mut() {
                normalize_text(value);
            }
        }
        if let Some(email) = self.email.as_mut() {
            normalize_email(email);
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &UpdateUser::default()
    }
}

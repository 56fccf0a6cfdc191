//! Domain layer - Core entities and value objects of the ID card system.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! users with their role sets, ID card requests with their status tags, and
//! the password value object.

pub mod constants;
pub mod error;
pub mod id_request;
pub mod password;
pub mod user;
pub mod validation;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use id_request::{
    cleared_if_blank, IdRequest, NewIdRequest, RequestStatus, RequestType, UpdateIdRequest,
};
pub use password::Password;
pub use user::{CreateUser, NewUser, Role, UpdateUser, User};
pub use validation::validate_input;

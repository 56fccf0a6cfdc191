//! ID Card Service Library
//!
//! Storage and use cases for student ID card requests: user accounts with
//! their roles, and the card requests those users submit. Exposed through the
//! `idcard-service` command-line binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

pub use config::IdCardServiceConfig;
pub use infra::Database;
pub use service::{IdRequestService, Services, UserService};

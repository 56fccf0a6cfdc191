//! CLI module - Command-line interface for the service.
//!
//! Provides commands for:
//! - `migrate` - Database migrations
//! - `users` - Account management
//! - `requests` - ID card request processing

pub mod args;

pub use args::{Cli, Commands};

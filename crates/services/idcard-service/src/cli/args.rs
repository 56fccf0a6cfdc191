//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Args, Parser, Subcommand};

use domain::{RequestStatus, RequestType, Role};

/// ID card request backend - accounts and card requests
#[derive(Parser, Debug)]
#[command(name = "idcard-service")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database URL, overrides IDCARD_DATABASE_URL / DATABASE_URL
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run database migrations
    Migrate(MigrateArgs),

    /// Manage user accounts
    Users(UsersArgs),

    /// Manage ID card requests
    Requests(RequestsArgs),
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the users command
#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// User management actions
#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// List all users
    List,
    /// Show one user
    Show(UserLookup),
    /// Register a new user
    Create(CreateUserArgs),
    /// Update profile fields or roles
    Update(UpdateUserArgs),
    /// Change a user's password
    Passwd {
        id: i32,
        #[arg(long)]
        current: String,
        #[arg(long = "new")]
        new_password: String,
    },
    /// Delete a user without requests
    Delete { id: i32 },
}

/// Exactly one lookup key
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct UserLookup {
    #[arg(long)]
    pub id: Option<i32>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub student_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateUserArgs {
    #[arg(long)]
    pub student_id: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub department: String,
    #[arg(long)]
    pub program: String,
    /// Role to grant, repeatable (STUDENT, ADMIN)
    #[arg(long = "role")]
    pub roles: Vec<Role>,
}

#[derive(Args, Debug)]
pub struct UpdateUserArgs {
    pub id: i32,
    #[arg(long)]
    pub student_id: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub program: Option<String>,
    /// Replaces the role set, repeatable
    #[arg(long = "role")]
    pub roles: Vec<Role>,
}

/// Arguments for the requests command
#[derive(Parser, Debug)]
pub struct RequestsArgs {
    #[command(subcommand)]
    pub action: RequestsAction,
}

/// ID request actions
#[derive(Subcommand, Debug)]
pub enum RequestsAction {
    /// List requests, newest first
    List {
        #[arg(long, conflicts_with = "status")]
        user_id: Option<i32>,
        #[arg(long)]
        status: Option<RequestStatus>,
    },
    /// Show one request
    Show { id: i32 },
    /// Submit a request for a user
    Submit {
        #[arg(long)]
        user_id: i32,
        #[arg(long = "type")]
        request_type: Option<RequestType>,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        photo_url: Option<String>,
    },
    /// Change the status of a request
    SetStatus {
        id: i32,
        status: RequestStatus,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Record payment of the card fee
    MarkPaid { id: i32 },
    /// Delete a request
    Delete { id: i32 },
}

//! Users command - Account management from the command line.

use std::collections::BTreeSet;

use crate::cli::args::{CreateUserArgs, UpdateUserArgs, UserLookup, UsersAction, UsersArgs};
use crate::config::IdCardServiceConfig;
use common::{AppError, AppResult};
use domain::{CreateUser, UpdateUser};

use super::{connect_services, print_json};

/// Execute the users command
pub async fn execute(args: UsersArgs, config: IdCardServiceConfig) -> AppResult<()> {
    let services = connect_services(&config).await?;
    let users = services.users;

    match args.action {
        UsersAction::List => print_json(&users.list_users().await?),
        UsersAction::Show(lookup) => {
            let user = match lookup {
                UserLookup { id: Some(id), .. } => users.get_user(id).await?,
                UserLookup {
                    email: Some(email), ..
                } => users.get_user_by_email(&email).await?,
                UserLookup {
                    student_id: Some(student_id),
                    ..
                } => users.get_user_by_student_id(&student_id).await?,
                _ => return Err(AppError::validation("A lookup key is required")),
            };
            print_json(&user)
        }
        UsersAction::Create(create) => print_json(&users.register(create.into()).await?),
        UsersAction::Update(update) => {
            let id = update.id;
            print_json(&users.update_user(id, update.into()).await?)
        }
        UsersAction::Passwd {
            id,
            current,
            new_password,
        } => {
            users.change_password(id, &current, &new_password).await?;
            println!("Password changed for user {}", id);
            Ok(())
        }
        UsersAction::Delete { id } => {
            users.delete_user(id).await?;
            println!("Deleted user {}", id);
            Ok(())
        }
    }
}

impl From<CreateUserArgs> for CreateUser {
    fn from(args: CreateUserArgs) -> Self {
        CreateUser {
            student_id: args.student_id,
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            password: args.password,
            department: args.department,
            program: args.program,
            roles: args.roles.into_iter().collect(),
        }
    }
}

impl From<UpdateUserArgs> for UpdateUser {
    fn from(args: UpdateUserArgs) -> Self {
        let roles = (!args.roles.is_empty()).then(|| args.roles.into_iter().collect::<BTreeSet<_>>());

        UpdateUser {
            student_id: args.student_id,
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            department: args.department,
            program: args.program,
            roles,
        }
    }
}

//! User service - Handles account use cases.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{validate_input, CreateUser, Password, UpdateUser, User};

use crate::repository::{IdRequestRepository, UserRepository};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new account, hashing the supplied password
    async fn register(&self, input: CreateUser) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// Get user by email
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    /// Get user by student ID
    async fn get_user_by_student_id(&self, student_id: &str) -> AppResult<User>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Update profile fields and/or the role set
    async fn update_user(&self, id: i32, changes: UpdateUser) -> AppResult<User>;

    /// Replace the password after verifying the current one
    async fn change_password(&self, id: i32, current: &str, new_password: &str) -> AppResult<()>;

    /// Delete a user that owns no requests
    async fn delete_user(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserService using repositories.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    requests: Arc<dyn IdRequestRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>, requests: Arc<dyn IdRequestRepository>) -> Self {
        Self { users, requests }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn register(&self, mut input: CreateUser) -> AppResult<User> {
        input.normalize();
        validate_input(&input)?;

        if self.users.exists_by_email(&input.email).await? {
            return Err(AppError::conflict("Email"));
        }
        if self.users.exists_by_student_id(&input.student_id).await? {
            return Err(AppError::conflict("Student ID"));
        }

        let password = Password::new(&input.password)?;
        let user = self.users.create(input.into_new_user(password)).await?;

        tracing::info!(user_id = user.id, student_id = %user.student_id, "User registered");
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.users.find_by_email(email).await?.ok_or_not_found()
    }

    async fn get_user_by_student_id(&self, student_id: &str) -> AppResult<User> {
        self.users
            .find_by_student_id(student_id)
            .await?
            .ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    async fn update_user(&self, id: i32, mut changes: UpdateUser) -> AppResult<User> {
        changes.normalize();
        if changes.is_empty() {
            return Err(AppError::validation("No changes provided"));
        }
        validate_input(&changes)?;

        let user = self.users.update(id, changes).await?;
        tracing::info!(user_id = id, "User updated");
        Ok(user)
    }

    async fn change_password(&self, id: i32, current: &str, new_password: &str) -> AppResult<()> {
        let user = self.get_user(id).await?;

        if let Err(err) = user.password().check(current) {
            tracing::warn!(user_id = id, "Password change rejected: current password mismatch");
            return Err(err.into());
        }

        let password = Password::new(new_password)?;
        self.users
            .update_password(id, password.into_string())
            .await?;

        tracing::info!(user_id = id, "Password changed");
        Ok(())
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.get_user(id).await?;

        let owned = self.requests.count_for_user(id).await?;
        if owned > 0 {
            tracing::warn!(user_id = id, requests = owned, "Refusing to delete user with requests");
            return Err(AppError::referenced("User"));
        }

        self.users.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}

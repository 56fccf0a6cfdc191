//! User repository: account records, their role sets and uniqueness rules.

use std::collections::BTreeSet;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use super::entities::id_request::{self, Entity as IdRequestEntity};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::entities::user_role::{self, Entity as UserRoleEntity};
use super::touch;
use common::{AppError, AppResult};
use domain::{validate_input, DomainError, NewUser, Role, UpdateUser, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Emails are stored lower-cased and student IDs trimmed; lookups apply the
/// same normalisation to their argument. Both are unique across all users.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by student ID
    async fn find_by_student_id(&self, student_id: &str) -> AppResult<Option<User>>;

    /// Whether any user has this email
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Whether any user has this student ID
    async fn exists_by_student_id(&self, student_id: &str) -> AppResult<bool>;

    /// Create a new user with its role set.
    ///
    /// Fails with `Validation` for blank or malformed fields and with
    /// `Conflict` when the email or student ID is taken.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply a partial update; `roles`, when present, replaces the role set
    async fn update(&self, id: i32, changes: UpdateUser) -> AppResult<User>;

    /// Replace the stored password hash
    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<User>;

    /// Delete user and its role rows
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// List all users ordered by ID
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        match UserEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => load_user(&self.db, model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(canonical_email(email)))
            .one(&self.db)
            .await?;

        match result {
            Some(model) => load_user(&self.db, model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_by_student_id(&self, student_id: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::StudentId.eq(student_id.trim()))
            .one(&self.db)
            .await?;

        match result {
            Some(model) => load_user(&self.db, model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        email_taken(&self.db, &canonical_email(email), None).await
    }

    async fn exists_by_student_id(&self, student_id: &str) -> AppResult<bool> {
        student_id_taken(&self.db, student_id.trim(), None).await
    }

    async fn create(&self, mut user: NewUser) -> AppResult<User> {
        user.normalize();
        validate_input(&user)?;

        let txn = self.db.begin().await?;

        if email_taken(&txn, &user.email, None).await? {
            return Err(AppError::conflict("Email"));
        }
        if student_id_taken(&txn, &user.student_id, None).await? {
            return Err(AppError::conflict("Student ID"));
        }

        let now = Utc::now();
        let active_model = ActiveModel {
            id: NotSet,
            student_id: Set(user.student_id),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            department: Set(user.department),
            program: Set(user.program),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&txn).await.map_err(map_write_err)?;
        replace_roles(&txn, model.id, &user.roles).await?;
        txn.commit().await?;

        tracing::debug!(user_id = model.id, "User created");
        to_domain(model, user.roles)
    }

    async fn update(&self, id: i32, mut changes: UpdateUser) -> AppResult<User> {
        changes.normalize();
        validate_input(&changes)?;

        let txn = self.db.begin().await?;

        let existing = UserEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        if changes.is_empty() {
            return load_user(&txn, existing).await;
        }

        if let Some(email) = &changes.email {
            if email_taken(&txn, email, Some(id)).await? {
                return Err(AppError::conflict("Email"));
            }
        }
        if let Some(student_id) = &changes.student_id {
            if student_id_taken(&txn, student_id, Some(id)).await? {
                return Err(AppError::conflict("Student ID"));
            }
        }

        let updated_at = touch(existing.updated_at);
        let mut active: ActiveModel = existing.into();

        if let Some(student_id) = changes.student_id {
            active.student_id = Set(student_id);
        }
        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(department) = changes.department {
            active.department = Set(department);
        }
        if let Some(program) = changes.program {
            active.program = Set(program);
        }
        active.updated_at = Set(updated_at);

        let model = active.update(&txn).await.map_err(map_write_err)?;
        if let Some(roles) = &changes.roles {
            replace_roles(&txn, id, roles).await?;
        }

        let user = load_user(&txn, model).await?;
        txn.commit().await?;

        tracing::debug!(user_id = id, "User updated");
        Ok(user)
    }

    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<User> {
        if password_hash.trim().is_empty() {
            return Err(AppError::validation(domain::MSG_PASSWORD_REQUIRED));
        }

        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let updated_at = touch(existing.updated_at);
        let mut active: ActiveModel = existing.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(updated_at);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        tracing::debug!(user_id = id, "User password replaced");
        load_user(&self.db, model).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let owned_requests = IdRequestEntity::find()
            .filter(id_request::Column::UserId.eq(id))
            .count(&txn)
            .await?;
        if owned_requests > 0 {
            return Err(AppError::referenced("User"));
        }

        UserRoleEntity::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .exec(&txn)
            .await?;

        let result = UserEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_write_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        txn.commit().await?;
        tracing::debug!(user_id = id, "User deleted");
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let rows = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .find_with_related(UserRoleEntity)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(model, roles)| to_domain(model, parse_roles(roles)?))
            .collect()
    }
}

fn canonical_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn email_taken<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    except_id: Option<i32>,
) -> AppResult<bool> {
    let mut query = UserEntity::find().filter(user::Column::Email.eq(email));
    if let Some(id) = except_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}

async fn student_id_taken<C: ConnectionTrait>(
    conn: &C,
    student_id: &str,
    except_id: Option<i32>,
) -> AppResult<bool> {
    let mut query = UserEntity::find().filter(user::Column::StudentId.eq(student_id));
    if let Some(id) = except_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}

/// Replace the role rows of a user with the given set.
async fn replace_roles<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    roles: &BTreeSet<Role>,
) -> AppResult<()> {
    UserRoleEntity::delete_many()
        .filter(user_role::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;

    if roles.is_empty() {
        return Ok(());
    }

    let rows = roles.iter().map(|role| user_role::ActiveModel {
        user_id: Set(user_id),
        role: Set(role.as_str().to_string()),
    });

    UserRoleEntity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn load_user<C: ConnectionTrait>(conn: &C, model: user::Model) -> AppResult<User> {
    let roles = model.find_related(UserRoleEntity).all(conn).await?;
    to_domain(model, parse_roles(roles)?)
}

fn parse_roles(rows: Vec<user_role::Model>) -> AppResult<BTreeSet<Role>> {
    rows.into_iter()
        .map(|row| {
            Role::from_str(&row.role)
                .map_err(|_| AppError::from(DomainError::unknown_tag("role", row.role.as_str())))
        })
        .collect()
}

/// Convert database model plus role set to domain entity
fn to_domain(model: user::Model, roles: BTreeSet<Role>) -> AppResult<User> {
    Ok(User {
        id: model.id,
        student_id: model.student_id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        password_hash: model.password_hash,
        department: model.department,
        program: model.program,
        roles,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// Map insert/update failures, reporting unique-index races as conflicts.
fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            if msg.contains("student_id") {
                AppError::conflict("Student ID")
            } else if msg.contains("email") {
                AppError::conflict("Email")
            } else {
                AppError::conflict("User")
            }
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::referenced("User"),
        _ => AppError::from(err),
    }
}

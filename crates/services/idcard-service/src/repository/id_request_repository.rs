//! ID request repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, SqlErr,
};

use super::entities::id_request::{self, ActiveModel, Entity as IdRequestEntity};
use super::entities::user::Entity as UserEntity;
use super::touch;
use common::{AppError, AppResult};
use domain::{cleared_if_blank, IdRequest, NewIdRequest, RequestStatus, UpdateIdRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// ID request repository trait for dependency injection.
///
/// All list operations return a snapshot ordered by request date, most
/// recent first. Requests with the same date are ordered by descending ID.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdRequestRepository: Send + Sync {
    /// Create a request.
    ///
    /// Status defaults to PENDING, paid to false and the request date to now.
    /// The referenced user must exist.
    async fn create(&self, request: NewIdRequest) -> AppResult<IdRequest>;

    /// Find request by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<IdRequest>>;

    /// Requests whose user is `user_id`, newest first
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<IdRequest>>;

    /// Every request, newest first
    async fn list_all(&self) -> AppResult<Vec<IdRequest>>;

    /// Requests currently in `status`, newest first
    async fn list_by_status(&self, status: RequestStatus) -> AppResult<Vec<IdRequest>>;

    /// Number of requests owned by a user
    async fn count_for_user(&self, user_id: i32) -> AppResult<u64>;

    /// Apply a partial update. No transition rules are enforced on status.
    /// Blank text fields are stored as null.
    async fn update(&self, id: i32, changes: UpdateIdRequest) -> AppResult<IdRequest>;

    /// Delete request by ID
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of IdRequestRepository
pub struct IdRequestStore {
    db: DatabaseConnection,
}

impl IdRequestStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch_newest_first(&self, query: Select<IdRequestEntity>) -> AppResult<Vec<IdRequest>> {
        let models = query
            .order_by_desc(id_request::Column::RequestDate)
            .order_by_desc(id_request::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(to_domain).collect()
    }
}

#[async_trait]
impl IdRequestRepository for IdRequestStore {
    async fn create(&self, mut request: NewIdRequest) -> AppResult<IdRequest> {
        request.normalize();

        if UserEntity::find_by_id(request.user_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(AppError::validation("Referenced user does not exist"));
        }

        let request_date = request.request_date.unwrap_or_else(Utc::now);
        let active_model = ActiveModel {
            id: NotSet,
            user_id: Set(request.user_id),
            status: Set(request.status.unwrap_or_default().as_str().to_string()),
            request_type: Set(request.request_type.map(|t| t.as_str().to_string())),
            photo_url: Set(request.photo_url),
            reason: Set(request.reason),
            comments: Set(request.comments),
            paid: Set(request.paid.unwrap_or(false)),
            request_date: Set(request_date),
            updated_at: Set(request_date),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_err)?;
        tracing::debug!(request_id = model.id, user_id = model.user_id, "ID request created");
        to_domain(model)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<IdRequest>> {
        IdRequestEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<IdRequest>> {
        self.fetch_newest_first(
            IdRequestEntity::find().filter(id_request::Column::UserId.eq(user_id)),
        )
        .await
    }

    async fn list_all(&self) -> AppResult<Vec<IdRequest>> {
        self.fetch_newest_first(IdRequestEntity::find()).await
    }

    async fn list_by_status(&self, status: RequestStatus) -> AppResult<Vec<IdRequest>> {
        self.fetch_newest_first(
            IdRequestEntity::find().filter(id_request::Column::Status.eq(status.as_str())),
        )
        .await
    }

    async fn count_for_user(&self, user_id: i32) -> AppResult<u64> {
        IdRequestEntity::find()
            .filter(id_request::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, id: i32, mut changes: UpdateIdRequest) -> AppResult<IdRequest> {
        let existing = IdRequestEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        changes.normalize();
        if changes.is_empty() {
            return to_domain(existing);
        }

        let updated_at = touch(existing.updated_at);
        let mut active: ActiveModel = existing.into();

        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(request_type) = changes.request_type {
            active.request_type = Set(Some(request_type.as_str().to_string()));
        }
        if let Some(photo_url) = changes.photo_url {
            active.photo_url = Set(cleared_if_blank(photo_url));
        }
        if let Some(reason) = changes.reason {
            active.reason = Set(cleared_if_blank(reason));
        }
        if let Some(comments) = changes.comments {
            active.comments = Set(cleared_if_blank(comments));
        }
        if let Some(paid) = changes.paid {
            active.paid = Set(paid);
        }
        active.updated_at = Set(updated_at);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        tracing::debug!(request_id = id, status = %model.status, "ID request updated");
        to_domain(model)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = IdRequestEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        tracing::debug!(request_id = id, "ID request deleted");
        Ok(())
    }
}

fn to_domain(model: id_request::Model) -> AppResult<IdRequest> {
    IdRequest::try_from(model).map_err(AppError::from)
}

/// A user removed between the existence check and the insert
fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            AppError::validation("Referenced user does not exist")
        }
        _ => AppError::from(err),
    }
}

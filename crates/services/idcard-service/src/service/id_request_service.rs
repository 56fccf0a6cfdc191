//! ID request service - Submission and processing of card requests.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{IdRequest, NewIdRequest, RequestStatus, UpdateIdRequest};

use crate::repository::{IdRequestRepository, UserRepository};

/// ID request service trait for dependency injection.
#[async_trait]
pub trait IdRequestService: Send + Sync {
    /// Submit a request on behalf of an existing user
    async fn submit_request(&self, request: NewIdRequest) -> AppResult<IdRequest>;

    /// Get request by ID
    async fn get_request(&self, id: i32) -> AppResult<IdRequest>;

    /// Requests of one user, newest first
    async fn list_requests_for_user(&self, user_id: i32) -> AppResult<Vec<IdRequest>>;

    /// All requests, newest first
    async fn list_all_requests(&self) -> AppResult<Vec<IdRequest>>;

    /// Requests in a given status, newest first
    async fn list_requests_by_status(&self, status: RequestStatus) -> AppResult<Vec<IdRequest>>;

    /// Apply a partial update
    async fn update_request(&self, id: i32, changes: UpdateIdRequest) -> AppResult<IdRequest>;

    /// Move a request to `status`, optionally replacing its comments
    async fn update_status(
        &self,
        id: i32,
        status: RequestStatus,
        comments: Option<String>,
    ) -> AppResult<IdRequest>;

    /// Record the card fee as paid
    async fn mark_paid(&self, id: i32) -> AppResult<IdRequest>;

    /// Delete request by ID
    async fn delete_request(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of IdRequestService using repositories.
pub struct IdRequestManager {
    requests: Arc<dyn IdRequestRepository>,
    users: Arc<dyn UserRepository>,
}

impl IdRequestManager {
    pub fn new(requests: Arc<dyn IdRequestRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { requests, users }
    }

    async fn ensure_user(&self, user_id: i32) -> AppResult<()> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_not_found()
    }
}

fn note_transition(id: i32, current: RequestStatus, next: RequestStatus) {
    if !current.is_forward_transition(next) {
        tracing::warn!(
            request_id = id,
            from = %current,
            to = %next,
            "Unusual status transition"
        );
    }
}

#[async_trait]
impl IdRequestService for IdRequestManager {
    async fn submit_request(&self, mut request: NewIdRequest) -> AppResult<IdRequest> {
        request.normalize();
        self.ensure_user(request.user_id).await?;

        let created = self.requests.create(request).await?;
        tracing::info!(
            request_id = created.id,
            user_id = created.user_id,
            "ID request submitted"
        );
        Ok(created)
    }

    async fn get_request(&self, id: i32) -> AppResult<IdRequest> {
        self.requests.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_requests_for_user(&self, user_id: i32) -> AppResult<Vec<IdRequest>> {
        self.ensure_user(user_id).await?;
        self.requests.list_for_user(user_id).await
    }

    async fn list_all_requests(&self) -> AppResult<Vec<IdRequest>> {
        self.requests.list_all().await
    }

    async fn list_requests_by_status(&self, status: RequestStatus) -> AppResult<Vec<IdRequest>> {
        self.requests.list_by_status(status).await
    }

    async fn update_request(&self, id: i32, mut changes: UpdateIdRequest) -> AppResult<IdRequest> {
        changes.normalize();
        if changes.is_empty() {
            return Err(AppError::validation("No changes provided"));
        }

        if let Some(next) = changes.status {
            let current = self.get_request(id).await?;
            note_transition(id, current.status, next);
        }

        let updated = self.requests.update(id, changes).await?;
        tracing::info!(request_id = id, "ID request updated");
        Ok(updated)
    }

    async fn update_status(
        &self,
        id: i32,
        status: RequestStatus,
        comments: Option<String>,
    ) -> AppResult<IdRequest> {
        let current = self.get_request(id).await?;
        note_transition(id, current.status, status);

        let changes = UpdateIdRequest {
            comments,
            ..UpdateIdRequest::status(status)
        };
        let updated = self.requests.update(id, changes).await?;

        tracing::info!(
            request_id = id,
            from = %current.status,
            to = %updated.status,
            "ID request status changed"
        );
        Ok(updated)
    }

    async fn mark_paid(&self, id: i32) -> AppResult<IdRequest> {
        let changes = UpdateIdRequest {
            paid: Some(true),
            ..Default::default()
        };
        let updated = self.requests.update(id, changes).await?;
        tracing::info!(request_id = id, "ID request marked paid");
        Ok(updated)
    }

    async fn delete_request(&self, id: i32) -> AppResult<()> {
        self.requests.delete(id).await?;
        tracing::info!(request_id = id, "ID request deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;
    use mockall::predicate::eq;

    use super::*;
    use crate::repository::{MockIdRequestRepository, MockUserRepository};
    use domain::User;

    fn user(id: i32) -> User {
        let now = Utc::now();
        User {
            id,
            student_id: format!("S{}", id),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: format!("user{}@school.edu", id),
            password_hash: "hash".to_string(),
            department: "Mathematics".to_string(),
            program: "BSc Mathematics".to_string(),
            roles: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn request(id: i32, user_id: i32, status: RequestStatus) -> IdRequest {
        let now = Utc::now();
        IdRequest {
            id,
            user_id,
            status,
            request_type: None,
            photo_url: None,
            reason: None,
            comments: None,
            paid: false,
            request_date: now,
            updated_at: now,
        }
    }

    fn service(requests: MockIdRequestRepository, users: MockUserRepository) -> IdRequestManager {
        IdRequestManager::new(Arc::new(requests), Arc::new(users))
    }

    #[tokio::test]
    async fn test_submit_request_for_existing_user() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(7))
            .returning(|id| Ok(Some(user(id))));

        let mut requests = MockIdRequestRepository::new();
        requests
            .expect_create()
            .withf(|r| r.user_id == 7 && r.reason.as_deref() == Some("Lost card"))
            .returning(|r| Ok(request(1, r.user_id, RequestStatus::Pending)));

        let mut input = NewIdRequest::for_user(7);
        input.reason = Some("  Lost card ".to_string());

        let created = service(requests, users).submit_request(input).await.unwrap();

        assert_eq!(created.status, RequestStatus::Pending);
        assert!(!created.paid);
    }

    #[tokio::test]
    async fn test_submit_request_unknown_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let mut requests = MockIdRequestRepository::new();
        requests.expect_create().never();

        let result = service(requests, users)
            .submit_request(NewIdRequest::for_user(99))
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_requests_for_unknown_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let mut requests = MockIdRequestRepository::new();
        requests.expect_list_for_user().never();

        let result = service(requests, users).list_requests_for_user(3).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_status_allows_any_transition() {
        let mut requests = MockIdRequestRepository::new();
        requests
            .expect_find_by_id()
            .with(eq(5))
            .returning(|id| Ok(Some(request(id, 1, RequestStatus::Delivered))));
        requests
            .expect_update()
            .withf(|id, changes| {
                *id == 5
                    && changes.status == Some(RequestStatus::Pending)
                    && changes.comments.as_deref() == Some("Reopened")
            })
            .times(1)
            .returning(|id, _| Ok(request(id, 1, RequestStatus::Pending)));

        let updated = service(requests, MockUserRepository::new())
            .update_status(5, RequestStatus::Pending, Some("Reopened".to_string()))
            .await
            .unwrap();

        assert_eq!(updated.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_status_missing_request() {
        let mut requests = MockIdRequestRepository::new();
        requests.expect_find_by_id().returning(|_| Ok(None));
        requests.expect_update().never();

        let result = service(requests, MockUserRepository::new())
            .update_status(5, RequestStatus::Approved, None)
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_request_requires_changes() {
        let mut requests = MockIdRequestRepository::new();
        requests.expect_update().never();

        let result = service(requests, MockUserRepository::new())
            .update_request(1, UpdateIdRequest::default())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_request_blank_reason_clears() {
        let mut requests = MockIdRequestRepository::new();
        requests
            .expect_update()
            .withf(|id, changes| *id == 1 && changes.reason.as_deref() == Some(""))
            .times(1)
            .returning(|id, _| Ok(request(id, 1, RequestStatus::Pending)));

        let changes = UpdateIdRequest {
            reason: Some("   ".to_string()),
            ..Default::default()
        };
        let updated = service(requests, MockUserRepository::new())
            .update_request(1, changes)
            .await
            .unwrap();

        assert!(updated.reason.is_none());
    }

    #[tokio::test]
    async fn test_mark_paid() {
        let mut requests = MockIdRequestRepository::new();
        requests
            .expect_update()
            .withf(|id, changes| *id == 2 && changes.paid == Some(true) && changes.status.is_none())
            .returning(|id, _| {
                let mut paid = request(id, 1, RequestStatus::Approved);
                paid.paid = true;
                Ok(paid)
            });

        let updated = service(requests, MockUserRepository::new())
            .mark_paid(2)
            .await
            .unwrap();

        assert!(updated.paid);
    }
}

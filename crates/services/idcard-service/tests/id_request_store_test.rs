mod support;

use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use common::AppError;
use domain::{NewIdRequest, RequestStatus, RequestType, UpdateIdRequest};
use idcard_service_lib::repository::{IdRequestRepository, UserRepository};

use support::{new_user, setup_stores};

#[tokio::test]
async fn test_create_applies_defaults() {
    let (users, requests) = setup_stores().await;
    let user = users.create(new_user("S1", "a@x.edu")).await.unwrap();

    let before = Utc::now();
    let created = requests
        .create(NewIdRequest::for_user(user.id))
        .await
        .unwrap();

    assert_eq!(created.user_id, user.id);
    assert_eq!(created.status, RequestStatus::Pending);
    assert!(!created.paid);
    assert!(created.request_date >= before);
    assert_eq!(created.request_date, created.updated_at);
    assert!(created.request_type.is_none());
}

#[tokio::test]
async fn test_create_keeps_supplied_fields() {
    let (users, requests) = setup_stores().await;
    let user = users.create(new_user("S1", "a@x.edu")).await.unwrap();

    let created = requests
        .create(NewIdRequest {
            request_type: Some(RequestType::Replacement),
            reason: Some(" Card was stolen ".to_string()),
            photo_url: Some("/uploads/s1.jpg".to_string()),
            comments: Some("".to_string()),
            ..NewIdRequest::for_user(user.id)
        })
        .await
        .unwrap();

    let found = requests.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.request_type, Some(RequestType::Replacement));
    assert_eq!(found.reason.as_deref(), Some("Card was stolen"));
    assert_eq!(found.photo_url.as_deref(), Some("/uploads/s1.jpg"));
    assert!(found.comments.is_none());
}

#[tokio::test]
async fn test_create_for_missing_user_fails() {
    let (_, requests) = setup_stores().await;

    let result = requests.create(NewIdRequest::for_user(42)).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(requests.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_for_user_newest_first() {
    let (users, requests) = setup_stores().await;
    let alice = users.create(new_user("S1", "a@x.edu")).await.unwrap();
    let bob = users.create(new_user("S2", "b@x.edu")).await.unwrap();

    let t1 = Utc::now() - Duration::days(2);
    let t2 = Utc::now() - Duration::days(1);

    let older = requests
        .create(NewIdRequest {
            request_date: Some(t1),
            ..NewIdRequest::for_user(alice.id)
        })
        .await
        .unwrap();
    let newer = requests
        .create(NewIdRequest {
            request_date: Some(t2),
            ..NewIdRequest::for_user(alice.id)
        })
        .await
        .unwrap();
    requests
        .create(NewIdRequest::for_user(bob.id))
        .await
        .unwrap();

    let ids: Vec<i32> = requests
        .list_for_user(alice.id)
        .await
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    assert_eq!(requests.count_for_user(alice.id).await.unwrap(), 2);
    assert_eq!(requests.count_for_user(bob.id).await.unwrap(), 1);
    assert!(requests.list_for_user(999).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_all_newest_first_with_id_tiebreak() {
    let (users, requests) = setup_stores().await;
    let alice = users.create(new_user("S1", "a@x.edu")).await.unwrap();
    let bob = users.create(new_user("S2", "b@x.edu")).await.unwrap();

    let same_day = Utc::now() - Duration::hours(3);
    let first = requests
        .create(NewIdRequest {
            request_date: Some(same_day),
            ..NewIdRequest::for_user(alice.id)
        })
        .await
        .unwrap();
    let second = requests
        .create(NewIdRequest {
            request_date: Some(same_day),
            ..NewIdRequest::for_user(bob.id)
        })
        .await
        .unwrap();
    let latest = requests
        .create(NewIdRequest::for_user(alice.id))
        .await
        .unwrap();

    let ids: Vec<i32> = requests
        .list_all()
        .await
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![latest.id, second.id, first.id]);
}

#[tokio::test]
async fn test_list_by_status() {
    let (users, requests) = setup_stores().await;
    let user = users.create(new_user("S1", "a@x.edu")).await.unwrap();

    let pending = requests
        .create(NewIdRequest::for_user(user.id))
        .await
        .unwrap();
    let approved = requests
        .create(NewIdRequest {
            status: Some(RequestStatus::Approved),
            ..NewIdRequest::for_user(user.id)
        })
        .await
        .unwrap();

    let listed = requests
        .list_by_status(RequestStatus::Approved)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, approved.id);

    let listed = requests
        .list_by_status(RequestStatus::Pending)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, pending.id);

    assert!(requests
        .list_by_status(RequestStatus::Delivered)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_update_status_and_payment() {
    let (users, requests) = setup_stores().await;
    let user = users.create(new_user("S1", "a@x.edu")).await.unwrap();
    let created = requests
        .create(NewIdRequest::for_user(user.id))
        .await
        .unwrap();

    tokio::time::sleep(StdDuration::from_millis(20)).await;

    let updated = requests
        .update(
            created.id,
            UpdateIdRequest {
                paid: Some(true),
                comments: Some("Fee received".to_string()),
                ..UpdateIdRequest::status(RequestStatus::Ready)
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, RequestStatus::Ready);
    assert!(updated.paid);
    assert_eq!(updated.comments.as_deref(), Some("Fee received"));
    assert_eq!(updated.request_date, created.request_date);
    assert!(updated.updated_at > created.updated_at);

    // Any status may follow any other
    let reverted = requests
        .update(created.id, UpdateIdRequest::status(RequestStatus::Pending))
        .await
        .unwrap();
    assert_eq!(reverted.status, RequestStatus::Pending);
    assert!(reverted.paid);
}

#[tokio::test]
async fn test_update_blank_text_clears_field() {
    let (users, requests) = setup_stores().await;
    let user = users.create(new_user("S1", "a@x.edu")).await.unwrap();
    let created = requests
        .create(NewIdRequest {
            comments: Some("old".to_string()),
            reason: Some("Lost card".to_string()),
            photo_url: Some("/uploads/s1.jpg".to_string()),
            ..NewIdRequest::for_user(user.id)
        })
        .await
        .unwrap();

    let updated = requests
        .update(
            created.id,
            UpdateIdRequest {
                comments: Some("".to_string()),
                photo_url: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.comments.is_none());
    assert!(updated.photo_url.is_none());
    assert_eq!(updated.reason.as_deref(), Some("Lost card"));

    let reloaded = requests.find_by_id(created.id).await.unwrap().unwrap();
    assert!(reloaded.comments.is_none());
    assert!(reloaded.photo_url.is_none());
}

#[tokio::test]
async fn test_update_and_delete_missing_request() {
    let (_, requests) = setup_stores().await;

    assert!(matches!(
        requests
            .update(7, UpdateIdRequest::status(RequestStatus::Approved))
            .await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(requests.delete(7).await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_delete_request() {
    let (users, requests) = setup_stores().await;
    let user = users.create(new_user("S1", "a@x.edu")).await.unwrap();
    let created = requests
        .create(NewIdRequest::for_user(user.id))
        .await
        .unwrap();

    requests.delete(created.id).await.unwrap();

    assert!(requests.find_by_id(created.id).await.unwrap().is_none());
    assert_eq!(requests.count_for_user(user.id).await.unwrap(), 0);
}

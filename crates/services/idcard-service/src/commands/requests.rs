//! Requests command - ID card request processing from the command line.

use serde::Serialize;

use crate::cli::args::{RequestsAction, RequestsArgs};
use crate::config::IdCardServiceConfig;
use common::AppResult;
use domain::{IdRequest, NewIdRequest};

use super::{connect_services, print_json};

/// Execute the requests command
pub async fn execute(args: RequestsArgs, config: IdCardServiceConfig) -> AppResult<()> {
    let services = connect_services(&config).await?;
    let requests = services.requests;

    match args.action {
        RequestsAction::List { user_id, status } => {
            let listed = match (user_id, status) {
                (Some(user_id), _) => requests.list_requests_for_user(user_id).await?,
                (None, Some(status)) => requests.list_requests_by_status(status).await?,
                (None, None) => requests.list_all_requests().await?,
            };
            let views: Vec<RequestView> = listed.iter().map(RequestView::from).collect();
            print_json(&views)
        }
        RequestsAction::Show { id } => print_request(&requests.get_request(id).await?),
        RequestsAction::Submit {
            user_id,
            request_type,
            reason,
            photo_url,
        } => {
            let request = NewIdRequest {
                request_type,
                reason,
                photo_url,
                ..NewIdRequest::for_user(user_id)
            };
            print_request(&requests.submit_request(request).await?)
        }
        RequestsAction::SetStatus {
            id,
            status,
            comment,
        } => print_request(&requests.update_status(id, status, comment).await?),
        RequestsAction::MarkPaid { id } => print_request(&requests.mark_paid(id).await?),
        RequestsAction::Delete { id } => {
            requests.delete_request(id).await?;
            println!("Deleted request {}", id);
            Ok(())
        }
    }
}

/// Request as printed by the CLI, with the human readable status label.
#[derive(Serialize)]
struct RequestView<'a> {
    #[serde(flatten)]
    request: &'a IdRequest,
    status_label: &'static str,
}

impl<'a> From<&'a IdRequest> for RequestView<'a> {
    fn from(request: &'a IdRequest) -> Self {
        Self {
            request,
            status_label: request.status.label(),
        }
    }
}

fn print_request(request: &IdRequest) -> AppResult<()> {
    print_json(&RequestView::from(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::RequestStatus;

    #[test]
    fn test_view_includes_status_label() {
        let now = Utc::now();
        let request = IdRequest {
            id: 3,
            user_id: 1,
            status: RequestStatus::Ready,
            request_type: None,
            photo_url: None,
            reason: None,
            comments: None,
            paid: true,
            request_date: now,
            updated_at: now,
        };

        let json = serde_json::to_value(RequestView::from(&request)).unwrap();
        assert_eq!(json["status"], "READY");
        assert_eq!(json["status_label"], "Ready for Pickup");
        assert_eq!(json["id"], 3);
        assert_eq!(json["paid"], true);
    }
}

//! Service layer for business logic.

mod id_request_service;
mod user_service;

use std::sync::Arc;

use crate::infra::Database;
use crate::repository::{IdRequestStore, UserStore};

pub use id_request_service::{IdRequestManager, IdRequestService};
pub use user_service::{UserManager, UserService};

/// Services wired against one database connection.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserService>,
    pub requests: Arc<dyn IdRequestService>,
}

impl Services {
    pub fn new(db: &Database) -> Self {
        let user_repo = Arc::new(UserStore::new(db.get_connection()));
        let request_repo = Arc::new(IdRequestStore::new(db.get_connection()));

        Self {
            users: Arc::new(UserManager::new(user_repo.clone(), request_repo.clone())),
            requests: Arc::new(IdRequestManager::new(request_repo, user_repo)),
        }
    }
}

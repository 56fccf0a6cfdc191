// Shared setup for store integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;

use common::DatabaseConfig;
use domain::{NewUser, Password, Role};
use idcard_service_lib::repository::{IdRequestStore, UserStore};
use idcard_service_lib::Database;

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> Database {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..Default::default()
    };

    Database::connect(&config)
        .await
        .expect("Failed to create test database")
}

/// Creates both stores over one fresh database
pub async fn setup_stores() -> (UserStore, IdRequestStore) {
    let db = setup_test_db().await;
    (
        UserStore::new(db.get_connection()),
        IdRequestStore::new(db.get_connection()),
    )
}

/// A valid user record; the hash is a real argon2 hash of "password123"
pub fn new_user(student_id: &str, email: &str) -> NewUser {
    let password = Password::new("password123").expect("Failed to hash password");

    NewUser {
        student_id: student_id.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        password_hash: password.into_string(),
        department: "Computer Science".to_string(),
        program: "BSc Computer Science".to_string(),
        roles: BTreeSet::from([Role::Student]),
    }
}

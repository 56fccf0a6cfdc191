//! Repository layer for data access.

use chrono::{DateTime, Utc};

pub mod entities;
mod id_request_repository;
mod user_repository;

pub use id_request_repository::{IdRequestRepository, IdRequestStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use id_request_repository::MockIdRequestRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// Next `updated_at` value for a mutated record.
///
/// Never earlier than the previous value, even if the wall clock stepped back.
pub(crate) fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_touch_advances_to_now() {
        let previous = Utc::now() - Duration::hours(1);
        assert!(touch(previous) > previous);
    }

    #[test]
    fn test_touch_never_moves_backwards() {
        let future = Utc::now() + Duration::hours(1);
        assert_eq!(touch(future), future);
    }
}

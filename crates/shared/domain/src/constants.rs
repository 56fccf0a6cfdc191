//! Domain-level constants.
//!
//! Stored tag values. Field validation messages live on the `#[validate]`
//! attributes of the input types.

// =============================================================================
// User Roles
// =============================================================================

/// Role held by students who submit ID card requests
pub const ROLE_STUDENT: &str = "STUDENT";

/// Administrator role for reviewing and processing requests
pub const ROLE_ADMIN: &str = "ADMIN";

// =============================================================================
// Request Status
// =============================================================================

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_APPROVED: &str = "APPROVED";
pub const STATUS_REJECTED: &str = "REJECTED";
pub const STATUS_PROCESSING: &str = "PROCESSING";
pub const STATUS_READY: &str = "READY";
pub const STATUS_DELIVERED: &str = "DELIVERED";

// =============================================================================
// Request Type
// =============================================================================

/// First card issued to a student
pub const TYPE_NEW: &str = "NEW";

/// Replacement for a lost or damaged card
pub const TYPE_REPLACEMENT: &str = "REPLACEMENT";

// =============================================================================
// Validation
// =============================================================================

/// Blank password, raised before hashing and by the store on a blank hash
pub const MSG_PASSWORD_REQUIRED: &str = "Password is required";

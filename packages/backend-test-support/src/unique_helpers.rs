//! Helpers for generating unique test data
//!
//! ULID-based so ids sort by creation time, which keeps log output from
//! parallel tests readable.

use ulid::Ulid;

/// Generate a unique principal id with the given prefix, e.g. `client-01HV...`.
///
/// ```
/// use thappy_test_support::unique_helpers::unique_principal_id;
///
/// let a = unique_principal_id("client");
/// let b = unique_principal_id("client");
/// assert_ne!(a, b);
/// assert!(a.starts_with("client-"));
/// ```
pub fn unique_principal_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address in the format `{prefix}-{ulid}@example.test`.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new().to_string().to_lowercase())
}

//! Request ID generation

use uuid::Uuid;

/// Generate a correlation ID for one proxy request (UUID v4).
///
/// # Examples
///
/// ```
/// use fluxtogether::logging::generate_request_id;
///
/// let request_id = generate_request_id();
/// assert_eq!(request_id.len(), 36);
/// ```
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

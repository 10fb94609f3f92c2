//! UUID utilities

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Parse a document id from a path segment
///
/// Returns `None` when the segment is not a UUID, which the API reports as a
/// malformed id rather than a missing document.
pub fn parse_id(s: &str) -> Option<Uuid> {
    Uuid::parse_str(s.trim()).ok()
}

//! Unique ids so parallel tests never share rooms or players.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use landlord_test_support::unique_str;
///
/// let a = unique_str("room");
/// assert_ne!(a, unique_str("room"));
/// assert!(a.starts_with("room-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

pub fn unique_room_id() -> String {
    unique_str("room")
}

pub fn unique_player_id() -> String {
    unique_str("player")
}

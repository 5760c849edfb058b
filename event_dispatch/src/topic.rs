//! Topic matching

/// Returns whether a registered topic matches an incoming one
///
/// A registered topic `T` matches an incoming topic `E` when `E` begins
/// with `T` as a literal byte prefix: exactly `T.len()` bytes are
/// compared. A callback registered for `"sensor/"` fires for
/// `"sensor/temp"` and for `"sensor/"` itself; one registered for
/// `"sensor/temp"` does not fire for `"sensor/"`.
///
/// Note the direction: the *registered* topic is the prefix. This is
/// not a hierarchical wildcard scheme, and when several registered
/// topics match an incoming one, only the first slot in scan order
/// receives the message.
pub fn topic_matches(registered: &str, incoming: &str) -> bool {
    incoming.as_bytes().starts_with(registered.as_bytes())
}

/// Classification for retry policy.
///
/// Used by [`RetryPolicy`](crate::RetryPolicy) to decide how to respond to a
/// failed attempt.
///
/// # Behavior Summary
///
/// | Class | Retry? | Sleep Before Retry? |
/// |-------|--------|---------------------|
/// | `Never` | No | No |
/// | `WithBackoff` | Yes, while attempts remain | Yes (exponential) |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - the request is fundamentally invalid, the server
    /// rejected it with a structured message, or there is no network path.
    /// Retrying won't help.
    Never,

    /// Retry with exponential backoff.
    ///
    /// Used for transient conditions like transport failures and unusable
    /// responses, where the same request may succeed moments later.
    WithBackoff,
}

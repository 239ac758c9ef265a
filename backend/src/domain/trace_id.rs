//! Request correlation id.
//!
//! Held in a tokio task local for the duration of one request. Spawned tasks
//! start without it; the WebSocket session loop re-enters it with
//! [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

/// Header echoing the id back to the client.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static CURRENT: TraceId;
}

/// Random v4 UUID naming one request.
///
/// ```
/// use gadget_backend::domain::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id = TraceId::generate();
/// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
/// assert_eq!(TraceId::current(), None);
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id of the enclosing [`TraceId::scope`], if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    #[must_use]
    pub fn current_or_generate() -> Self {
        Self::current().unwrap_or_else(Self::generate)
    }

    /// Run `fut` with `id` as the current trace id.
    pub async fn scope<F: Future>(id: Self, fut: F) -> F::Output {
        CURRENT.scope(id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn scope_is_visible_only_inside() {
        let id = TraceId::generate();

        let inside = TraceId::scope(id, async { TraceId::current_or_generate() }).await;

        assert_eq!(inside, id);
        assert_eq!(TraceId::current(), None);
    }

    #[tokio::test]
    async fn spawned_tasks_do_not_inherit_the_id() {
        let id = TraceId::generate();

        let spawned = TraceId::scope(id, async { tokio::spawn(async { TraceId::current() }).await })
            .await
            .expect("join spawned task");

        assert_eq!(spawned, None);
    }

    #[rstest]
    #[case("7d4d1b8e-2c5a-4f7e-9a51-0c2f3e8b6a10", true)]
    #[case("not-a-uuid", false)]
    #[case("", false)]
    fn parses_hyphenated_uuids(#[case] raw: &str, #[case] ok: bool) {
        let parsed = raw.parse::<TraceId>();

        assert_eq!(parsed.is_ok(), ok);
        if let Ok(id) = parsed {
            assert_eq!(id.to_string(), raw);
        }
    }
}

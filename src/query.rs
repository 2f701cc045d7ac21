use crate::engine::TrustEngine;
use crate::error::{Error, Result};
use crate::types::TrustItem;
use crate::validation::validate_pattern;

/// Where a query stands in its lifecycle.
///
/// `Idle -> Active -> Exhausted`, with `start` the only way into
/// `Active` and `Exhausted` terminal for that enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Active,
    Exhausted,
}

/// Pull-based iterator over trust-list entries.
///
/// Owns its engine handle exclusively; the `&mut self` receivers make
/// concurrent calls on one query unrepresentable, matching the
/// strictly sequential request/response protocol underneath.
///
/// # Restarting
///
/// `start` while an enumeration is still active is rejected with
/// [`Error::ProtocolViolation`]; a prior query is never implicitly
/// superseded. Once `next` has returned the `None` sentinel (or an
/// error), `start` may be called again to begin a fresh enumeration
/// on the same handle.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> trustlist::Result<()> {
/// use trustlist::{EngineConfig, GpgEngine, TrustQuery};
///
/// let engine = GpgEngine::open(EngineConfig::default()).await?;
/// let mut query = TrustQuery::new(engine);
/// query.start("alice", 0).await?;
/// while let Some(item) = query.next().await? {
///     println!("{item}");
/// }
/// # Ok(())
/// # }
/// ```
///
/// [`Error::ProtocolViolation`]: crate::Error::ProtocolViolation
pub struct TrustQuery<E> {
    engine: E,
    state: State,
}

impl<E: TrustEngine> TrustQuery<E> {
    /// Wraps an engine handle in a fresh, idle query.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: State::Idle,
        }
    }

    /// Begins an enumeration for `pattern` with `flags`.
    ///
    /// The pattern is validated before the engine is touched; a
    /// malformed pattern fails with [`Error::InvalidPattern`] and
    /// leaves the query state unchanged. Engine-side rejection
    /// (e.g. [`Error::EngineBusy`]) likewise leaves the query out of
    /// the active state.
    ///
    /// [`Error::InvalidPattern`]: crate::Error::InvalidPattern
    /// [`Error::EngineBusy`]: crate::Error::EngineBusy
    pub async fn start(&mut self, pattern: &str, flags: u32) -> Result<()> {
        if self.state == State::Active {
            return Err(Error::ProtocolViolation(
                "start called while an enumeration is active",
            ));
        }

        let pattern = validate_pattern(pattern)?;
        self.engine.begin(pattern, flags).await?;
        self.state = State::Active;
        Ok(())
    }

    /// Pulls the next trust item.
    ///
    /// Returns `Ok(None)` once the enumeration is exhausted; every
    /// call after that also returns `Ok(None)`. An engine failure
    /// mid-enumeration surfaces once and exhausts the query; items
    /// fetched before the failure remain valid.
    pub async fn next(&mut self) -> Result<Option<TrustItem>> {
        match self.state {
            State::Idle => Err(Error::ProtocolViolation("next called before start")),
            State::Exhausted => Ok(None),
            State::Active => match self.engine.fetch().await {
                Ok(Some(item)) => Ok(Some(item)),
                Ok(None) => {
                    self.state = State::Exhausted;
                    Ok(None)
                }
                Err(err) => {
                    self.state = State::Exhausted;
                    Err(err)
                }
            },
        }
    }

    /// True once the current enumeration has signaled its sentinel or
    /// failed; a new `start` clears it.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// Releases the engine handle, aborting any in-flight enumeration.
    ///
    /// Dropping the query has the same effect; this form hands the
    /// handle back for reuse.
    #[must_use]
    pub fn close(self) -> E {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::types::{ItemKind, OwnerTrust, Validity};

    fn item(keyid: &str, name: &str) -> TrustItem {
        TrustItem {
            level: 1,
            keyid: keyid.to_string(),
            kind: ItemKind::UserId,
            owner_trust: OwnerTrust::Full,
            validity: Validity::Full,
            name: name.to_string(),
        }
    }

    /// Engine stub that replays a scripted sequence of fetch results.
    struct ScriptedEngine {
        replies: VecDeque<Result<Option<TrustItem>>>,
        begun: usize,
    }

    impl ScriptedEngine {
        fn new(replies: Vec<Result<Option<TrustItem>>>) -> Self {
            Self {
                replies: replies.into(),
                begun: 0,
            }
        }
    }

    impl TrustEngine for ScriptedEngine {
        async fn begin(&mut self, _pattern: &str, _flags: u32) -> Result<()> {
            self.begun += 1;
            Ok(())
        }

        async fn fetch(&mut self) -> Result<Option<TrustItem>> {
            self.replies.pop_front().unwrap_or(Ok(None))
        }
    }

    #[tokio::test]
    async fn test_next_before_start_fails() {
        let mut query = TrustQuery::new(ScriptedEngine::new(vec![]));
        let err = query.next().await.unwrap_err();
        assert!(matches!(err, Error::ProtocolViolation(_)));
    }

    #[tokio::test]
    async fn test_start_while_active_fails() {
        let mut query = TrustQuery::new(ScriptedEngine::new(vec![Ok(Some(item("AA", "a")))]));
        query.start("alice", 0).await.unwrap();

        let err = query.start("bob", 0).await.unwrap_err();
        assert!(matches!(err, Error::ProtocolViolation(_)));
    }

    #[tokio::test]
    async fn test_invalid_pattern_never_reaches_engine() {
        let mut query = TrustQuery::new(ScriptedEngine::new(vec![]));
        let err = query.start("", 0).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
        assert_eq!(query.close().begun, 0);
    }

    #[tokio::test]
    async fn test_engine_error_exhausts_query() {
        let mut query = TrustQuery::new(ScriptedEngine::new(vec![
            Ok(Some(item("AA", "a"))),
            Err(Error::Engine {
                status: 2,
                stderr: "trustdb corrupt".to_string(),
            }),
        ]));
        query.start("alice", 0).await.unwrap();

        assert!(query.next().await.unwrap().is_some());
        let err = query.next().await.unwrap_err();
        assert!(matches!(err, Error::Engine { status: 2, .. }));
        assert!(query.is_exhausted());
        assert!(query.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_engine_busy_leaves_query_startable() {
        struct BusyEngine;

        impl TrustEngine for BusyEngine {
            async fn begin(&mut self, _pattern: &str, _flags: u32) -> Result<()> {
                Err(Error::EngineBusy)
            }

            async fn fetch(&mut self) -> Result<Option<TrustItem>> {
                Ok(None)
            }
        }

        let mut query = TrustQuery::new(BusyEngine);
        let err = query.start("alice", 0).await.unwrap_err();
        assert!(matches!(err, Error::EngineBusy));

        // The query never became active, so next is still a misuse.
        let err = query.next().await.unwrap_err();
        assert!(matches!(err, Error::ProtocolViolation(_)));
    }
}

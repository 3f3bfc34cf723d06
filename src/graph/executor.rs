//! C4: the upsert executor. Translates projector intents into idempotent
//! calls against a [`GraphClient`], retrying transient failures with
//! exponential backoff and surfacing permanent ones with the offending
//! packet's index (spec.md §4.4/§7).

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::{ExecutorError, PipelineError};
use crate::graph::client::GraphClient;
use crate::projector::Intent;

/// Bounded retry policy for transient executor failures (spec.md §4.4/§7).
#[derive(Debug, Clone, Copy)]
pub struct ExecutorConfig {
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_backoff: Duration::from_millis(50),
        }
    }
}

/// Owns one [`GraphClient`] connection and applies intents to it.
pub struct Executor<G: GraphClient> {
    client: G,
    config: ExecutorConfig,
    elapsed: Duration,
    debug: bool,
}

impl<G: GraphClient> Executor<G> {
    #[must_use]
    pub fn new(client: G) -> Self {
        Self::with_config(client, ExecutorConfig::default())
    }

    #[must_use]
    pub fn with_config(client: G, config: ExecutorConfig) -> Self {
        Self {
            client,
            config,
            elapsed: Duration::ZERO,
            debug: false,
        }
    }

    /// Toggle verbose per-call tracing, for the `--debug-at N` hook
    /// (spec.md §4.5).
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Cumulative wall time spent inside this executor, for telemetry
    /// (spec.md §4.5).
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn into_client(self) -> G {
        self.client
    }

    #[must_use]
    pub fn client(&self) -> &G {
        &self.client
    }

    /// Apply one intent, retrying transient failures and translating a
    /// permanent (or retry-exhausted) failure into a [`PipelineError`]
    /// naming `packet_index`.
    pub fn execute(&mut self, intent: &Intent, packet_index: u64) -> Result<(), PipelineError> {
        let start = std::time::Instant::now();
        if self.debug {
            trace!(?intent, packet_index, "executing intent");
        }
        let result = self.retry(|client| apply(client, intent));
        self.elapsed += start.elapsed();
        result.map_err(|source| PipelineError::Executor {
            packet_index,
            source,
        })
    }

    fn retry<F>(&mut self, mut call: F) -> Result<(), ExecutorError>
    where
        F: FnMut(&mut G) -> Result<(), ExecutorError>,
    {
        let mut attempt = 0u32;
        loop {
            match call(&mut self.client) {
                Ok(()) => return Ok(()),
                Err(ExecutorError::Permanent(msg)) => {
                    return Err(ExecutorError::Permanent(msg));
                }
                Err(ExecutorError::Transient(msg)) => {
                    attempt += 1;
                    if attempt >= self.config.max_attempts {
                        warn!(attempts = attempt, "executor retries exhausted");
                        return Err(ExecutorError::Transient(msg));
                    }
                    let backoff = self.config.base_backoff * 2u32.saturating_pow(attempt - 1);
                    debug!(attempt, ?backoff, "retrying after transient executor failure");
                    if !backoff.is_zero() {
                        std::thread::sleep(backoff);
                    }
                }
            }
        }
    }
}

fn apply<G: GraphClient>(client: &mut G, intent: &Intent) -> Result<(), ExecutorError> {
    match intent {
        Intent::UpsertNode { label, name, props } => client.create_node(*label, name, props.clone()),
        Intent::UpsertSimpleEdge {
            rel,
            src_label,
            src,
            dst_label,
            dst,
        } => client.new_relationship(*rel, *src_label, src, *dst_label, dst),
        Intent::UpsertConnection(request) => client.upsert_connection(request.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::client::ConnectionUpsert;
    use crate::graph::model::{Label, Props, RelType};

    struct FlakyClient {
        failures_remaining: u32,
        calls: u32,
    }

    impl GraphClient for FlakyClient {
        fn create_node(&mut self, _l: Label, _n: &str, _p: Props) -> Result<(), ExecutorError> {
            self.calls += 1;
            if self.failures_remaining > 0 {
                self.failures_remaining -= 1;
                Err(ExecutorError::Transient("connection reset".into()))
            } else {
                Ok(())
            }
        }

        fn new_relationship(
            &mut self,
            _r: RelType,
            _sl: Label,
            _s: &str,
            _dl: Label,
            _d: &str,
        ) -> Result<(), ExecutorError> {
            Ok(())
        }

        fn upsert_connection(&mut self, _req: ConnectionUpsert) -> Result<(), ExecutorError> {
            Ok(())
        }
    }

    struct PermanentlyBrokenClient;

    impl GraphClient for PermanentlyBrokenClient {
        fn create_node(&mut self, _l: Label, _n: &str, _p: Props) -> Result<(), ExecutorError> {
            Err(ExecutorError::Permanent("bad credentials".into()))
        }

        fn new_relationship(
            &mut self,
            _r: RelType,
            _sl: Label,
            _s: &str,
            _dl: Label,
            _d: &str,
        ) -> Result<(), ExecutorError> {
            Ok(())
        }

        fn upsert_connection(&mut self, _req: ConnectionUpsert) -> Result<(), ExecutorError> {
            Ok(())
        }
    }

    fn no_sleep_config() -> ExecutorConfig {
        ExecutorConfig {
            max_attempts: 5,
            base_backoff: Duration::ZERO,
        }
    }

    #[test]
    fn retries_transient_failures_until_success() {
        let client = FlakyClient {
            failures_remaining: 2,
            calls: 0,
        };
        let mut executor = Executor::with_config(client, no_sleep_config());
        let intent = Intent::UpsertNode {
            label: Label::Ip,
            name: "10.0.0.1".into(),
            props: Props::new(),
        };
        executor.execute(&intent, 0).unwrap();
        assert_eq!(executor.client().calls, 3);
    }

    #[test]
    fn exhausting_retries_surfaces_the_packet_index() {
        let client = FlakyClient {
            failures_remaining: 100,
            calls: 0,
        };
        let mut executor = Executor::with_config(client, no_sleep_config());
        let intent = Intent::UpsertNode {
            label: Label::Ip,
            name: "10.0.0.1".into(),
            props: Props::new(),
        };
        let err = executor.execute(&intent, 42).unwrap_err();
        match err {
            PipelineError::Executor { packet_index, .. } => assert_eq!(packet_index, 42),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn permanent_failure_is_not_retried() {
        let mut executor = Executor::with_config(PermanentlyBrokenClient, no_sleep_config());
        let intent = Intent::UpsertNode {
            label: Label::Ip,
            name: "10.0.0.1".into(),
            props: Props::new(),
        };
        let err = executor.execute(&intent, 7).unwrap_err();
        match err {
            PipelineError::Executor { packet_index, source: ExecutorError::Permanent(_) } => {
                assert_eq!(packet_index, 7);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

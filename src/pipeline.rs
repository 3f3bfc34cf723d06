//! C5: the pipeline driver. Owns one capture source end to end: picks the
//! fidelity mode, optionally pre-counts packets for progress, runs the
//! extractor → projector → executor chain per packet, checks for
//! cancellation between packets, and assembles the final [`Telemetry`]
//! (spec.md §4.5/§6).

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{info, trace};

use crate::cache::RecencyCache;
use crate::capture::{Capture, CaptureEvent, Source};
use crate::error::PipelineError;
use crate::extractor;
use crate::graph::{Executor, GraphClient};
use crate::oui::OuiLookup;
use crate::projector::{self, Fidelity};
use crate::telemetry::Telemetry;

/// Run-level options distinct from the capture source itself (spec.md §6).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub reduce: bool,
    pub no_count: bool,
    pub debug_at: Option<u64>,
    pub cache_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reduce: false,
            no_count: false,
            debug_at: None,
            cache_capacity: 50,
        }
    }
}

/// Reduced fidelity is forced for live interfaces regardless of
/// `config.reduce` (spec.md §6); the override is announced once via
/// `tracing`.
#[must_use]
pub fn resolve_fidelity(source: &Source, config: &PipelineConfig) -> Fidelity {
    match source {
        Source::Live(_) => {
            if !config.reduce {
                info!("live capture forces reduced fidelity");
            }
            Fidelity::Reduced
        }
        Source::File(_) => {
            if config.reduce {
                Fidelity::Reduced
            } else {
                Fidelity::Full
            }
        }
    }
}

/// Count the packets in an offline file by replaying it once with no
/// projection work, for progress telemetry. Returns `None` for live
/// sources (unbounded) or when `config.no_count` opts out.
#[must_use]
pub fn count_total(source: &Source, config: &PipelineConfig) -> Option<u64> {
    if config.no_count {
        return None;
    }
    let Source::File(path) = source else {
        return None;
    };
    let mut capture = Capture::open(&Source::File(path.clone())).ok()?;
    let mut count = 0u64;
    loop {
        match capture.next_event() {
            CaptureEvent::Frame(_) => count += 1,
            CaptureEvent::Timeout => continue,
            CaptureEvent::Eof => break,
        }
    }
    Some(count)
}

/// Drive one capture source through the pipeline until exhaustion or
/// cancellation.
pub fn run<G: GraphClient>(
    source: Source,
    oui: &dyn OuiLookup,
    executor: &mut Executor<G>,
    config: &PipelineConfig,
    cancel: &AtomicBool,
) -> Result<Telemetry, PipelineError> {
    let fidelity = resolve_fidelity(&source, config);
    let total = count_total(&source, config);
    let mut capture = Capture::open(&source)?;
    let mut cache = RecencyCache::new(config.cache_capacity);

    let start = Instant::now();
    let mut packet_index: u64 = 0;

    loop {
        if cancel.load(Ordering::SeqCst) {
            return Err(PipelineError::Cancelled { packet_index });
        }
        match capture.next_event() {
            CaptureEvent::Eof => break,
            CaptureEvent::Timeout => continue,
            CaptureEvent::Frame(frame) => {
                let record = extractor::extract(&frame, oui, &mut cache);
                let intents = projector::project(&record, fidelity, &mut cache);

                let debug_this_packet = config.debug_at == Some(packet_index);
                if debug_this_packet {
                    trace!(packet_index, ?record, "debugging packet");
                    executor.set_debug(true);
                }
                for intent in &intents {
                    executor.execute(intent, packet_index)?;
                }
                if debug_this_packet {
                    executor.set_debug(false);
                }

                packet_index += 1;
            }
        }
    }

    Ok(Telemetry::collect(
        packet_index,
        total,
        start.elapsed(),
        executor.elapsed(),
        &cache,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_sources_always_resolve_to_reduced_fidelity() {
        let config = PipelineConfig::default();
        let source = Source::Live("eth0".to_string());
        assert_eq!(resolve_fidelity(&source, &config), Fidelity::Reduced);
    }

    #[test]
    fn file_sources_default_to_full_fidelity() {
        let config = PipelineConfig::default();
        let source = Source::File("capture.pcap".into());
        assert_eq!(resolve_fidelity(&source, &config), Fidelity::Full);
    }

    #[test]
    fn reduce_flag_forces_reduced_fidelity_for_files() {
        let config = PipelineConfig {
            reduce: true,
            ..PipelineConfig::default()
        };
        let source = Source::File("capture.pcap".into());
        assert_eq!(resolve_fidelity(&source, &config), Fidelity::Reduced);
    }
}

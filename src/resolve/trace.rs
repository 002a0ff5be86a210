//! Cumulative resolution timing.
//!
//! Enabled by `policy.trace`. Every orchestrated lookup adds its elapsed
//! time to a process-wide counter and reports the running total.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::debug;

static CUMULATIVE_NANOS: AtomicU64 = AtomicU64::new(0);

/// Total time spent in traced lookups so far.
pub fn cumulative() -> Duration {
    Duration::from_nanos(CUMULATIVE_NANOS.load(Ordering::Relaxed))
}

/// Guard that records its lifetime on drop.
pub(crate) struct TraceSpan {
    start: Option<Instant>,
}

impl TraceSpan {
    #[inline]
    pub fn start(enabled: bool) -> Self {
        Self {
            start: enabled.then(Instant::now),
        }
    }
}

impl Drop for TraceSpan {
    fn drop(&mut self) {
        let Some(start) = self.start else {
            return;
        };
        let elapsed = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        let total = CUMULATIVE_NANOS
            .fetch_add(elapsed, Ordering::Relaxed)
            .saturating_add(elapsed);
        debug!("trace"; "accumulated time to resolve assets: {}ms", total / 1_000_000);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_span_records_nothing() {
        let before = cumulative();
        drop(TraceSpan::start(false));
        // Other tests may trace concurrently, so only check monotonicity
        assert!(cumulative() >= before);
    }

    #[test]
    fn test_enabled_span_accumulates() {
        let before = cumulative();
        {
            let _span = TraceSpan::start(true);
            std::thread::sleep(Duration::from_millis(2));
        }
        assert!(cumulative() >= before + Duration::from_millis(2));
    }
}

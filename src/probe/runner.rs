//! Timeboxed probe execution.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::{ProbeOutcome, ProbeRun, RawFindings};
use crate::error::ProbeError;
use crate::model::Category;

/// Default time budget for one probe invocation
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// A concern-specific page inspection.
///
/// Implementations wrap the browser-automation harness. They must not
/// observe each other's side effects: results are independent of order.
pub trait Probe: Send + Sync {
    /// Category this probe reports on
    fn category(&self) -> Category;

    /// Inspect the page and return raw findings
    fn inspect(&self) -> Result<RawFindings, ProbeError>;
}

/// Runs probes with a timeout, converting every failure into a marker.
#[derive(Debug, Clone)]
pub struct ProbeRunner {
    timeout: Duration,
    concurrent: bool,
}

impl Default for ProbeRunner {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

impl ProbeRunner {
    /// Concurrent runner; all probes share one deadline.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            concurrent: true,
        }
    }

    /// Sequential runner for harnesses that cannot evaluate concurrently
    /// against one page. Each probe gets its own `timeout`; after a timeout
    /// the remaining probes are reported as not started.
    #[must_use]
    pub const fn sequential(timeout: Duration) -> Self {
        Self {
            timeout,
            concurrent: false,
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run every probe and collect one outcome per probe, in input order.
    ///
    /// Probes still running at the deadline are abandoned and reported as
    /// timed out; their threads are detached.
    pub fn run(&self, probes: &[Arc<dyn Probe>]) -> Vec<ProbeRun> {
        let outcomes = if self.concurrent {
            self.run_concurrent(probes)
        } else {
            self.run_sequential(probes)
        };

        probes
            .iter()
            .zip(outcomes)
            .map(|(probe, outcome)| {
                let outcome = outcome.unwrap_or_else(|| self.timed_out());
                if let ProbeOutcome::Failed(failure) = &outcome {
                    tracing::warn!(
                        category = %probe.category(),
                        "Probe produced no signal: {}",
                        failure.reason
                    );
                }
                ProbeRun::new(probe.category(), outcome)
            })
            .collect()
    }

    fn run_concurrent(&self, probes: &[Arc<dyn Probe>]) -> Vec<Option<ProbeOutcome>> {
        let deadline = Instant::now() + self.timeout;
        let (tx, rx) = mpsc::channel();
        let mut outcomes: Vec<Option<ProbeOutcome>> = probes.iter().map(|_| None).collect();

        for (index, probe) in probes.iter().enumerate() {
            if let Err(outcome) = spawn_probe(index, Arc::clone(probe), tx.clone()) {
                outcomes[index] = Some(outcome);
            }
        }
        drop(tx);

        let mut pending = outcomes.iter().filter(|o| o.is_none()).count();
        while pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((index, outcome)) => {
                    if outcomes[index].is_none() {
                        outcomes[index] = Some(outcome);
                        pending -= 1;
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        outcomes
    }

    /// One probe at a time. A timed-out probe's thread cannot be stopped,
    /// so once one times out the rest are not started and are reported as
    /// blocked by it.
    fn run_sequential(&self, probes: &[Arc<dyn Probe>]) -> Vec<Option<ProbeOutcome>> {
        let mut outcomes = Vec::with_capacity(probes.len());
        let mut stuck: Option<Category> = None;

        for (index, probe) in probes.iter().enumerate() {
            if let Some(blocking) = stuck {
                outcomes.push(Some(ProbeOutcome::Failed(
                    ProbeError::HarnessBusy(blocking.to_string()).into(),
                )));
                continue;
            }

            let (tx, rx): (Sender<_>, Receiver<_>) = mpsc::channel();
            if let Err(outcome) = spawn_probe(index, Arc::clone(probe), tx) {
                outcomes.push(Some(outcome));
                continue;
            }
            match rx.recv_timeout(self.timeout) {
                Ok((_, outcome)) => outcomes.push(Some(outcome)),
                Err(_) => {
                    stuck = Some(probe.category());
                    outcomes.push(None);
                }
            }
        }
        outcomes
    }

    fn timed_out(&self) -> ProbeOutcome {
        let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        ProbeOutcome::Failed(ProbeError::Timeout { millis }.into())
    }
}

/// Start one probe on its own thread. Returns the failure marker if the
/// thread could not be spawned.
fn spawn_probe(
    index: usize,
    probe: Arc<dyn Probe>,
    tx: Sender<(usize, ProbeOutcome)>,
) -> Result<(), ProbeOutcome> {
    let name = format!("probe-{}", probe.category());
    thread::Builder::new()
        .name(name)
        .spawn(move || {
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| probe.inspect())) {
                Ok(result) => ProbeOutcome::from(result),
                Err(payload) => {
                    ProbeOutcome::Failed(ProbeError::Panicked(panic_message(&*payload)).into())
                }
            };
            // The receiver is gone once the deadline passed; nothing to report to.
            let _ = tx.send((index, outcome));
        })
        .map(|_| ())
        .map_err(|e| ProbeOutcome::failed(format!("could not start probe thread: {e}")))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixedProbe(Category, serde_json::Value);

    impl Probe for FixedProbe {
        fn category(&self) -> Category {
            self.0
        }

        fn inspect(&self) -> Result<RawFindings, ProbeError> {
            Ok(RawFindings::new(self.1.clone()))
        }
    }

    struct FailingProbe;

    impl Probe for FailingProbe {
        fn category(&self) -> Category {
            Category::Forms
        }

        fn inspect(&self) -> Result<RawFindings, ProbeError> {
            Err(ProbeError::Query("form is detached".to_string()))
        }
    }

    struct PanickingProbe;

    impl Probe for PanickingProbe {
        fn category(&self) -> Category {
            Category::Mobile
        }

        fn inspect(&self) -> Result<RawFindings, ProbeError> {
            panic!("viewport query blew up")
        }
    }

    struct SlowProbe;

    impl Probe for SlowProbe {
        fn category(&self) -> Category {
            Category::Seo
        }

        fn inspect(&self) -> Result<RawFindings, ProbeError> {
            thread::sleep(Duration::from_millis(500));
            Ok(RawFindings::new(json!({})))
        }
    }

    fn probes() -> Vec<Arc<dyn Probe>> {
        vec![
            Arc::new(FixedProbe(Category::Tables, json!({"tableCount": 0}))),
            Arc::new(FailingProbe),
            Arc::new(PanickingProbe),
            Arc::new(SlowProbe),
        ]
    }

    #[test]
    fn test_failures_become_markers_in_order() {
        let runs = ProbeRunner::new(Duration::from_millis(100)).run(&probes());

        let categories: Vec<Category> = runs.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![Category::Tables, Category::Forms, Category::Mobile, Category::Seo]
        );
        assert!(!runs[0].outcome.is_failed());
        assert!(runs[1].outcome.is_failed());
        match &runs[2].outcome {
            ProbeOutcome::Failed(f) => assert!(f.reason.contains("viewport query blew up")),
            ProbeOutcome::Completed(_) => panic!("panic should become a failure marker"),
        }
        match &runs[3].outcome {
            ProbeOutcome::Failed(f) => assert!(f.reason.contains("timed out")),
            ProbeOutcome::Completed(_) => panic!("slow probe should time out"),
        }
    }

    /// Records whether it ever ran while another probe was still running.
    struct ExclusiveProbe {
        category: Category,
        busy: Arc<AtomicBool>,
        overlapped: Arc<AtomicBool>,
        hold: Duration,
    }

    impl Probe for ExclusiveProbe {
        fn category(&self) -> Category {
            self.category
        }

        fn inspect(&self) -> Result<RawFindings, ProbeError> {
            if self.busy.swap(true, Ordering::SeqCst) {
                self.overlapped.store(true, Ordering::SeqCst);
            }
            thread::sleep(self.hold);
            self.busy.store(false, Ordering::SeqCst);
            Ok(RawFindings::new(json!({})))
        }
    }

    #[test]
    fn test_sequential_never_overlaps_a_timed_out_probe() {
        let busy = Arc::new(AtomicBool::new(false));
        let overlapped = Arc::new(AtomicBool::new(false));
        let probe = |category, hold| -> Arc<dyn Probe> {
            Arc::new(ExclusiveProbe {
                category,
                busy: Arc::clone(&busy),
                overlapped: Arc::clone(&overlapped),
                hold,
            })
        };
        let probes = vec![
            probe(Category::Aria, Duration::from_millis(1)),
            probe(Category::Seo, Duration::from_millis(300)),
            probe(Category::Images, Duration::from_millis(1)),
            probe(Category::Forms, Duration::from_millis(1)),
        ];

        let runs = ProbeRunner::sequential(Duration::from_millis(50)).run(&probes);
        thread::sleep(Duration::from_millis(400));

        assert!(!overlapped.load(Ordering::SeqCst));
        assert!(!runs[0].outcome.is_failed());
        match &runs[1].outcome {
            ProbeOutcome::Failed(f) => assert!(f.reason.contains("timed out")),
            ProbeOutcome::Completed(_) => panic!("slow probe should time out"),
        }
        for run in &runs[2..] {
            match &run.outcome {
                ProbeOutcome::Failed(f) => assert!(f.reason.contains("timed-out seo probe")),
                ProbeOutcome::Completed(_) => panic!("probe should not start behind a stuck one"),
            }
        }
    }

    #[test]
    fn test_sequential_matches_concurrent() {
        let concurrent = ProbeRunner::new(Duration::from_millis(100)).run(&probes());
        let sequential = ProbeRunner::sequential(Duration::from_millis(100)).run(&probes());
        assert_eq!(concurrent, sequential);
    }
}

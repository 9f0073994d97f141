//! Simulated work: a randomized job plan and the parallel runner that
//! reports it through a [`Reporter`].

use anyhow::Result;
use progmeter_core::Reporter;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Stages every job walks through before it finishes
const STAGES: [&str; 3] = ["dl", "hash", "link"];

/// Reasons a simulated job can fail with
const FAILURES: [&str; 3] = ["connection reset", "checksum mismatch", "timed out"];

/// One simulated unit of work with a display row.
#[derive(Debug, Clone)]
pub(crate) struct Job {
    pub(crate) key: String,
    pub(crate) name: String,
    pub(crate) stages: Vec<(&'static str, Duration)>,
    pub(crate) failure: Option<&'static str>,
}

/// Shape of a generated plan.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlanShape {
    /// Jobs with a display row
    pub(crate) items: usize,
    /// Jobs counted without a row
    pub(crate) untracked: usize,
    /// Probability a job fails
    pub(crate) fail_rate: f64,
    /// Upper bound for a job's total duration
    pub(crate) max_ms: u64,
}

/// Generated work.
#[derive(Debug, Clone)]
pub(crate) struct Plan {
    pub(crate) jobs: Vec<Job>,
    pub(crate) untracked: Vec<Duration>,
}

impl Plan {
    /// Build a plan from `shape`, drawing durations and failures from `rng`.
    pub(crate) fn generate(shape: &PlanShape, rng: &mut impl Rng) -> Self {
        let per_stage = shape.max_ms / STAGES.len() as u64;

        let jobs = (0..shape.items)
            .map(|i| {
                let digest: u32 = rng.random();
                let stages = STAGES
                    .iter()
                    .map(|label| (*label, Duration::from_millis(rng.random_range(0..=per_stage))))
                    .collect();
                let failure = if rng.random_bool(shape.fail_rate) {
                    FAILURES.choose(&mut *rng).copied()
                } else {
                    None
                };
                Job {
                    key: format!("job-{i:03}"),
                    name: format!("pkg-{i:03}/{digest:08x}"),
                    stages,
                    failure,
                }
            })
            .collect();

        let untracked = (0..shape.untracked)
            .map(|_| Duration::from_millis(rng.random_range(0..=shape.max_ms)))
            .collect();

        Self { jobs, untracked }
    }

    /// Units of work the meter should expect
    pub(crate) fn len(&self) -> usize {
        self.jobs.len() + self.untracked.len()
    }
}

/// What happened to a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub(crate) done: usize,
    pub(crate) failed: usize,
}

/// Run every job with at most `concurrency` in flight at once.
pub(crate) async fn run(
    reporter: Arc<dyn Reporter>,
    plan: Plan,
    concurrency: usize,
) -> Result<Outcome> {
    let limit = Arc::new(Semaphore::new(concurrency.max(1)));
    let done = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    reporter.add_todos(plan.len());

    let mut set: JoinSet<Result<()>> = JoinSet::new();

    for job in plan.jobs {
        let reporter = Arc::clone(&reporter);
        let limit = Arc::clone(&limit);
        let done = Arc::clone(&done);
        let failed = Arc::clone(&failed);

        set.spawn(async move {
            let _permit = limit.acquire_owned().await?;

            reporter.add_entry(&job.key, &job.name, "");
            for (label, pause) in &job.stages {
                reporter.working(&job.key, label);
                tokio::time::sleep(*pause).await;
            }

            if let Some(reason) = job.failure {
                tracing::debug!(key = %job.key, reason, "job failed");
                reporter.error(&job.key, reason);
                failed.fetch_add(1, Ordering::Relaxed);
            } else {
                reporter.finish(&job.key);
                done.fetch_add(1, Ordering::Relaxed);
            }
            Ok(())
        });
    }

    for pause in plan.untracked {
        let reporter = Arc::clone(&reporter);
        let limit = Arc::clone(&limit);
        let done = Arc::clone(&done);

        set.spawn(async move {
            let _permit = limit.acquire_owned().await?;
            tokio::time::sleep(pause).await;
            reporter.mark_done();
            done.fetch_add(1, Ordering::Relaxed);
            Ok(())
        });
    }

    while let Some(res) = set.join_next().await {
        res??;
    }

    Ok(Outcome {
        done: done.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
    })
}

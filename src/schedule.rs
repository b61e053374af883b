//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Two tasks run on cron schedules against shared storage:
//! - A nightly purge of jobs whose application deadline has passed
//! - An early-morning full-catalog sweep, timed for the board's quiet hours
//!
//! Each task catches and logs its own errors, so a failed run cannot take
//! down the host process or suppress the next tick.

use crate::config::ScheduleConfig;
use crate::crawler::Sweeper;
use crate::SaqmeError;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

/// Registers both scheduled tasks and starts the scheduler
///
/// # Arguments
///
/// * `schedule` - Cron expressions for the purge and sweep tasks
/// * `sweeper` - Shared sweeper the tasks run against
///
/// # Returns
///
/// The running scheduler; dropping it stops the tasks
pub async fn start_scheduler(
    schedule: &ScheduleConfig,
    sweeper: Arc<Sweeper>,
) -> Result<JobScheduler, SaqmeError> {
    let scheduler = JobScheduler::new().await?;

    // Nightly purge of expired jobs
    let purge_sweeper = sweeper.clone();
    let purge_job = Job::new_async(schedule.purge.as_str(), move |_uuid, _lock| {
        let sweeper = purge_sweeper.clone();
        Box::pin(async move {
            run_scheduled_purge(&sweeper);
        })
    })?;
    scheduler.add(purge_job).await?;

    // Full-catalog sweep during the board's quiet hours
    let sweep_sweeper = sweeper.clone();
    let sweep_job = Job::new_async(schedule.sweep.as_str(), move |_uuid, _lock| {
        let sweeper = sweep_sweeper.clone();
        Box::pin(async move {
            run_scheduled_sweep(&sweeper).await;
        })
    })?;
    scheduler.add(sweep_job).await?;

    scheduler.start().await?;

    tracing::info!(
        "Scheduled tasks started (purge: '{}', sweep: '{}')",
        schedule.purge,
        schedule.sweep
    );
    Ok(scheduler)
}

/// Runs the purge task, logging instead of propagating failure
fn run_scheduled_purge(sweeper: &Sweeper) {
    tracing::info!("Running scheduled purge of expired jobs");

    match sweeper.purge_expired() {
        Ok(deleted) => tracing::info!("Scheduled purge removed {} expired jobs", deleted),
        Err(e) => tracing::error!("Scheduled purge failed: {}", e),
    }
}

/// Runs the sweep task, logging instead of propagating failure
///
/// An overlap with a still-running sweep surfaces here as
/// [`SaqmeError::SweepInProgress`] and is only logged; the next tick will
/// try again.
async fn run_scheduled_sweep(sweeper: &Sweeper) {
    tracing::info!("Running scheduled full-catalog sweep");

    match sweeper.run_full_sweep().await {
        Ok(summary) => tracing::info!(
            "Scheduled sweep saved {} unique jobs from {} combinations ({} failed)",
            summary.saved,
            summary.combinations,
            summary.failed_combinations
        ),
        Err(e) => tracing::error!("Scheduled sweep failed: {}", e),
    }
}

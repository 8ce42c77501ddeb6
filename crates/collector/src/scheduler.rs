use crate::ingestor::CycleRunner;
use anyhow::{Context, Result};
use playwatch_core::IngestionConfig;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

/// Runs ingestion cycles on a cron schedule.
pub struct IngestionScheduler {
    config: IngestionConfig,
    runner: Arc<dyn CycleRunner>,
    scheduler: Option<JobScheduler>,
}

impl IngestionScheduler {
    /// Creates a stopped scheduler.
    #[must_use]
    pub fn new(config: IngestionConfig, runner: Arc<dyn CycleRunner>) -> Self {
        Self {
            config,
            runner,
            scheduler: None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Starts scheduling cycles. A no-op when disabled or already running.
    ///
    /// # Errors
    /// Returns an error if the cron expression is invalid or the scheduler
    /// fails to start.
    pub async fn start(&mut self) -> Result<()> {
        if !self.config.enabled {
            info!("Ingestion scheduler is disabled");
            return Ok(());
        }
        if self.is_running() {
            return Ok(());
        }

        info!(cron = %self.config.cron_schedule, "Starting ingestion scheduler");

        let scheduler = JobScheduler::new().await?;
        let runner = self.runner.clone();

        let job = Job::new_async(self.config.cron_schedule.as_str(), move |_uuid, _lock| {
            let runner = runner.clone();
            Box::pin(async move {
                let report = runner.run_cycle().await;
                if report.is_clean() {
                    info!(cycle_at = %report.cycle_at, "Scheduled cycle completed");
                } else {
                    error!(
                        cycle_at = %report.cycle_at,
                        errors = report.errors.len(),
                        "Scheduled cycle completed with errors"
                    );
                }
            })
        })
        .with_context(|| format!("invalid cron schedule: {}", self.config.cron_schedule))?;

        scheduler.add(job).await?;
        scheduler.start().await?;
        self.scheduler = Some(scheduler);

        info!("Ingestion scheduler started");
        Ok(())
    }

    /// Stops scheduling. An in-flight cycle is left to finish.
    ///
    /// # Errors
    /// Returns an error if the scheduler fails to shut down.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(mut scheduler) = self.scheduler.take() else {
            return Ok(());
        };
        if let Err(e) = scheduler.shutdown().await {
            warn!(error = %e, "Ingestion scheduler shutdown failed");
            return Err(e.into());
        }
        info!("Ingestion scheduler stopped");
        Ok(())
    }
}

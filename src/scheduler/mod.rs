//! Cron-driven refresh loop

use chrono::{DateTime, Utc};
use cron::Schedule;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::errors::{AppError, AppResult};
use crate::service::RefreshService;

pub struct RefreshScheduler {
    service: Arc<RefreshService>,
    schedule: Schedule,
    expression: String,
    run_on_start: bool,
}

impl RefreshScheduler {
    pub fn new(
        service: Arc<RefreshService>,
        expression: &str,
        run_on_start: bool,
    ) -> AppResult<Self> {
        let schedule = Schedule::from_str(expression)
            .map_err(|e| AppError::schedule(expression, format!("Invalid cron expression: {e}")))?;
        Ok(Self {
            service,
            schedule,
            expression: expression.to_string(),
            run_on_start,
        })
    }

    /// First scheduled run strictly after `after`
    pub fn next_run_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Run until Ctrl-C
    pub async fn run(self) -> AppResult<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `shutdown` resolves. A failed refresh is logged and the loop
    /// waits for the next occurrence.
    pub async fn run_until<F>(self, shutdown: F) -> AppResult<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!("Scheduler started with cron '{}'", self.expression);

        if self.run_on_start {
            self.refresh().await;
        }

        loop {
            let now = Utc::now();
            let Some(next) = self.next_run_after(now) else {
                warn!("Cron '{}' has no further occurrences, stopping", self.expression);
                return Ok(());
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!("Next refresh at {} (in {:?})", next, wait);

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping scheduler");
                    return Ok(());
                }
                _ = tokio::time::sleep(wait) => self.refresh().await,
            }
        }
    }

    async fn refresh(&self) {
        let service = Arc::clone(&self.service);
        match tokio::task::spawn_blocking(move || service.run_once(Utc::now())).await {
            Ok(Ok(summary)) => debug!("Scheduled refresh finished: {}", summary),
            Ok(Err(e)) => error!("Scheduled refresh failed: {}", e),
            Err(e) => error!("Scheduled refresh task panicked: {}", e),
        }
    }
}

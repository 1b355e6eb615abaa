use std::sync::Arc;
use std::time::Duration;

use appointly_core::AppointmentLifecycleManager;
use appointly_core::models::appointment::AutoCompleteReport;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Runs [`run_auto_complete`] every `every` until the returned handle is aborted.
pub fn spawn_auto_complete(
    lifecycle: Arc<AppointmentLifecycleManager>,
    every: Duration,
) -> JoinHandle<()> {
    info!("Auto-completing past appointments every {}s", every.as_secs());
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            run_auto_complete(&lifecycle).await;
        }
    })
}

/// One pass of the job. A failed pass is logged and retried on the next tick.
pub async fn run_auto_complete(
    lifecycle: &AppointmentLifecycleManager,
) -> Option<AutoCompleteReport> {
    match lifecycle.auto_complete_past().await {
        Ok(report) => Some(report),
        Err(e) => {
            error!("Auto-complete run failed: {}", e);
            None
        }
    }
}

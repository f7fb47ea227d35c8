use crate::database::LedgerStore;
use crate::ledger::{AttendanceLedger, Clock, LedgerError, LogicalDay};
use crate::utils::time::{format_datetime_local, next_day_boundary};
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub type SharedLedger<S> = Arc<Mutex<AttendanceLedger<S>>>;

/// Resets the ledger at every local midnight. Missed boundaries (process
/// down) are not replayed.
pub fn spawn_daily_reset<S>(
    ledger: SharedLedger<S>,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
) -> JoinHandle<()>
where
    S: LedgerStore + 'static,
{
    tokio::spawn(async move {
        loop {
            let Some(boundary) = next_day_boundary(clock.now(), offset) else {
                tracing::error!("Could not compute the next reset time, stopping scheduler");
                return;
            };
            tracing::info!(
                "Next fishing reset at {}",
                format_datetime_local(boundary, offset)
            );

            wait_until(clock.as_ref(), boundary).await;

            if let Err(e) = reset_now(&ledger).await {
                tracing::error!("Scheduled reset failed: {}", e);
            }
        }
    })
}

/// One reset under the ledger lock, seeded with the roster as it is now.
pub async fn reset_now<S: LedgerStore>(ledger: &SharedLedger<S>) -> Result<LogicalDay, LedgerError> {
    let mut ledger = ledger.lock().await;
    let roster = ledger.roster().clone();
    ledger.reset(&roster).await
}

/// Timers can drift from the wall clock; keep sleeping until the clock agrees.
async fn wait_until(clock: &dyn Clock, instant: DateTime<Utc>) {
    loop {
        let remaining = instant - clock.now();
        match remaining.to_std() {
            Ok(duration) if !duration.is_zero() => tokio::time::sleep(duration).await,
            _ => return,
        }
    }
}

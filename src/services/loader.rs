use crate::services::profile::ProfileSource;
use crate::ui::LoadMsg;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// Fetch failures are reported as `Err(text)`; the app turns them into an
// empty profile.
pub fn spawn_fetch_profile(source: Arc<dyn ProfileSource>, tx: Sender<LoadMsg>) {
    thread::spawn(move || {
        let outcome = fetch_outcome(source.as_ref());
        let _ = tx.send(LoadMsg::Profile(outcome));
    });
}

pub(crate) fn fetch_outcome(
    source: &dyn ProfileSource,
) -> Result<crate::services::profile::User, String> {
    match source.fetch() {
        Ok(user) => Ok(user),
        Err(e) => {
            tracing::warn!(source = %source.describe(), error = %format!("{e:#}"), "profile fetch failed");
            Err(format!("{e:#}"))
        }
    }
}

/// Simulated remote submission: waits `delay`, then reports completion.
/// Not cancellable.
pub fn spawn_submit(delay: Duration, tx: Sender<LoadMsg>) {
    thread::spawn(move || {
        thread::sleep(delay);
        tracing::info!(delay_ms = delay.as_millis() as u64, "submission finished");
        let _ = tx.send(LoadMsg::SubmitFinished(Ok(())));
    });
}

//! Self-resetting alert timer.
//!
//! Every [`AlertTimer::schedule`] supersedes the previous one, so the alert
//! is cleared [`ALERT_DURATION`] after the *last* scheduling.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::warn;

/// How long an alert stays visible.
pub const ALERT_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug)]
pub struct AlertTimer {
    generation: AtomicU64,
    runtime: Option<Handle>,
}

impl AlertTimer {
    /// Timer bound to the current Tokio runtime, if there is one.
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            runtime: Handle::try_current().ok(),
        }
    }

    /// Run `on_expire` after [`ALERT_DURATION`] unless rescheduled first.
    ///
    /// The expiry runs on the runtime the timer was created in, else on the
    /// caller's. Returns `false` without scheduling when neither exists.
    pub fn schedule<F>(self: &Arc<Self>, on_expire: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let armed = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let Some(runtime) = self
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
        else {
            warn!("no Tokio runtime; alert will not clear itself");
            return false;
        };
        let timer = Arc::clone(self);
        runtime.spawn(async move {
            tokio::time::sleep(ALERT_DURATION).await;
            if timer.generation.load(Ordering::SeqCst) == armed {
                on_expire();
            }
        });
        true
    }

    /// Drop any pending expiry.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for AlertTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Box<dyn FnOnce() + Send>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let handle = fired.clone();
        let make = move || {
            let fired = handle.clone();
            Box::new(move || {
                fired.fetch_add(1, Ordering::SeqCst);
            }) as Box<dyn FnOnce() + Send>
        };
        (fired, make)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_duration() {
        let timer = Arc::new(AlertTimer::new());
        let (fired, make) = counter();
        timer.schedule(make());

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_resets_the_timer() {
        let timer = Arc::new(AlertTimer::new());
        let (fired, make) = counter();
        timer.schedule(make());
        tokio::time::sleep(Duration::from_secs(2)).await;
        timer.schedule(make());

        // Past the first deadline: superseded, nothing fires.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_expiry() {
        let timer = Arc::new(AlertTimer::new());
        let (fired, make) = counter();
        timer.schedule(make());
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn without_runtime_nothing_is_scheduled() {
        let timer = Arc::new(AlertTimer::new());
        let (fired, make) = counter();
        assert!(!timer.schedule(make()));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn scheduling_outside_runtime_uses_the_creating_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        let timer = {
            let _guard = runtime.enter();
            Arc::new(AlertTimer::new())
        };
        let (fired, make) = counter();
        assert!(timer.schedule(make()));

        runtime.block_on(async { tokio::time::sleep(Duration::from_millis(3100)).await });
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}

//! Connectivity monitoring for the chat client.
//!
//! A [`ConnectivityMonitor`] probes the health endpoint on a fixed interval
//! and publishes the result on a `watch` channel. The chat client reads the
//! latest value before every send; it never waits on the probe.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Online/offline flag published by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn is_online(self) -> bool {
        self == Connectivity::Online
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Online => write!(f, "online"),
            Connectivity::Offline => write!(f, "offline"),
        }
    }
}

/// Liveness check against the chat backend.
///
/// Returns true when the endpoint answered with a success status. The
/// monitor applies its own timeout on top of whatever the probe does.
pub trait HealthProbe: Send + Sync + 'static {
    fn check(&self) -> impl Future<Output = bool> + Send;
}

/// Periodic liveness probe.
pub struct ConnectivityMonitor;

impl ConnectivityMonitor {
    /// Run a single probe bounded by `timeout`. A timeout counts as offline.
    pub async fn probe_once<P: HealthProbe>(probe: &P, timeout: Duration) -> Connectivity {
        match tokio::time::timeout(timeout, probe.check()).await {
            Ok(true) => Connectivity::Online,
            Ok(false) => Connectivity::Offline,
            Err(_) => {
                tracing::debug!(timeout_ms = timeout.as_millis() as u64, "health probe timed out");
                Connectivity::Offline
            }
        }
    }

    /// Spawn the probe loop. The first probe runs immediately, then every
    /// `interval`, until `cancel` fires.
    ///
    /// The receiver starts at `Online` so the client is usable before the
    /// first probe completes.
    pub fn spawn<P: HealthProbe>(
        probe: P,
        interval: Duration,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> (watch::Receiver<Connectivity>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(Connectivity::Online);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let status = Self::probe_once(&probe, timeout).await;
                        let changed = tx.send_if_modified(|current| {
                            if *current == status {
                                false
                            } else {
                                *current = status;
                                true
                            }
                        });
                        if changed {
                            tracing::info!(%status, "chat backend connectivity changed");
                        }
                        if tx.is_closed() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("connectivity monitor stopped");
        });

        (rx, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct ToggleProbe {
        healthy: Arc<AtomicBool>,
        calls: Arc<AtomicUsize>,
    }

    impl HealthProbe for ToggleProbe {
        fn check(&self) -> impl Future<Output = bool> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let healthy = self.healthy.load(Ordering::SeqCst);
            async move { healthy }
        }
    }

    struct HangingProbe;

    impl HealthProbe for HangingProbe {
        fn check(&self) -> impl Future<Output = bool> + Send {
            std::future::pending()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_timeout_counts_as_offline() {
        let status = ConnectivityMonitor::probe_once(&HangingProbe, Duration::from_secs(5)).await;
        assert_eq!(status, Connectivity::Offline);
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_publishes_changes() {
        let probe = ToggleProbe::default();
        let cancel = CancellationToken::new();
        let (mut rx, handle) = ConnectivityMonitor::spawn(
            probe.clone(),
            Duration::from_secs(30),
            Duration::from_secs(5),
            cancel.clone(),
        );

        // First probe runs immediately and reports the backend down.
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Connectivity::Offline);

        probe.healthy.store(true, Ordering::SeqCst);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Connectivity::Online);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 2);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_stops_on_cancel() {
        let probe = ToggleProbe::default();
        probe.healthy.store(true, Ordering::SeqCst);
        let cancel = CancellationToken::new();
        let (_rx, handle) = ConnectivityMonitor::spawn(
            probe.clone(),
            Duration::from_secs(30),
            Duration::from_secs(5),
            cancel.clone(),
        );
        cancel.cancel();
        handle.await.unwrap();
        assert!(probe.calls.load(Ordering::SeqCst) <= 1);
    }
}

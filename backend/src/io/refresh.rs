//! Periodic refresh of the displayed prediction.
//!
//! A ticker recomputes the [`PredictionSnapshot`] on a fixed interval and
//! publishes it on a `watch` channel. It only reads the tracker; persisted
//! state is never touched here. Mutating handlers call
//! [`PredictionFeed::publish`] directly so subscribers see changes at once.

use chrono::Utc;
use shared::PredictionSnapshot;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::{SleepTracker, StatusPersistence};

#[derive(Clone)]
pub struct PredictionFeed {
    sender: Arc<watch::Sender<Option<PredictionSnapshot>>>,
}

impl PredictionFeed {
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn publish(&self, snapshot: PredictionSnapshot) {
        // send_replace succeeds with or without live receivers
        self.sender.send_replace(Some(snapshot));
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<PredictionSnapshot>> {
        self.sender.subscribe()
    }

    pub fn latest(&self) -> Option<PredictionSnapshot> {
        self.sender.borrow().clone()
    }
}

impl Default for PredictionFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Recompute and publish one snapshot; false if the tracker lock is poisoned
pub fn refresh_once<P: StatusPersistence>(
    tracker: &Mutex<SleepTracker<P>>,
    feed: &PredictionFeed,
) -> bool {
    match tracker.lock() {
        Ok(tracker) => {
            feed.publish(tracker.snapshot(Utc::now()));
            true
        }
        Err(_) => {
            warn!("Sleep tracker lock poisoned, skipping prediction refresh");
            false
        }
    }
}

/// Spawn the background ticker
pub fn spawn_prediction_ticker<P>(
    tracker: Arc<Mutex<SleepTracker<P>>>,
    feed: PredictionFeed,
    period: Duration,
) -> JoinHandle<()>
where
    P: StatusPersistence + 'static,
{
    let period = period.max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if refresh_once(&tracker, &feed) {
                debug!("Prediction refreshed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::sleep::InitialStatusPolicy;
    use shared::SleepStatus;

    fn tracker() -> Arc<Mutex<SleepTracker<fn(&SleepStatus) -> anyhow::Result<()>>>> {
        fn discard(_: &SleepStatus) -> anyhow::Result<()> {
            Ok(())
        }
        let status = InitialStatusPolicy::default().initial_status(Utc::now());
        Arc::new(Mutex::new(SleepTracker::new(
            status,
            discard as fn(&SleepStatus) -> anyhow::Result<()>,
        )))
    }

    #[test]
    fn test_feed_starts_empty_and_keeps_latest() {
        let feed = PredictionFeed::new();
        assert!(feed.latest().is_none());

        assert!(refresh_once(&tracker(), &feed));
        let snapshot = feed.latest().unwrap();
        assert!(!snapshot.is_asleep);
        assert_eq!(snapshot.prediction.unwrap().elapsed_minutes, 120);
    }

    #[tokio::test]
    async fn test_ticker_publishes_to_subscribers() {
        let feed = PredictionFeed::new();
        let mut receiver = feed.subscribe();

        let handle = spawn_prediction_ticker(tracker(), feed.clone(), Duration::from_secs(60));
        receiver.changed().await.unwrap();
        assert!(receiver.borrow().is_some());
        handle.abort();
    }
}

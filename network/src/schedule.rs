// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic clock ticks for a running game.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Owns the one live tick task. Starting a new schedule aborts the old one.
pub struct ClockSchedule {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl ClockSchedule {
    pub fn new(period: Duration) -> Self {
        Self { period, task: None }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Send `event` into `tx` every period until stopped
    pub fn start<E>(&mut self, tx: mpsc::Sender<E>, event: E)
    where
        E: Clone + Send + 'static,
    {
        self.stop();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(event.clone()).await.is_err() {
                    break;
                }
            }
        }));
        tracing::debug!("Clock schedule started ({:?})", period);
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Clock schedule stopped");
        }
    }
}

impl Drop for ClockSchedule {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_at_the_period() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut schedule = ClockSchedule::new(Duration::from_millis(100));
        schedule.start(tx, ());
        assert!(schedule.is_active());

        let begin = tokio::time::Instant::now();
        for _ in 0..3 {
            rx.recv().await.unwrap();
        }
        assert_eq!(begin.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_the_old_task() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut schedule = ClockSchedule::new(Duration::from_millis(100));
        schedule.start(tx.clone(), 1u8);
        schedule.start(tx, 2u8);

        tokio::time::sleep(Duration::from_millis(450)).await;
        let mut seen = Vec::new();
        while let Ok(v) = rx.try_recv() {
            seen.push(v);
        }
        assert_eq!(seen, vec![2, 2, 2, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_schedule_is_silent() {
        let (tx, mut rx) = mpsc::channel::<()>(16);
        let mut schedule = ClockSchedule::new(Duration::from_millis(100));
        schedule.start(tx, ());
        schedule.stop();
        assert!(!schedule.is_active());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }
}

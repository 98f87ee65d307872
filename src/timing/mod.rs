//! Timing coordinator — every delayed transition the widget performs.
//!
//! All waits are scheduled tokio tasks, never busy loops. Each timer slot
//! holds at most one armed task; arming a slot again cancels the previous
//! task. Every arm gets a fresh epoch, and a firing task must present its
//! epoch to [`TimingCoordinator::complete`] before touching state, so a task
//! that was superseded or cancelled after it woke up becomes a no-op.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::AssistantConfig;

/// A cancellable scheduled callback.
///
/// Dropping the task cancels it unless it has been disarmed.
#[derive(Debug)]
pub struct DelayedTask {
    handle: Option<JoinHandle<()>>,
}

impl DelayedTask {
    /// Run `task` after `delay`.
    pub fn spawn<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Abort the task if it has not finished.
    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Let the task run to completion without holding a cancel handle.
    pub fn disarm(mut self) {
        self.handle.take();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map(|h| h.is_finished()).unwrap_or(true)
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// The independent timer slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Typing indicator before queued replies appear.
    Typing,
    /// Simulated voice capture.
    Voice,
}

impl std::fmt::Display for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Typing => write!(f, "typing"),
            Self::Voice => write!(f, "voice"),
        }
    }
}

#[derive(Debug)]
struct Armed {
    epoch: u64,
    task: DelayedTask,
}

/// Owns the typing and voice timers for one session.
#[derive(Debug)]
pub struct TimingCoordinator {
    typing_delay_min: Duration,
    typing_delay_max: Duration,
    voice_timeout: Duration,
    typing: Option<Armed>,
    voice: Option<Armed>,
    next_epoch: u64,
}

impl TimingCoordinator {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            typing_delay_min: config.typing_delay_min,
            typing_delay_max: config.typing_delay_max,
            voice_timeout: config.voice_timeout,
            typing: None,
            voice: None,
            next_epoch: 1,
        }
    }

    /// A typing delay drawn uniformly from the configured window.
    pub fn typing_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = self.typing_delay_min.as_millis() as u64;
        let max = self.typing_delay_max.as_millis() as u64;
        if min >= max {
            return self.typing_delay_min;
        }
        Duration::from_millis(rng.gen_range(min..=max))
    }

    pub fn voice_timeout(&self) -> Duration {
        self.voice_timeout
    }

    fn slot(&mut self, timer: Timer) -> &mut Option<Armed> {
        match timer {
            Timer::Typing => &mut self.typing,
            Timer::Voice => &mut self.voice,
        }
    }

    /// Arm `timer`, superseding any pending task in the same slot.
    ///
    /// `make` receives the new epoch and returns the work to run after `delay`.
    pub fn arm<F, Fut>(&mut self, timer: Timer, delay: Duration, make: F) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let epoch = self.next_epoch;
        self.next_epoch += 1;

        if let Some(previous) = self.slot(timer).take() {
            debug!(timer = %timer, epoch = previous.epoch, "Superseding pending timer");
            previous.task.cancel();
        }

        let task = DelayedTask::spawn(delay, make(epoch));
        *self.slot(timer) = Some(Armed { epoch, task });
        debug!(timer = %timer, epoch, delay_ms = delay.as_millis() as u64, "Timer armed");
        epoch
    }

    /// Called by a firing task. Returns true (and clears the slot) only if
    /// `epoch` is still the armed one.
    pub fn complete(&mut self, timer: Timer, epoch: u64) -> bool {
        let current = matches!(self.slot(timer), Some(armed) if armed.epoch == epoch);
        if !current {
            debug!(timer = %timer, epoch, "Stale timer ignored");
            return false;
        }
        if let Some(armed) = self.slot(timer).take() {
            armed.task.disarm();
        }
        debug!(timer = %timer, epoch, "Timer fired");
        true
    }

    /// Cancel a pending timer. Returns true if one was armed.
    pub fn cancel(&mut self, timer: Timer) -> bool {
        match self.slot(timer).take() {
            Some(armed) => {
                debug!(timer = %timer, epoch = armed.epoch, "Timer cancelled");
                armed.task.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.cancel(Timer::Typing);
        self.cancel(Timer::Voice);
    }

    /// Whether `timer` has a task that has not yet run.
    pub fn is_armed(&self, timer: Timer) -> bool {
        let slot = match timer {
            Timer::Typing => &self.typing,
            Timer::Voice => &self.voice,
        };
        slot.as_ref().is_some_and(|armed| !armed.task.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tokio::sync::Mutex;

    use super::*;

    fn coordinator() -> TimingCoordinator {
        TimingCoordinator::new(&AssistantConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_task_runs_after_delay() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let task = DelayedTask::spawn(Duration::from_secs(1), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_never_runs() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let task = DelayedTask::spawn(Duration::from_secs(1), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        task.cancel();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_task_never_runs() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        drop(DelayedTask::spawn(Duration::from_secs(1), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_supersedes_previous_task() {
        let fired: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));
        let timing = Arc::new(Mutex::new(coordinator()));

        for _ in 0..3 {
            let fired = Arc::clone(&fired);
            let timing_ref = Arc::clone(&timing);
            timing
                .lock()
                .await
                .arm(Timer::Typing, Duration::from_secs(1), move |epoch| async move {
                    if timing_ref.lock().await.complete(Timer::Typing, epoch) {
                        fired.lock().await.push(epoch);
                    }
                });
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        let fired = fired.lock().await;
        assert_eq!(fired.len(), 1, "only the latest arm fires");
        assert!(!timing.lock().await.is_armed(Timer::Typing));
    }

    #[tokio::test(start_paused = true)]
    async fn slots_are_independent() {
        let mut timing = coordinator();
        timing.arm(Timer::Typing, Duration::from_secs(5), |_| async {});
        timing.arm(Timer::Voice, Duration::from_secs(5), |_| async {});
        assert!(timing.cancel(Timer::Voice));
        assert!(timing.is_armed(Timer::Typing));
        assert!(!timing.is_armed(Timer::Voice));
        assert!(!timing.cancel(Timer::Voice));
        timing.cancel_all();
        assert!(!timing.is_armed(Timer::Typing));
    }

    #[tokio::test(start_paused = true)]
    async fn task_that_ran_is_no_longer_armed() {
        let mut timing = coordinator();
        timing.arm(Timer::Voice, Duration::from_millis(100), |_| async {});
        assert!(timing.is_armed(Timer::Voice));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!timing.is_armed(Timer::Voice));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_epoch_is_rejected() {
        let mut timing = coordinator();
        let first = timing.arm(Timer::Typing, Duration::from_secs(5), |_| async {});
        let second = timing.arm(Timer::Typing, Duration::from_secs(5), |_| async {});
        assert!(second > first);
        assert!(!timing.complete(Timer::Typing, first));
        assert!(timing.complete(Timer::Typing, second));
        assert!(!timing.complete(Timer::Typing, second));
    }

    #[test]
    fn typing_delay_stays_in_window() {
        let timing = coordinator();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let delay = timing.typing_delay(&mut rng);
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay <= Duration::from_millis(2000));
        }
    }

    #[test]
    fn fixed_window_returns_minimum() {
        let config = AssistantConfig {
            typing_delay_min: Duration::from_millis(300),
            typing_delay_max: Duration::from_millis(300),
            ..Default::default()
        };
        let timing = TimingCoordinator::new(&config);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(timing.typing_delay(&mut rng), Duration::from_millis(300));
    }
}

//! Periodic tick stream driving a running timer

use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Wall-clock time between two ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identifies the tick stream a callback belongs to.
///
/// Every spawn and every cancellation moves the scheduler to a new
/// generation, so a callback holding an older token knows it is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken(u64);

/// Whether the stream keeps going after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Stop,
}

/// Owns at most one background task that calls back once per period.
#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl TickScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            generation: 0,
            handle: None,
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.handle.is_some()
    }

    /// Whether `token` belongs to the live stream
    pub fn is_current(&self, token: TickToken) -> bool {
        self.handle.is_some() && token.0 == self.generation
    }

    /// Spawn the tick stream unless one is already live.
    ///
    /// The first tick fires one full period after this call. Must be called
    /// from within a tokio runtime.
    pub fn spawn<F>(&mut self, mut on_tick: F) -> bool
    where
        F: FnMut(TickToken) -> TickFlow + Send + 'static,
    {
        if self.is_ticking() {
            debug!("Tick stream already live, not spawning another");
            return false;
        }

        self.generation += 1;
        let token = TickToken(self.generation);
        let period = self.period;
        let first_tick = Instant::now() + period;

        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(first_tick, period);
            // Seconds missed under load are still counted
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

            loop {
                interval.tick().await;
                if on_tick(token) == TickFlow::Stop {
                    break;
                }
            }
            debug!("Tick stream {} finished", token.0);
        }));
        true
    }

    /// Abort the live stream. Returns whether one was live.
    ///
    /// The generation moves on before this returns, so a callback that is
    /// already waiting to run will find its token stale.
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Called from inside the stream's own callback when it is about to
    /// return [`TickFlow::Stop`]; lets the next `spawn` proceed at once.
    pub fn retire(&mut self, token: TickToken) {
        if self.is_current(token) {
            self.generation += 1;
            // Detach; the task ends after this callback returns
            self.handle = None;
        }
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    };
    use tokio::time::sleep;

    fn counter() -> (Arc<AtomicU64>, impl FnMut(TickToken) -> TickFlow + Send + 'static) {
        let count = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&count);
        (count, move |_: TickToken| {
            seen.fetch_add(1, Ordering::SeqCst);
            TickFlow::Continue
        })
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let mut scheduler = TickScheduler::default();
        let (count, on_tick) = counter();
        assert!(scheduler.spawn(on_tick));

        sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(3000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn second_spawn_is_ignored() {
        let mut scheduler = TickScheduler::default();
        let (count, on_tick) = counter();
        let (other, other_tick) = counter();
        assert!(scheduler.spawn(on_tick));
        assert!(!scheduler.spawn(other_tick));

        sleep(Duration::from_millis(2500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(other.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_further_ticks() {
        let mut scheduler = TickScheduler::default();
        let (count, on_tick) = counter();
        scheduler.spawn(on_tick);

        sleep(Duration::from_millis(1500)).await;
        assert!(scheduler.cancel());
        assert!(!scheduler.is_ticking());

        sleep(Duration::from_millis(5000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!scheduler.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_invalidates_the_old_token() {
        let mut scheduler = TickScheduler::default();
        let first = Arc::new(std::sync::Mutex::new(None));
        let slot = Arc::clone(&first);
        scheduler.spawn(move |token| {
            *slot.lock().unwrap() = Some(token);
            TickFlow::Stop
        });

        sleep(Duration::from_millis(1500)).await;
        let token = (*first.lock().unwrap()).expect("tick should have fired");
        assert!(scheduler.is_current(token));

        scheduler.cancel();
        assert!(!scheduler.is_current(token));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_flow_ends_the_stream() {
        let mut scheduler = TickScheduler::default();
        let count = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&count);
        scheduler.spawn(move |_| {
            if seen.fetch_add(1, Ordering::SeqCst) == 1 {
                TickFlow::Stop
            } else {
                TickFlow::Continue
            }
        });

        sleep(Duration::from_millis(10_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}

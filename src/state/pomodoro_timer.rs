//! Running timer instance owned by one view

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::TimerError,
    tasks::tick_scheduler::{TickFlow, TickScheduler, TickToken},
};

use super::{PendingTransition, PhaseMachine, TickOutcome, TimerConfig, TimerEvent, TimerState};

/// Everything a tick or an operation touches, guarded by one lock
#[derive(Debug)]
struct TimerCore {
    id: Uuid,
    machine: PhaseMachine,
    scheduler: TickScheduler,
    closed: bool,
    state_tx: watch::Sender<TimerState>,
    events_tx: broadcast::Sender<TimerEvent>,
}

impl TimerCore {
    fn publish(&self) {
        if let Err(e) = self.state_tx.send(self.machine.state()) {
            debug!("No state watchers for timer {}: {}", self.id, e);
        }
    }

    fn emit(&self, event: TimerEvent) {
        if let Err(e) = self.events_tx.send(event) {
            debug!("No event listeners for timer {}: {}", self.id, e);
        }
    }

    /// Spawn the tick stream if the machine is running and none is live
    fn ensure_ticking(&mut self, core: Weak<Mutex<TimerCore>>) {
        if !self.machine.state().running {
            return;
        }
        self.scheduler.spawn(move |token| {
            let Some(core) = core.upgrade() else {
                return TickFlow::Stop;
            };
            let mut guard = lock(&core);
            guard.on_tick(token)
        });
    }

    fn on_tick(&mut self, token: TickToken) -> TickFlow {
        if self.closed || !self.scheduler.is_current(token) {
            debug!("Dropping stale tick for timer {}", self.id);
            return TickFlow::Stop;
        }

        match self.machine.tick() {
            TickOutcome::Idle => {
                self.scheduler.retire(token);
                TickFlow::Stop
            }
            TickOutcome::Counting { remaining_seconds } => {
                debug!("Timer {} tick: {}s remaining", self.id, remaining_seconds);
                self.publish();
                TickFlow::Continue
            }
            TickOutcome::Completed { phase, pending } => {
                self.scheduler.retire(token);
                info!("Timer {} finished {:?} phase, waiting for acknowledgement ({:?})",
                      self.id, phase, pending);
                self.publish();
                self.emit(TimerEvent::PhaseCompleted {
                    timer_id: self.id,
                    completed: phase,
                    pending,
                    at: Utc::now(),
                });
                TickFlow::Stop
            }
        }
    }
}

// Operations always succeed, so a poisoned lock is recovered rather than reported
fn lock(core: &Mutex<TimerCore>) -> MutexGuard<'_, TimerCore> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Work/break timer with an acknowledgement gate between phases.
///
/// Ticks and operations are serialized by a single lock. Cancelling the tick
/// stream happens under that lock, before the operation returns, so no tick
/// from an earlier stream can touch the state afterwards. Dropping the timer
/// cancels ticking as well.
#[derive(Debug)]
pub struct PomodoroTimer {
    id: Uuid,
    core: Arc<Mutex<TimerCore>>,
    /// Keep the receiver alive to prevent channel closure
    state_rx: watch::Receiver<TimerState>,
}

impl PomodoroTimer {
    /// Create an idle timer at the start of a full work phase.
    ///
    /// Lifecycle events go to `events_tx`; it is usually shared by every timer
    /// of an application.
    pub fn new(id: Uuid, config: TimerConfig, events_tx: broadcast::Sender<TimerEvent>) -> Self {
        let machine = PhaseMachine::new(config);
        let (state_tx, state_rx) = watch::channel(machine.state());

        Self {
            id,
            core: Arc::new(Mutex::new(TimerCore {
                id,
                machine,
                scheduler: TickScheduler::default(),
                closed: false,
                state_tx,
                events_tx,
            })),
            state_rx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current `{phase, remaining_seconds, running, pending_transition}`
    pub fn snapshot(&self) -> TimerState {
        lock(&self.core).machine.state()
    }

    pub fn config(&self) -> TimerConfig {
        lock(&self.core).machine.config()
    }

    /// Config and state read under the same lock
    pub fn view(&self) -> (TimerConfig, TimerState) {
        let core = lock(&self.core);
        (core.machine.config(), core.machine.state())
    }

    /// Direction of the transition waiting for acknowledgement, if any
    pub fn pending_transition(&self) -> Option<PendingTransition> {
        self.snapshot().pending_transition
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.core).closed
    }

    /// Receiver that sees every state change, including each tick
    pub fn watch(&self) -> watch::Receiver<TimerState> {
        self.state_rx.clone()
    }

    /// Start or resume the current phase. Must be called from within a tokio runtime.
    pub fn start(&self) -> Result<TimerState, TimerError> {
        let mut core = lock(&self.core);
        if core.closed {
            debug!("Ignoring start on closed timer {}", self.id);
            return Ok(core.machine.state());
        }

        let started = core.machine.start().inspect_err(|e| {
            warn!("Timer {} cannot start: {}", self.id, e);
        })?;
        core.ensure_ticking(Arc::downgrade(&self.core));

        let state = core.machine.state();
        if started {
            info!("Timer {} started {:?} phase with {}s remaining",
                  self.id, state.phase, state.remaining_seconds);
            core.publish();
            core.emit(TimerEvent::Started { timer_id: self.id, state, at: Utc::now() });
        }
        Ok(state)
    }

    /// Stop counting down, keeping the remaining time
    pub fn pause(&self) -> TimerState {
        let mut core = lock(&self.core);
        core.scheduler.cancel();
        let was_running = core.machine.pause();

        let state = core.machine.state();
        if was_running && !core.closed {
            info!("Timer {} paused with {}s remaining", self.id, state.remaining_seconds);
            core.publish();
            core.emit(TimerEvent::Paused { timer_id: self.id, state, at: Utc::now() });
        }
        state
    }

    /// Cancel ticking, drop any pending transition and return to a full work phase
    pub fn reset(&self) -> TimerState {
        let mut core = lock(&self.core);
        if core.closed {
            debug!("Ignoring reset on closed timer {}", self.id);
            return core.machine.state();
        }

        core.scheduler.cancel();
        core.machine.reset();

        let state = core.machine.state();
        info!("Timer {} reset", self.id);
        core.publish();
        core.emit(TimerEvent::Reset { timer_id: self.id, state, at: Utc::now() });
        state
    }

    /// Consume the pending transition and enter the next phase.
    ///
    /// A break starts counting down at once; the following work phase waits
    /// for [`PomodoroTimer::start`]. Without a pending transition this does nothing.
    pub fn acknowledge_transition(&self) -> TimerState {
        let mut core = lock(&self.core);
        if core.closed {
            debug!("Ignoring acknowledgement on closed timer {}", self.id);
            return core.machine.state();
        }

        let Some(transition) = core.machine.acknowledge_transition() else {
            debug!("Nothing to acknowledge on timer {}", self.id);
            return core.machine.state();
        };

        core.scheduler.cancel();
        core.ensure_ticking(Arc::downgrade(&self.core));

        let state = core.machine.state();
        info!("Timer {} acknowledged {:?}, now {:?} (running={})",
              self.id, transition, state.phase, state.running);
        core.publish();
        core.emit(TimerEvent::TransitionAcknowledged {
            timer_id: self.id,
            transition,
            state,
            at: Utc::now(),
        });
        state
    }

    /// Replace the durations. Only applied while idle; returns whether it was.
    pub fn update_config(&self, config: TimerConfig) -> bool {
        let mut core = lock(&self.core);
        if core.closed || !core.machine.update_config(config) {
            warn!("Timer {} is busy, ignoring configuration change", self.id);
            return false;
        }

        info!("Timer {} configured: work={}s, break={}s",
              self.id, config.work_seconds, config.break_seconds);
        core.publish();
        true
    }

    /// Tear the timer down. No tick fires after this returns and later
    /// operations have no effect.
    pub fn close(&self) {
        let mut core = lock(&self.core);
        if core.closed {
            return;
        }

        core.closed = true;
        core.scheduler.cancel();
        core.machine.pause();

        info!("Timer {} closed", self.id);
        core.publish();
        core.emit(TimerEvent::Closed { timer_id: self.id, at: Utc::now() });
    }
}

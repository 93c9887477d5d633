//! The action scheduler.
//!
//! A schedulable state hands over the action it wants running. The action
//! is merged into the one in progress on the schedule thread, and a single
//! tick loop on the tick thread advances the merged action every
//! `tick_interval_ms`, feeding the events it yields back into the state
//! loop. The loop stops once the action completes and restarts with the
//! next pending action.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use kiln_core::{Action, Clock, Updatable};

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::executor::Executor;
use crate::updates::{Notifiable, Updates};

const MODULE: &str = "schedules";

struct Shared {
    latest: Mutex<Option<Arc<dyn Updatable>>>,
    action: Mutex<Action>,
    ticking: AtomicBool,
    schedule: Executor,
    tick: Executor,
    updates: Updates,
    clock: Arc<dyn Clock>,
    interval_ms: u64,
}

/// Handle to the scheduler. Clones share the scheduler.
#[derive(Clone)]
pub struct Schedules {
    shared: Arc<Shared>,
}

impl Schedules {
    /// Spawn `<prefix>-schedule` and `<prefix>-tick`. Action events are
    /// sent to `updates`.
    pub fn new(
        config: &EngineConfig,
        updates: Updates,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            shared: Arc::new(Shared {
                latest: Mutex::new(None),
                action: Mutex::new(Action::Complete),
                ticking: AtomicBool::new(false),
                schedule: Executor::spawn(MODULE, config.thread_name("schedule"))?,
                tick: Executor::spawn(MODULE, config.thread_name("tick"))?,
                updates,
                clock,
                interval_ms: config.tick_interval_ms,
            }),
        })
    }

    /// The action in progress.
    pub fn action(&self) -> Action {
        self.shared
            .action
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a tick loop is running.
    pub fn is_ticking(&self) -> bool {
        self.shared.ticking.load(Ordering::Acquire)
    }

    /// Stop both workers. Returns how many were joined.
    pub fn stop(&self) -> usize {
        usize::from(self.shared.schedule.shutdown()) + usize::from(self.shared.tick.shutdown())
    }
}

impl Notifiable for Schedules {
    fn notify(&self, state: &Arc<dyn Updatable>) -> Result<(), EngineError> {
        if state.as_schedulable().is_none() {
            return Ok(());
        }
        {
            let mut latest = self
                .shared
                .latest
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if latest.as_ref().is_some_and(|l| Arc::ptr_eq(l, state)) {
                return Ok(());
            }
            *latest = Some(Arc::clone(state));
        }
        let shared = Arc::clone(&self.shared);
        let state = Arc::clone(state);
        self.shared.schedule.submit(move || shared.schedule(&state))
    }
}

impl Shared {
    fn schedule(self: Arc<Self>, state: &Arc<dyn Updatable>) -> Result<(), EngineError> {
        let Some(schedulable) = state.as_schedulable() else {
            return Ok(());
        };
        let next = schedulable.schedule();
        {
            let mut action = self.action.lock().unwrap_or_else(PoisonError::into_inner);
            *action = Action::merge(std::mem::take(&mut *action), next);
            if !action.is_pending() {
                return Ok(());
            }
        }
        self.start_ticking(Duration::ZERO)
    }

    /// Claim the tick loop and queue its first tick; a no-op when a loop is
    /// already running.
    fn start_ticking(self: Arc<Self>, delay: Duration) -> Result<(), EngineError> {
        if self
            .ticking
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }
        self.submit_tick(delay)
    }

    fn submit_tick(self: Arc<Self>, delay: Duration) -> Result<(), EngineError> {
        let shared = Arc::clone(&self);
        let submitted = self.tick.submit_after(delay, move || shared.tick());
        if submitted.is_err() {
            self.ticking.store(false, Ordering::Release);
        }
        submitted
    }

    fn tick(self: Arc<Self>) -> Result<(), EngineError> {
        let claim = TickClaim::new(&self.ticking);
        let time = self.clock.now_millis();
        let (events, pending) = {
            let mut action = self.action.lock().unwrap_or_else(PoisonError::into_inner);
            *action = action.update(time);
            (action.events().to_vec(), action.is_pending())
        };

        for event in events {
            self.updates.handle(event)?;
        }

        if pending {
            let due = time.saturating_add(self.interval_ms);
            let delay = Duration::from_millis(due.saturating_sub(self.clock.now_millis()));
            let shared = Arc::clone(&self);
            self.tick.submit_after(delay, move || shared.tick())?;
            claim.hand_off();
            return Ok(());
        }

        drop(claim);
        // An action merged while this tick was finishing would otherwise
        // wait for the next notify.
        let rearm = self
            .action
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_pending();
        if rearm {
            let delay = Duration::from_millis(self.interval_ms);
            return self.start_ticking(delay);
        }
        Ok(())
    }
}

/// The running tick's hold on the `ticking` flag.
///
/// Dropping the claim clears the flag, so a tick that errors or panics
/// leaves the loop free for the next notify. Only a queued follow-up tick
/// takes the claim over.
struct TickClaim<'a> {
    ticking: &'a AtomicBool,
    held: bool,
}

impl<'a> TickClaim<'a> {
    fn new(ticking: &'a AtomicBool) -> Self {
        Self {
            ticking,
            held: true,
        }
    }

    fn hand_off(mut self) {
        self.held = false;
    }
}

impl Drop for TickClaim<'_> {
    fn drop(&mut self) {
        if self.held {
            self.ticking.store(false, Ordering::Release);
        }
    }
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Schedules>();
};

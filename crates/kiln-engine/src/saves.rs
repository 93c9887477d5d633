//! Persistence of savable states.
//!
//! Saves are admission-controlled like renders: at most `save_permits` run
//! at once and a notify that finds none free is skipped. A save job writes
//! whichever savable state is newest when it runs. With at least
//! [`MIN_PERMITS`](crate::config::MIN_PERMITS) permits a skipped notify
//! always finds a save still queued behind the running one, so it loses
//! nothing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use kiln_core::{Context, Updatable};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::executor::Executor;
use crate::permit::{Permit, Permits};
use crate::updates::Notifiable;

const MODULE: &str = "saves";

struct Shared {
    latest: Mutex<Option<Arc<dyn Updatable>>>,
    saved: Mutex<Option<Arc<dyn Updatable>>>,
    permits: Arc<Permits>,
    completed: AtomicU64,
    failed: AtomicU64,
    executor: Executor,
    context: Context,
}

/// Handle to the save worker. Clones share the worker.
#[derive(Clone)]
pub struct Saves {
    shared: Arc<Shared>,
}

impl Saves {
    /// Spawn `<prefix>-saves`.
    pub fn new(config: &EngineConfig, context: Context) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared {
                latest: Mutex::new(None),
                saved: Mutex::new(None),
                permits: Arc::new(Permits::new(config.save_permits)),
                completed: AtomicU64::new(0),
                failed: AtomicU64::new(0),
                executor: Executor::spawn(MODULE, config.thread_name(MODULE))?,
                context,
            }),
        })
    }

    /// Saves that returned `Ok`.
    pub fn completed(&self) -> u64 {
        self.shared.completed.load(Ordering::Acquire)
    }

    /// Saves that returned an error.
    pub fn failed(&self) -> u64 {
        self.shared.failed.load(Ordering::Acquire)
    }

    /// Save permits currently free.
    pub fn available_permits(&self) -> usize {
        self.shared.permits.available()
    }

    /// Stop the worker once queued saves are done. Returns whether it was
    /// joined.
    pub fn stop(&self) -> bool {
        self.shared.executor.shutdown()
    }
}

impl Notifiable for Saves {
    fn notify(&self, state: &Arc<dyn Updatable>) -> Result<(), EngineError> {
        if state.as_savable().is_none() {
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

        let Some(permit) = self.shared.permits.try_acquire_owned() else {
            return Err(EngineError::Saturated { module: MODULE });
        };
        let shared = Arc::clone(&self.shared);
        self.shared.executor.submit(move || {
            shared.save(permit);
            Ok(())
        })
    }
}

impl Shared {
    fn save(&self, permit: Permit) {
        let _permit = permit;
        let state = self
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(state) = state else {
            return;
        };
        {
            let mut saved = self.saved.lock().unwrap_or_else(PoisonError::into_inner);
            if saved.as_ref().is_some_and(|s| Arc::ptr_eq(s, &state)) {
                debug!(module = MODULE, "state already saved");
                return;
            }
            *saved = Some(Arc::clone(&state));
        }
        let Some(savable) = state.as_savable() else {
            return;
        };
        match savable.save(&self.context) {
            Ok(()) => {
                self.completed.fetch_add(1, Ordering::AcqRel);
            }
            Err(error) => {
                self.failed.fetch_add(1, Ordering::AcqRel);
                warn!(module = MODULE, %error, "save failed");
            }
        }
    }
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Saves>();
};

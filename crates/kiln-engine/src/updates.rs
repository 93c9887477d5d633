//! The serialized state loop.
//!
//! Every event is folded into the current state on one worker thread, in
//! submission order. After each fold the new state is handed to every
//! subscriber, in registration order, on that same thread.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use kiln_core::{Context, Event, Updatable};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::executor::Executor;

const MODULE: &str = "updates";

/// A subsystem that reacts to new states.
///
/// `notify` runs on the state-loop thread, so it must hand real work off
/// to its own executor and return promptly. An error is logged by the
/// loop and does not stop the remaining subscribers.
pub trait Notifiable: Send + Sync {
    /// A new state was produced.
    fn notify(&self, state: &Arc<dyn Updatable>) -> Result<(), EngineError>;
}

struct Shared {
    executor: Executor,
    context: Context,
    state: Mutex<Arc<dyn Updatable>>,
    subscribers: RwLock<Vec<Arc<dyn Notifiable>>>,
}

/// Handle to the state loop. Clones share the loop.
#[derive(Clone)]
pub struct Updates {
    shared: Arc<Shared>,
}

impl Updates {
    /// Start the loop on `<prefix>-updates` with `initial` as the state.
    pub fn new(
        config: &EngineConfig,
        context: Context,
        initial: Arc<dyn Updatable>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            shared: Arc::new(Shared {
                executor: Executor::spawn(MODULE, config.thread_name(MODULE))?,
                context,
                state: Mutex::new(initial),
                subscribers: RwLock::new(Vec::new()),
            }),
        })
    }

    /// Add a subscriber; it sees every state produced from now on.
    pub fn subscribe(&self, subscriber: Arc<dyn Notifiable>) {
        self.shared
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(subscriber);
    }

    /// Queue `event` for folding.
    ///
    /// Fails with [`EngineError::ShutDown`] once the loop is stopped.
    pub fn handle(&self, event: Event) -> Result<(), EngineError> {
        let shared = Arc::clone(&self.shared);
        self.shared.executor.submit(move || {
            shared.apply(&event);
            Ok(())
        })
    }

    /// The most recently produced state.
    pub fn state(&self) -> Arc<dyn Updatable> {
        Arc::clone(&self.shared.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// The context states are updated with.
    pub fn context(&self) -> &Context {
        &self.shared.context
    }

    /// Stop accepting events, finish the queued ones, then drop every
    /// subscriber. Returns whether the worker was joined.
    pub fn stop(&self) -> bool {
        let joined = self.shared.executor.shutdown();
        self.shared
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        joined
    }
}

impl Shared {
    fn apply(&self, event: &Event) {
        let current = Arc::clone(&self.state.lock().unwrap_or_else(PoisonError::into_inner));
        let next = current.update(&self.context, event);
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);

        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for subscriber in subscribers {
            match subscriber.notify(&next) {
                Ok(()) => {}
                Err(error @ EngineError::Saturated { .. }) => {
                    debug!(module = MODULE, %error, "subscriber skipped state");
                }
                Err(error) => warn!(module = MODULE, %error, "subscriber failed"),
            }
        }
    }
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Updates>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    struct Count(u64);

    impl Updatable for Count {
        fn update(self: Arc<Self>, _ctx: &Context, event: &Event) -> Arc<dyn Updatable> {
            Arc::new(Count(self.0 * 10 + event.time()))
        }
    }

    struct Tally(AtomicUsize);

    impl Notifiable for Tally {
        fn notify(&self, _state: &Arc<dyn Updatable>) -> Result<(), EngineError> {
            self.0.fetch_add(1, Ordering::AcqRel);
            Ok(())
        }
    }

    struct Refuse;

    impl Notifiable for Refuse {
        fn notify(&self, _state: &Arc<dyn Updatable>) -> Result<(), EngineError> {
            Err(EngineError::Saturated { module: "refuse" })
        }
    }

    fn updates() -> Updates {
        let config = EngineConfig {
            thread_name_prefix: "kiln-updates-test".into(),
            ..EngineConfig::default()
        };
        Updates::new(&config, Context::new("test", "/tmp"), Arc::new(Count(0))).unwrap()
    }

    #[test]
    fn folds_events_in_order() {
        let updates = updates();
        for t in 1..=5 {
            updates.handle(Event::animation(t)).unwrap();
        }
        assert!(updates.stop());
        let state = updates.state();
        assert_eq!(state.downcast_ref::<Count>().map(|c| c.0), Some(12_345));
    }

    #[test]
    fn failing_subscriber_does_not_starve_the_next() {
        let updates = updates();
        let tally = Arc::new(Tally(AtomicUsize::new(0)));
        updates.subscribe(Arc::new(Refuse));
        updates.subscribe(tally.clone());
        updates.handle(Event::animation(1)).unwrap();
        updates.handle(Event::animation(2)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while tally.0.load(Ordering::Acquire) < 2 {
            if Instant::now() > deadline {
                panic!("subscriber not notified");
            }
            thread::sleep(Duration::from_millis(5));
        }
        updates.stop();
    }

    #[test]
    fn handle_after_stop_is_rejected() {
        let updates = updates();
        updates.stop();
        assert_eq!(
            updates.handle(Event::animation(0)),
            Err(EngineError::ShutDown { module: "updates" })
        );
    }
}

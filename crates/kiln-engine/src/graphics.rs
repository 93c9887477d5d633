//! The two-stage render pipeline.
//!
//! ```text
//!  state loop            render thread           animate thread        display thread
//!      │ notify(state)        │                        │                      │
//!      │ latest = state       │                        │                      │
//!      │ try_acquire permit ─>│ render(latest)         │                      │
//!      │                      │ generation += 1 ──────>│ frame.update(now)    │
//!      │                      │ release permit         │ publish ───────────> │ draw(canvas)
//!      │                      │                        │ dynamic: re-sample   │ (try_acquire fresh)
//!      │ <── Animation event ─┼────────────────────────│ static               │
//! ```
//!
//! Renders are admission-controlled: at most `render_permits` are in
//! flight, and a notify that finds none free is turned away with
//! [`EngineError::Saturated`]. Nothing is lost by that: a render reads the
//! latest state when it runs, not the one that triggered it, and with at
//! least [`MIN_PERMITS`](crate::config::MIN_PERMITS) permits a turned-away
//! notify always has a render still queued behind the running one.
//!
//! Every render bumps a key-frame generation. An animate continuation
//! carries the generation its frame came from and stops as soon as a newer
//! render exists, so a stale frame is never re-published.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use kiln_core::{Clock, Event, Updatable};
use kiln_scene::{Canvas, Frame};

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::executor::Executor;
use crate::permit::{Permit, Permits};
use crate::updates::{Notifiable, Updates};

const MODULE: &str = "graphics";

struct Shared {
    latest: Mutex<Option<Arc<dyn Updatable>>>,
    render_permits: Arc<Permits>,
    generation: AtomicU64,
    frame: Mutex<Option<Arc<Frame>>>,
    fresh: Permits,
    render: Executor,
    animate: Executor,
    updates: Updates,
    clock: Arc<dyn Clock>,
}

/// Handle to the render pipeline. Clones share the pipeline.
#[derive(Clone)]
pub struct Graphics {
    shared: Arc<Shared>,
}

impl Graphics {
    /// Spawn `<prefix>-render` and `<prefix>-animate`. Animation-finished
    /// events are sent to `updates`.
    pub fn new(
        config: &EngineConfig,
        updates: Updates,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared {
                latest: Mutex::new(None),
                render_permits: Arc::new(Permits::new(config.render_permits)),
                generation: AtomicU64::new(0),
                frame: Mutex::new(None),
                fresh: Permits::empty(1),
                render: Executor::spawn(MODULE, config.thread_name("render"))?,
                animate: Executor::spawn(MODULE, config.thread_name("animate"))?,
                updates,
                clock,
            }),
        })
    }

    /// Draw the newest frame if one was published since the last draw.
    ///
    /// Never blocks. Returns whether anything was drawn.
    pub fn draw(&self, canvas: &mut dyn Canvas) -> bool {
        if !self.shared.fresh.try_acquire() {
            return false;
        }
        match self.latest_frame() {
            Some(frame) => {
                frame.draw(canvas);
                true
            }
            None => false,
        }
    }

    /// The most recently published frame.
    pub fn latest_frame(&self) -> Option<Arc<Frame>> {
        self.shared
            .frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Render permits currently free.
    pub fn available_render_permits(&self) -> usize {
        self.shared.render_permits.available()
    }

    /// Key frames rendered so far.
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }

    /// Stop both workers. Returns how many were joined.
    pub fn stop(&self) -> usize {
        usize::from(self.shared.render.shutdown()) + usize::from(self.shared.animate.shutdown())
    }
}

impl Notifiable for Graphics {
    fn notify(&self, state: &Arc<dyn Updatable>) -> Result<(), EngineError> {
        if state.as_renderable().is_none() {
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

        let Some(permit) = self.shared.render_permits.try_acquire_owned() else {
            return Err(EngineError::Saturated { module: MODULE });
        };
        let shared = Arc::clone(&self.shared);
        // On rejection the job, and with it the permit, is dropped.
        self.shared.render.submit(move || shared.render(permit))
    }
}

impl Shared {
    fn render(self: Arc<Self>, permit: Permit) -> Result<(), EngineError> {
        let _permit = permit;
        let state = self
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(state) = state else {
            return Ok(());
        };
        let Some(renderable) = state.as_renderable() else {
            return Ok(());
        };
        let frame = renderable.render()?;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let shared = Arc::clone(&self);
        let frame = Arc::new(frame);
        self.animate
            .submit(move || shared.animate(generation, frame))
    }

    fn animate(self: Arc<Self>, generation: u64, frame: Arc<Frame>) -> Result<(), EngineError> {
        if self.generation.load(Ordering::Acquire) != generation {
            return Ok(());
        }
        let time = self.clock.now_millis();
        let next = Arc::new(frame.update(time));
        if !self.publish(generation, Arc::clone(&next)) {
            return Ok(());
        }

        if !next.is_dynamic() {
            return self.updates.handle(Event::animation(time));
        }
        let due = time.saturating_add(next.duration());
        let delay = Duration::from_millis(due.saturating_sub(self.clock.now_millis()));
        let shared = Arc::clone(&self);
        self.animate
            .submit_after(delay, move || shared.animate(generation, next))
    }

    /// Hand `frame` to the display thread unless a newer render exists.
    fn publish(&self, generation: u64, frame: Arc<Frame>) -> bool {
        let mut slot = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        *slot = Some(frame);
        self.fresh.drain();
        self.fresh.release();
        true
    }
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Graphics>();
};

//! The assembled engine.
//!
//! [`Engine`] wires the state loop to its three subscribers and owns their
//! shutdown. The host feeds input through [`handle`](Engine::handle) and
//! [`resize`](Engine::resize), and its display thread calls
//! [`draw`](Engine::draw) as often as it likes.

use std::sync::Arc;
use std::time::Instant;

use kiln_core::{Clock, Context, Event, Updatable};
use kiln_scene::Canvas;
use tracing::info;

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::graphics::Graphics;
use crate::saves::Saves;
use crate::schedules::Schedules;
use crate::updates::Updates;

// ── ShutdownReport ───────────────────────────────────────────────

/// What [`Engine::stop`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Total time spent stopping, in milliseconds.
    pub total_ms: u64,
    /// Whether the state-loop thread was joined.
    pub updates_joined: bool,
    /// Subsystem worker threads joined.
    pub workers_joined: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EngineState {
    Running,
    Stopped,
}

// ── Engine ───────────────────────────────────────────────────────

/// A running Kiln engine: state loop, render pipeline, scheduler and saves.
///
/// Dropping a running engine stops it.
pub struct Engine {
    updates: Updates,
    graphics: Graphics,
    schedules: Schedules,
    saves: Saves,
    state: EngineState,
}

impl Engine {
    /// Validate `config`, spawn every worker and start folding events into
    /// `initial`.
    ///
    /// Subscribers are notified in the order graphics, schedules, saves.
    /// Nothing is rendered until the first event arrives.
    pub fn start(
        config: EngineConfig,
        context: Context,
        initial: Arc<dyn Updatable>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let updates = Updates::new(&config, context.clone(), initial)?;
        let saves = Saves::new(&config, context)?;
        let schedules = Schedules::new(&config, updates.clone(), Arc::clone(&clock))?;
        let graphics = Graphics::new(&config, updates.clone(), clock)?;

        updates.subscribe(Arc::new(graphics.clone()));
        updates.subscribe(Arc::new(schedules.clone()));
        updates.subscribe(Arc::new(saves.clone()));

        info!(
            prefix = %config.thread_name_prefix,
            render_permits = config.render_permits,
            save_permits = config.save_permits,
            tick_interval_ms = config.tick_interval_ms,
            "engine started"
        );

        Ok(Self {
            updates,
            graphics,
            schedules,
            saves,
            state: EngineState::Running,
        })
    }

    /// Queue `event` for the state loop.
    pub fn handle(&self, event: Event) -> Result<(), EngineError> {
        self.updates.handle(event)
    }

    /// Report a new display size.
    pub fn resize(&self, time: u64, width: u32, height: u32) -> Result<(), EngineError> {
        self.updates.handle(Event::view(time, width, height)?)
    }

    /// Draw the newest frame onto `canvas` if one is waiting. Never blocks.
    pub fn draw(&self, canvas: &mut dyn Canvas) -> bool {
        self.graphics.draw(canvas)
    }

    /// The most recently produced state.
    pub fn state(&self) -> Arc<dyn Updatable> {
        self.updates.state()
    }

    /// The state loop.
    pub fn updates(&self) -> &Updates {
        &self.updates
    }

    /// The render pipeline.
    pub fn graphics(&self) -> &Graphics {
        &self.graphics
    }

    /// The scheduler.
    pub fn schedules(&self) -> &Schedules {
        &self.schedules
    }

    /// The save worker.
    pub fn saves(&self) -> &Saves {
        &self.saves
    }

    /// Whether [`stop`](Self::stop) has not run yet.
    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Stop every worker.
    ///
    /// The state loop goes first and finishes its queued events; the
    /// subsystems then finish whatever those events queued. Later calls
    /// return an empty report.
    pub fn stop(&mut self) -> ShutdownReport {
        if self.state == EngineState::Stopped {
            return ShutdownReport::default();
        }
        let start = Instant::now();
        self.state = EngineState::Stopped;

        let updates_joined = self.updates.stop();
        let workers_joined = usize::from(self.saves.stop())
            + self.schedules.stop()
            + self.graphics.stop();

        let report = ShutdownReport {
            total_ms: start.elapsed().as_millis() as u64,
            updates_joined,
            workers_joined,
        };
        info!(
            total_ms = report.total_ms,
            workers_joined = report.workers_joined,
            "engine stopped"
        );
        report
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if self.state == EngineState::Running {
            self.stop();
        }
    }
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Engine>();
};

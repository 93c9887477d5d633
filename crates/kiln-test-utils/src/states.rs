//! Mock application states.
//!
//! - [`LogState`] records every event and can schedule one action per key
//!   press. It cannot be rendered.
//! - [`GatedState`] renders only once its [`Gate`] is opened.
//! - [`SlideState`] renders a quad sliding over a fixed duration and counts
//!   animation completions.
//! - [`FailingState`] fails every render and every save.
//!
//! Renderable mocks return themselves for animation events so a completed
//! animation does not trigger another render.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use kiln_core::{
    Action, Context, Event, EventKind, Key, Renderable, Savable, SaveError, Schedulable,
    Updatable,
};
use kiln_scene::{
    Animation, Batch, Camera, Color, Frame, Interpolation, Mat4, Material, Mesh, Model, Region,
    Scene, SceneError, Transformation, Vec3,
};

const WIDTH: u32 = 64;
const HEIGHT: u32 = 64;

fn quad_scene(material: &str, model: Model) -> Result<Scene, SceneError> {
    let material = Arc::new(Material::new(material, Vec::new())?);
    Ok(Scene::new(
        Camera::default(),
        vec![Batch::new(material, vec![model])],
    ))
}

fn quad() -> Arc<Mesh> {
    Arc::new(Mesh::quad(Region::default()))
}

// ── LogState ─────────────────────────────────────────────────────

/// Records every event folded into it.
#[derive(Clone, Debug, Default)]
pub struct LogState {
    pub events: Vec<Event>,
    action: Option<Action>,
}

impl LogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state that asks for `action` after each key-down event.
    pub fn scheduling(action: Action) -> Self {
        Self {
            events: Vec::new(),
            action: Some(action),
        }
    }

    /// Names of the action events received, in order.
    pub fn action_names(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e.kind() {
                EventKind::Action { name } => Some(name.to_string()),
                _ => None,
            })
            .collect()
    }

    /// Times of the events received, in order.
    pub fn times(&self) -> Vec<u64> {
        self.events.iter().map(Event::time).collect()
    }
}

impl Updatable for LogState {
    fn update(self: Arc<Self>, _ctx: &Context, event: &Event) -> Arc<dyn Updatable> {
        let mut next = (*self).clone();
        next.events.push(event.clone());
        Arc::new(next)
    }

    fn as_schedulable(&self) -> Option<&dyn Schedulable> {
        self.action.as_ref().map(|_| self as &dyn Schedulable)
    }
}

impl Schedulable for LogState {
    fn schedule(&self) -> Action {
        let pressed = self.events.last().is_some_and(|e| {
            matches!(
                e.kind(),
                EventKind::Key {
                    input: Key::Down,
                    ..
                }
            )
        });
        match (&self.action, pressed) {
            (Some(action), true) => action.clone(),
            _ => Action::Complete,
        }
    }
}

// ── Gate / GatedState ────────────────────────────────────────────

/// A latch that renders of a [`GatedState`] wait on.
#[derive(Debug, Default)]
pub struct Gate {
    open: Mutex<bool>,
    opened: Condvar,
    entered: AtomicUsize,
    rendered: AtomicUsize,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Let every waiting and future render through.
    pub fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.opened.notify_all();
    }

    /// Renders that have started.
    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::Acquire)
    }

    /// Renders that have finished.
    pub fn rendered(&self) -> usize {
        self.rendered.load(Ordering::Acquire)
    }

    /// Block until opened. Gives up after 5 s so a broken test cannot
    /// hang a worker forever.
    fn pass(&self) {
        self.entered.fetch_add(1, Ordering::AcqRel);
        let open = self.open.lock().unwrap();
        let _open = self
            .opened
            .wait_timeout_while(open, Duration::from_secs(5), |open| !*open)
            .unwrap();
        self.rendered.fetch_add(1, Ordering::AcqRel);
    }
}

/// A renderable state whose renders block on a shared [`Gate`].
///
/// Every non-animation event yields a new version. The rendered frame is
/// static and its single batch's material is named `v<version>`.
#[derive(Debug)]
pub struct GatedState {
    pub gate: Arc<Gate>,
    pub version: u64,
}

impl GatedState {
    pub fn new(gate: Arc<Gate>) -> Self {
        Self { gate, version: 0 }
    }
}

impl Updatable for GatedState {
    fn update(self: Arc<Self>, _ctx: &Context, event: &Event) -> Arc<dyn Updatable> {
        if matches!(event.kind(), EventKind::Animation) {
            return self;
        }
        Arc::new(Self {
            gate: Arc::clone(&self.gate),
            version: self.version + 1,
        })
    }

    fn as_renderable(&self) -> Option<&dyn Renderable> {
        Some(self)
    }
}

impl Renderable for GatedState {
    fn render(&self) -> Result<Frame, SceneError> {
        self.gate.pass();
        let scene = quad_scene(
            &format!("v{}", self.version),
            Model::new_static(quad(), Mat4::IDENTITY),
        )?;
        Frame::new_static(vec![scene], Color::BLACK, WIDTH, HEIGHT)
    }
}

// ── SlideState ───────────────────────────────────────────────────

/// A quad translated one unit along X over `duration` ms, starting at the
/// time of the last non-animation event.
#[derive(Debug)]
pub struct SlideState {
    pub start: u64,
    pub duration: u64,
    /// Milliseconds between animation samples.
    pub step: u64,
    pub completions: Arc<AtomicUsize>,
}

impl SlideState {
    pub fn new(duration: u64, step: u64) -> Self {
        Self {
            start: 0,
            duration,
            step,
            completions: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Updatable for SlideState {
    fn update(self: Arc<Self>, _ctx: &Context, event: &Event) -> Arc<dyn Updatable> {
        if matches!(event.kind(), EventKind::Animation) {
            self.completions.fetch_add(1, Ordering::AcqRel);
            return self;
        }
        Arc::new(Self {
            start: event.time(),
            duration: self.duration,
            step: self.step,
            completions: Arc::clone(&self.completions),
        })
    }

    fn as_renderable(&self) -> Option<&dyn Renderable> {
        Some(self)
    }
}

impl Renderable for SlideState {
    fn render(&self) -> Result<Frame, SceneError> {
        let slide = Transformation::translate(
            Vec3::X,
            Interpolation::linear(self.start, self.duration),
        );
        let model = Model::dynamic(quad(), Animation::dynamic(slide));
        let scene = quad_scene("slide", model)?;
        Frame::dynamic(vec![scene], Color::WHITE, WIDTH, HEIGHT, self.step)
    }
}

// ── FailingState ─────────────────────────────────────────────────

/// Fails every render and every save, counting the attempts.
#[derive(Debug, Default)]
pub struct FailingState {
    pub renders: Arc<AtomicUsize>,
    pub saves: Arc<AtomicUsize>,
}

impl FailingState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Updatable for FailingState {
    fn update(self: Arc<Self>, _ctx: &Context, event: &Event) -> Arc<dyn Updatable> {
        if matches!(event.kind(), EventKind::Animation) {
            return self;
        }
        Arc::new(Self {
            renders: Arc::clone(&self.renders),
            saves: Arc::clone(&self.saves),
        })
    }

    fn as_renderable(&self) -> Option<&dyn Renderable> {
        Some(self)
    }

    fn as_savable(&self) -> Option<&dyn Savable> {
        Some(self)
    }
}

impl Renderable for FailingState {
    fn render(&self) -> Result<Frame, SceneError> {
        self.renders.fetch_add(1, Ordering::AcqRel);
        Err(SceneError::RenderFailed {
            reason: "mock render failure".to_string(),
        })
    }
}

impl Savable for FailingState {
    fn save(&self, _ctx: &Context) -> Result<(), SaveError> {
        self.saves.fetch_add(1, Ordering::AcqRel);
        Err(SaveError::Failed {
            reason: "mock save failure".to_string(),
        })
    }
}

//! Capabilities an application state can offer the engine.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kiln_scene::Renderable;

use crate::action::Action;
use crate::error::SaveError;
use crate::event::Event;

/// Application identity handed to every state transition and save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Context {
    app_name: Arc<str>,
    data_dir: PathBuf,
}

impl Context {
    /// A context for `app_name`, persisting under `data_dir`.
    pub fn new(app_name: &str, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_name: Arc::from(app_name),
            data_dir: data_dir.into(),
        }
    }

    /// Application name.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Directory saves are written under.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// An immutable application state.
///
/// The state loop folds every event through [`update`](Self::update) on a
/// single thread. A state returns itself (the same `Arc`) when an event
/// changes nothing; subsystems use pointer identity to skip such states.
///
/// The `as_*` accessors advertise optional capabilities. Subsystems ignore
/// states that do not offer theirs.
pub trait Updatable: Any + Send + Sync {
    /// The state after `event`.
    fn update(self: Arc<Self>, ctx: &Context, event: &Event) -> Arc<dyn Updatable>;

    /// This state as something that can be drawn.
    fn as_renderable(&self) -> Option<&dyn Renderable> {
        None
    }

    /// This state as something that schedules actions.
    fn as_schedulable(&self) -> Option<&dyn Schedulable> {
        None
    }

    /// This state as something that can be persisted.
    fn as_savable(&self) -> Option<&dyn Savable> {
        None
    }
}

impl dyn Updatable {
    /// Borrow the concrete state if it is a `T`.
    pub fn downcast_ref<T: Updatable>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

/// A state that wants action events delivered to it later.
pub trait Schedulable {
    /// The action this state wants running.
    fn schedule(&self) -> Action;
}

/// A state that can persist itself.
pub trait Savable {
    /// Write this state out.
    fn save(&self, ctx: &Context) -> Result<(), SaveError>;
}

//! Core types and traits for the Kiln engine.
//!
//! Events feed the state loop, actions let a state schedule events for
//! itself, and the capability traits in [`traits`] describe what an
//! application state offers the engine's subsystems.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action;
pub mod error;
pub mod event;
pub mod time;
pub mod traits;

pub use action::{Action, Events};
pub use error::{ActionError, EventError, SaveError};
pub use event::{Event, EventKind, Key, Touch};
pub use time::{Clock, SystemClock};
pub use traits::{Context, Savable, Schedulable, Updatable};

pub use kiln_scene::Renderable;

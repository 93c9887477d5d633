//! Runtime for Kiln applications.
//!
//! An application is a single immutable state that events are folded into
//! on a dedicated thread ([`Updates`]). Every new state is offered to three
//! subscribers, each with its own workers:
//!
//! - [`Graphics`] renders it into a [`Frame`](kiln_scene::Frame), animates
//!   the frame and hands the newest one to the display thread;
//! - [`Schedules`] runs the [`Action`](kiln_core::Action) it asks for and
//!   feeds the resulting events back into the loop;
//! - [`Saves`] persists it.
//!
//! [`Engine`] assembles the four and stops them in order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod graphics;
pub mod permit;
pub mod saves;
pub mod schedules;
pub mod updates;

pub use config::{EngineConfig, MIN_PERMITS};
pub use engine::{Engine, ShutdownReport};
pub use error::{ConfigError, EngineError};
pub use executor::{Executor, Job};
pub use graphics::Graphics;
pub use permit::{Permit, Permits};
pub use saves::Saves;
pub use schedules::Schedules;
pub use updates::{Notifiable, Updates};

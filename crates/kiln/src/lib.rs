//! Kiln: immutable scene graphs driven by a threaded state loop.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Kiln sub-crates. For most users, adding `kiln` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use kiln::prelude::*;
//!
//! // A state that only counts events.
//! struct Counter(u64);
//! impl Updatable for Counter {
//!     fn update(self: Arc<Self>, _ctx: &Context, _event: &Event) -> Arc<dyn Updatable> {
//!         Arc::new(Counter(self.0 + 1))
//!     }
//! }
//!
//! let mut engine = Engine::start(
//!     EngineConfig::default(),
//!     Context::new("counter", std::env::temp_dir()),
//!     Arc::new(Counter(0)),
//!     Arc::new(SystemClock),
//! )
//! .unwrap();
//! engine.handle(Event::animation(0)).unwrap();
//! engine.handle(Event::animation(1)).unwrap();
//! engine.stop();
//!
//! let count = engine.state().downcast_ref::<Counter>().map(|c| c.0);
//! assert_eq!(count, Some(2));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `kiln-core` | Events, actions, clocks, state capability traits |
//! | [`scene`] | `kiln-scene` | Scene graph values, matrices, the `Canvas` seam |
//! | [`engine`] | `kiln-engine` | State loop, render pipeline, scheduler, saves |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Events, actions, clocks and capability traits (`kiln-core`).
pub use kiln_core as types;

/// Scene graph values and the draw seam (`kiln-scene`).
///
/// Everything here is immutable: updating a [`scene::Frame`] at a time
/// returns a new frame and collapses whatever has finished animating.
pub use kiln_scene as scene;

/// Worker threads and their assembly (`kiln-engine`).
///
/// [`engine::Engine`] starts the state loop and its three subscribers.
pub use kiln_engine as engine;

/// Common imports for typical Kiln usage.
///
/// ```rust
/// use kiln::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use kiln_core::{
        Action, Clock, Context, Event, EventKind, Key, Renderable, Savable, Schedulable,
        SystemClock, Touch, Updatable,
    };

    // Scene graph
    pub use kiln_scene::{
        Animation, Batch, Camera, Canvas, Color, Frame, Interpolation, Mat4, Material, Mesh,
        Model, Property, Region, Scene, Transformation, Vec2, Vec3, Viewport,
    };

    // Errors
    pub use kiln_core::{ActionError, EventError, SaveError};
    pub use kiln_engine::{ConfigError, EngineError};
    pub use kiln_scene::SceneError;

    // Engine
    pub use kiln_engine::{Engine, EngineConfig, ShutdownReport};
}

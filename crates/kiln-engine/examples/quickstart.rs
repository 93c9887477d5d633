//! Kiln Quickstart: a spinning quad driven by the full engine.
//!
//! Demonstrates:
//!   1. An application state that renders, schedules and saves
//!   2. Starting the engine and feeding it input
//!   3. A display loop drawing whatever frame is ready
//!   4. Stopping the engine and reading the shutdown report
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example quickstart

use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use kiln_core::{
    Action, Clock, Context, Event, EventKind, Key, Renderable, Savable, SaveError, Schedulable,
    SystemClock, Updatable,
};
use kiln_engine::{Engine, EngineConfig};
use kiln_scene::math;
use kiln_scene::{
    Animation, Batch, Camera, Canvas, Color, Frame, Interpolation, Material, Mesh, Model,
    Property, Region, Scene, Transformation, Vec3, Viewport,
};
use tracing_subscriber::EnvFilter;

// ─── Application state ──────────────────────────────────────────

const SPIN_MS: u64 = 600;

/// Counts key presses; every press spins the quad once and schedules a
/// "chime" action a little later.
#[derive(Clone, Debug, Default)]
struct Spinner {
    width: u32,
    height: u32,
    presses: u32,
    last_press: u64,
    chimes: u32,
}

impl Updatable for Spinner {
    fn update(self: Arc<Self>, _ctx: &Context, event: &Event) -> Arc<dyn Updatable> {
        let mut next = (*self).clone();
        match event.kind() {
            EventKind::View { width, height } => {
                next.width = *width;
                next.height = *height;
            }
            EventKind::Key {
                input: Key::Down, ..
            } => {
                next.presses += 1;
                next.last_press = event.time();
            }
            EventKind::Action { .. } => next.chimes += 1,
            _ => return self,
        }
        Arc::new(next)
    }

    fn as_renderable(&self) -> Option<&dyn Renderable> {
        (self.width > 0).then_some(self as &dyn Renderable)
    }

    fn as_schedulable(&self) -> Option<&dyn Schedulable> {
        Some(self)
    }

    fn as_savable(&self) -> Option<&dyn Savable> {
        Some(self)
    }
}

impl Renderable for Spinner {
    fn render(&self) -> Result<Frame, kiln_scene::SceneError> {
        let material = Arc::new(Material::new(
            "flat",
            vec![
                Property::named("u_mvp", Property::ModelViewProjection)?,
                Property::color("u_color", Color::new(0.9, 0.4, 0.1, 1.0)?)?,
            ],
        )?);
        let spin = Transformation::rotate(
            Vec3::new(0.0, 0.0, 360.0),
            Interpolation::linear(self.last_press, SPIN_MS),
        );
        let quad = Model::dynamic(
            Arc::new(Mesh::quad(Region::default())),
            Animation::dynamic(spin),
        );
        let aspect = self.width as f32 / self.height as f32;
        let camera = Camera::look_at(
            math::perspective(60.0, aspect, 0.1, 100.0),
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::ZERO,
            Vec3::Y,
        );
        let scene = Scene::new(camera, vec![Batch::new(material, vec![quad])]);
        Frame::dynamic(vec![scene], Color::BLACK, self.width, self.height, 1000 / 30)
    }
}

impl Schedulable for Spinner {
    fn schedule(&self) -> Action {
        let pressed = self.presses > self.chimes;
        match Action::delayed("chime", self.last_press + SPIN_MS) {
            Ok(action) if pressed => action,
            _ => Action::Complete,
        }
    }
}

impl Savable for Spinner {
    fn save(&self, ctx: &Context) -> Result<(), SaveError> {
        fs::create_dir_all(ctx.data_dir())?;
        let path = ctx.data_dir().join(format!("{}.txt", ctx.app_name()));
        fs::write(path, format!("presses={} chimes={}\n", self.presses, self.chimes))?;
        Ok(())
    }
}

// ─── Display side ───────────────────────────────────────────────

/// Prints draw calls instead of issuing them to a GPU.
#[derive(Default)]
struct ConsoleCanvas {
    frames: u32,
}

impl Canvas for ConsoleCanvas {
    fn begin(&mut self, viewport: Viewport, background: Color) {
        self.frames += 1;
        println!(
            "frame {:>3}: {}x{} clear #{:08x}",
            self.frames,
            viewport.width,
            viewport.height,
            background.to_rgba()
        );
    }

    fn draw_batch(
        &mut self,
        material: &Material,
        camera: &Camera,
        models: &[Model],
        indices: &[u32],
    ) {
        println!("  {}: {} triangles", material.name(), indices.len() / 3);
        for model in models {
            for property in material.properties() {
                let name = property.binding();
                if let (Some(name), Some(matrix)) = (name, property.matrix(camera, model)) {
                    println!("    {name} x axis = {:?}", matrix.x_axis);
                }
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let clock = Arc::new(SystemClock);
    let context = Context::new("quickstart", std::env::temp_dir().join("kiln-quickstart"));
    let mut engine = Engine::start(
        EngineConfig::default(),
        context,
        Arc::new(Spinner::default()),
        clock.clone(),
    )?;

    let now = || clock.now_millis();
    engine.resize(now(), 640, 480)?;

    let mut canvas = ConsoleCanvas::default();
    let start = Instant::now();
    let mut pressed = 0;
    while start.elapsed() < Duration::from_secs(3) {
        // Press a key once a second.
        if start.elapsed() >= Duration::from_secs(pressed) {
            engine.handle(Event::key(now(), 32, Key::Down))?;
            pressed += 1;
        }
        engine.draw(&mut canvas);
        thread::sleep(Duration::from_millis(16));
    }

    let report = engine.stop();
    println!("{report:?}");
    if let Some(state) = engine.state().downcast_ref::<Spinner>() {
        println!("presses={} chimes={}", state.presses, state.chimes);
    }
    Ok(())
}

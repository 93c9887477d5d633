//! Integration tests: scheduled actions delivered through the state loop.
//!
//! A [`LogState`] asks for its action after every key-down event and
//! records the action events the tick loop feeds back. A [`ManualClock`]
//! decides when delayed actions fire.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use kiln_core::{Action, Clock, Context, Event, Key, SystemClock};
use kiln_engine::{Engine, EngineConfig};
use kiln_test_utils::{LogState, ManualClock};

fn start(name: &str, action: Action, clock: Arc<dyn Clock>) -> Engine {
    let config = EngineConfig {
        thread_name_prefix: format!("sched-{name}"),
        tick_interval_ms: 5,
        ..EngineConfig::default()
    };
    Engine::start(
        config,
        Context::new("kiln-tests", std::env::temp_dir()),
        Arc::new(LogState::scheduling(action)),
        clock,
    )
    .unwrap()
}

fn wait_until(what: &str, done: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done() {
        if Instant::now() > deadline {
            panic!("timed out waiting for {what}");
        }
        thread::sleep(Duration::from_millis(2));
    }
}

fn log(engine: &Engine) -> LogState {
    engine
        .state()
        .downcast_ref::<LogState>()
        .cloned()
        .expect("state is a LogState")
}

fn press(engine: &Engine, time: u64) {
    engine.handle(Event::key(time, 32, Key::Down)).unwrap();
}

#[test]
fn immediate_action_fires_once_per_press() {
    let mut engine = start(
        "immediate",
        Action::immediate("jump").unwrap(),
        Arc::new(SystemClock),
    );

    press(&engine, 1);
    wait_until("first jump", || log(&engine).action_names() == ["jump"]);
    wait_until("tick loop to stop", || !engine.schedules().is_ticking());
    assert_eq!(engine.schedules().action(), Action::Complete);
    assert_eq!(log(&engine).action_names(), ["jump"]);

    press(&engine, 2);
    wait_until("second jump", || log(&engine).action_names() == ["jump", "jump"]);

    engine.stop();
}

#[test]
fn delayed_action_waits_for_the_clock() {
    let clock = Arc::new(ManualClock::new(0));
    let mut engine = start(
        "delayed",
        Action::delayed("ring", 500).unwrap(),
        clock.clone(),
    );

    press(&engine, 0);
    wait_until("tick loop to start", || engine.schedules().is_ticking());
    assert!(log(&engine).action_names().is_empty());

    clock.set(500);
    wait_until("ring", || log(&engine).action_names() == ["ring"]);
    let state = log(&engine);
    assert_eq!(state.events.last().map(Event::time), Some(500));

    wait_until("tick loop to stop", || !engine.schedules().is_ticking());
    engine.stop();
    assert_eq!(log(&engine).action_names(), ["ring"]);
}

#[test]
fn composite_children_fire_on_their_own_schedule() {
    let clock = Arc::new(ManualClock::new(0));
    let action = Action::composite([
        Action::immediate("open").unwrap(),
        Action::delayed("close", 200).unwrap(),
    ]);
    let mut engine = start("composite", action, clock.clone());

    press(&engine, 0);
    wait_until("open", || log(&engine).action_names() == ["open"]);
    assert!(engine.schedules().is_ticking());

    clock.set(200);
    wait_until("close", || log(&engine).action_names() == ["open", "close"]);
    wait_until("tick loop to stop", || !engine.schedules().is_ticking());
    engine.stop();
}

#[test]
fn stop_abandons_a_waiting_action() {
    let clock = Arc::new(ManualClock::new(0));
    let mut engine = start(
        "abandon",
        Action::delayed("ring", 300).unwrap(),
        clock.clone(),
    );

    press(&engine, 0);
    wait_until("tick loop to start", || engine.schedules().is_ticking());

    let started = Instant::now();
    let report = engine.stop();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(report.updates_joined);
    assert_eq!(report.workers_joined, 5);

    clock.set(300);
    assert!(log(&engine).action_names().is_empty());
    assert!(engine.schedules().action().is_pending());
}

/// Panics on its first reading, then reads from a [`ManualClock`].
struct HiccupClock {
    inner: ManualClock,
    hiccuped: AtomicBool,
}

impl HiccupClock {
    fn new() -> Self {
        Self {
            inner: ManualClock::new(0),
            hiccuped: AtomicBool::new(false),
        }
    }

    fn hiccuped(&self) -> bool {
        self.hiccuped.load(Ordering::Acquire)
    }
}

impl Clock for HiccupClock {
    fn now_millis(&self) -> u64 {
        if !self.hiccuped.swap(true, Ordering::AcqRel) {
            panic!("clock hiccup");
        }
        self.inner.now_millis()
    }
}

#[test]
fn panicking_tick_frees_the_loop_for_the_next_notify() {
    let clock = Arc::new(HiccupClock::new());
    let mut engine = start(
        "hiccup",
        Action::immediate("jump").unwrap(),
        clock.clone(),
    );

    press(&engine, 0);
    wait_until("failed tick to release the loop", || {
        clock.hiccuped() && !engine.schedules().is_ticking()
    });
    assert!(log(&engine).action_names().is_empty());
    assert!(engine.schedules().action().is_pending());

    // The next state change restarts the loop and the held action fires.
    press(&engine, 200);
    wait_until("jump", || log(&engine).action_names() == ["jump"]);
    wait_until("tick loop to stop", || !engine.schedules().is_ticking());

    engine.stop();
    assert_eq!(log(&engine).action_names(), ["jump"]);
}

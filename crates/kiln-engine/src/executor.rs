//! Single-thread task executors.
//!
//! Each subsystem owns one or two executors. An executor is a named thread
//! draining an unbounded crossbeam channel in FIFO order, plus a timer heap
//! for delayed tasks. A task that fails or panics is logged and the thread
//! moves on to the next one.
//!
//! ```text
//! submit()        ──Run(job)────────────┐
//! submit_after()  ──RunAt(due, job)──┐  │
//!                                    v  v
//!                         [ unbounded channel ]
//!                                    │
//!                         worker: recv_deadline(next timer)
//!                                 run due timers, then messages
//! ```
//!
//! Shutdown drops the sender. Tasks already in the channel still run;
//! delayed tasks that have not come due are dropped.

use std::any::Any;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, error, warn};

use crate::error::{ConfigError, EngineError};

/// A unit of work run on an executor thread.
pub type Job = Box<dyn FnOnce() -> Result<(), EngineError> + Send + 'static>;

enum Message {
    Run(Job),
    RunAt(Instant, Job),
}

struct Timer {
    due: Instant,
    seq: u64,
    job: Job,
}

// Min-heap on (due, seq): earliest first, FIFO among equal deadlines.
impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Timer {}

struct Inner {
    module: &'static str,
    thread_name: String,
    tx: Mutex<Option<Sender<Message>>>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

/// Handle to a single worker thread. Clones share the thread.
#[derive(Clone)]
pub struct Executor {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("module", &self.inner.module)
            .field("thread_name", &self.inner.thread_name)
            .finish()
    }
}

impl Executor {
    /// Spawn the worker thread `thread_name`, reporting rejected
    /// submissions as coming from `module`.
    pub fn spawn(module: &'static str, thread_name: String) -> Result<Self, ConfigError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let name = thread_name.clone();
        let handle = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || run_worker(&name, rx))
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("{thread_name}: {e}"),
            })?;
        debug!(worker = %thread_name, "executor started");
        Ok(Self {
            inner: Arc::new(Inner {
                module,
                thread_name,
                tx: Mutex::new(Some(tx)),
                thread: Mutex::new(Some(handle)),
            }),
        })
    }

    /// The worker thread's name.
    pub fn thread_name(&self) -> &str {
        &self.inner.thread_name
    }

    /// Queue `job` to run after everything already queued.
    pub fn submit<F>(&self, job: F) -> Result<(), EngineError>
    where
        F: FnOnce() -> Result<(), EngineError> + Send + 'static,
    {
        self.send(Message::Run(Box::new(job)))
    }

    /// Run `job` once `delay` has elapsed.
    pub fn submit_after<F>(&self, delay: Duration, job: F) -> Result<(), EngineError>
    where
        F: FnOnce() -> Result<(), EngineError> + Send + 'static,
    {
        if delay.is_zero() {
            return self.submit(job);
        }
        self.send(Message::RunAt(Instant::now() + delay, Box::new(job)))
    }

    fn send(&self, message: Message) -> Result<(), EngineError> {
        let tx = self.inner.tx.lock().unwrap_or_else(PoisonError::into_inner);
        let shut_down = EngineError::ShutDown {
            module: self.inner.module,
        };
        match tx.as_ref() {
            Some(tx) => tx.send(message).map_err(|_| shut_down),
            None => Err(shut_down),
        }
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.inner
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Stop accepting work and wait for queued tasks to finish.
    ///
    /// Returns whether the worker was joined. Called from the worker
    /// itself, or a second time, it only closes the queue and returns
    /// `false`.
    pub fn shutdown(&self) -> bool {
        self.inner
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let handle = self
            .inner
            .thread
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(handle) = handle else {
            return false;
        };
        if handle.thread().id() == thread::current().id() {
            return false;
        }
        handle.join().is_ok()
    }
}

fn run_worker(name: &str, rx: Receiver<Message>) {
    let mut timers = BinaryHeap::new();
    let mut seq = 0u64;

    loop {
        let now = Instant::now();
        while timers.peek().is_some_and(|t: &Timer| t.due <= now) {
            if let Some(timer) = timers.pop() {
                execute(name, timer.job);
            }
        }

        let message = match timers.peek() {
            Some(next) => match rx.recv_deadline(next.due) {
                Ok(message) => message,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match rx.recv() {
                Ok(message) => message,
                Err(_) => break,
            },
        };

        match message {
            Message::Run(job) => execute(name, job),
            Message::RunAt(due, job) => {
                seq += 1;
                timers.push(Timer { due, seq, job });
            }
        }
    }

    if !timers.is_empty() {
        debug!(worker = name, dropped = timers.len(), "dropping delayed tasks on shutdown");
    }
    debug!(worker = name, "executor stopped");
}

fn execute(worker: &str, job: Job) {
    match panic::catch_unwind(AssertUnwindSafe(job)) {
        Ok(Ok(())) => {}
        Ok(Err(error @ EngineError::ShutDown { .. })) => {
            warn!(worker, %error, "task hit a stopped module");
        }
        Ok(Err(error)) => error!(worker, %error, "task failed"),
        Err(payload) => {
            error!(worker, panic = %panic_message(payload.as_ref()), "task panicked");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    fn executor(name: &str) -> Executor {
        Executor::spawn("test", format!("kiln-test-{name}")).unwrap()
    }

    fn wait_for(counter: &AtomicUsize, target: usize) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while counter.load(AtomicOrdering::Acquire) < target {
            if Instant::now() > deadline {
                panic!(
                    "counter stuck at {} (wanted {target})",
                    counter.load(AtomicOrdering::Acquire)
                );
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn runs_jobs_in_submission_order() {
        let ex = executor("order");
        let log = Arc::new(Mutex::new(Vec::new()));
        for i in 0..50 {
            let log = Arc::clone(&log);
            ex.submit(move || {
                log.lock().unwrap().push(i);
                Ok(())
            })
            .unwrap();
        }
        assert!(ex.shutdown());
        assert_eq!(*log.lock().unwrap(), (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn survives_failing_and_panicking_jobs() {
        let ex = executor("survive");
        let done = Arc::new(AtomicUsize::new(0));
        ex.submit(|| Err(EngineError::Saturated { module: "test" }))
            .unwrap();
        ex.submit(|| panic!("boom")).unwrap();
        let d = Arc::clone(&done);
        ex.submit(move || {
            d.fetch_add(1, AtomicOrdering::AcqRel);
            Ok(())
        })
        .unwrap();
        wait_for(&done, 1);
        ex.shutdown();
    }

    #[test]
    fn delayed_jobs_run_in_deadline_order() {
        let ex = executor("delay");
        let log = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(AtomicUsize::new(0));
        for (label, ms) in [("late", 60u64), ("early", 20), ("now", 0)] {
            let log = Arc::clone(&log);
            let done = Arc::clone(&done);
            ex.submit_after(Duration::from_millis(ms), move || {
                log.lock().unwrap().push(label);
                done.fetch_add(1, AtomicOrdering::AcqRel);
                Ok(())
            })
            .unwrap();
        }
        wait_for(&done, 3);
        assert_eq!(*log.lock().unwrap(), vec!["now", "early", "late"]);
        ex.shutdown();
    }

    #[test]
    fn shutdown_rejects_new_work_and_drops_pending_timers() {
        let ex = executor("shutdown");
        let ran = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&ran);
        ex.submit_after(Duration::from_secs(30), move || {
            r.fetch_add(1, AtomicOrdering::AcqRel);
            Ok(())
        })
        .unwrap();

        let start = Instant::now();
        assert!(ex.shutdown());
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(ran.load(AtomicOrdering::Acquire), 0);
        assert!(ex.is_shut_down());
        assert_eq!(
            ex.submit(|| Ok(())),
            Err(EngineError::ShutDown { module: "test" })
        );
        assert!(!ex.shutdown());
    }

    #[test]
    fn shutdown_from_worker_does_not_deadlock() {
        let ex = executor("self");
        let done = Arc::new(AtomicUsize::new(0));
        let (inner, d) = (ex.clone(), Arc::clone(&done));
        ex.submit(move || {
            assert!(!inner.shutdown());
            d.fetch_add(1, AtomicOrdering::AcqRel);
            Ok(())
        })
        .unwrap();
        wait_for(&done, 1);
        assert!(ex.is_shut_down());
    }

    const _: fn() = || {
        fn assert<T: Send + Sync>() {}
        assert::<Executor>();
    };

    /// Collects formatted log lines written by a scoped subscriber.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stopped_module_inside_a_task_is_a_warning() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            execute(
                "warn-test",
                Box::new(|| Err(EngineError::ShutDown { module: "graphics" })),
            );
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("task hit a stopped module"), "{output}");
    }
}

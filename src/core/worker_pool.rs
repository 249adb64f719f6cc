//! Fixed-size pool of background threads running hook jobs
//!
//! Lifecycle is one-directional: running, then stopping, then stopped.
//! Once stopping, [`WorkerPool::submit`] refuses new jobs and releases
//! producers blocked on a full queue, while the workers keep running what
//! was already admitted. [`WorkerPool::shutdown`] drains that admitted work
//! before joining; [`WorkerPool::stop`] joins right away and drops whatever
//! is still queued. Both are idempotent and safe to call concurrently.

use crossbeam_channel::{bounded, select, Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use std::cell::Cell;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_QUEUE_FACTOR: usize = 2;

thread_local! {
    static IN_WORKER: Cell<bool> = const { Cell::new(false) };
}

/// Whether the calling thread belongs to a worker pool
pub fn on_worker_thread() -> bool {
    IN_WORKER.with(Cell::get)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    Running,
    Stopping,
    Stopped,
}

impl PoolState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => PoolState::Running,
            1 => PoolState::Stopping,
            _ => PoolState::Stopped,
        }
    }
}

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Counts submitted jobs that have not yet finished or been discarded
#[derive(Debug, Default)]
struct InFlight {
    count: Mutex<usize>,
    idle: Condvar,
}

impl InFlight {
    fn add(&self) {
        *self.count.lock() += 1;
    }

    fn done(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn get(&self) -> usize {
        *self.count.lock()
    }

    fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.idle.wait(&mut count);
        }
    }
}

/// A queued job; releases its in-flight slot whether it runs or is dropped
struct Job {
    task: Option<Task>,
    in_flight: Arc<InFlight>,
}

impl Job {
    fn run(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(panic_info) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(task)) {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!("[LOGGER ERROR] Hook job panicked: {}", panic_msg);
            }
        }
    }
}

impl Drop for Job {
    fn drop(&mut self) {
        self.in_flight.done();
    }
}

pub struct WorkerPool {
    state: AtomicU8,
    jobs: Sender<Job>,
    backlog: Receiver<Job>,
    close_signal: Mutex<Option<Sender<()>>>,
    close_rx: Receiver<()>,
    halt_signal: Mutex<Option<Sender<()>>>,
    handles: Mutex<Vec<thread::JoinHandle<()>>>,
    in_flight: Arc<InFlight>,
    dropped: AtomicUsize,
    workers: usize,
}

impl WorkerPool {
    /// Start `workers` threads sharing a queue of `workers * queue_factor` slots
    pub fn new(workers: usize, queue_factor: usize) -> Self {
        let workers = workers.max(1);
        let (jobs, backlog) = bounded::<Job>(workers * queue_factor.max(1));
        let (close_tx, close_rx) = bounded::<()>(0);
        let (halt_tx, halt_rx) = bounded::<()>(0);

        let handles = (0..workers)
            .map(|idx| {
                let jobs = backlog.clone();
                let halt = halt_rx.clone();
                thread::Builder::new()
                    .name(format!("loggo-hook-{}", idx))
                    .spawn(move || Self::worker(jobs, halt))
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    eprintln!("[LOGGER ERROR] Failed to spawn hook worker: {}", e);
                    None
                }
            })
            .collect();

        Self {
            state: AtomicU8::new(PoolState::Running as u8),
            jobs,
            backlog,
            close_signal: Mutex::new(Some(close_tx)),
            close_rx,
            halt_signal: Mutex::new(Some(halt_tx)),
            handles: Mutex::new(handles),
            in_flight: Arc::new(InFlight::default()),
            dropped: AtomicUsize::new(0),
            workers,
        }
    }

    fn worker(jobs: Receiver<Job>, halt: Receiver<()>) {
        IN_WORKER.with(|flag| flag.set(true));
        loop {
            select! {
                recv(jobs) -> job => match job {
                    Ok(job) => job.run(),
                    Err(_) => return,
                },
                recv(halt) -> _ => return,
            }
        }
    }

    pub fn state(&self) -> PoolState {
        PoolState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.state() == PoolState::Running
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn capacity(&self) -> usize {
        self.jobs.capacity().unwrap_or(0)
    }

    /// Jobs submitted but not yet finished or discarded
    pub fn pending(&self) -> usize {
        self.in_flight.get()
    }

    /// Jobs discarded because the pool was stopping
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Queue a job, blocking while the queue is full and the pool runs
    ///
    /// Returns `false` when the job was discarded because the pool is
    /// stopping or stopped.
    pub fn submit<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.is_running() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        self.in_flight.add();
        let job = Job {
            task: Some(Box::new(task)),
            in_flight: Arc::clone(&self.in_flight),
        };

        let accepted = select! {
            send(self.jobs, job) -> res => res.is_ok(),
            recv(self.close_rx) -> _ => false,
        };

        if !accepted {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // Raced with stop(): the workers are gone, so the queue is discarded.
        if self.state.load(Ordering::SeqCst) == PoolState::Stopped as u8 {
            self.discard_backlog();
        }
        true
    }

    /// Block until every submitted job has finished or been discarded
    ///
    /// Returns immediately when called from a worker thread, since that
    /// thread's own job would never complete.
    pub fn wait_idle(&self) {
        if on_worker_thread() {
            eprintln!("[LOGGER WARNING] Drain requested from a hook worker; skipping wait");
            return;
        }
        self.in_flight.wait();
    }

    /// Refuse new jobs and release blocked producers, leaving admitted jobs
    /// to the workers
    ///
    /// Returns whether this call moved the pool out of the running state.
    pub fn begin_stop(&self) -> bool {
        let moved = self
            .state
            .compare_exchange(
                PoolState::Running as u8,
                PoolState::Stopping as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if moved {
            drop(self.close_signal.lock().take());
        }
        moved
    }

    /// Refuse new jobs, wait for the admitted ones and join the workers
    ///
    /// Bounded even while other threads keep submitting, since every
    /// submission after [`begin_stop`](Self::begin_stop) is refused.
    pub fn shutdown(&self) {
        self.begin_stop();
        self.wait_idle();
        self.stop();
    }

    /// Refuse new jobs, wake the workers and join them, dropping queued jobs
    pub fn stop(&self) {
        self.begin_stop();
        let Some(halt) = self.halt_signal.lock().take() else {
            return;
        };
        drop(halt);

        let handles = std::mem::take(&mut *self.handles.lock());
        let current = thread::current().id();
        for handle in handles {
            if handle.thread().id() == current {
                continue;
            }
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] Hook worker panicked during shutdown: {:?}", e);
            }
        }

        self.state.store(PoolState::Stopped as u8, Ordering::SeqCst);
        self.discard_backlog();
    }

    fn discard_backlog(&self) {
        while let Ok(job) = self.backlog.try_recv() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            drop(job);
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

//! Hook registry and the dispatch pass run on the worker pool
//!
//! Hooks are user callbacks receiving every emitted message together with
//! its level. A hook that fails, by returning an error or by panicking, is
//! reported once on the error stream and removed from the registry. Passes
//! run concurrently, but a single hook is never invoked by two passes at
//! once and is not invoked again once it has failed.

use super::error::{HookError, LoggerError, Result};
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use super::sink::Sink;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

pub const DEFAULT_MAX_HOOKS: usize = 100;

/// Callback signature for hooks
pub type HookFn = Arc<dyn Fn(LogLevel, &str) -> std::result::Result<(), HookError> + Send + Sync>;

/// Stable identity of a registered hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookId(u64);

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hook-{}", self.0)
    }
}

static NEXT_HOOK_ID: AtomicU64 = AtomicU64::new(1);

/// State shared by every snapshot copy of one hook
#[derive(Debug, Default)]
struct HookState {
    gate: Mutex<()>,
    retired: AtomicBool,
}

#[derive(Clone)]
pub struct Hook {
    callback: HookFn,
    priority: i32,
    id: HookId,
    state: Arc<HookState>,
}

impl Hook {
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn id(&self) -> HookId {
        self.id
    }

    /// Whether the hook has failed and is no longer invoked
    pub fn is_retired(&self) -> bool {
        self.state.retired.load(Ordering::Acquire)
    }

    /// Mark the hook failed; only the first caller gets `true`
    fn retire(&self) -> bool {
        self.state
            .retired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn call(&self, level: LogLevel, message: &str) -> std::result::Result<(), HookError> {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            (self.callback)(level, message)
        })) {
            Ok(result) => result,
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                Err(format!("hook panicked: {}", panic_msg).into())
            }
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("retired", &self.is_retired())
            .finish_non_exhaustive()
    }
}

/// Ordered, capacity-bounded collection of hooks
#[derive(Debug)]
pub struct HookRegistry {
    hooks: Mutex<Vec<Hook>>,
    len: AtomicUsize,
    max_hooks: usize,
}

impl HookRegistry {
    pub fn new(max_hooks: usize) -> Self {
        Self {
            hooks: Mutex::new(Vec::new()),
            len: AtomicUsize::new(0),
            max_hooks,
        }
    }

    pub fn max_hooks(&self) -> usize {
        self.max_hooks
    }

    /// Lock-free size check for the emission path
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a hook, failing without side effects when full
    pub fn add<F>(&self, callback: F, priority: i32) -> Result<HookId>
    where
        F: Fn(LogLevel, &str) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        let mut hooks = self.hooks.lock();
        if hooks.len() >= self.max_hooks {
            return Err(LoggerError::hook_capacity(self.max_hooks));
        }

        let id = HookId(NEXT_HOOK_ID.fetch_add(1, Ordering::Relaxed));
        hooks.push(Hook {
            callback: Arc::new(callback),
            priority,
            id,
            state: Arc::default(),
        });
        self.len.store(hooks.len(), Ordering::Release);
        Ok(id)
    }

    /// Remove the hook with `id`; returns whether it was present
    pub fn remove(&self, id: HookId) -> bool {
        let mut hooks = self.hooks.lock();
        let Some(pos) = hooks.iter().position(|h| h.id == id) else {
            return false;
        };
        hooks.remove(pos);
        self.len.store(hooks.len(), Ordering::Release);
        true
    }

    pub fn clear(&self) {
        let mut hooks = self.hooks.lock();
        hooks.clear();
        self.len.store(0, Ordering::Release);
    }

    /// Copy of the current hooks, highest priority first, ties in
    /// registration order
    pub fn snapshot(&self) -> Vec<Hook> {
        let mut hooks = self.hooks.lock().clone();
        hooks.sort_by(|a, b| b.priority.cmp(&a.priority));
        hooks
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HOOKS)
    }
}

/// One dispatch pass: run every hook in the snapshot and evict failures
pub(crate) fn dispatch(
    registry: &HookRegistry,
    errors: &Mutex<Box<dyn Sink>>,
    metrics: &LoggerMetrics,
    level: LogLevel,
    message: &str,
) {
    for hook in registry.snapshot() {
        let _gate = hook.state.gate.lock();
        if hook.is_retired() {
            continue;
        }
        if let Err(e) = hook.call(level, message) {
            if !hook.retire() {
                continue;
            }
            let line = format!("Hook error: {}\n", single_line(&e.to_string()));
            let _ = errors.lock().write(line.as_bytes());
            if registry.remove(hook.id) {
                metrics.record_hook_removed();
            }
        }
    }
}

fn single_line(text: &str) -> String {
    text.replace(|c: char| c == '\n' || c == '\r', " ")
}

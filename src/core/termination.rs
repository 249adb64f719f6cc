//! What the logger does after a fatal or panic message is delivered
//!
//! Both actions are replaceable so that programs and tests can observe
//! termination without the process going away.

use std::fmt;
use std::sync::Arc;

/// Called with the exit code after a fatal message
pub type ExitFn = Arc<dyn Fn(i32) + Send + Sync>;

/// Called with the rendered message body after a panic message
pub type PanicFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Exit code used for fatal messages
pub const FATAL_EXIT_CODE: i32 = 1;

#[derive(Clone)]
pub struct Termination {
    pub(crate) exit: ExitFn,
    pub(crate) panic: PanicFn,
}

impl Termination {
    pub fn new(exit: ExitFn, panic: PanicFn) -> Self {
        Self { exit, panic }
    }

    pub fn with_exit(mut self, exit: ExitFn) -> Self {
        self.exit = exit;
        self
    }

    pub fn with_panic(mut self, panic: PanicFn) -> Self {
        self.panic = panic;
        self
    }

    pub(crate) fn exit(&self, code: i32) {
        (self.exit)(code)
    }

    pub(crate) fn panic(&self, message: &str) {
        (self.panic)(message)
    }
}

impl Default for Termination {
    /// Exit the process, or unwind the calling thread with the message
    fn default() -> Self {
        Self {
            exit: Arc::new(|code: i32| std::process::exit(code)),
            panic: Arc::new(|message: &str| panic!("{}", message)),
        }
    }
}

impl fmt::Debug for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Termination").finish_non_exhaustive()
    }
}

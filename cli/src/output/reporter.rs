//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ! {message}"` on stderr (suppressed when `ctx.quiet`)
/// - the spinner only appears when stderr is a terminal and not `quiet`
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            spinner: RefCell::new(None),
        }
    }

    /// Run `f` with the spinner hidden, so printed lines are not overdrawn.
    fn suspended(&self, f: impl FnOnce()) {
        match self.spinner.borrow().as_ref() {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.suspended(|| self.ctx.step(message));
    }

    fn success(&self, message: &str) {
        self.suspended(|| self.ctx.success(message));
    }

    fn warn(&self, message: &str) {
        self.suspended(|| self.ctx.warn(message));
    }

    fn spin(&self, label: &str) {
        if !self.ctx.show_progress() {
            return;
        }
        let previous = self.spinner.replace(Some(progress::spinner(label)));
        if let Some(pb) = previous {
            pb.finish_and_clear();
        }
    }

    fn set_status(&self, label: &str) {
        if let Some(pb) = self.spinner.borrow().as_ref() {
            pb.set_message(label.to_string());
        }
    }

    fn stop_spin(&self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        self.stop_spin();
    }
}

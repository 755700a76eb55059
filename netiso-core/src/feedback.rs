//! Progress reporting and cooperative cancellation
//!
//! Long loops receive a `&dyn Feedback` explicitly; nothing here is global.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use log::info;

use crate::Error;

/// Iterations between two cancellation polls / progress reports
pub const PROGRESS_BATCH: usize = 1000;

/// Capability handed to every long-running phase
pub trait Feedback {
    /// Fraction of the current phase that is done, in `[0, 1]`
    fn set_progress(&self, _fraction: f64) {}

    /// Coarse informational message
    fn push_info(&self, message: &str) {
        info!("{message}");
    }

    fn is_canceled(&self) -> bool {
        false
    }
}

/// Feedback that reports nothing and never cancels
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn push_info(&self, _message: &str) {}
}

/// Shared flag that aborts a running analysis once set
#[derive(Debug, Default, Clone)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Feedback writing progress to the `log` facade in 10% steps
#[derive(Debug, Default)]
pub struct LogFeedback {
    token: Option<CancellationToken>,
    last_decile: AtomicU64,
}

impl LogFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token: Some(token),
            last_decile: AtomicU64::new(0),
        }
    }
}

impl Feedback for LogFeedback {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn set_progress(&self, fraction: f64) {
        let decile = (fraction.clamp(0.0, 1.0) * 10.0).floor() as u64;
        let previous = self.last_decile.swap(decile, Ordering::Relaxed);
        if decile != previous {
            info!("{}% done", decile * 10);
        }
    }

    fn is_canceled(&self) -> bool {
        self.token.as_ref().is_some_and(CancellationToken::is_canceled)
    }
}

/// Counts iterations of a loop with a known amount of work, polling for
/// cancellation and reporting progress once per batch.
pub struct ProgressTracker<'a> {
    feedback: &'a dyn Feedback,
    total: usize,
    done: usize,
    batch: usize,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(feedback: &'a dyn Feedback, total: usize) -> Self {
        Self::with_batch(feedback, total, PROGRESS_BATCH)
    }

    pub fn with_batch(feedback: &'a dyn Feedback, total: usize, batch: usize) -> Self {
        Self {
            feedback,
            total,
            done: 0,
            batch: batch.max(1),
        }
    }

    /// Records one unit of work.
    ///
    /// # Errors
    ///
    /// Returns `Error::Canceled` when the feedback reports cancellation at a
    /// batch boundary.
    pub fn tick(&mut self) -> Result<(), Error> {
        self.done += 1;
        if self.done % self.batch == 0 {
            if self.feedback.is_canceled() {
                return Err(Error::Canceled);
            }
            self.feedback.set_progress(self.fraction());
        }
        Ok(())
    }

    /// Records `units` of work that needed no processing.
    ///
    /// # Errors
    ///
    /// Same as [`tick`](Self::tick).
    pub fn advance(&mut self, units: usize) -> Result<(), Error> {
        for _ in 0..units {
            self.tick()?;
        }
        Ok(())
    }

    pub fn done(&self) -> usize {
        self.done
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.done as f64 / self.total as f64).min(1.0)
        }
    }

    /// Reports completion of the phase.
    pub fn finish(self) {
        self.feedback.set_progress(1.0);
    }
}

/// Fails fast when cancellation was requested between phases.
pub fn check_canceled(feedback: &dyn Feedback) -> Result<(), Error> {
    if feedback.is_canceled() {
        Err(Error::Canceled)
    } else {
        Ok(())
    }
}

//! Scoped logging capture around a publish.
//!
//! A [`LoggingCapture`] is started before the publish strategy runs and must
//! be stopped exactly once afterwards. [`CaptureScope`] ties the stop call to
//! a guard's `Drop`, so it happens on every exit path, including early
//! returns and unwinding.

use log::{LevelFilter, trace};

/// A logging channel that can be captured for the duration of a publish.
#[cfg_attr(test, mockall::automock)]
pub trait LoggingCapture {
    /// Begin capturing output at `level`.
    fn start(&mut self, level: LevelFilter);

    /// Stop capturing. Called exactly once per [`Self::start`].
    fn stop(&mut self);
}

/// Guard that stops a capture when dropped.
///
/// # Examples
///
/// ```
/// use log::LevelFilter;
/// use publican_deployer::capture::{CaptureScope, MaxLevelCapture};
///
/// let mut capture = MaxLevelCapture::default();
/// {
///     let _scope = CaptureScope::begin(&mut capture, LevelFilter::Info);
///     log::info!("publishing");
/// }
/// ```
pub struct CaptureScope<'a> {
    capture: &'a mut dyn LoggingCapture,
}

impl<'a> CaptureScope<'a> {
    /// Start `capture` at `level` and return the guard that stops it.
    pub fn begin(capture: &'a mut dyn LoggingCapture, level: LevelFilter) -> Self {
        capture.start(level);
        Self { capture }
    }
}

impl Drop for CaptureScope<'_> {
    fn drop(&mut self) {
        self.capture.stop();
    }
}

/// Capture that raises the global `log` verbosity while a publish runs.
///
/// Starting records the current maximum level and installs the requested
/// one; stopping restores what was there before.
#[derive(Debug, Default)]
pub struct MaxLevelCapture {
    previous: Option<LevelFilter>,
}

impl LoggingCapture for MaxLevelCapture {
    fn start(&mut self, level: LevelFilter) {
        let previous = log::max_level();
        trace!("capturing publish output at {level} (was {previous})");
        self.previous = Some(previous);
        log::set_max_level(level);
    }

    fn stop(&mut self) {
        if let Some(previous) = self.previous.take() {
            log::set_max_level(previous);
        }
    }
}

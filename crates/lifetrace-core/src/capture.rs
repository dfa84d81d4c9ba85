//! # Backtrace Capture
//!
//! Records the calling thread's return addresses at the moment of an event.
//!
//! Capture is opt-in. Walking the stack on every retain and release is far
//! more expensive than the rest of recording combined, so a disabled
//! capturer costs one relaxed atomic load and returns an empty backtrace.
//!
//! Only the calling thread's stack is read. The unwinder from the
//! `backtrace` crate is used in-process; no other thread is suspended or
//! inspected.
//!
//! ## Hidden frames
//!
//! A captured stack starts inside the unwinder and passes through the
//! recorder's own dispatch (`capture`, `EventStore::record`,
//! `Recorder::notify`, `global::notify`) before reaching the host. Those
//! frames are recognised by the start address of their enclosing function
//! and dropped, along with everything inner to them. `skip_frames` then
//! drops that many further frames, for hosts that route notifications
//! through hook glue of their own.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::RecorderConfig;
use crate::types::Address;

/// Innermost frames searched for recorder dispatch functions.
const DISPATCH_WINDOW: usize = 32;

/// Start addresses of the functions every recorded event passes through.
fn dispatch_functions() -> [usize; 4]
{
    [
        BacktraceCapturer::capture as usize,
        crate::store::EventStore::record as usize,
        crate::recorder::Recorder::notify as usize,
        crate::global::notify as usize,
    ]
}

/// Bounded, optionally disabled call stack capture.
#[derive(Debug)]
pub struct BacktraceCapturer
{
    enabled: AtomicBool,
    max_depth: usize,
    skip_frames: usize,
}

impl BacktraceCapturer
{
    /// Create a capturer from the recorder configuration.
    pub fn new(config: &RecorderConfig) -> Self
    {
        Self {
            enabled: AtomicBool::new(config.backtrace_enabled),
            max_depth: config.max_depth,
            skip_frames: config.skip_frames,
        }
    }

    /// Turn capture on or off. Applies to the next captured event.
    pub fn set_enabled(&self, enabled: bool)
    {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool
    {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn max_depth(&self) -> usize
    {
        self.max_depth
    }

    /// Capture the current call stack, innermost frame first.
    ///
    /// Unwinder and recorder frames are removed, then `skip_frames` more,
    /// and at most `max_depth` are kept. Returns an empty vector without
    /// walking the stack when capture is disabled.
    #[inline(never)]
    pub fn capture(&self) -> Vec<Address>
    {
        if !self.is_enabled() {
            return Vec::new();
        }

        let dispatch = dispatch_functions();
        let limit = DISPATCH_WINDOW + self.skip_frames + self.max_depth;
        let mut frames = Vec::with_capacity(limit.min(DISPATCH_WINDOW + 64));
        let mut outermost_dispatch = None;

        backtrace::trace(|frame| {
            let ip = Address::from_ip(frame.ip());
            if ip == Address::ZERO {
                return false;
            }
            if frames.len() < DISPATCH_WINDOW && dispatch.contains(&(frame.symbol_address() as usize)) {
                outermost_dispatch = Some(frames.len());
            }
            frames.push(ip);
            frames.len() < limit
        });

        // Without a recognisable dispatch frame only `skip_frames` is applied.
        let start = outermost_dispatch.map_or(0, |index| index + 1) + self.skip_frames;
        frames.drain(..start.min(frames.len()));
        frames.truncate(self.max_depth);
        frames
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_disabled_capture_is_empty()
    {
        let capturer = BacktraceCapturer::new(&RecorderConfig::default());
        assert!(!capturer.is_enabled());
        assert!(capturer.capture().is_empty());
    }

    #[test]
    fn test_enabled_capture_returns_frames()
    {
        let capturer = BacktraceCapturer::new(&RecorderConfig::default());
        capturer.set_enabled(true);
        let frames = capturer.capture();
        assert!(!frames.is_empty());
        assert!(frames.iter().all(|addr| *addr != Address::ZERO));
    }

    #[test]
    fn test_capture_respects_max_depth()
    {
        let config = RecorderConfig::default().with_backtrace(true).with_max_depth(2);
        let capturer = BacktraceCapturer::new(&config);
        assert_eq!(capturer.capture().len(), 2);
    }

    #[test]
    fn test_skip_frames_drops_caller_frames()
    {
        let config = RecorderConfig::default().with_backtrace(true);
        let full = BacktraceCapturer::new(&config).capture();
        let skipped = BacktraceCapturer::new(&config.with_skip_frames(1)).capture();
        // Both captures run from this function; only the innermost return address differs.
        assert_eq!(skipped.len() + 1, full.len());
        assert_eq!(skipped[..], full[1..]);
    }

    #[inline(never)]
    fn capture_from_helper(capturer: &BacktraceCapturer) -> Vec<Address>
    {
        capturer.capture()
    }

    #[test]
    fn test_first_frame_is_the_caller()
    {
        let capturer = BacktraceCapturer::new(&RecorderConfig::default().with_backtrace(true));
        let frames = capture_from_helper(&capturer);
        let first = frames[0].value();
        let helper = capture_from_helper as usize as u64;
        // The innermost kept frame is a return address inside the helper.
        assert!(first > helper && first < helper + 4096);
    }
}

//! The environment the auto-scroller drives.
//!
//! In the browser this is the window (scroll position + `requestAnimationFrame`);
//! natively it is [`SimulatedHost`], an in-memory page used by the CLI and tests.

/// Opaque id of a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

pub trait ScrollHost {
    /// Current vertical scroll offset in pixels.
    fn scroll_offset(&self) -> f64;

    /// Largest reachable offset: content extent minus viewport extent.
    fn max_scroll_offset(&self) -> f64;

    fn scroll_by(&mut self, pixels: f64);

    /// Schedule the next frame callback. `None` if the host refused.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A page of fixed height with a fixed viewport, scrolled entirely in memory.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    pub content_height: f64,
    pub viewport_height: f64,
    offset: f64,
    next_handle: i32,
    pending: Vec<FrameHandle>,
    requested: usize,
    cancelled: usize,
}

impl SimulatedHost {
    pub fn new(content_height: f64, viewport_height: f64) -> Self {
        Self {
            content_height,
            viewport_height,
            offset: 0.0,
            next_handle: 1,
            pending: Vec::new(),
            requested: 0,
            cancelled: 0,
        }
    }

    /// Jump straight to an offset, clamped like a browser would.
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, self.max_scroll_offset());
    }

    /// Callbacks scheduled and not yet fired or cancelled.
    pub fn pending_frames(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Simulate the host firing a scheduled callback.
    /// Returns false if the handle was not pending (cancelled or already fired).
    pub fn fire(&mut self, handle: FrameHandle) -> bool {
        match self.pending.iter().position(|h| *h == handle) {
            Some(idx) => {
                self.pending.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn requested_count(&self) -> usize {
        self.requested
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }
}

impl ScrollHost for SimulatedHost {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn max_scroll_offset(&self) -> f64 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    fn scroll_by(&mut self, pixels: f64) {
        self.set_offset(self.offset + pixels);
    }

    fn request_frame(&mut self) -> Option<FrameHandle> {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.requested += 1;
        self.pending.push(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(idx) = self.pending.iter().position(|h| *h == handle) {
            self.pending.remove(idx);
            self.cancelled += 1;
        }
    }
}

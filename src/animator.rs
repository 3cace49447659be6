//! Auto-scroll controller.
//!
//! The controller owns all mutable playback state. Each frame callback reads
//! the current speed from the controller itself, so a speed change applies on
//! the next frame. At most one frame callback is ever pending.

use crate::config::AutoScrollConfig;
use crate::host::{FrameHandle, ScrollHost};
use crate::speed::{ScrollSpeed, SpeedLabel};

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    pub is_playing: bool,
    pub speed: ScrollSpeed,
    /// Timestamp (ms) of the previous frame; `None` until the first frame after a start.
    pub last_frame_timestamp: Option<f64>,
}

/// What a single frame callback did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Playback was not active; nothing happened and nothing was scheduled.
    Idle,
    /// First frame after a start: timestamp recorded, no movement.
    Primed,
    /// Scrolled by this many pixels and scheduled the next frame.
    Advanced(f64),
    /// Reached the bottom of the page; playback stopped.
    ReachedEnd,
    /// The host refused to schedule another frame; playback stopped.
    Stalled,
}

pub struct ScrollAnimator {
    state: AnimationState,
    pending: Option<FrameHandle>,
    config: AutoScrollConfig,
}

impl ScrollAnimator {
    /// An invalid config (for example an inverted speed range) is replaced
    /// by the defaults.
    pub fn new(config: AutoScrollConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("{:#}; using default auto-scroll settings", e);
                AutoScrollConfig::default()
            }
        };
        let speed = ScrollSpeed::new(config.default_speed, &config);
        Self {
            state: AnimationState {
                is_playing: false,
                speed,
                last_frame_timestamp: None,
            },
            pending: None,
            config,
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn speed(&self) -> ScrollSpeed {
        self.state.speed
    }

    pub fn speed_label(&self) -> SpeedLabel {
        self.state.speed.label()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn config(&self) -> &AutoScrollConfig {
        &self.config
    }

    /// Clamp and store a new speed. Takes effect on the next frame.
    pub fn set_speed(&mut self, pixels_per_second: f64) -> ScrollSpeed {
        self.state.speed = ScrollSpeed::new(pixels_per_second, &self.config);
        log::debug!(
            "Auto-scroll speed set to {} px/s ({})",
            self.state.speed.get(),
            self.state.speed.label()
        );
        self.state.speed
    }

    /// Begin playback. Calling this while already playing is a no-op, so
    /// there is never more than one frame chain.
    pub fn start<H: ScrollHost>(&mut self, host: &mut H) {
        if self.state.is_playing {
            return;
        }
        self.state.is_playing = true;
        self.state.last_frame_timestamp = None;
        log::info!("Auto-scroll started at {} px/s", self.state.speed.get());
        self.schedule(host);
    }

    /// Stop playback, cancel any pending frame and forget the last timestamp.
    pub fn stop<H: ScrollHost>(&mut self, host: &mut H) {
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
        if self.state.is_playing {
            log::info!("Auto-scroll stopped");
        }
        self.state.is_playing = false;
        self.state.last_frame_timestamp = None;
    }

    pub fn toggle<H: ScrollHost>(&mut self, host: &mut H) {
        if self.state.is_playing {
            self.stop(host);
        } else {
            self.start(host);
        }
    }

    /// Frame callback. `timestamp` is the host's frame time in milliseconds.
    pub fn on_frame<H: ScrollHost>(&mut self, host: &mut H, timestamp: f64) -> FrameOutcome {
        // Normally this is the handle that just fired and cancelling it does
        // nothing. A driver that calls in directly may still have it scheduled.
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }

        if !self.state.is_playing {
            return FrameOutcome::Idle;
        }

        let last = match self.state.last_frame_timestamp {
            Some(last) => last,
            None => {
                self.state.last_frame_timestamp = Some(timestamp);
                return if self.schedule(host) {
                    FrameOutcome::Primed
                } else {
                    FrameOutcome::Stalled
                };
            }
        };

        let delta = (timestamp - last).max(0.0);
        self.state.last_frame_timestamp = Some(timestamp);
        let pixels = self.state.speed.pixels_for(delta);

        let current = host.scroll_offset();
        let max = host.max_scroll_offset();
        if current >= max - self.config.end_epsilon_px {
            log::info!("Auto-scroll reached the end at offset {:.0}", current);
            self.stop(host);
            return FrameOutcome::ReachedEnd;
        }

        host.scroll_by(pixels);
        log::debug!("Auto-scroll advanced {:.1}px (delta {:.1}ms)", pixels, delta);

        if self.schedule(host) {
            FrameOutcome::Advanced(pixels)
        } else {
            FrameOutcome::Stalled
        }
    }

    fn schedule<H: ScrollHost>(&mut self, host: &mut H) -> bool {
        match host.request_frame() {
            Some(handle) => {
                self.pending = Some(handle);
                true
            }
            None => {
                log::warn!("Host refused to schedule a frame; stopping auto-scroll");
                self.stop(host);
                false
            }
        }
    }
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(AutoScrollConfig::default())
    }
}

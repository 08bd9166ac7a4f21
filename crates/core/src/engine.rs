//! Edge-switch engine: turns pointer positions into host switch commands.
//!
//! The engine is a small state machine over three states: disabled, idle,
//! and cooldown. Idle watches every position sample against the screen
//! bounds; crossing an edge fires that edge's ordered command sequence,
//! enters cooldown, and parks the cursor away from the edge. Cooldown
//! swallows samples until the threshold elapses, which stops the still
//! firing edge events from retriggering while the cursor settles.
//!
//! The engine exclusively owns its mutable state and the device channel.
//! Pointer events and the enable hotkey arrive from two independent event
//! contexts, so callers wrap the engine in one mutex and route both event
//! kinds through it; that single boundary also serializes channel access.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::channel::DeviceChannel;
use crate::host;

/// Cooldown after a switch during which further crossings are ignored.
pub const SWITCH_THRESHOLD: Duration = Duration::from_secs(2);

/// How far from the fired edge the cursor is parked, in pixels.
pub const REENTRY_MARGIN: i32 = 100;

/// One entry of an edge command sequence: which receiver channel moves to
/// which paired host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostTarget {
    pub device_index: u8,
    pub host: u8,
}

/// Ordered switch sequences for the two screen edges.
///
/// Built once at startup from configuration and immutable afterwards. An
/// empty list means crossing that edge switches nothing but still parks the
/// cursor.
#[derive(Debug, Clone, Default)]
pub struct EdgeActions {
    pub left: Vec<HostTarget>,
    pub right: Vec<HostTarget>,
}

/// Which screen edge the pointer crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// Screen geometry and cursor placement, as the platform provides them.
pub trait Desktop: Send {
    /// Current primary display size in pixels.
    fn screen_size(&self) -> (i32, i32);

    /// Place the cursor at absolute screen coordinates.
    fn move_cursor(&self, x: i32, y: i32);
}

/// The decision state machine.
pub struct SwitchEngine {
    channel: DeviceChannel,
    desktop: Box<dyn Desktop>,
    actions: EdgeActions,
    threshold: Duration,
    enabled: bool,
    in_cooldown: bool,
    last_transition: Instant,
    left_bound: i32,
    right_bound: i32,
}

impl SwitchEngine {
    /// Create an engine over an open channel. Starts enabled and idle.
    ///
    /// `threshold` is the cooldown length; pass [`SWITCH_THRESHOLD`] unless
    /// configured otherwise.
    pub fn new(
        channel: DeviceChannel,
        desktop: Box<dyn Desktop>,
        actions: EdgeActions,
        threshold: Duration,
    ) -> Self {
        let (width, _) = desktop.screen_size();
        Self {
            channel,
            desktop,
            actions,
            threshold,
            enabled: true,
            in_cooldown: false,
            last_transition: Instant::now(),
            left_bound: 0,
            right_bound: width,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Handle the enable/disable hotkey.
    ///
    /// Flips the flag and nothing else; cooldown bookkeeping stays as it
    /// was, so re-enabling resumes exactly where the engine left off.
    pub fn on_toggle(&mut self) {
        self.enabled = !self.enabled;
        info!(enabled = self.enabled, "edge switching toggled");
    }

    /// Handle one pointer position sample.
    ///
    /// Runs on whichever context delivers pointer events. The full command
    /// path (resolve, build, send) executes synchronously here, bounded by
    /// the resolver's receive timeout; switches are rare, human-triggered
    /// events, so that latency is acceptable.
    pub fn on_pointer_move(&mut self, x: i32, y: i32) {
        if !self.enabled {
            return;
        }

        if self.in_cooldown {
            if self.last_transition.elapsed() < self.threshold {
                return;
            }
            // Cooldown is over; this same sample is re-evaluated below, so a
            // position already sitting on the opposite edge switches now.
            self.in_cooldown = false;
            self.last_transition = Instant::now();
            debug!("cooldown over, watching edges again");
        }

        if x <= self.left_bound {
            self.switch_edge(Edge::Left, y);
        } else if x >= self.right_bound {
            self.switch_edge(Edge::Right, y);
        }
    }

    fn switch_edge(&mut self, edge: Edge, y: i32) {
        // Cooldown starts regardless of command outcomes: a cursor stuck at
        // the edge must not retrigger a storm of half-failed switches.
        self.in_cooldown = true;
        self.last_transition = Instant::now();

        let targets = match edge {
            Edge::Left => &self.actions.left,
            Edge::Right => &self.actions.right,
        };
        info!(?edge, commands = targets.len(), "edge crossed, switching hosts");

        for target in targets {
            match host::change_host(&self.channel, target.device_index, target.host) {
                Ok(()) => {}
                // Best-effort fan-out: one failed channel must not keep the
                // remaining paired hosts from switching.
                Err(e) => warn!(
                    device_index = target.device_index,
                    host = target.host,
                    error = %e,
                    "switch command failed, continuing with remaining targets"
                ),
            }
        }

        self.reposition(edge, y);
    }

    /// Park the cursor away from the edge that fired.
    ///
    /// The right bound is re-read here and nowhere else: a display
    /// resolution change is picked up on the next switch, not polled.
    fn reposition(&mut self, edge: Edge, y: i32) {
        let (width, _) = self.desktop.screen_size();
        self.right_bound = width;

        let x = match edge {
            Edge::Left => self.left_bound + REENTRY_MARGIN,
            Edge::Right => self.right_bound - REENTRY_MARGIN,
        };
        debug!(x, y, "repositioning cursor");
        self.desktop.move_cursor(x, y);
    }
}

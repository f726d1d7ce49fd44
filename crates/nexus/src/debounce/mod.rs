//! Hover debounce: turns raw enter/leave events into a stable active panel.
//!
//! Opening is immediate, switching waits [`SWITCH_DELAY`] and closing waits
//! [`CLOSE_DELAY`]. At most one timer is ever outstanding.

use std::time::Duration;

pub mod controller;
pub mod timer;

pub use controller::{HoverController, HoverState, PanelChange, PendingAction};
pub use timer::{ManualScheduler, Scheduler, TimerToken};

pub const SWITCH_DELAY: Duration = Duration::from_millis(200);
pub const CLOSE_DELAY: Duration = Duration::from_millis(300);

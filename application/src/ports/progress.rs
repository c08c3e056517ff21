//! Progress notification port
//!
//! Defines the interface for reporting progress while a room script replays.

use crate::use_cases::simulate_room::StepOutcome;
use tablepick_domain::{RoomCode, RoomView};

/// Callback for progress updates during a room simulation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain text).
pub trait ProgressNotifier: Send + Sync {
    /// Called once before the first step
    fn on_start(&self, room: &RoomCode, total_steps: usize);

    /// Called after each step with the room as it stands afterwards
    fn on_step(&self, outcome: &StepOutcome, view: &RoomView);

    /// Called after the last step
    fn on_finish(&self, view: &RoomView);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_start(&self, _room: &RoomCode, _total_steps: usize) {}
    fn on_step(&self, _outcome: &StepOutcome, _view: &RoomView) {}
    fn on_finish(&self, _view: &RoomView) {}
}

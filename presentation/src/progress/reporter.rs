//! Progress reporting while a room script replays

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};
use tablepick_application::{ProgressNotifier, StepOutcome};
use tablepick_domain::{RoomCode, RoomPhase, RoomView};

/// Reports replay progress with a progress bar over the script's steps
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
    phase: Mutex<Option<RoomPhase>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            phase: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn status(view: &RoomView) -> String {
        format!("{} · voted {}/{}", view.phase, view.voted, view.total)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_start(&self, room: &RoomCode, total_steps: usize) {
        let pb = ProgressBar::new(total_steps as u64);
        pb.set_style(Self::style());
        pb.set_prefix(format!("Room {}", room));
        pb.set_message("Starting...");
        *self.bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_step(&self, outcome: &StepOutcome, view: &RoomView) {
        if let Some(pb) = self.bar.lock().unwrap_or_else(PoisonError::into_inner).as_ref() {
            let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
            if *phase != Some(view.phase) {
                pb.println(format!("  {} {}", "->".cyan(), view.phase.display_name().bold()));
                *phase = Some(view.phase);
            }
            if let Some(error) = &outcome.error {
                pb.println(format!("  {} {} ({})", "x".red(), outcome.action, error));
            }
            pb.set_message(Self::status(view));
            pb.inc(1);
        }
    }

    fn on_finish(&self, view: &RoomView) {
        if let Some(pb) = self.bar.lock().unwrap_or_else(PoisonError::into_inner).take() {
            let done = if view.phase.is_terminal() {
                view.phase.display_name().green().to_string()
            } else {
                format!("still {}", view.phase.display_name()).yellow().to_string()
            };
            pb.finish_with_message(done);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress {
    phase: Mutex<Option<RoomPhase>>,
}

impl SimpleProgress {
    pub fn new() -> Self {
        Self {
            phase: Mutex::new(None),
        }
    }
}

impl Default for SimpleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for SimpleProgress {
    fn on_start(&self, room: &RoomCode, total_steps: usize) {
        println!(
            "{} {} ({} steps)",
            "->".cyan(),
            format!("Room {}", room).bold(),
            total_steps
        );
    }

    fn on_step(&self, outcome: &StepOutcome, view: &RoomView) {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if *phase != Some(view.phase) {
            println!("  {} {}", "->".cyan(), view.phase.display_name());
            *phase = Some(view.phase);
        }
        match &outcome.error {
            None => println!("  {} {}ms {}", "v".green(), outcome.at_ms, outcome.action),
            Some(error) => println!(
                "  {} {}ms {} ({})",
                "x".red(),
                outcome.at_ms,
                outcome.action,
                error
            ),
        }
    }

    fn on_finish(&self, _view: &RoomView) {
        println!();
    }
}

//! Slide navigation state machine.
//!
//! The shipped `script.js` implements the same reducer in the browser. The
//! renderer uses this module for the state the page shows before any script
//! runs.

/// Horizontal travel, in CSS pixels, a swipe must exceed to navigate.
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

/// Navigation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Next,
    Previous,
    First,
    Last,
    /// Jump to a 1-based slide number.
    GoTo(usize),
}

/// Current position within a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavState {
    current: usize,
    total: usize,
}

impl NavState {
    /// State at page load: the first slide.
    pub fn initial(total: usize) -> Self {
        Self {
            current: if total == 0 { 0 } else { 1 },
            total,
        }
    }

    /// 1-based current slide, 0 for an empty deck.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Apply an action. Out-of-range moves leave the state unchanged.
    pub fn reduce(self, action: NavAction) -> Self {
        let target = match action {
            NavAction::Next => self.current + 1,
            NavAction::Previous => self.current.saturating_sub(1),
            NavAction::First => 1,
            NavAction::Last => self.total,
            NavAction::GoTo(n) => n,
        };
        if (1..=self.total).contains(&target) {
            Self {
                current: target,
                ..self
            }
        } else {
            self
        }
    }

    /// Progress bar width in percent.
    pub fn progress_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64 * 100.0
        }
    }

    pub fn previous_disabled(&self) -> bool {
        self.current <= 1
    }

    pub fn next_disabled(&self) -> bool {
        self.current >= self.total
    }
}

/// Map a `KeyboardEvent.key` value to an action.
pub fn key_action(key: &str) -> Option<NavAction> {
    match key {
        "ArrowLeft" | "ArrowUp" => Some(NavAction::Previous),
        "ArrowRight" | "ArrowDown" | " " => Some(NavAction::Next),
        "Home" => Some(NavAction::First),
        "End" => Some(NavAction::Last),
        _ => None,
    }
}

/// Map a horizontal swipe (`end_x - start_x`) to an action.
pub fn swipe_action(delta_x: f64) -> Option<NavAction> {
    if delta_x < -SWIPE_THRESHOLD_PX {
        Some(NavAction::Next)
    } else if delta_x > SWIPE_THRESHOLD_PX {
        Some(NavAction::Previous)
    } else {
        None
    }
}

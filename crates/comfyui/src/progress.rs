//! Text progress-bar rendering for generation jobs.
//!
//! A bar is [`BAR_WIDTH`] cells wide. The number of filled cells is
//! `floor(BAR_WIDTH * value / max)`, computed in widened integer
//! arithmetic so that the last cell only fills once the final step is
//! reached, whatever step counts a server reports.

use crate::operations::Operation;

/// Number of cells in a rendered bar.
pub const BAR_WIDTH: usize = 40;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Number of filled cells for step `value` of `max`.
///
/// `value` is clamped to `0..=max`; a non-positive `max` renders empty.
pub fn filled_cells(value: i64, max: i64) -> usize {
    if max <= 0 {
        return 0;
    }
    let value = value.clamp(0, max) as i128;
    // Widened so BAR_WIDTH * value cannot overflow; the quotient is <= BAR_WIDTH.
    (BAR_WIDTH as i128 * value / max as i128) as usize
}

/// Completion percentage (0-100) for step `value` of `max`.
pub fn percentage(value: i64, max: i64) -> f64 {
    if max <= 0 {
        return 0.0;
    }
    value.clamp(0, max) as f64 / max as f64 * 100.0
}

/// Render the bar body (without brackets).
pub fn render_bar(value: i64, max: i64) -> String {
    let filled = filled_cells(value, max);
    let mut bar = String::with_capacity(BAR_WIDTH * FILLED.len_utf8());
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(BAR_WIDTH - filled));
    bar
}

/// Render a full status line: bar, percentage, step count and label.
pub fn render_line(value: i64, max: i64, label: &str) -> String {
    format!(
        "[{}] {:5.1}% | Step {value}/{max} | {label}",
        render_bar(value, max),
        percentage(value, max),
    )
}

/// One point in a generation job's progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    /// Current step number.
    pub value: i64,
    /// Total number of steps.
    pub max: i64,
    /// Workflow node ID that is executing.
    pub node: String,
    pub operation: Operation,
}

impl ProgressState {
    pub fn new(value: i64, max: i64, node: &str, class_type: &str) -> Self {
        Self {
            value,
            max,
            node: node.to_string(),
            operation: Operation::from_class_type(class_type),
        }
    }

    pub fn render_line(&self) -> String {
        render_line(self.value, self.max, &self.operation.label())
    }
}

/// Canned walk through a txt2img workflow, used for the simulated display.
pub fn demo_states() -> Vec<ProgressState> {
    vec![
        ProgressState::new(0, 20, "4", "CheckpointLoaderSimple"),
        ProgressState::new(5, 20, "6", "CLIPTextEncode"),
        ProgressState::new(10, 20, "3", "KSampler"),
        ProgressState::new(18, 20, "8", "VAEDecode"),
        ProgressState::new(20, 20, "9", "SaveImage"),
    ]
}

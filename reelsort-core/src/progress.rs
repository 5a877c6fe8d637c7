//! Progress formatting for operator-facing log lines.

use tracing::info;

const BAR_WIDTH: usize = 20;

/// Render a `[####----]  42% (3/8)` progress token.
///
/// Monotonic in `current` and clamped to `[0, total]`; a zero `total`
/// counts as one so the bar never divides by zero.
pub fn format_progress(current: usize, total: usize) -> String {
    let safe_total = total.max(1);
    let safe_current = current.min(safe_total);
    let ratio = safe_current as f64 / safe_total as f64;
    let mut filled = (ratio * BAR_WIDTH as f64) as usize;
    if safe_current > 0 && filled == 0 {
        filled = 1;
    }
    let bar: String = "#".repeat(filled) + &"-".repeat(BAR_WIDTH - filled);
    let percent = (ratio * 100.0).round() as usize;
    format!("[{bar}] {percent:3}% ({safe_current}/{safe_total})")
}

/// Emits progress log lines with a consistent shape. The total can grow
/// while counting is still in flight so `(k/N)` stays exact.
#[derive(Debug)]
pub struct ProgressTracker {
    total: usize,
    current: usize,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total: total.max(1),
            current: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Grow the denominator when more work is discovered.
    pub fn grow_total(&mut self, total: usize) {
        if total > self.total {
            self.total = total;
        }
    }

    pub fn log(&self, message: &str) {
        self.emit(message);
    }

    pub fn advance_to(&mut self, absolute: usize, message: &str) {
        self.current = absolute.min(self.total);
        self.emit(message);
    }

    pub fn complete(&mut self, message: &str) {
        self.current = self.total;
        self.emit(message);
    }

    fn emit(&self, message: &str) {
        info!(
            target: "reelsort::progress",
            "{} {}",
            format_progress(self.current, self.total),
            message
        );
    }
}

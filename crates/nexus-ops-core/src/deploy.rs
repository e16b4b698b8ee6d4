use serde::Serialize;

/// Progress gained per tick: 5% per interval, 20 ticks to a full bar.
pub const STEP: u8 = 5;

/// Simulated rollout: a counter that walks 0 to 100 in fixed steps. The
/// only cancellation path is the console's `halt` command, which drops the
/// run before any displayed state resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeployRun {
    pub percent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Running(u8),
    Complete,
}

impl DeployRun {
    pub fn new() -> Self {
        Self { percent: 0 }
    }

    /// Advance one tick. Returns `Complete` once the bar has filled; the
    /// caller drops the run at that point.
    pub fn advance(&mut self) -> Progress {
        self.percent = self.percent.saturating_add(STEP).min(100);
        if self.percent >= 100 {
            Progress::Complete
        } else {
            Progress::Running(self.percent)
        }
    }
}

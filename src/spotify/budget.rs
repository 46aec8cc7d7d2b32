use std::time::Duration;

use indicatif::ProgressBar;
use tokio::time::{Instant, sleep_until};

use crate::info;

pub const DEFAULT_BUDGET: u32 = 50;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(30);

/// Local call budget: at most `budget` calls per window, the window starting
/// at its first call.
#[derive(Debug)]
pub struct CallBudget {
    budget: u32,
    window: Duration,
    window_start: Option<Instant>,
    calls: u32,
    progress: ProgressBar,
}

impl Default for CallBudget {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET, DEFAULT_WINDOW)
    }
}

impl CallBudget {
    pub fn new(budget: u32, window: Duration) -> Self {
        Self {
            budget: budget.max(1),
            window,
            window_start: None,
            calls: 0,
            progress: ProgressBar::hidden(),
        }
    }

    /// Bar to suspend while reporting a wait.
    pub fn set_progress(&mut self, progress: ProgressBar) {
        self.progress = progress;
    }

    /// Reserves one call, blocking until the current window elapses if the
    /// budget is spent.
    pub async fn acquire(&mut self) {
        let now = Instant::now();
        let start = match self.window_start {
            Some(start) if now.duration_since(start) < self.window => start,
            _ => {
                self.window_start = Some(now);
                self.calls = 0;
                now
            }
        };

        if self.calls >= self.budget {
            let resume_at = start + self.window;
            let wait = resume_at.saturating_duration_since(now);
            self.progress.suspend(|| {
                info!(
                    "Call budget of {} per {}s spent, waiting {:.1}s",
                    self.budget,
                    self.window.as_secs(),
                    wait.as_secs_f64()
                )
            });
            sleep_until(resume_at).await;
            self.window_start = Some(Instant::now());
            self.calls = 0;
        }

        self.calls += 1;
    }

    pub fn calls_in_window(&self) -> u32 {
        self.calls
    }
}

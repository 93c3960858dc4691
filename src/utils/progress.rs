use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar over strips written
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(total: u64, description: &str) -> Self {
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(description.to_string());

        ProgressTracker {
            bar,
        }
    }

    /// A tracker that draws nothing, used when progress output is disabled
    pub fn hidden(total: u64) -> Self {
        ProgressTracker {
            bar: ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden()),
        }
    }

    pub fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Completed");
    }

    /// Stops the bar without marking it complete, used on failure
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_tracker_counts_without_drawing() {
        let tracker = ProgressTracker::hidden(5);
        tracker.increment(2);
        tracker.increment(1);
        assert_eq!(tracker.position(), 3);
        assert_eq!(tracker.bar.length(), Some(5));
        assert!(tracker.bar.is_hidden());
        tracker.abandon();
    }
}

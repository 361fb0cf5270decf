use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over the features of a run, hidden when disabled
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(total: u64, description: &str, visible: bool) -> Self {
        if !visible {
            return ProgressTracker {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} features ({eta}) {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(description.to_string());

        ProgressTracker { bar }
    }

    pub fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    pub fn finish(&self, skipped: usize) {
        if skipped == 0 {
            self.bar.finish_with_message("Completed");
        } else {
            self.bar.finish_with_message(format!("Completed, {} skipped", skipped));
        }
    }
}

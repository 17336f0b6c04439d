//! Progress display for multi-variant generation runs

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static VARIANT_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] {{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// One bar counting generated variants
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Bar for `variants` generations
    pub fn new(variants: u64) -> Self {
        let bar = ProgressBar::new(variants);
        bar.set_style(VARIANT_STYLE.clone());
        Self { bar }
    }

    /// Bar that draws nothing, for quiet runs
    pub fn hidden(variants: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(variants);
        Self { bar }
    }

    /// Show which variant is running
    pub fn start_variant(&self, index: u64, seed: u64) {
        self.bar.set_message(format!("variant {index} (seed {seed})"));
    }

    /// Count one finished variant
    pub fn complete_variant(&self) {
        self.bar.inc(1);
    }

    /// Variants finished so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Close the bar
    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

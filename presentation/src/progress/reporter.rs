//! Progress reporting for the dispatch sequence

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sales_intel_application::ports::progress::DispatchProgress;
use sales_intel_domain::{DispatchStage, RequestId};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one spinner per running stage
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchProgress for ProgressReporter {
    fn on_stage_start(&self, stage: DispatchStage) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(stage.display_name());
        pb.set_message("...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.spinner.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_stage_complete(&self, stage: DispatchStage, success: bool) {
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };
        if let Some(pb) = slot.take() {
            let mark = if success { "v".green() } else { "x".red() };
            pb.set_prefix(stage.display_name());
            pb.finish_with_message(format!("{}", mark));
        }
    }

    fn on_superseded(&self, _request_id: RequestId) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DispatchProgress for SimpleProgress {
    fn on_stage_start(&self, stage: DispatchStage) {
        println!("{} {}", "->".cyan(), stage.display_name().bold());
    }

    fn on_stage_complete(&self, stage: DispatchStage, success: bool) {
        if success {
            println!("  {} {}", "v".green(), stage);
        } else {
            println!("  {} {} (degraded)", "x".red(), stage);
        }
    }
}

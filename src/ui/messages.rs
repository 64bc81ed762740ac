//! User-facing status lines. Diagnostics go through `tracing` instead.

use crate::models::sync_report::CaptureOutcome;
use ansi_term::{Colour, Style};
use std::fmt;

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

fn tag(colour: Colour, icon: &str) -> String {
    Style::new().bold().fg(colour).paint(icon).to_string()
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Blue, ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Green, ICON_OK), msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Yellow, ICON_WARN), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", tag(Colour::Red, ICON_ERR), msg);
}

/// Report what happened to a freshly captured record.
pub fn capture_outcome(outcome: &CaptureOutcome) {
    let r = outcome.record();
    let what = format!("{} {} for {}", r.action_label, r.timestamp_str(), r.full_name());
    match outcome {
        CaptureOutcome::Uploaded(_) => success(format!("Recorded and uploaded: {}", what)),
        CaptureOutcome::SavedOffline(_) => {
            info(format!("Saved offline (#{}): {}. Will sync when online.", r.id, what))
        }
        CaptureOutcome::AwaitingSignIn(_) => {
            info(format!("Saved locally (#{}): {}. Sign in to upload.", r.id, what))
        }
        CaptureOutcome::UploadFailed { error: e, .. } => warning(format!(
            "Saved locally (#{}) but upload failed: {}. It stays pending.",
            r.id, e
        )),
    }
}

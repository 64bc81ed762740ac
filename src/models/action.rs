use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Attendance action captured with every record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    TimeIn,
    LunchOut,
    LunchIn,
    TimeOut,
    UniversityActivity,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::TimeIn,
        Action::LunchOut,
        Action::LunchIn,
        Action::TimeOut,
        Action::UniversityActivity,
    ];

    /// Convert enum → DB string
    pub fn code(&self) -> &'static str {
        match self {
            Action::TimeIn => "TIME_IN",
            Action::LunchOut => "LUNCH_OUT",
            Action::LunchIn => "LUNCH_IN",
            Action::TimeOut => "TIME_OUT",
            Action::UniversityActivity => "UNIVERSITY_ACTIVITY",
        }
    }

    /// Human-readable label, stored next to the code.
    pub fn label(&self) -> &'static str {
        match self {
            Action::TimeIn => "Time In",
            Action::LunchOut => "Lunch Out",
            Action::LunchIn => "Lunch In",
            Action::TimeOut => "Time Out",
            Action::UniversityActivity => "University Activity",
        }
    }

    /// Convert DB string → enum
    pub fn from_code(s: &str) -> Option<Self> {
        Action::ALL.into_iter().find(|a| a.code() == s)
    }

    /// Helper: accept CLI input such as `time_in`, `TIME-IN` or `in`.
    pub fn from_input(s: &str) -> Option<Self> {
        let norm = s.trim().to_uppercase().replace('-', "_");
        Action::from_code(&norm).or_else(|| Action::from_legacy(&norm))
    }

    /// Short codes written by older clients.
    pub fn from_legacy(s: &str) -> Option<Self> {
        match s {
            "IN" => Some(Action::TimeIn),
            "OUT" => Some(Action::TimeOut),
            "LOUT" => Some(Action::LunchOut),
            "LIN" => Some(Action::LunchIn),
            "UA" => Some(Action::UniversityActivity),
            _ => None,
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Action::ALL.into_iter().find(|a| a.label() == s)
    }

    /// True when `label` is the label this action is stored with.
    pub fn matches_label(&self, label: &str) -> bool {
        self.label() == label
    }

    /// Suggest an action from the local hour of capture.
    pub fn suggest_for<T: Timelike>(time: &T) -> Option<Self> {
        match time.hour() {
            7 | 8 => Some(Action::TimeIn),
            12 => Some(Action::LunchOut),
            13 => Some(Action::LunchIn),
            17 | 18 => Some(Action::TimeOut),
            _ => None,
        }
    }
}

/// Display label for whatever the remote sent back: a current label, a code,
/// or one of the legacy short codes. Unknown values pass through unchanged.
pub fn normalize_label(raw: &str) -> String {
    let trimmed = raw.trim();
    Action::from_label(trimmed)
        .or_else(|| Action::from_code(trimmed))
        .or_else(|| Action::from_legacy(trimmed))
        .map(|a| a.label().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

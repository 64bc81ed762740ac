use crate::db::RecordStore;
use crate::db::log::LogEntry;
use crate::errors::AppResult;
use crate::utils::table::strip_ansi;
use ansi_term::Colour;

const OP_WIDTH_MAX: usize = 60;

/// ANSI colour for an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "capture" => Colour::Green,
        "sync" => Colour::Cyan,
        "sync_batch" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

fn op_target(entry: &LogEntry) -> String {
    if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    }
}

/// Render one line; only the operation word is coloured.
fn render_line(entry: &LogEntry, id_w: usize, date_w: usize, op_w: usize) -> String {
    let color = color_for_operation(&entry.operation);

    let visible = op_target(entry);
    let truncated = if visible.chars().count() > OP_WIDTH_MAX {
        let mut s: String = visible.chars().take(OP_WIDTH_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        visible
    };

    let colored = match truncated.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(truncated.as_str()).to_string(),
    };
    let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

    let date = chrono::DateTime::parse_from_rfc3339(&entry.date)
        .map(|dt| dt.format("%FT%T%:z").to_string())
        .unwrap_or_else(|_| entry.date.clone());

    format!(
        "{:>id_w$}: {:<date_w$} | {}{} => {}",
        entry.id, date, colored, padding, entry.message
    )
}

pub struct LogLogic;

impl LogLogic {
    pub fn render(entries: &[LogEntry]) -> Vec<String> {
        let op_w = entries
            .iter()
            .map(|e| op_target(e).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_MAX);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(0);

        entries
            .iter()
            .map(|e| render_line(e, id_w, date_w, op_w))
            .collect()
    }

    pub async fn print_log(store: &RecordStore) -> AppResult<()> {
        let entries = store.audit_log().await?;

        println!("📜 Internal log:\n");
        for line in Self::render(&entries) {
            println!("{}", line);
        }
        Ok(())
    }
}

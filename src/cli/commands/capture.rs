use crate::cli::parser::Commands;
use crate::core::AppContext;
use crate::core::pending::pending_reminder;
use crate::errors::{AppError, AppResult};
use crate::models::{Action, NewRecord};
use crate::models::record::parse_instant;
use crate::ui::messages::{capture_outcome, info};
use chrono::{Local, Timelike, Utc};

/// Resolve the action: explicit input wins, otherwise suggest from the hour.
fn resolve_action(input: Option<&str>) -> AppResult<Action> {
    match input {
        Some(raw) => Action::from_input(raw).ok_or_else(|| AppError::InvalidAction(raw.to_string())),
        None => {
            let now = Local::now();
            Action::suggest_for(&now).ok_or_else(|| {
                AppError::InvalidAction(format!(
                    "no action given and none suggested at {:02}:00; pass --action",
                    now.hour()
                ))
            })
        }
    }
}

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Capture {
        first_name,
        last_name,
        action,
        at,
    } = cmd
    {
        let action = resolve_action(action.as_deref())?;
        let timestamp = match at {
            Some(s) => parse_instant(s)?,
            None => Utc::now(),
        };

        let record = NewRecord::new(first_name, last_name, action, timestamp)?;
        let outcome = ctx.orchestrator.capture(record).await?;
        capture_outcome(&outcome);

        let count = ctx.pending.count().await?;
        if let Some(msg) = pending_reminder(count, ctx.is_online(), ctx.is_signed_in()) {
            info(msg);
        }
    }
    Ok(())
}

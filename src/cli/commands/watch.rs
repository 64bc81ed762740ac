use crate::cli::parser::Commands;
use crate::core::AppContext;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};
use crate::utils::describe_batch;
use std::time::Duration;

/// Run the auto-sync loop until Ctrl-C, printing each finished batch.
pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Watch { interval } = cmd {
        let every = interval
            .map(|s| Duration::from_secs(s.max(1)))
            .unwrap_or_else(|| ctx.config.sync_interval());

        info(format!(
            "Watching for pending records every {}s. Press Ctrl-C to stop.",
            every.as_secs()
        ));

        let mut status = ctx.orchestrator.subscribe();
        let task = ctx.orchestrator.spawn_auto_sync(every);
        let mut seen = status.borrow_and_update().runs;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                changed = status.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snap = *status.borrow_and_update();
                    if snap.runs > seen {
                        seen = snap.runs;
                        if let Some(report) = snap.last_report
                            && !report.is_gated()
                        {
                            info(describe_batch(&report));
                        }
                    }
                }
            }
        }

        task.abort();
        warning("Stopped watching.");
    }
    Ok(())
}

use crate::cli::parser::Commands;
use crate::core::AppContext;
use crate::errors::AppResult;
use crate::models::BatchStatus;
use crate::ui::messages::{info, success, warning};
use crate::utils::describe_batch;

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Sync { id } = cmd {
        match id {
            Some(id) => {
                let record = ctx.orchestrator.run_single_sync(*id).await?;
                success(format!(
                    "Record #{} ({} {}) is synced.",
                    record.id,
                    record.full_name(),
                    record.action_label
                ));
            }
            None => {
                let report = ctx.orchestrator.run_batch_sync().await?;
                let line = describe_batch(&report);
                match report.status {
                    BatchStatus::Completed if report.failed == 0 => success(line),
                    BatchStatus::NothingPending => info(line),
                    _ => warning(line),
                }
            }
        }
    }
    Ok(())
}

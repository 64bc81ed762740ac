use crate::cli::parser::Commands;
use crate::core::AppContext;
use crate::core::history::{HistoryRow, run_query};
use crate::errors::{AppError, AppResult};
use chrono::Local;

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Remote { history, refresh } = cmd {
        if !ctx.is_online() {
            return Err(AppError::TransportFailure("device is offline".to_string()));
        }
        let query = history.to_query()?;
        let records = ctx.remote_view.get_remote_view(*refresh).await?;
        let rows = records.iter().map(HistoryRow::from).collect();

        let page = run_query(rows, &query, true, Local::now());
        super::list::print_page(&page, false);
    }
    Ok(())
}

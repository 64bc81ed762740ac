use crate::core::AppContext;
use crate::core::history::{HistoryQuery, HistoryRow, run_query};
use crate::core::pending::pending_reminder;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use chrono::Local;

pub async fn handle(ctx: &AppContext) -> AppResult<()> {
    let count = ctx.pending.count().await?;

    match pending_reminder(count, ctx.is_online(), ctx.is_signed_in()) {
        None => {
            success("All records are synced.");
            Ok(())
        }
        Some(msg) => {
            info(msg);
            let records = ctx.store.list_pending().await?;
            let rows = records.iter().map(HistoryRow::from).collect();
            let query = HistoryQuery {
                per_page: count.max(1),
                ..HistoryQuery::default()
            };
            super::list::print_page(&run_query(rows, &query, false, Local::now()), true);
            Ok(())
        }
    }
}

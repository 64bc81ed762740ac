use crate::cli::parser::{Commands, HistoryArgs};
use crate::core::AppContext;
use crate::core::history::{HistoryPage, HistoryQuery, HistoryRow, run_query};
use crate::errors::AppResult;
use crate::utils::colors::{colorize_optional, colorize_status};
use crate::utils::date::local_display;
use crate::utils::table::Table;
use chrono::Local;

impl HistoryArgs {
    pub fn to_query(&self) -> AppResult<HistoryQuery> {
        Ok(HistoryQuery {
            filter: self.filter.parse()?,
            search: self.search.clone(),
            page: self.page,
            ..HistoryQuery::default()
        })
    }
}

/// Print one page of history rows. `local` adds the id, status and sync columns.
pub fn print_page(page: &HistoryPage, local: bool) {
    if page.rows.is_empty() {
        println!("No records found.");
        return;
    }

    let mut table = if local {
        Table::new(["ID", "Time", "Name", "Action", "Status", "Synced at"])
    } else {
        Table::new(["Time", "Name", "Action"])
    };

    for row in &page.rows {
        let time = row
            .timestamp
            .as_ref()
            .map(local_display)
            .unwrap_or_else(|| row.raw_timestamp.clone());
        let name = format!("{} {}", row.first_name, row.last_name);

        if local {
            table.add_row(vec![
                row.id.map(|i| i.to_string()).unwrap_or_default(),
                time,
                name,
                row.label.clone(),
                colorize_status(row.status),
                colorize_optional(
                    &row.synced_at
                        .as_ref()
                        .map(local_display)
                        .unwrap_or_else(|| "--".to_string()),
                ),
            ]);
        } else {
            table.add_row(vec![time, name, row.label.clone()]);
        }
    }

    print!("{}", table.render());
    println!(
        "\nPage {} of {} ({} record(s))",
        page.page, page.total_pages, page.total_rows
    );
}

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::List { history } = cmd {
        let query = history.to_query()?;
        let records = ctx.store.list_all().await?;
        let rows = records.iter().map(HistoryRow::from).collect();

        let page = run_query(rows, &query, false, Local::now());
        print_page(&page, true);
    }
    Ok(())
}

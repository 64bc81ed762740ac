use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::RecordStore;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// Creates the config directory and file (skipped in test mode), then opens
/// the database, which runs every pending migration.
pub async fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.as_deref(), cli.test)?;
    let db_str = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing attendsync…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", db_str);

    let store = RecordStore::open(&db_str).await?;

    if let Err(e) = store
        .audit("init", "Database initialized", &format!("Database initialized at {}", db_str))
        .await
    {
        warning(format!("Failed to write internal log: {}", e));
    }

    success(format!("Database initialized at {}", db_str));
    Ok(())
}

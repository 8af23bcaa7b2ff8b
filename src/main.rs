use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use feedkeeper::account::{AccountManager, AccountRepository};
use feedkeeper::app::{App, AppEvent};
use feedkeeper::config::Config;
use feedkeeper::storage::{Account, AccountId, AccountType, Database, DatabaseError};

/// Get the config directory path (~/.config/feedkeeper/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("feedkeeper");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "feedkeeper", about = "Manage feed reader accounts from the terminal")]
struct Args {
    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,

    /// Print all accounts and exit
    #[arg(long)]
    list: bool,

    /// With --list, print JSON instead of a table
    #[arg(long, requires = "list")]
    json: bool,

    /// Add an account of this type (e.g. feedly, feedbin) and exit
    #[arg(long, value_name = "TYPE")]
    add: Option<AccountType>,

    /// Display name for --add
    #[arg(long, value_name = "NAME", requires = "add")]
    name: Option<String>,

    /// Config file to use instead of ~/.config/feedkeeper/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn print_accounts(accounts: &[Account], default_id: AccountId, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(accounts).context("Failed to encode accounts")?;
        println!("{}", out);
        return Ok(());
    }

    for account in accounts {
        let state = if account.is_active { "active" } else { "inactive" };
        let marker = if account.id == default_id { " (default)" } else { "" };
        println!(
            "{:>4}  {:<14} {:<9} {}{}",
            account.id.0,
            account.account_type.code(),
            state,
            account.name_for_display(),
            marker
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --list output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        tracing::info!(path = %config_dir.display(), "Created config directory");
    }

    // User-only access on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let db_path = config_dir.join("accounts.db");

    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Database reset.");
    }

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of feedkeeper appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let manager = Arc::new(
        AccountManager::load(db.clone())
            .await
            .context("Failed to load accounts")?,
    );

    if let Some(account_type) = args.add {
        let account = manager
            .add_account(account_type, args.name.as_deref())
            .await
            .context("Failed to add account")?;
        println!("Added {} (id {})", account.name_for_display(), account.id);
        return Ok(());
    }

    if args.list {
        print_accounts(&manager.sorted_accounts(), manager.default_account_id(), args.json)?;
        return Ok(());
    }

    let mut app = App::new(db, manager, config);
    app.restore_session().await;

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    feedkeeper::ui::run(&mut app, event_tx, event_rx).await?;

    app.save_session().await;
    println!("Goodbye!");
    Ok(())
}

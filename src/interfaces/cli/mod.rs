//! CLI interface module
//!
//! Executes administrative commands directly against the store file.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::errors::{LinkvaultError, Result};
use crate::storage::{RedbStorage, UrlDb, UrlRecord};
use crate::utils::time_parser::TimeParser;

const DEFAULT_SAMPLE_PATH: &str = "linkvault.example.toml";

pub async fn run_cli(command: Commands, config: &StaticConfig) -> Result<()> {
    match command {
        Commands::Add {
            url,
            user,
            id,
            expire,
        } => {
            let record = UrlRecord::new(url)
                .with_id(id.unwrap_or_default())
                .with_expires(parse_expire(expire.as_deref())?);
            let id = open_db(config)?.put(record, &user).await?;
            println!("{} {}", "Added".green().bold(), id);
        }
        Commands::Get { id } => match open_db(config)?.get(&id).await? {
            Some(record) => print_record(&record),
            None => return Err(LinkvaultError::not_found(format!("URL {} not found", id))),
        },
        Commands::View { id } => {
            let target = open_db(config)?.view(&id).await?;
            if target.is_empty() {
                return Err(LinkvaultError::not_found(format!("URL {} not found", id)));
            }
            println!("{}", target);
        }
        Commands::Update { id, url, expire } => {
            let record = UrlRecord::new(url).with_expires(parse_expire(expire.as_deref())?);
            open_db(config)?.update(&id, record).await?;
            println!("{} {}", "Updated".green().bold(), id);
        }
        Commands::Delete { id } => {
            open_db(config)?.delete(&id).await?;
            println!("{} {}", "Deleted".yellow().bold(), id);
        }
        Commands::List { user, json } => {
            let records = open_db(config)?.urls(user.as_deref().unwrap_or_default()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("{}", "No short links".dimmed());
            } else {
                for record in &records {
                    print_record(record);
                }
                println!("{} link(s)", records.len());
            }
        }
        Commands::Config { action } => run_config_command(action)?,
    }

    Ok(())
}

fn open_db(config: &StaticConfig) -> Result<Arc<dyn UrlDb>> {
    Ok(Arc::new(RedbStorage::open(&config.database)?))
}

fn run_config_command(action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Generate { output_path, force } => {
            let path = output_path.unwrap_or_else(|| DEFAULT_SAMPLE_PATH.to_string());
            if Path::new(&path).exists() && !force {
                return Err(LinkvaultError::validation(format!(
                    "{} already exists, use --force to overwrite",
                    path
                )));
            }
            StaticConfig::default().save_to_file(&path)?;
            println!("{} {}", "Generated".green().bold(), path);
            Ok(())
        }
    }
}

fn parse_expire(input: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    input
        .map(|s| TimeParser::parse_expire_time(s).map_err(LinkvaultError::date_parse))
        .transpose()
}

fn print_record(record: &UrlRecord) {
    let expires = match record.expires {
        Some(expires) if record.is_expired_at(Utc::now()) => {
            format!("expired {}", expires.to_rfc3339())
                .as_str()
                .red()
                .to_string()
        }
        Some(expires) => expires.to_rfc3339(),
        None => "never".to_string(),
    };

    println!(
        "{} -> {}\n  user: {}  views: {}  expires: {}",
        record.id.cyan().bold(),
        record.url,
        record.user,
        record.views,
        expires
    );
}

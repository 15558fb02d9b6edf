//! Backup report command line.
//!
//! Thin consumer of the client library: parses arguments, runs one query and prints
//! the result as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use backup_report::config::Config;
use backup_report::{
    ActivityFilter, ApiResult, Category, ClassificationPolicy, LogTarget, ServerClient,
};

#[derive(Debug, Parser)]
#[command(name = "backup-report", about = "Report on backup server clients")]
struct Cli {
    /// Read settings from this env file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
    #[arg(long, global = true)]
    url: Option<String>,
    #[arg(long, global = true)]
    username: Option<String>,
    #[arg(long, global = true)]
    password: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List clients of one category
    Clients(ClientsArgs),
    /// Storage usage
    Usage {
        #[arg(long)]
        client: Option<String>,
    },
    /// Current and last activities
    Activities {
        #[arg(long)]
        client: Option<String>,
        /// Only paused activities
        #[arg(long)]
        paused: bool,
    },
    Users,
    Groups,
    /// Live log of the server or one client
    Livelog {
        /// Client id; omit for the server log
        #[arg(long)]
        client: Option<i64>,
        #[arg(long)]
        recent: bool,
    },
}

#[derive(Debug, Args)]
struct ClientsArgs {
    /// all, ok, failed, stale, blank, unseen, online, offline, active, outdated, removed
    category: Category,
    #[arg(long)]
    group: Option<String>,
    /// Age threshold in minutes for stale and unseen
    #[arg(long)]
    threshold: Option<u64>,
    /// Treat file backups with issues as failed
    #[arg(long)]
    strict: bool,
    #[arg(long)]
    skip_file: bool,
    #[arg(long)]
    skip_image: bool,
    #[arg(long)]
    skip_blank: bool,
    #[arg(long)]
    include_removed: bool,
}

impl ClientsArgs {
    fn policy(&self) -> ClassificationPolicy {
        ClassificationPolicy {
            include_removed: self.include_removed,
            include_file_backups: !self.skip_file,
            include_image_backups: !self.skip_image,
            include_blank: !self.skip_blank,
            fail_on_file_issues: self.strict,
            time_threshold_minutes: self.threshold,
            group_name: self.group.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.env_file {
        Some(path) => match Config::from_env_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::from_env(),
    };
    if let Some(url) = &cli.url {
        config.url = url.clone();
    }
    if let Some(username) = &cli.username {
        config.username = username.clone();
    }
    if let Some(password) = &cli.password {
        config.password = password.clone();
    }

    // Logs go to stderr; stdout carries the report.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Querying {}", config.url);

    match run(&config, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config, command: Command) -> ApiResult<()> {
    let client = ServerClient::from_config(config)?;

    match command {
        Command::Clients(args) => print_json(&client.get_clients(args.category, &args.policy()).await?),
        Command::Usage { client: Some(name) } => print_json(&client.get_client_usage(&name).await?),
        Command::Usage { client: None } => print_json(&client.get_usage().await?),
        Command::Activities { client: name, paused } => {
            let filter = ActivityFilter { client_name: name };
            if paused {
                print_json(&client.get_paused_activities(&filter).await?)
            } else {
                print_json(&client.get_activities(&filter).await?)
            }
        }
        Command::Users => print_json(&client.get_users().await?),
        Command::Groups => print_json(&client.get_groups().await?),
        Command::Livelog { client: id, recent } => {
            let target = id.map_or(LogTarget::Server, LogTarget::Client);
            print_json(&client.get_live_log(target, recent).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> ApiResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

use std::{net::TcpListener, path::PathBuf, str::FromStr, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::{io::AsyncReadExt, sync::RwLock};
use tracing::{error, info};

use ticktick_to_notion_api::{
    build_services,
    configuration::Settings,
    forwarder::{ForwardOutcome, ForwarderError},
    mailer::{build_from_mailbox, SmtpMailer},
    observability::{get_subscriber, init_subscriber},
    run_server,
};

/// Forward tasks completed in TickTick to a Notion database
#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forward a single task payload to Notion (read from stdin when no file is given)
    Forward { file: Option<PathBuf> },

    /// Print the Notion page a task payload would create, without calling Notion
    Transform { file: Option<PathBuf> },

    /// Run the webhook server
    Serve,
}

async fn read_payload(file: &Option<PathBuf>) -> Result<String, ForwarderError> {
    let mut payload = String::new();
    match file {
        Some(path) => {
            payload = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read payload from {}", path.display()))?;
        }
        None => {
            tokio::io::stdin()
                .read_to_string(&mut payload)
                .await
                .context("Failed to read payload from stdin")?;
        }
    }
    Ok(payload)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    color_backtrace::install();
    // lettre needs a rustls crypto provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();

    let settings = Settings::new().expect("Cannot load TickTick to Notion configuration");
    let (log_env_filter, dep_log_level_filter) = match cli.verbose {
        1 => (log::LevelFilter::Info.as_str(), log::LevelFilter::Info),
        2 => (log::LevelFilter::Debug.as_str(), log::LevelFilter::Debug),
        _ if cli.verbose > 1 => (log::LevelFilter::Trace.as_str(), log::LevelFilter::Trace),
        _ => (
            settings
                .application
                .observability
                .logging
                .log_directive
                .as_str(),
            log::LevelFilter::from_str(
                &settings
                    .application
                    .observability
                    .logging
                    .dependencies_log_level,
            )
            .unwrap_or(log::LevelFilter::Error),
        ),
    };
    let subscriber = get_subscriber(log_env_filter);
    init_subscriber(subscriber, dep_log_level_filter);

    let notification_settings = &settings.notification;
    let mailer = Arc::new(RwLock::new(
        SmtpMailer::build(
            notification_settings.smtp_server.clone(),
            notification_settings.smtp_port,
            notification_settings.smtp_username.clone(),
            notification_settings.smtp_password.clone(),
            build_from_mailbox(
                &notification_settings.sender_name,
                &notification_settings.from_header,
            )
            .expect("Failed to parse notification settings `from_header`"),
        )
        .expect("Failed to build an SmtpMailer"),
    ));

    let forwarder_service =
        build_services(&settings, None, mailer).expect("Failed to build the forwarder service");

    let result: Result<(), ForwarderError> = match &cli.command {
        Commands::Forward { file } => match read_payload(file).await {
            Ok(payload) => forwarder_service.forward(&payload).await.map(|outcome| {
                let output = match outcome {
                    ForwardOutcome::Created(page) => {
                        json!({ "status": "created", "page_id": page.id, "url": page.url })
                    }
                    ForwardOutcome::Rejected => json!({ "status": "rejected" }),
                    ForwardOutcome::RemoteError { response, notified } => json!({
                        "status": "remote_error",
                        "response": response,
                        "notified": notified
                    }),
                };
                println!("{output}");
            }),
            Err(err) => Err(err),
        },
        Commands::Transform { file } => match read_payload(file).await {
            Ok(payload) => forwarder_service
                .transform(&payload)
                .and_then(|page| {
                    serde_json::to_string_pretty(&page)
                        .context("Failed to serialize the Notion page")
                        .map_err(ForwarderError::from)
                })
                .map(|page| println!("{page}")),
            Err(err) => Err(err),
        },
        Commands::Serve => {
            let listener = TcpListener::bind(format!(
                "{}:{}",
                settings.application.listen_address, settings.application.listen_port
            ))
            .expect("Failed to bind port");

            info!(
                "Forwarding tasks to Notion database {}",
                settings.notion.database_id
            );
            run_server(listener, settings.clone(), forwarder_service)
                .await
                .expect("Failed to start HTTP server")
                .await?;
            Ok(())
        }
    };

    match result {
        Err(err) => {
            error!("ticktick-to-notion failed: {err:?}");
            panic!("ticktick-to-notion failed: {err:?}")
        }
        Ok(_) => Ok(()),
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use klaviyo_flow_builder::utils::{ConfigValidator, LoggingConfig};
use klaviyo_flow_builder::{
    parse_submission, prepare_create_flow, ApiServer, EnvConfig, FlowRequestHandler,
    FlowServiceConfig, FormClient, FormState, KlaviyoClient, ServerConfig,
};

#[derive(Parser)]
#[command(name = "flow-builder", version, about = "Klaviyo flow builder", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server that forwards flows to Klaviyo
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the Klaviyo request body for a form without sending it
    Preview {
        #[arg(long)]
        form: PathBuf,
        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Submit a form to a running server
    Submit {
        #[arg(long)]
        form: PathBuf,
        #[arg(long, env = "FLOW_BUILDER_URL", default_value = "http://127.0.0.1:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    EnvConfig::load_dotenv();
    LoggingConfig::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { host, port } => handle_serve(host, port).await?,
        Command::Preview { form, compact } => handle_preview(&form, compact)?,
        Command::Submit { form, server } => handle_submit(&form, server).await?,
    }
    Ok(())
}

async fn handle_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut server_config = ServerConfig::from_env()?;
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }

    let service_config = FlowServiceConfig::from_env();
    ConfigValidator::validate_url(&service_config.base_url)?;
    match service_config.api_key() {
        Some(key) => ConfigValidator::validate_api_key(key)?,
        None => tracing::warn!("KLAVIYO_API_KEY is not set; submissions will fail with 500"),
    }

    let client = KlaviyoClient::from_config(&service_config)?;
    tracing::info!(endpoint = client.endpoint(), "Forwarding flows to Klaviyo");
    let handler = FlowRequestHandler::new(service_config, Arc::new(client));
    let mut server = ApiServer::bind(&server_config, handler).await?;
    let shutdown = server.shutdown_handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            if let Some(tx) = shutdown {
                let _ = tx.send(());
            }
        }
    });

    server.run().await?;
    Ok(())
}

fn handle_preview(path: &Path, compact: bool) -> anyhow::Result<()> {
    let form = load_form(path)?;
    form.validate()?;

    let body = serde_json::to_vec(&form.to_submission())?;
    let submission = parse_submission(&body)?;
    let request = prepare_create_flow(&submission)?;

    let content = if compact {
        serde_json::to_string(&request)?
    } else {
        serde_json::to_string_pretty(&request)?
    };
    println!("{content}");
    Ok(())
}

async fn handle_submit(path: &Path, server: String) -> anyhow::Result<()> {
    ConfigValidator::validate_url(&server)?;
    let form = load_form(path)?;
    let client = FormClient::new(server);
    tracing::debug!(endpoint = client.endpoint(), "Submitting form");
    let outcome = client.submit(&form).await?;

    println!("{}", outcome.render());
    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn load_form(path: &Path) -> anyhow::Result<FormState> {
    FormState::load(path).with_context(|| format!("failed to load form `{}`", path.display()))
}

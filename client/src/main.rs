use std::sync::Arc;

use chat_desk_client::{
    handlers::{Desk, DeskContext, start_dashboard_task},
    types::Notifier,
    ui::run_terminal,
    utils::{init_tracing, parse_client_config},
};
use clap::Parser;
use color_eyre::eyre::WrapErr;
use common::utils::net::AjaxClient;
use tracing::info;

/// Terminal console for live-chat support operators.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to Config.toml. Defaults to ./Config.toml, then
    /// ~/.config/chat-desk/Config.toml.
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config =
        parse_client_config(args.config.as_deref()).wrap_err("Invalid configuration")?;
    init_tracing(&config.log_file)?;

    let backend = AjaxClient::new(
        config.endpoint.clone(),
        config.nonce.clone(),
        config.request_timeout(),
    )
    .wrap_err("Failed to build HTTP client")?;

    let (notifier, log_rx) = Notifier::channel();
    let ctx = DeskContext::new(Arc::new(backend), notifier, &config);
    let desk = Desk::new(ctx.clone());

    info!(endpoint = %config.endpoint, "chat desk starting");
    let dashboard = start_dashboard_task(ctx, desk.state.clone());

    let terminal = ratatui::init();
    let result = run_terminal(terminal, desk, log_rx).await;
    ratatui::restore();

    dashboard.abort();
    info!("chat desk stopped");
    result
}

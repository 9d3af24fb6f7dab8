use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::{process::ExitCode, sync::Arc};
use vidmeta_common::observability::init_logging;
use vidmeta_config::{VidmetaConfig, VidmetaConfigLoader};
use vidmeta_view::{HttpBackend, PageState, Slot, ViewController, ViewOptions};
mod cli;

const DEFAULT_CONFIG_FILE: &str = "vidmeta.yaml";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1) Load config (env wins over the file, flags win over both)
    let mut cfg = load_config(&cli)?;
    if let Some(url) = cli.server_url {
        cfg.client.server_url = url;
    }
    let command = cli.command.unwrap_or(Command::Tui);

    // 2) Logging. The TUI owns the terminal, so only `serve` forces stderr.
    let mut log = cfg.logging.to_log_config("vidmeta");
    if matches!(command, Command::Serve { .. }) {
        log.emit_stderr = true;
    }
    let log_path = init_logging(log)?;
    tracing::debug!(path = %log_path.display(), "logging.ready");

    match command {
        Command::Tui => {
            let backend = Arc::new(http_backend(&cfg)?);
            vidmeta_tui::run(backend, view_options(&cfg)).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Extract { url, json } => extract(&cfg, &url, json).await,
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                cfg.server.bind = bind;
            }
            vidmeta_server::serve(&cfg.server).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(cli: &Cli) -> Result<VidmetaConfig> {
    let loader = VidmetaConfigLoader::new();
    let loader = match &cli.config {
        Some(path) => loader.with_file(path),
        None => loader.with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().context("failed to load configuration")
}

fn http_backend(cfg: &VidmetaConfig) -> Result<HttpBackend> {
    HttpBackend::new(
        &cfg.client.server_url,
        &cfg.client.endpoint,
        cfg.client.timeout(),
    )
    .with_context(|| format!("invalid server url {:?}", cfg.client.server_url))
}

fn view_options(cfg: &VidmetaConfig) -> ViewOptions {
    ViewOptions {
        watch_host: cfg.client.watch_host.clone(),
        date_format: cfg.client.date_format.clone(),
    }
}

async fn extract(cfg: &VidmetaConfig, url: &str, json: bool) -> Result<ExitCode> {
    let backend = http_backend(cfg)?;
    let mut view = ViewController::new(PageState::default(), view_options(cfg));

    match view.submit(&backend, url).await {
        Ok(result) if json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Ok(_) => print!("{}", render_page(view.target())),
        Err(_) => {
            eprintln!("{}", view.target().error_text());
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Plain-text rendering of the details panel.
fn render_page(page: &PageState) -> String {
    let mut out = String::new();
    for slot in [Slot::Title, Slot::VideoId, Slot::PublishedAt, Slot::Duration] {
        out.push_str(&field_line(slot.label(), page.slot(slot)));
    }
    out.push_str(&field_line("Thumbnail", page.thumbnail_src()));
    out.push_str(&field_line("Link", page.thumbnail_href()));
    out.push_str(&format!(
        "\n{}:\n{}\n",
        Slot::Description.label(),
        page.slot(Slot::Description)
    ));
    out
}

fn field_line(label: &str, value: &str) -> String {
    format!("{:<11}{value}\n", format!("{label}:"))
}

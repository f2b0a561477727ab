//! CLI entry point for vaultdl.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info, warn};
use vaultdl_core::download::{BatchReport, DownloadItem, HttpClient, download_batch};
use vaultdl_core::download::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use vaultdl_core::http_client::HttpTimeouts;
use vaultdl_core::site::{
    DEFAULT_LANDING_URL, PreviewOptions, SITE_CONNECT_TIMEOUT_SECS, SITE_READ_TIMEOUT_SECS,
    is_previewable,
};
use vaultdl_core::{DocumentTree, MediaReference, SiteClient, SiteClientConfig, UrlScheme};

mod app_config;
mod cli;
mod progress;

use app_config::{FileConfig, VerbositySetting};
use cli::{Args, Command};
use progress::BatchProgress;

/// Effective settings after merging CLI flags, config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    landing_url: String,
    output_dir: PathBuf,
    site_timeouts: HttpTimeouts,
    download_timeouts: HttpTimeouts,
    quiet: bool,
}

impl Settings {
    fn resolve(args: &Args, file: &FileConfig) -> Self {
        let landing_url = args
            .landing_url
            .clone()
            .or_else(|| file.landing_url.clone())
            .unwrap_or_else(|| DEFAULT_LANDING_URL.to_string());
        Self {
            landing_url,
            output_dir: file.output_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            site_timeouts: HttpTimeouts::new(
                file.site_connect_timeout_secs.unwrap_or(SITE_CONNECT_TIMEOUT_SECS),
                file.site_read_timeout_secs.unwrap_or(SITE_READ_TIMEOUT_SECS),
            ),
            download_timeouts: HttpTimeouts::new(
                file.download_connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
                file.download_read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS),
            ),
            quiet: args.quiet
                || (args.verbose == 0 && file.verbosity == Some(VerbositySetting::Quiet)),
        }
    }

    /// Content host scheme follows the landing page, so a plain-HTTP landing
    /// page (local mirrors, test servers) yields plain-HTTP content URLs.
    fn content_scheme(&self) -> UrlScheme {
        let plain_http = url::Url::parse(&self.landing_url).is_ok_and(|url| url.scheme() == "http");
        if plain_http {
            UrlScheme::Http
        } else {
            UrlScheme::Https
        }
    }

    fn site_client(&self) -> Result<SiteClient> {
        let client = SiteClient::new(SiteClientConfig {
            landing_url: self.landing_url.clone(),
            content_scheme: self.content_scheme(),
            timeouts: self.site_timeouts,
        })?;
        Ok(client)
    }

    fn output_dir<'a>(&'a self, requested: Option<&'a Path>) -> &'a Path {
        requested.unwrap_or(&self.output_dir)
    }
}

/// Log level when `RUST_LOG` is unset.
/// Priority: quiet flag > verbose flag > config verbosity > info.
fn default_log_level(args: &Args, configured: Option<VerbositySetting>) -> &'static str {
    if args.quiet {
        return "error";
    }
    match (args.verbose, configured) {
        (0, Some(VerbositySetting::Quiet)) => "error",
        (0, Some(VerbositySetting::Verbose)) | (1, _) => "debug",
        (0, Some(VerbositySetting::Debug)) => "trace",
        (0, _) => "info",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let loaded = app_config::load_default_file_config()?;
    let file_config = loaded.config.unwrap_or_default();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(default_log_level(&args, file_config.verbosity))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, config_path = ?loaded.path, "CLI arguments parsed");
    let settings = Settings::resolve(&args, &file_config);
    debug!(?settings, "effective settings");

    match args.command {
        Command::Tree { all } => run_tree(&settings, all).await,
        Command::Show { path, html } => run_show(&settings, &path, html).await,
        Command::Media {
            path,
            json,
            download,
            output_dir,
        } => run_media(&settings, &path, json, download, output_dir.as_deref()).await,
        Command::Get { path, output_dir } => run_get(&settings, &path, output_dir.as_deref()).await,
    }
}

async fn run_tree(settings: &Settings, all: bool) -> Result<()> {
    let session = settings.site_client()?.open_session().await?;
    let tree = DocumentTree::build(session.directory(), all);
    if tree.is_empty() {
        info!("Directory has no matching entries");
        return Ok(());
    }
    print!("{}", tree.render());
    Ok(())
}

async fn run_show(settings: &Settings, path: &str, html: bool) -> Result<()> {
    let client = settings.site_client()?;
    let session = client.open_session().await?;
    if !session.directory().contains(path) {
        bail!("'{path}' is not in the site directory");
    }
    if !is_previewable(path) {
        bail!("'{path}' is not a text document; use `vaultdl get` to download it");
    }

    let view = client.fetch_document_media(&session, path).await?;
    match view.render_html(PreviewOptions::default()) {
        Some(rendered) if html => print!("{rendered}"),
        _ => println!("{}", view.text),
    }
    if !view.media.is_empty() {
        println!();
        println!("Media ({}):", view.media.len());
        print_media_lines(&view.media);
    }
    Ok(())
}

async fn run_media(
    settings: &Settings,
    path: &str,
    json: bool,
    download: bool,
    output_dir: Option<&Path>,
) -> Result<()> {
    let client = settings.site_client()?;
    let session = client.open_session().await?;
    let view = client.fetch_document_media(&session, path).await?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&view.media).context("Failed to render media as JSON")?;
        println!("{rendered}");
    } else if view.media.is_empty() {
        info!(path, "No media references found");
    } else {
        print_media_lines(&view.media);
    }

    if download && !view.media.is_empty() {
        let items: Vec<DownloadItem> = view.media.iter().map(DownloadItem::from).collect();
        run_batch(settings, &items, settings.output_dir(output_dir)).await?;
    }
    Ok(())
}

async fn run_get(settings: &Settings, path: &str, output_dir: Option<&Path>) -> Result<()> {
    let session = settings.site_client()?.open_session().await?;
    if !session.directory().contains(path) {
        bail!("'{path}' is not in the site directory");
    }
    let item = DownloadItem::for_entry(session.site(), path);
    run_batch(settings, &[item], settings.output_dir(output_dir)).await
}

async fn run_batch(settings: &Settings, items: &[DownloadItem], output_dir: &Path) -> Result<()> {
    let client = HttpClient::with_timeouts(settings.download_timeouts)?;
    let progress = BatchProgress::new(!settings.quiet);
    let report = download_batch(&client, items, output_dir, |percent, message| {
        progress.update(percent, message);
    })
    .await?;
    progress.finish();
    summarize(&report, output_dir)
}

fn summarize(report: &BatchReport, output_dir: &Path) -> Result<()> {
    info!(
        written = report.completed_count(),
        total = report.total(),
        bytes = report.bytes(),
        dir = %output_dir.display(),
        "Downloads finished"
    );
    for file in report.written() {
        println!("{}", file.path.display());
    }
    for failed in report.failed() {
        warn!(name = %failed.item.name, error = %failed.error, "Not downloaded");
    }
    if report.failed_count() > 0 {
        bail!(
            "{} of {} downloads failed",
            report.failed_count(),
            report.total()
        );
    }
    Ok(())
}

fn print_media_lines(media: &[MediaReference]) {
    for reference in media {
        println!("{}\t{}\t{}", reference.media_type, reference.path, reference.url);
    }
}

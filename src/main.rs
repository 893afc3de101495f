//! mail-search-cache-rs: console mail client core
//!
//! An interactive mail search session backed by a deduplicating in-memory
//! cache. Each query is either answered from the cache or fetched from the
//! remote source, and result sets are browsed in fixed-size pages.
//!
//! # Architecture
//!
//! - [`main`]: Process entry point with env loading and session startup
//! - [`config`]: Environment-driven session configuration
//! - [`errors`]: Application error model
//! - [`models`]: Message value type and attachment metadata
//! - [`source`]: Remote source capability, bounded fetch, fixture source
//! - [`cache`]: Deduplicating message cache with resolved-query tracking
//! - [`search`]: Cache-versus-remote search policy
//! - [`browser`]: Page cursor state machine over one result list
//! - [`render`]: HTML preview rendering of a single message
//! - [`session`]: Interactive command loop

mod browser;
mod cache;
mod config;
mod errors;
mod models;
mod render;
mod search;
mod session;
mod source;

use std::fs;

use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::config::SessionConfig;
use crate::errors::{AppError, AppResult};
use crate::models::Message;
use crate::render::HtmlRenderer;
use crate::search::SearchCoordinator;
use crate::source::FixtureSource;

/// Application entry point
///
/// Initializes tracing from environment, loads config, and runs the
/// interactive session over stdin/stdout against a fixture-backed remote
/// source.
///
/// # Environment Variables
///
/// See [`SessionConfig::load_from_env`] for full configuration options.
///
/// # Example
///
/// ```no_run
/// MAIL_CACHE_MAILBOX_FILE=./mailbox.json cargo run
/// ```
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = SessionConfig::load_from_env()?;
    let mailbox = load_mailbox(&config)?;

    let mut coordinator = SearchCoordinator::new(
        FixtureSource::new(mailbox),
        config.unread_query.clone(),
    );
    let renderer = HtmlRenderer::new(&config.render_dir, config.open_browser);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    session::run_session(
        &mut coordinator,
        &renderer,
        config.default_limit,
        stdin,
        &mut stdout,
    )
    .await?;
    Ok(())
}

/// Load the mailbox fixture the demo remote source serves from
fn load_mailbox(config: &SessionConfig) -> AppResult<Vec<Message>> {
    let raw = fs::read_to_string(&config.mailbox_file).map_err(|e| {
        AppError::Remote(format!(
            "cannot read mailbox file {}: {e}",
            config.mailbox_file.display()
        ))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        AppError::InvalidInput(format!(
            "malformed mailbox file {}: {e}",
            config.mailbox_file.display()
        ))
    })
}

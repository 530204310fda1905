//! HTML front end for the Förderdaten store.
//!
//! Exposes an axum [`Router`] for record entry, listing, editing, reporting
//! and the click dashboard, backed by any [`FoerderStore`].

pub mod chart;
pub mod error;
pub mod handlers;
pub mod templates;

pub use error::Error;

use std::{path::{Path, PathBuf}, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use foerder_core::store::FoerderStore;
use minijinja::Environment;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use chart::ChartStyle;
use handlers::{dashboard, records, report};

/// Largest request body accepted, uploads included.
pub const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  /// SQLite database file; created on first start.
  pub store_path:  PathBuf,
  /// Default rendering for `/chart` when no `style` is requested.
  #[serde(default)]
  pub chart_style: ChartStyle,
}

impl ServerConfig {
  /// Layer defaults, the optional TOML file at `path`, `FOERDER_*`
  /// environment variables and finally a bare `PORT` variable.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::layered(
      path,
      config::Environment::with_prefix("FOERDER"),
      std::env::var("PORT").ok(),
    )
  }

  fn layered(
    path: &Path,
    env: config::Environment,
    port: Option<String>,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 5000_i64)?
      .set_default("store_path", "foerdermatrix.db")?
      .set_default("chart_style", "bar")?
      .add_source(config::File::from(path).required(false))
      .add_source(env)
      .set_override_option("port", port)?
      .build()?
      .try_deserialize()
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: FoerderStore> {
  pub store:     Arc<S>,
  pub templates: Arc<Environment<'static>>,
  pub config:    Arc<ServerConfig>,
}

impl<S: FoerderStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Result<Self, minijinja::Error> {
    Ok(Self {
      store:     Arc::new(store),
      templates: Arc::new(templates::environment()?),
      config:    Arc::new(config),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the application.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: FoerderStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Records
    .route("/",            get(records::index::<S>).post(records::create::<S>))
    .route("/edit/{id}",   get(records::edit_form::<S>).post(records::update::<S>))
    .route("/delete/{id}", get(records::delete::<S>))
    // Reporting
    .route("/chart",       get(report::chart::<S>))
    .route("/export",      get(report::export::<S>))
    .route("/import",      post(report::import::<S>))
    // Dashboard
    .route("/dashboard",        get(dashboard::page::<S>))
    .route("/dashboard/upload", post(dashboard::upload::<S>))
    .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

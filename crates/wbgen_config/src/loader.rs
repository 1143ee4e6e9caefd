//! Catalog and project file loading.

use crate::catalog::{Catalog, RawLibrary};
use crate::error::ConfigError;
use crate::project::ProjectConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The published IP library used when no catalog source is given.
pub const DEFAULT_IP_LIBRARY_URL: &str =
    "https://raw.githubusercontent.com/shalan/cuprj-cli/refs/heads/main/ip-lib.json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a catalog is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    /// A local JSON file.
    Path(PathBuf),
    /// An HTTP(S) URL serving JSON.
    Url(String),
}

impl CatalogSource {
    /// Classifies a user-supplied catalog location.
    ///
    /// An existing local file always wins. Otherwise `http://` and `https://`
    /// locations are fetched, and anything else is treated as a (missing) path.
    pub fn parse(location: &str) -> Self {
        let path = Path::new(location);
        if path.exists() {
            return CatalogSource::Path(path.to_path_buf());
        }
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            CatalogSource::Url(location.to_string())
        } else {
            CatalogSource::Path(path.to_path_buf())
        }
    }

    /// Returns a printable form of the location.
    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Path(path) => path.display().to_string(),
            CatalogSource::Url(url) => url.clone(),
        }
    }
}

/// Loads and validates a catalog from a file or URL.
pub fn load_catalog(source: &CatalogSource) -> Result<Catalog, ConfigError> {
    let origin = source.describe();
    let content = match source {
        CatalogSource::Path(path) => read_file(path)?,
        CatalogSource::Url(url) => fetch(url)?,
    };
    let catalog = load_catalog_from_str(&content, &origin)?;
    tracing::info!(source = %origin, entries = catalog.len(), "loaded IP catalog");
    Ok(catalog)
}

/// Parses and validates a catalog from JSON text.
///
/// `origin` labels the content in error messages.
pub fn load_catalog_from_str(content: &str, origin: &str) -> Result<Catalog, ConfigError> {
    let raw: RawLibrary =
        serde_json::from_str(content).map_err(|e| ConfigError::parse(origin, e))?;
    raw.into_catalog()
}

/// Downloads a catalog document.
fn fetch(url: &str) -> Result<String, ConfigError> {
    let fetch_error = |reason: String| ConfigError::FetchError {
        url: url.to_string(),
        reason,
    };

    tracing::debug!(%url, "fetching IP catalog");
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| fetch_error(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|e| fetch_error(e.to_string()))?;

    if !response.status().is_success() {
        return Err(fetch_error(format!("HTTP {}", response.status())));
    }

    response.text().map_err(|e| fetch_error(e.to_string()))
}

/// The serialization format of a project description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectFormat {
    /// YAML (`.yaml`, `.yml`, and any unrecognized extension).
    Yaml,
    /// TOML (`.toml`).
    Toml,
    /// JSON (`.json`).
    Json,
}

impl ProjectFormat {
    /// Picks the format from a file extension, defaulting to YAML.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => ProjectFormat::Toml,
            Some("json") => ProjectFormat::Json,
            _ => ProjectFormat::Yaml,
        }
    }
}

/// Loads a project description, picking the format from the file extension.
pub fn load_project(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = read_file(path)?;
    let project = load_project_from_str(
        &content,
        ProjectFormat::from_path(path),
        &path.display().to_string(),
    )?;
    tracing::info!(path = %path.display(), slaves = project.slaves.len(), "loaded bus description");
    Ok(project)
}

/// Parses and validates a project description from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_project_from_str(
    content: &str,
    format: ProjectFormat,
    origin: &str,
) -> Result<ProjectConfig, ConfigError> {
    let project: ProjectConfig = match format {
        ProjectFormat::Yaml => serde_yaml::from_str(content).map_err(|e| ConfigError::parse(origin, e))?,
        ProjectFormat::Toml => toml::from_str(content).map_err(|e| ConfigError::parse(origin, e))?,
        ProjectFormat::Json => serde_json::from_str(content).map_err(|e| ConfigError::parse(origin, e))?,
    };
    validate_project(&project)?;
    Ok(project)
}

/// Validates that every slave names itself and its catalog type.
fn validate_project(project: &ProjectConfig) -> Result<(), ConfigError> {
    for (index, slave) in project.slaves.iter().enumerate() {
        if slave.instance_name.is_empty() {
            return Err(ConfigError::MissingField(format!("slaves[{index}].name")));
        }
        if slave.catalog_type.is_empty() {
            return Err(ConfigError::MissingField(format!("slaves[{index}].type")));
        }
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.display().to_string(),
        source,
    })
}

//! Sync configuration loaded from a YAML file.
//!
//! The file carries a free-form `mongodb` settings map, an ordered `gwurl` map
//! of catalog source URLs, and an optional `paurl` map that is parsed but never
//! synchronized. Defaults are resolved once, in [`StoreSettings::from_raw`], so
//! the resulting [`SyncConfig`] is complete and immutable.

use std::path::Path;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Deserializer};

use crate::ConfigError;

pub const DEFAULT_LOGIN: &str = "Guest";
pub const DEFAULT_PASSWORD: &str = "Guest";
pub const DEFAULT_HOSTNAME: &str = "localhost";
pub const DEFAULT_PORT: u16 = 27017;
pub const DEFAULT_DATABASE: &str = "PaintLayering";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_COLLECTION: &str = "GamesWorkshop";

/// Characters that must be escaped inside the userinfo part of a connection URL.
const USERINFO: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// What a refresh destroys before the reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropScope {
    /// Drop the whole target database, including unrelated collections.
    #[default]
    Database,
    /// Drop only the target collection.
    Collection,
}

impl std::fmt::Display for DropScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropScope::Database => write!(f, "database"),
            DropScope::Collection => write!(f, "collection"),
        }
    }
}

/// The `mongodb` section exactly as written in the file.
///
/// Every key is optional and empty strings count as absent. Scalars may be
/// written as YAML strings or numbers (`port: 27017` and `port: "27017"` are
/// equivalent).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStoreSettings {
    #[serde(default, deserialize_with = "scalar_text")]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub password: Option<String>,
    #[serde(default, alias = "host", deserialize_with = "scalar_text")]
    pub hostname: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub port: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub database: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub options: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub timeout: Option<String>,
    #[serde(
        default,
        rename = "gw-collection",
        alias = "collection",
        deserialize_with = "scalar_text"
    )]
    pub collection: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[serde(default, rename = "drop-scope", deserialize_with = "scalar_text")]
    pub drop_scope: Option<String>,
}

/// Fully resolved store settings.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub login: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
    /// Raw connection-string query, without the leading `?`.
    pub options: String,
    pub dial_timeout: Duration,
    pub collection: String,
    pub description: Option<String>,
    pub drop_scope: DropScope,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            login: DEFAULT_LOGIN.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            options: String::new(),
            dial_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            collection: DEFAULT_COLLECTION.to_string(),
            description: None,
            drop_scope: DropScope::Database,
        }
    }
}

impl StoreSettings {
    /// Resolve a raw settings map, filling every missing key with its default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `port`, `timeout`, or
    /// `drop-scope` is present but cannot be parsed.
    pub fn from_raw(raw: RawStoreSettings) -> Result<Self, ConfigError> {
        let port = match non_empty(raw.port) {
            Some(port) => port.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "mongodb.port".to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match non_empty(raw.timeout) {
            Some(secs) => secs.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key: "mongodb.timeout".to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let drop_scope = match non_empty(raw.drop_scope) {
            Some(scope) => parse_drop_scope(&scope)?,
            None => DropScope::Database,
        };

        Ok(Self {
            login: non_empty(raw.login).unwrap_or_else(|| DEFAULT_LOGIN.to_string()),
            password: non_empty(raw.password).unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
            hostname: non_empty(raw.hostname).unwrap_or_else(|| DEFAULT_HOSTNAME.to_string()),
            port,
            database: non_empty(raw.database).unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            options: non_empty(raw.options).unwrap_or_default(),
            dial_timeout: Duration::from_secs(timeout_secs),
            collection: non_empty(raw.collection)
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            description: non_empty(raw.description),
            drop_scope,
        })
    }

    /// Assemble the `mongodb://` connection URL.
    ///
    /// Credentials are percent-encoded; the `?options` suffix is only present
    /// when options were configured.
    #[must_use]
    pub fn connection_url(&self) -> String {
        self.format_url(&utf8_percent_encode(&self.password, USERINFO).to_string())
    }

    /// The connection URL with the password masked, safe to log.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        self.format_url("****")
    }

    fn format_url(&self, password: &str) -> String {
        let login = utf8_percent_encode(&self.login, USERINFO);
        let mut url = format!(
            "mongodb://{login}:{password}@{host}:{port}/{database}",
            host = self.hostname,
            port = self.port,
            database = self.database,
        );
        if !self.options.is_empty() {
            url.push('?');
            url.push_str(self.options.trim_start_matches('?'));
        }
        url
    }
}

impl std::fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSettings")
            .field("login", &self.login)
            .field("password", &"[redacted]")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("options", &self.options)
            .field("dial_timeout", &self.dial_timeout)
            .field("collection", &self.collection)
            .field("description", &self.description)
            .field("drop_scope", &self.drop_scope)
            .finish()
    }
}

/// A named catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub description: Option<String>,
    pub store: StoreSettings,
    /// Sources to synchronize, in file order.
    pub sources: Vec<CatalogSource>,
    /// Entries of the `paurl` map. Reported by `config`, never fetched; URLs
    /// are not validated.
    pub reserved_sources: Vec<CatalogSource>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSyncConfig {
    #[serde(default, alias = "descritption")]
    description: Option<String>,
    #[serde(default, alias = "MongoDB")]
    mongodb: Option<RawStoreSettings>,
    #[serde(default, alias = "GWurl")]
    gwurl: Option<serde_yaml::Mapping>,
    #[serde(default, alias = "PAurl")]
    paurl: Option<serde_yaml::Mapping>,
}

/// Load and validate the sync configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sync_config(path: &Path) -> Result<SyncConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_sync_config(&content)
}

/// Parse and validate a sync configuration from YAML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed YAML,
/// [`ConfigError::MissingSources`] when `gwurl` is absent or empty, and
/// [`ConfigError::InvalidValue`] / [`ConfigError::InvalidSourceUrl`] for
/// values that fail validation.
pub fn parse_sync_config(content: &str) -> Result<SyncConfig, ConfigError> {
    let raw: RawSyncConfig = serde_yaml::from_str(content)?;

    let store = StoreSettings::from_raw(raw.mongodb.unwrap_or_default())?;

    let sources = match raw.gwurl {
        Some(map) if !map.is_empty() => source_entries("gwurl", &map)?
            .into_iter()
            .map(|source| validate_source_url(&source).map(|()| source))
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(ConfigError::MissingSources),
    };

    let reserved_sources = match raw.paurl {
        Some(map) => source_entries("paurl", &map)?,
        None => Vec::new(),
    };

    Ok(SyncConfig {
        description: raw.description.filter(|d| !d.trim().is_empty()),
        store,
        sources,
        reserved_sources,
    })
}

/// Parse a `drop-scope` value.
fn parse_drop_scope(s: &str) -> Result<DropScope, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "database" => Ok(DropScope::Database),
        "collection" => Ok(DropScope::Collection),
        other => Err(ConfigError::InvalidValue {
            key: "mongodb.drop-scope".to_string(),
            reason: format!("expected 'database' or 'collection', got '{other}'"),
        }),
    }
}

/// Convert a name → URL mapping into ordered entries.
fn source_entries(
    section: &str,
    map: &serde_yaml::Mapping,
) -> Result<Vec<CatalogSource>, ConfigError> {
    map.iter()
        .map(|(key, value)| {
            let name = yaml_scalar(key).ok_or_else(|| ConfigError::InvalidValue {
                key: section.to_string(),
                reason: format!("source names must be scalars, got {key:?}"),
            })?;
            let url = value
                .as_str()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: format!("{section}.{name}"),
                    reason: "expected a non-empty URL string".to_string(),
                })?;
            Ok(CatalogSource {
                name,
                url: url.to_string(),
            })
        })
        .collect()
}

fn validate_source_url(source: &CatalogSource) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidSourceUrl {
        name: source.name.clone(),
        url: source.url.clone(),
        reason,
    };

    let parsed = url::Url::parse(&source.url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(value) => yaml_scalar(&value).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a scalar value, got {value:?}"))
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

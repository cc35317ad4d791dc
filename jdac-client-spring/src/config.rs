//! Binding of the `jdac` configuration namespace.
//!
//! Sources, lowest priority first: struct defaults, configuration files,
//! `JDAC__*` environment variables, explicit overrides. Keys are bound
//! relaxed, so `baseUrl`, `base-url` and `base_url` are the same setting.
//!
//! Every key under `jdac` is folded to one spelling (lowercase, no `-` or
//! `_`) before the layers are merged, so a higher-priority source replaces
//! a lower one whatever spelling either uses. Sources added to a
//! [`config::ConfigBuilder`] by hand should be wrapped in [`RelaxedKeys`],
//! and overrides should name their key through [`folded_key`].

use crate::{manifest::ServiceMapping, SpringError, SpringResult};
use ::config::{
    Config, ConfigError, Environment, File, FileFormat, FileSourceFile, Map, Source, Value,
    ValueKind,
};
use jdac_client::{canonical_key, Properties};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Configuration namespace holding the data access settings
pub const JDAC_PREFIX: &str = "jdac";

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "JDAC_CONFIG_PATH";

/// Data access settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataAccessProperties {
    /// Base URL of the data access service
    #[serde(rename = "baseurl")]
    pub base_url: Option<String>,

    /// Package (module path) scanned for service types
    #[serde(rename = "basepackage")]
    pub base_package: Option<String>,

    /// Log every outbound request
    #[serde(rename = "logrequest")]
    pub log_request: bool,

    /// JWT provider settings; `class` names the provider
    #[serde(rename = "jwtprovider")]
    pub jwt_provider: Properties,

    /// Services declared explicitly rather than through role markers
    pub services: Vec<ServiceMapping>,
}

impl DataAccessProperties {
    /// Bind the `jdac` namespace of an assembled configuration.
    ///
    /// A configuration without that namespace binds to the defaults.
    pub fn bind(config: &Config) -> SpringResult<Self> {
        let table = match config.get_table(JDAC_PREFIX) {
            Ok(table) => table,
            Err(ConfigError::NotFound(_)) => {
                debug!("No '{}' configuration found, using defaults", JDAC_PREFIX);
                Map::new()
            }
            Err(e) => return Err(e.into()),
        };

        let properties: DataAccessProperties =
            Value::new(None, ValueKind::Table(fold_table(table))).try_deserialize()?;

        info!("JDAC data access properties loaded.");
        info!("baseUrl: {:?}", properties.base_url);
        info!("basePackage: {:?}", properties.base_package);
        Ok(properties)
    }

    /// Load from the configuration file named by `JDAC_CONFIG_PATH` (or the
    /// common locations) and the environment
    pub fn load() -> SpringResult<Self> {
        let files = match std::env::var(CONFIG_PATH_ENV) {
            Ok(config_path) => vec![File::with_name(&config_path).required(true)],
            Err(_) => ["application", "config/application", "jdac"]
                .into_iter()
                .map(|path| File::with_name(path).required(false))
                .collect(),
        };

        Self::assemble(files, Self::environment())
    }

    /// Load from a single configuration file; the format follows the extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> SpringResult<Self> {
        Self::assemble([File::from(path.as_ref())], Self::environment())
    }

    /// `JDAC__BASE_URL`, `JDAC__JWT_PROVIDER__CLASS`, ...
    pub fn environment() -> Environment {
        Environment::with_prefix("JDAC")
            .prefix_separator("__")
            .separator("__")
            .keep_prefix(true)
    }

    /// Base package, failing when it is not configured
    pub fn require_base_package(&self) -> SpringResult<&str> {
        self.base_package
            .as_deref()
            .map(str::trim)
            .filter(|package| !package.is_empty())
            .ok_or_else(|| SpringError::configuration("jdac.base-package is not configured"))
    }

    fn assemble<I>(files: I, environment: Environment) -> SpringResult<Self>
    where
        I: IntoIterator<Item = File<FileSourceFile, FileFormat>>,
    {
        let mut builder = Config::builder();
        for file in files {
            builder = builder.add_source(RelaxedKeys::new(file));
        }
        builder = builder.add_source(RelaxedKeys::new(environment));

        Self::bind(&builder.build()?)
    }
}

/// Source adapter folding every key under `jdac` to its relaxed spelling
#[derive(Debug)]
pub struct RelaxedKeys {
    inner: Box<dyn Source + Send + Sync>,
}

impl RelaxedKeys {
    pub fn new<S: Source + Send + Sync + 'static>(source: S) -> Self {
        Self {
            inner: Box::new(source),
        }
    }
}

impl Source for RelaxedKeys {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(Self {
            inner: self.inner.clone_into_box(),
        })
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        let mut collected = Map::new();
        for (key, value) in self.inner.collect()? {
            if in_namespace(&key) {
                collected.insert(folded_key(&key), fold_value(value));
            } else {
                collected.insert(key, value);
            }
        }
        Ok(collected)
    }
}

/// Fold every segment of a dotted key, e.g. for `set_override`:
/// `jdac.jwt_provider.class` becomes `jdac.jwtprovider.class`
pub fn folded_key(key: &str) -> String {
    key.split('.').map(canonical_key).collect::<Vec<_>>().join(".")
}

fn in_namespace(key: &str) -> bool {
    key.split('.')
        .next()
        .map_or(false, |first| canonical_key(first) == JDAC_PREFIX)
}

fn fold_value(mut value: Value) -> Value {
    value.kind = match std::mem::replace(&mut value.kind, ValueKind::Nil) {
        ValueKind::Table(table) => ValueKind::Table(fold_table(table)),
        ValueKind::Array(items) => ValueKind::Array(items.into_iter().map(fold_value).collect()),
        other => other,
    };
    value
}

/// Keys already in folded form are applied last, so within one table they
/// win over other spellings of the same key
fn fold_table(table: Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(String, Value)> = table.into_iter().collect();
    entries.sort_by_key(|(key, _)| (folded_key(key) == *key, key.clone()));

    let mut folded: Map<String, Value> = Map::new();
    for (key, value) in entries {
        let value = fold_value(value);
        let folded_name = folded_key(&key);
        let value = match folded.remove(&folded_name) {
            Some(existing) => {
                warn!("Configuration key '{}' given in several spellings", folded_name);
                merge(existing, value)
            }
            None => value,
        };
        folded.insert(folded_name, value);
    }
    folded
}

fn merge(mut lower: Value, mut higher: Value) -> Value {
    if let ValueKind::Table(high) = &mut higher.kind {
        if let ValueKind::Table(low) = &mut lower.kind {
            for (key, value) in std::mem::take(high) {
                let value = match low.remove(&key) {
                    Some(existing) => merge(existing, value),
                    None => value,
                };
                low.insert(key, value);
            }
            return lower;
        }
    }
    higher
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DataAccessProperties::environment().source(Some(vars))
    }

    #[test]
    fn test_missing_namespace_binds_defaults() {
        let config = Config::builder().build().unwrap();
        let properties = DataAccessProperties::bind(&config).unwrap();

        assert_eq!(properties, DataAccessProperties::default());
        assert!(!properties.log_request);
        assert!(properties.jwt_provider.is_empty());
    }

    #[test]
    fn test_bind_from_file_with_relaxed_keys() {
        let file = toml_file(
            r#"
            [jdac]
            base-url = "https://api.example.com"
            basePackage = "com.acme.services"
            log_request = true

            [jdac.jwt-provider]
            class = "simple"
            jwt = "abc"

            [[jdac.services]]
            type = "com::acme::services::OrderQuery"
            role = "query"
            "#,
        );

        let config = Config::builder()
            .add_source(File::from(file.path()))
            .build()
            .unwrap();
        let properties = DataAccessProperties::bind(&config).unwrap();

        assert_eq!(properties.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(properties.base_package.as_deref(), Some("com.acme.services"));
        assert!(properties.log_request);
        assert_eq!(properties.jwt_provider.get("class"), Some("simple"));
        assert_eq!(properties.jwt_provider.get("jwt"), Some("abc"));
        assert_eq!(properties.services.len(), 1);
        assert_eq!(
            properties.services[0].type_name,
            "com::acme::services::OrderQuery"
        );
    }

    #[test]
    fn test_higher_priority_source_wins_per_key() {
        let file = toml_file(
            r#"
            [jdac]
            base_url = "https://file.example.com"

            [jdac.jwt_provider]
            class = "basic"
            authEndpoint = "https://auth.example.com/token"
            "#,
        );

        let config = Config::builder()
            .add_source(RelaxedKeys::new(File::from(file.path())))
            .add_source(RelaxedKeys::new(environment(&[
                ("JDAC__BASE_URL", "https://env.example.com"),
                ("JDAC__JWT_PROVIDER__SERVICE_KEY", "key-from-env"),
                ("OTHER__BASE_URL", "ignored"),
            ])))
            .set_override(folded_key("jdac.jwt_provider.class"), "simple")
            .unwrap()
            .build()
            .unwrap();
        let properties = DataAccessProperties::bind(&config).unwrap();

        assert_eq!(properties.base_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(properties.jwt_provider.get("class"), Some("simple"));
        assert_eq!(
            properties.jwt_provider.get("authEndpoint"),
            Some("https://auth.example.com/token")
        );
        assert_eq!(properties.jwt_provider.get("serviceKey"), Some("key-from-env"));
    }

    #[test]
    fn test_env_overrides_file_whatever_the_spelling() {
        let file = toml_file(
            r#"
            [jdac]
            base-url = "https://file.example.com"
            basePackage = "com.acme.services"

            [jdac.jwt-provider]
            class = "basic"
            auth-endpoint = "https://auth.example.com/token"
            service-key = "from-file"
            "#,
        );

        let properties = DataAccessProperties::assemble(
            [File::from(file.path())],
            environment(&[
                ("JDAC__BASE_URL", "https://env.example.com"),
                ("JDAC__JWT_PROVIDER__SERVICE_KEY", "from-env"),
                ("JDAC__JWT_PROVIDER__SERVICE_SECRET", "secret-from-env"),
            ]),
        )
        .unwrap();

        assert_eq!(properties.base_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(properties.base_package.as_deref(), Some("com.acme.services"));
        assert_eq!(properties.jwt_provider.get("serviceKey"), Some("from-env"));
        assert_eq!(
            properties.jwt_provider.get("serviceSecret"),
            Some("secret-from-env")
        );
        assert_eq!(
            properties.jwt_provider.get("authEndpoint"),
            Some("https://auth.example.com/token")
        );
        // one entry per relaxed key
        assert_eq!(properties.jwt_provider.len(), 4);
    }

    #[test]
    fn test_spellings_within_one_source_collapse() {
        let file = toml_file(
            r#"
            [jdac.jwt_provider]
            service-key = "kebab"
            servicekey = "folded"
            "#,
        );

        let config = Config::builder()
            .add_source(File::from(file.path()))
            .build()
            .unwrap();
        let properties = DataAccessProperties::bind(&config).unwrap();

        assert_eq!(properties.jwt_provider.len(), 1);
        assert_eq!(properties.jwt_provider.get("serviceKey"), Some("folded"));
    }

    #[test]
    fn test_folded_key() {
        assert_eq!(folded_key("jdac.jwt-provider.serviceKey"), "jdac.jwtprovider.servicekey");
        assert!(in_namespace("JDAC.base_url"));
        assert!(!in_namespace("server.port"));
    }

    #[test]
    fn test_require_base_package() {
        let mut properties = DataAccessProperties::default();
        assert!(matches!(
            properties.require_base_package(),
            Err(SpringError::Configuration { .. })
        ));

        properties.base_package = Some("  com.acme ".to_string());
        assert_eq!(properties.require_base_package().unwrap(), "com.acme");
    }
}

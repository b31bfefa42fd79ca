use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable pointing at the registry file
pub const REGISTRY_PATH_ENV: &str = "STORMX_ENVIRONMENTS";
/// Registry file used when neither the flag nor the env var is set
pub const DEFAULT_REGISTRY_FILE: &str = "environments.yaml";

/// One deployment of the application under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDescriptor {
    /// Registry key, filled in from the map key on load
    #[serde(skip)]
    pub name: String,

    /// Base URL of the PHP admin application
    pub php_host: String,

    /// Base URL of the REST API, if the environment exposes one
    #[serde(default)]
    pub host: Option<String>,

    /// Identity provider login URL for SSO runs
    #[serde(default)]
    pub idp_url: Option<String>,
}

impl EnvironmentDescriptor {
    pub fn new(name: &str, php_host: &str) -> Self {
        Self {
            name: name.to_string(),
            php_host: php_host.to_string(),
            host: None,
            idp_url: None,
        }
    }

    pub fn with_api_host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    pub fn with_idp_url(mut self, idp_url: &str) -> Self {
        self.idp_url = Some(idp_url.to_string());
        self
    }
}

/// Name → descriptor mapping, read-only once loaded
///
/// The file format is a plain YAML map:
///
/// ```yaml
/// local:
///   php_host: http://192.168.56.101
///   host: http://192.168.56.101:8000
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvironmentRegistry {
    environments: BTreeMap<String, EnvironmentDescriptor>,
}

impl EnvironmentRegistry {
    /// Resolve the registry location: explicit path, then env var, then default file
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        std::env::var(REGISTRY_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_REGISTRY_FILE))
    }

    /// Load a registry from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::RegistryIo {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_yaml_str(&content, path)?;
        log::debug!(
            "loaded {} environment(s) from {}",
            registry.environments.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Parse registry YAML; `origin` is only used for error messages
    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let raw: BTreeMap<String, EnvironmentDescriptor> =
            serde_yaml::from_str(content).map_err(|source| ConfigError::RegistryParse {
                path: origin.to_path_buf(),
                source,
            })?;

        let environments = raw
            .into_iter()
            .map(|(name, mut descriptor)| {
                descriptor.name = name.clone();
                (name, descriptor)
            })
            .collect();

        Ok(Self { environments })
    }

    pub fn insert(&mut self, descriptor: EnvironmentDescriptor) {
        self.environments
            .insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&EnvironmentDescriptor> {
        self.environments.get(name)
    }

    /// Look up an environment, failing with the list of known names
    pub fn lookup(&self, name: &str) -> Result<&EnvironmentDescriptor, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                name: name.to_string(),
                known: self.names(),
            })
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.environments.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}

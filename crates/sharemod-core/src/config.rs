use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// The role of the application build using the plugin.
///
/// Exactly one application in a deployment must be the provider for the
/// mechanism to function; that invariant spans multiple builds and cannot
/// be validated from a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "provider")]
    Provider,
    #[serde(rename = "consumer")]
    Consumer,
}

/// The bundler command driving the current configuration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Dev server. Each application runs isolated, so a consumer cannot
    /// assume a provider's globals will ever be populated.
    #[serde(rename = "serve")]
    Serve,
    /// Production build.
    #[serde(rename = "build")]
    Build,
}

impl Default for Command {
    fn default() -> Self {
        Command::Build
    }
}

/// Environment context handed to the plugin on each configuration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEnv {
    #[serde(default)]
    pub command: Command,
}

impl ConfigEnv {
    pub fn new(command: Command) -> Self {
        Self { command }
    }

    pub fn serve() -> Self {
        Self::new(Command::Serve)
    }

    pub fn build() -> Self {
        Self::new(Command::Build)
    }
}

/// User-supplied predicate that can force the plugin inert for a pass.
pub type DisabledFn = Arc<dyn Fn(&ConfigEnv) -> bool + Send + Sync>;

/// File-loadable plugin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedModulesConfig {
    /// Role of this application build
    pub role: Role,

    /// Shared module map: module id -> global variable name
    ///
    /// e.g. { "react": "React", "react-dom/client": "ReactDOM" }
    pub modules: IndexMap<String, String>,
}

impl SharedModulesConfig {
    /// Load configuration from a YAML or JSON file, picked by extension
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Err(crate::error::ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Programmatic plugin options: the file-loadable configuration plus the
/// optional disable predicate, which has no file representation.
#[derive(Clone)]
pub struct SharedModulesOptions {
    pub role: Role,
    pub modules: IndexMap<String, String>,
    pub disabled: Option<DisabledFn>,
}

impl SharedModulesOptions {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            modules: IndexMap::new(),
            disabled: None,
        }
    }

    /// Register a shared module under its runtime global name
    pub fn share(mut self, module_id: impl Into<String>, global_name: impl Into<String>) -> Self {
        self.modules.insert(module_id.into(), global_name.into());
        self
    }

    /// Install a predicate that disables the plugin for matching passes
    pub fn disabled_when(
        mut self,
        predicate: impl Fn(&ConfigEnv) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.disabled = Some(Arc::new(predicate));
        self
    }
}

impl From<SharedModulesConfig> for SharedModulesOptions {
    fn from(config: SharedModulesConfig) -> Self {
        Self {
            role: config.role,
            modules: config.modules,
            disabled: None,
        }
    }
}

impl std::fmt::Debug for SharedModulesOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedModulesOptions")
            .field("role", &self.role)
            .field("modules", &self.modules)
            .field("disabled", &self.disabled.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_config() {
        let json = r#"{
            "role": "consumer",
            "modules": {
                "react": "React",
                "react-dom/client": "ReactDOM"
            }
        }"#;
        let config: SharedModulesConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.role, Role::Consumer);
        assert_eq!(config.modules.get("react").unwrap(), "React");
        assert_eq!(config.modules.get("react-dom/client").unwrap(), "ReactDOM");
    }

    #[test]
    fn test_module_order_preserved() {
        let yaml = "role: provider\nmodules:\n  zlib: Z\n  react: React\n  axios: Axios\n";
        let config: SharedModulesConfig = serde_yaml::from_str(yaml).unwrap();
        let ids: Vec<&String> = config.modules.keys().collect();
        assert_eq!(ids, ["zlib", "react", "axios"]);
    }

    #[test]
    fn test_serialize_config_camel_case() {
        let config = SharedModulesConfig {
            role: Role::Provider,
            modules: IndexMap::from([("react".to_string(), "React".to_string())]),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"role\":\"provider\""));
        assert!(json.contains("\"modules\""));
    }

    #[test]
    fn test_command_round_trip() {
        assert_eq!(serde_json::to_string(&Command::Serve).unwrap(), "\"serve\"");
        assert_eq!(serde_json::to_string(&Command::Build).unwrap(), "\"build\"");
        let env: ConfigEnv = serde_json::from_str(r#"{"command":"serve"}"#).unwrap();
        assert_eq!(env.command, Command::Serve);
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("sharemod.yaml");
        std::fs::write(&yaml, "role: provider\nmodules:\n  react: React\n").unwrap();
        let config = SharedModulesConfig::from_file(&yaml).unwrap();
        assert_eq!(config.role, Role::Provider);

        let json = dir.path().join("sharemod.json");
        std::fs::write(&json, r#"{"role":"consumer","modules":{"react":"React"}}"#).unwrap();
        let config = SharedModulesConfig::from_file(&json).unwrap();
        assert_eq!(config.role, Role::Consumer);

        let toml = dir.path().join("sharemod.toml");
        std::fs::write(&toml, "role = 'provider'").unwrap();
        assert!(matches!(
            SharedModulesConfig::from_file(&toml),
            Err(crate::error::ConfigError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_options_builder() {
        let options = SharedModulesOptions::new(Role::Consumer)
            .share("react", "React")
            .disabled_when(|env| env.command == Command::Build);

        assert_eq!(options.role, Role::Consumer);
        assert_eq!(options.modules.get("react").unwrap(), "React");
        let disabled = options.disabled.unwrap();
        assert!(disabled(&ConfigEnv::build()));
        assert!(!disabled(&ConfigEnv::serve()));
    }
}

use crate::config::{Command, ConfigEnv, DisabledFn, Role, SharedModulesOptions};
use crate::registry::{self, ModuleRegistry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Where the host bundler should slot a plugin in its pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PluginOrder {
    #[serde(rename = "pre")]
    Pre,
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "post")]
    Post,
}

/// Partial bundler configuration contributed by a plugin.
///
/// The host merges this with every other plugin's contribution; this
/// crate only produces its own piece. Serializable so a host (or the
/// CLI) can print or merge it as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    /// Module ids the bundler must not physically resolve or include;
    /// they are satisfied at runtime through the global namespace.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external: Vec<String>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        self.external.is_empty()
    }
}

/// Hook surface a host bundler drives. All hooks default to
/// pass-through; hosts call them synchronously and sequentially within
/// one build pass.
pub trait BundlerPlugin {
    fn name(&self) -> &str;

    fn order(&self) -> PluginOrder {
        PluginOrder::Normal
    }

    /// Invoked once per configuration pass, before any resolution
    fn config(&mut self, _env: &ConfigEnv) -> ConfigPatch {
        ConfigPatch::default()
    }

    /// Offered every module id the bundler is asked to resolve.
    /// `Some(id)` claims the request and rewrites it; `None` defers to
    /// the host's normal resolution.
    fn resolve_id(&self, _id: &str, _importer: Option<&str>) -> Option<String> {
        None
    }

    /// Asked for the content of ids a plugin claimed during resolution
    fn load(&self, _id: &str) -> Option<String> {
        None
    }
}

/// Externalize modules so they are shared between multiple builds.
///
/// The provider build bundles the real library and publishes it on the
/// runtime global namespace; consumer builds externalize it and read the
/// global back through a synthesized shim served under a virtual
/// identifier. Provider scripts must execute before any consumer script
/// at runtime; script load order is the deploying application's
/// responsibility.
pub struct SharedModulesPlugin {
    role: Role,
    registry: ModuleRegistry,
    disabled_fn: Option<DisabledFn>,
    disabled: bool,
}

impl SharedModulesPlugin {
    pub fn new(options: SharedModulesOptions) -> Self {
        let registry = ModuleRegistry::new(options.role, &options.modules);
        Self {
            role: options.role,
            registry,
            disabled_fn: options.disabled,
            disabled: false,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Activation state computed by the last configuration pass
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Role-specific configuration contribution, ignoring activation.
    /// The provider bundles everything normally and contributes nothing;
    /// consumers externalize every shared module id.
    pub fn role_config(&self) -> ConfigPatch {
        match self.role {
            Role::Provider => ConfigPatch::default(),
            Role::Consumer => ConfigPatch {
                external: self.registry.module_ids().map(String::from).collect(),
            },
        }
    }
}

impl BundlerPlugin for SharedModulesPlugin {
    fn name(&self) -> &str {
        "shared-modules"
    }

    fn order(&self) -> PluginOrder {
        // Must intercept shared ids before the host's filesystem resolution
        PluginOrder::Pre
    }

    fn config(&mut self, env: &ConfigEnv) -> ConfigPatch {
        // Recomputed on every pass (e.g. a dev-server restart), never cached
        let missing_provider = self.role == Role::Consumer && env.command == Command::Serve;
        let user_disabled = self.disabled_fn.as_ref().is_some_and(|f| f(env));
        self.disabled = missing_provider || user_disabled;

        info!(
            role = ?self.role,
            command = ?env.command,
            shared_modules = self.registry.len(),
            disabled = self.disabled,
            "shared-modules configuration pass"
        );
        if missing_provider {
            warn!("consumer running under a dev server has no provider; plugin is inert");
        }

        if self.disabled {
            ConfigPatch::default()
        } else {
            self.role_config()
        }
    }

    fn resolve_id(&self, id: &str, importer: Option<&str>) -> Option<String> {
        if self.disabled {
            return None;
        }
        // A virtual shim's own internal require of the real module must
        // resolve normally, not be re-intercepted as shared.
        if importer.is_some_and(registry::is_virtual_id) {
            return None;
        }
        if !self.registry.contains(id) {
            return None;
        }
        let resolved = registry::virtual_id(id);
        debug!(module = %id, virtual_id = %resolved, "intercepted shared module");
        Some(resolved)
    }

    fn load(&self, id: &str) -> Option<String> {
        if self.disabled || !registry::is_virtual_id(id) {
            return None;
        }
        let spec = self.registry.spec_for_virtual_id(id)?;
        debug!(virtual_id = %id, global = %spec.global_name, "serving shim source");
        Some(spec.shim_source.clone())
    }
}

use crate::config::Role;
use crate::shim;
use indexmap::IndexMap;
use tracing::warn;

/// Reserved namespace token for virtual identifiers. Starts with `/@`,
/// which no npm-style package name or relative import can begin with, so
/// it cannot collide with a real module id or filesystem path.
pub const VIRTUAL_PREFIX: &str = "/@virtual:shared-modules/";

/// Virtual modules are served as CommonJS bodies.
pub const VIRTUAL_SUFFIX: &str = ".cjs";

/// Derive the virtual identifier for a shared module id.
///
/// The mapping is injective: distinct module ids yield distinct virtual
/// identifiers, and the inverse is computed by matching a candidate id
/// against the registry's derived identifiers.
pub fn virtual_id(module_id: &str) -> String {
    format!("{VIRTUAL_PREFIX}{module_id}{VIRTUAL_SUFFIX}")
}

/// Whether an id lives in the reserved virtual namespace
pub fn is_virtual_id(id: &str) -> bool {
    id.starts_with(VIRTUAL_PREFIX)
}

/// One shared module, fixed for the lifetime of a build invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedModuleSpec {
    /// Module id as the bundler sees it, e.g. `react-dom/client`
    pub module_id: String,
    /// Global variable name the runtime copies are exchanged under
    pub global_name: String,
    /// Synthesized module body served for the virtual identifier
    pub shim_source: String,
}

impl SharedModuleSpec {
    pub fn virtual_id(&self) -> String {
        virtual_id(&self.module_id)
    }
}

/// Registry of shared modules, built once per build invocation and
/// read-only thereafter.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    specs: Vec<SharedModuleSpec>,
}

impl ModuleRegistry {
    /// Build the registry from the configured module map. Shim sources are
    /// synthesized eagerly; the role picks the template.
    pub fn new(role: Role, modules: &IndexMap<String, String>) -> Self {
        let mut seen_globals: IndexMap<&str, &str> = IndexMap::new();
        for (module_id, global_name) in modules {
            if let Some(previous) = seen_globals.insert(global_name, module_id) {
                warn!(
                    global = %global_name,
                    first = %previous,
                    second = %module_id,
                    "duplicate global name; last shim to execute wins at runtime"
                );
            }
        }

        let specs = modules
            .iter()
            .map(|(module_id, global_name)| SharedModuleSpec {
                module_id: module_id.clone(),
                global_name: global_name.clone(),
                shim_source: match role {
                    Role::Provider => shim::provider_shim(module_id, global_name),
                    Role::Consumer => shim::consumer_shim(global_name),
                },
            })
            .collect();

        Self { specs }
    }

    pub fn contains(&self, module_id: &str) -> bool {
        self.specs.iter().any(|s| s.module_id == module_id)
    }

    /// Inverse of [`virtual_id`], restricted to registered modules
    pub fn spec_for_virtual_id(&self, id: &str) -> Option<&SharedModuleSpec> {
        self.specs.iter().find(|s| s.virtual_id() == id)
    }

    pub fn specs(&self) -> &[SharedModuleSpec] {
        &self.specs
    }

    pub fn module_ids(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.module_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

pub mod config;
pub mod error;
pub mod plugin;
pub mod registry;
pub mod shim;

pub use config::{Command, ConfigEnv, DisabledFn, Role, SharedModulesConfig, SharedModulesOptions};
pub use error::ConfigError;
pub use plugin::{BundlerPlugin, ConfigPatch, PluginOrder, SharedModulesPlugin};
pub use registry::{
    virtual_id, ModuleRegistry, SharedModuleSpec, VIRTUAL_PREFIX, VIRTUAL_SUFFIX,
};

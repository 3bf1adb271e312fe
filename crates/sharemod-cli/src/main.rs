use clap::Parser;
use sharemod_core::config::{Command, ConfigEnv, SharedModulesConfig};
use sharemod_core::plugin::{BundlerPlugin, SharedModulesPlugin};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// sharemod - share bundled libraries between independent front-end builds
#[derive(Parser, Debug)]
#[command(name = "sharemod")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the sharemod configuration file
    #[arg(short, long, value_name = "FILE", default_value = "sharemod.yaml")]
    project: PathBuf,

    /// Bundler command to evaluate the configuration under (serve, build)
    #[arg(long, value_name = "COMMAND", default_value = "build")]
    command: String,

    /// Initialize a new sharemod configuration file
    #[arg(long)]
    init: bool,

    /// Print the contributed bundler configuration as JSON
    #[arg(long)]
    print_config: bool,

    /// Resolve a module id to its virtual identifier
    #[arg(long, value_name = "ID")]
    resolve: Option<String>,

    /// Write each generated shim to a .cjs file in the given directory
    #[arg(long, value_name = "DIR")]
    emit_shims: Option<PathBuf>,

    /// List the shared modules and their virtual identifiers
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG=debug for detailed logs, RUST_LOG=info for normal output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    if cli.init {
        init_project()?;
        return Ok(());
    }

    let config = SharedModulesConfig::from_file(&cli.project)?;
    debug!(path = %cli.project.display(), role = ?config.role, "loaded configuration");

    let env = ConfigEnv::new(parse_command(&cli.command)?);
    let mut plugin = SharedModulesPlugin::new(config.into());
    let patch = plugin.config(&env);

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&patch)?);
    }

    if let Some(ref id) = cli.resolve {
        match plugin.resolve_id(id, None) {
            Some(virtual_id) => println!("{id} -> {virtual_id}"),
            None => println!("{id} -> pass-through"),
        }
    }

    if let Some(ref dir) = cli.emit_shims {
        emit_shims(&plugin, dir)?;
    }

    let no_action = !cli.print_config && cli.resolve.is_none() && cli.emit_shims.is_none();
    if cli.list || no_action {
        list_modules(&plugin);
    }

    Ok(())
}

/// Initialize a starter configuration file in the current directory
fn init_project() -> anyhow::Result<()> {
    let config = r#"# sharemod configuration file
#
# Exactly one application in a deployment must use role: provider.

role: provider

# Shared module map: module id -> runtime global variable name
modules:
  react: React
  react-dom/client: ReactDOM
"#;

    std::fs::write("sharemod.yaml", config)?;
    println!("Created sharemod.yaml");
    println!("Run 'sharemod --print-config' to inspect the bundler contribution.");

    Ok(())
}

/// Parse the bundler command string
fn parse_command(command: &str) -> anyhow::Result<Command> {
    match command {
        "serve" => Ok(Command::Serve),
        "build" => Ok(Command::Build),
        other => anyhow::bail!("Invalid command '{other}'. Valid commands: serve, build"),
    }
}

fn list_modules(plugin: &SharedModulesPlugin) {
    if plugin.is_disabled() {
        println!("plugin is disabled for this pass; all hooks pass through");
        return;
    }
    for spec in plugin.registry().specs() {
        println!("{} ({}) -> {}", spec.module_id, spec.global_name, spec.virtual_id());
    }
}

/// Write each shim source to `<dir>/<module id>.cjs`, with path
/// separators in the module id flattened out
fn emit_shims(plugin: &SharedModulesPlugin, dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    for spec in plugin.registry().specs() {
        let file_name = format!("{}.cjs", spec.module_id.replace('/', "_"));
        let path = dir.join(file_name);
        std::fs::write(&path, &spec.shim_source)?;
        info!(module = %spec.module_id, path = %path.display(), "wrote shim");
        println!("Wrote {}", path.display());
    }
    Ok(())
}

//! restmod: Ansible module generator for Swagger-described REST APIs.
//!
//! # Architecture
//!
//! The CLI is organized around subcommands:
//! - `generate` - Render the modules of a collection from API descriptions
//! - `examples` - Refresh module `EXAMPLES` from integration test plays
//! - `config` - Create, show and validate `restmod.toml`
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! # Generate the vSphere collection into ./vmware_rest
//! restmod generate --schema-dir api_specifications/7.0.0
//!
//! # Refresh the examples afterwards
//! restmod examples --target-dir vmware_rest
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use restmod_cli::ConfigAction;
use restmod_cli::commands;
use restmod_cli::commands::generate::GenerateOptions;
use restmod_core::cli::{ExitCode, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Generates Ansible modules from Swagger API descriptions.
#[derive(Parser, Debug)]
#[command(name = "restmod")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: ./restmod.toml)
    #[arg(short, long, global = true, env = "RESTMOD_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the modules of a collection.
    ///
    /// Loads every configured API description from the schema directory,
    /// renders the trusted modules and writes them together with the
    /// sanity ignore files, `dev.md` and `commit_message`.
    Generate {
        /// Location of the target collection
        #[arg(long, default_value = "vmware_rest")]
        target_dir: PathBuf,

        /// Directory holding the API description files
        #[arg(long, default_value = "api_specifications/7.0.0")]
        schema_dir: PathBuf,

        /// Version stamped in dev.md (default: git revision of the working directory)
        #[arg(long)]
        revision: Option<String>,

        /// Render without writing any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Refresh the EXAMPLES block of the generated modules.
    ///
    /// Mines the integration test plays of the collection for tasks calling
    /// its modules.
    Examples {
        /// Location of the target collection
        #[arg(long, default_value = "vmware_rest")]
        target_dir: PathBuf,

        /// Scenario to read (repeatable, default: configured scenarios)
        #[arg(long = "scenario", num_args = 1)]
        scenarios: Vec<String>,
    },

    /// Manage the generator configuration.
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let exit_code = execute_command(cli.command, cli.config.as_deref(), output_format)?;

    std::process::exit(exit_code.as_i32());
}

/// Installs the stderr tracing subscriber.
///
/// `--verbose` forces the `debug` level, otherwise `RUST_LOG` applies with
/// `info` as the fallback.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn execute_command(
    command: Commands,
    config: Option<&std::path::Path>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    match command {
        Commands::Generate {
            target_dir,
            schema_dir,
            revision,
            dry_run,
        } => {
            let options = GenerateOptions {
                target_dir,
                schema_dir,
                revision,
                dry_run,
            };
            commands::generate::run(config, &options, output_format)
        }
        Commands::Examples {
            target_dir,
            scenarios,
        } => commands::examples::run(config, &target_dir, &scenarios, output_format),
        Commands::Config { action } => commands::config::run(action, config, output_format),
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            Ok(commands::completions::run(shell, &mut cmd))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_generate_defaults() {
        let cli = Cli::parse_from(["restmod", "generate"]);
        if let Commands::Generate {
            target_dir,
            schema_dir,
            revision,
            dry_run,
        } = cli.command
        {
            assert_eq!(target_dir, PathBuf::from("vmware_rest"));
            assert_eq!(schema_dir, PathBuf::from("api_specifications/7.0.0"));
            assert_eq!(revision, None);
            assert!(!dry_run);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_parsing_generate_options() {
        let cli = Cli::parse_from([
            "restmod",
            "generate",
            "--target-dir",
            "/tmp/out",
            "--revision",
            "abc",
            "--dry-run",
        ]);
        if let Commands::Generate {
            target_dir,
            revision,
            dry_run,
            ..
        } = cli.command
        {
            assert_eq!(target_dir, PathBuf::from("/tmp/out"));
            assert_eq!(revision.as_deref(), Some("abc"));
            assert!(dry_run);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_parsing_examples_scenarios() {
        let cli = Cli::parse_from([
            "restmod",
            "examples",
            "--scenario",
            "prepare_lab",
            "--scenario",
            "appliance",
        ]);
        if let Commands::Examples { scenarios, .. } = cli.command {
            assert_eq!(scenarios, vec!["prepare_lab", "appliance"]);
        } else {
            panic!("Expected Examples command");
        }
    }

    #[test]
    fn test_cli_parsing_config_init() {
        let cli = Cli::parse_from(["restmod", "config", "init", "--force"]);
        if let Commands::Config { action } = cli.command {
            assert_eq!(
                action,
                ConfigAction::Init {
                    path: None,
                    force: true
                }
            );
        } else {
            panic!("Expected Config command");
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "restmod",
            "--verbose",
            "--config",
            "custom.toml",
            "--format",
            "json",
            "config",
            "show",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(cli.format, "json");
    }

    #[test]
    fn test_cli_output_format_default() {
        let cli = Cli::parse_from(["restmod", "config", "validate"]);
        assert_eq!(cli.format, "pretty");
    }

    #[test]
    fn test_cli_parsing_completions_zsh() {
        let cli = Cli::parse_from(["restmod", "completions", "zsh"]);
        if let Commands::Completions { shell } = cli.command {
            assert_eq!(shell, Shell::Zsh);
        } else {
            panic!("Expected Completions command");
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

//! k8sform CLI - Kubernetes custom resources as declarative resources

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use k8sform_kube::Propagation;

mod commands;
mod display;
mod error;
mod exit_codes;

use commands::GlobalOptions;

#[derive(Parser)]
#[command(name = "k8sform")]
#[command(author = "k8sform Contributors")]
#[command(version)]
#[command(about = "Kubernetes custom resources as declarative resources", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Args)]
struct GlobalArgs {
    /// Additional CRD file or directory (repeatable)
    #[arg(long = "crd", global = true)]
    crds: Vec<PathBuf>,

    /// Provider configuration file
    #[arg(long, global = true, env = "K8SFORM_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the kubeconfig file
    #[arg(long, global = true, env = "K8SFORM_KUBECONFIG")]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context
    #[arg(long, global = true, env = "K8SFORM_CONTEXT")]
    context: Option<String>,

    /// Field manager for server-side apply
    #[arg(long, global = true)]
    field_manager: Option<String>,

    /// Take ownership of fields managed by others
    #[arg(long, global = true)]
    force_conflicts: bool,

    /// Never connect to a cluster
    #[arg(long, global = true, env = "K8SFORM_OFFLINE")]
    offline: bool,
}

impl From<GlobalArgs> for GlobalOptions {
    fn from(args: GlobalArgs) -> Self {
        Self {
            crds: args.crds,
            config: args.config,
            kubeconfig: args.kubeconfig,
            context: args.context,
            field_manager: args.field_manager,
            force_conflicts: args.force_conflicts,
            offline: args.offline,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List resource and data source types
    Catalog {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the schema of a type, or of the provider block
    Schema {
        /// Resource or data source type name
        type_name: Option<String>,

        /// Output as JSON (every schema when no type is given)
        #[arg(long)]
        json: bool,
    },

    /// Render the manifest YAML for a configuration
    Manifest {
        /// Data source (or resource) type name
        type_name: String,

        /// Configuration file (YAML), `-` for stdin
        #[arg(short = 'f', long = "file")]
        file: PathBuf,

        /// Write the manifest to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a configuration without contacting the cluster
    Validate {
        /// Resource or data source type name
        type_name: String,

        /// Configuration file (YAML), `-` for stdin
        #[arg(short = 'f', long = "file")]
        file: PathBuf,

        /// Output diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what apply would change
    Plan {
        /// Resource type name
        type_name: String,

        /// Configuration file (YAML), `-` for stdin
        #[arg(short = 'f', long = "file")]
        file: PathBuf,

        /// State file from a previous apply
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Create or update an object with server-side apply
    Apply {
        /// Resource type name
        type_name: String,

        /// Configuration file (YAML), `-` for stdin
        #[arg(short = 'f', long = "file")]
        file: PathBuf,

        /// State file, read before and written after apply
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Show the current state of an object
    Read {
        /// Resource type name
        type_name: String,

        /// `namespace/name`, or `name` for cluster-scoped types
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the state of an existing object
    Import {
        /// Resource type name
        type_name: String,

        /// `namespace/name`, or `name` for cluster-scoped types
        id: String,

        /// State file to write
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Delete an object
    Delete {
        /// Resource type name
        type_name: String,

        /// `namespace/name`, or `name` for cluster-scoped types
        #[arg(required_unless_present = "state")]
        id: Option<String>,

        /// State file; removed after deletion
        #[arg(long)]
        state: Option<PathBuf>,

        /// Cascading deletion policy
        #[arg(long, value_parser = Propagation::VALUES)]
        propagation: Option<String>,
    },

    /// Write example configurations for every type
    Generate {
        /// Output directory
        #[arg(short, long, default_value = "demos")]
        out: PathBuf,
    },

    /// Check that every type has an up-to-date example
    CheckExamples {
        /// Examples directory
        #[arg(default_value = "demos")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let code = match run(cli.command, cli.global.into()).await {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}

fn init_tracing(debug: bool) {
    let default = if debug { "k8sform=debug,kube=info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(debug)
        .init();
}

async fn run(command: Commands, options: GlobalOptions) -> error::Result<()> {
    match command {
        Commands::Catalog { json } => commands::catalog::run(&options, json),

        Commands::Schema { type_name, json } => {
            commands::schema::run(&options, type_name.as_deref(), json)
        }

        Commands::Manifest {
            type_name,
            file,
            output,
        } => commands::manifest::run(&options, &type_name, &file, output.as_deref()).await,

        Commands::Validate {
            type_name,
            file,
            json,
        } => commands::validate::run(&options, &type_name, &file, json),

        Commands::Plan {
            type_name,
            file,
            state,
        } => commands::plan::run(&options, &type_name, &file, state.as_deref()).await,

        Commands::Apply {
            type_name,
            file,
            state,
        } => commands::apply::run(&options, &type_name, &file, state.as_deref()).await,

        Commands::Read {
            type_name,
            id,
            json,
        } => commands::read::run(&options, &type_name, &id, json).await,

        Commands::Import {
            type_name,
            id,
            state,
        } => commands::import::run(&options, &type_name, &id, state.as_deref()).await,

        Commands::Delete {
            type_name,
            id,
            state,
            propagation,
        } => {
            commands::delete::run(
                &options,
                &type_name,
                id.as_deref(),
                state.as_deref(),
                propagation.as_deref(),
            )
            .await
        }

        Commands::Generate { out } => commands::generate::run(&options, &out),

        Commands::CheckExamples { dir } => commands::check_examples::run(&options, &dir),
    }
}

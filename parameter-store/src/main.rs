use std::{process::Command, sync::Arc};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde::Serialize;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use ssm_parameter_store::{
    ParameterStore, RetrievalOptions,
    configs::{Configs, ParameterStoreConfig},
};

#[derive(Parser, Debug)]
#[command(version, about = "Read AWS SSM Parameter Store values", long_about = None)]
struct Args {
    /// Return encrypted values without decrypting them
    #[arg(long, global = true)]
    no_decrypt: bool,

    /// Key results by full parameter name instead of the last path segment
    #[arg(long, global = true)]
    full_path: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a single parameter
    Get { name: String },

    /// Get several parameters by name; unknown names are left out
    GetMany {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Get all parameters under a path
    ByPath {
        path: String,

        /// Only direct children of the path
        #[arg(long)]
        no_recursive: bool,
    },

    /// Get all parameters under a path as a nested tree
    Tree { path: String },

    /// Export parameters under a path as environment variables and run a command
    Env {
        path: String,

        /// Only direct children of the path
        #[arg(long)]
        no_recursive: bool,

        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
}

fn setup_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()) // reads RUST_LOG
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .try_init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<i32> {
    let config = ParameterStoreConfig::load()
        .await
        .map_err(|e| anyhow!("Failed to load configs: {}", e))?;
    debug!("CONFIGS: {:?}", &config);

    let store = ParameterStore::from_config(Arc::new(config))
        .await
        .map_err(|e| anyhow!("Failed to initialize parameter client: {}", e))?;

    let options = RetrievalOptions::default()
        .decrypt(!args.no_decrypt)
        .strip_path(!args.full_path);

    match args.command {
        Commands::Get { name } => print_json(&store.get_parameter(&name, options).await?)?,
        Commands::GetMany { names } => print_json(&store.get_parameters(&names, options).await?)?,
        Commands::ByPath { path, no_recursive } => {
            let options = options.recursive(!no_recursive);
            print_json(&store.get_parameters_by_path(&path, options).await?)?
        }
        Commands::Tree { path } => {
            print_json(&store.get_parameters_with_hierarchy(&path, options).await?)?
        }
        Commands::Env {
            path,
            no_recursive,
            command,
        } => {
            let options = options.recursive(!no_recursive);
            let parameters = store.get_parameters_by_path(&path, options).await?;
            ParameterStore::set_environment(&parameters);

            let (program, program_args) = command
                .split_first()
                .ok_or_else(|| anyhow!("No command given"))?;
            let status = Command::new(program)
                .args(program_args)
                .status()
                .with_context(|| format!("Failed to run '{}'", program))?;
            return Ok(status.code().unwrap_or(1));
        }
    }

    Ok(0)
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    setup_logging();

    let args = Args::parse();

    let code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    };

    std::process::exit(code);
}

use anyhow::{anyhow, Result};
use clap::Parser;
use exgrip_api::Config;
use std::net::SocketAddr;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "exgrip", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the catalog database (default: ~/.local/share/exgrip/catalog.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Run the catalog lookup service
    ///
    /// Serves POST /process-data/. The body is a JSON object of optional
    /// filter fields (spindle, length, holderAngle, extensionAngle, toolType
    /// and the tool type's dimension). Matching combinations come back as a
    /// JSON array of summaries.
    ///
    /// Status codes:
    /// - 400 when no usable criteria were given or the length is malformed
    /// - 404 when nothing matched
    /// - 500 when the catalog store fails
    ServeCatalog {
        /// Address to bind (default from config: 0.0.0.0:8000)
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// Run the image similarity search service
    ///
    /// Serves POST /search. Images are downloaded, embedded with CLIP
    /// ViT-B/32 and ranked against the query text; the best matches come
    /// back as {id, dateTime} pairs. The model is loaded once at startup,
    /// which requires a build with the `clip` feature.
    ServeSearch {
        /// Address to bind (default from config: 0.0.0.0:8001)
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// Run both services until Ctrl-C
    Serve,
    /// Import catalog combinations from a JSON array
    Import {
        /// Path to the JSON export
        file: PathBuf,
    },
    /// Run one catalog lookup and print the matches as JSON
    Query {
        #[arg(long)]
        spindle: Option<String>,
        /// Length expression: <=200, 201-250, >600 or 300
        #[arg(long, allow_hyphen_values = true)]
        length: Option<String>,
        #[arg(long)]
        holder_angle: Option<String>,
        #[arg(long)]
        extension_angle: Option<String>,
        /// Tool type label, e.g. "Standard End Mills"
        #[arg(long)]
        tool_type: Option<String>,
        /// Value for the tool type's dimension (bore diameter, cutting
        /// diameter, edge radius or thread)
        #[arg(long, requires = "tool_type")]
        dimension: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Create the config file with defaults
    Init,
    /// Print the config file path
    Path,
    /// Print an example configuration
    Example,
}

fn setup_logging(config: &Config) -> Result<()> {
    let level = config
        .log_level
        .parse::<twyg::LogLevel>()
        .map_err(|e| anyhow!("Invalid log level {:?}: {e}", config.log_level))?;

    let opts = twyg::OptsBuilder::new()
        .coloured(config.log_coloured)
        .level(level)
        .report_caller(config.log_report_caller)
        .build()
        .map_err(|e| anyhow!("Failed to build logger options: {e}"))?;

    twyg::setup(opts).map_err(|e| anyhow!("Failed to set up logging: {e}"))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.db {
        Some(db_path) => Config::load_with_db_path(db_path)?,
        None => Config::load()?,
    };
    setup_logging(&config)?;

    // Ensure database directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match cli.command {
        Commands::ServeCatalog { addr } => {
            commands::serve_catalog(&config, addr.unwrap_or(config.catalog_addr)).await?;
        }
        Commands::ServeSearch { addr } => {
            commands::serve_search(&config, addr.unwrap_or(config.search_addr)).await?;
        }
        Commands::Serve => {
            commands::serve_all(&config).await?;
        }
        Commands::Import { file } => {
            commands::run_import(&config, &file)?;
        }
        Commands::Query {
            spindle,
            length,
            holder_angle,
            extension_angle,
            tool_type,
            dimension,
        } => {
            let args = commands::QueryArgs {
                spindle,
                length,
                holder_angle,
                extension_angle,
                tool_type,
                dimension,
            };
            commands::run_query(&config, args)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Init => commands::config::init_config()?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
        },
    }

    Ok(())
}

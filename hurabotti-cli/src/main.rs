use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hurabotti_core::archive::{self, guild};
use hurabotti_core::archive::guild::Guild;
use hurabotti_core::config::{Config, DEFAULT_CONFIG_PATH};
use hurabotti_core::corpus::build_corpus;
use hurabotti_core::model::registry::{self, ModelRegistry};

#[derive(Parser)]
#[command(name = "hurabotti", version, about = "Build word models from chat exports and generate text from them")]
struct Cli {
    /// Configuration file (created with defaults when missing)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the guilds and channels found in an export.
    Channels {
        /// Root directory of the export
        export: PathBuf,
    },

    /// Manage word models.
    Model {
        #[command(subcommand)]
        command: ModelCommands,
    },

    /// Generate text from a loaded model.
    Generate {
        /// Index of the model among the loaded models
        #[arg(long, default_value_t = 0)]
        model: usize,

        /// Maximum number of words (defaults to the configured limit)
        #[arg(long)]
        words: Option<usize>,
    },
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Create a model from the selected channels of an export.
    Create(CreateArgs),

    /// List the models in the model directory.
    List,

    /// Remove a model from the model directory.
    Remove {
        /// Model file name, with or without extension
        name: String,
    },
}

#[derive(Args)]
struct CreateArgs {
    /// Root directory of the export
    export: PathBuf,

    /// Name stored inside the model
    #[arg(long, default_value = "model")]
    name: String,

    /// File name of the model (defaults to the model name)
    #[arg(long)]
    file: Option<String>,

    /// Channel id to include (repeatable)
    #[arg(long = "channel")]
    channels: Vec<u64>,

    /// Guild id whose channels are all included (repeatable)
    #[arg(long = "guild")]
    guilds: Vec<u64>,

    /// Include every channel of the export
    #[arg(long)]
    all: bool,

    /// Overwrite an existing model without asking
    #[arg(long)]
    yes: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    match cli.command {
        Commands::Channels { export } => {
            let guilds = archive::load_guilds(&export)?;
            print_guilds(&guilds);
        }
        Commands::Model { command: ModelCommands::Create(args) } => create_model(&config, args)?,
        Commands::Model { command: ModelCommands::List } => {
            for (index, name) in registry::list_models(&config.model_directory)?.iter().enumerate() {
                println!("{index}: {name}");
            }
        }
        Commands::Model { command: ModelCommands::Remove { name } } => {
            let path = registry::remove_model(&config.model_directory, &name)?;
            println!("Removed {}", path.display());
        }
        Commands::Generate { model, words } => {
            let models = ModelRegistry::from_config(&config)?;
            let words = words.unwrap_or(models.max_words());
            println!("{}", models.generate(model, words)?);
        }
    }

    Ok(())
}

fn create_model(config: &Config, args: CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut guilds = archive::load_guilds(&args.export)?;

    if args.all {
        guild::enable_all(&mut guilds);
    }
    guild::enable_channels(&mut guilds, &args.channels);
    guild::enable_guilds(&mut guilds, &args.guilds);

    let enabled: Vec<&str> = guilds
        .iter()
        .flat_map(|g| g.enabled_channels())
        .map(|channel| channel.name.as_str())
        .collect();
    if enabled.is_empty() {
        return Err("no channels selected, use --channel, --guild or --all".into());
    }

    let file_name = args.file.as_deref().unwrap_or(&args.name);
    info!(model = %args.name, file = %file_name, channels = ?enabled, "making model");

    let model = build_corpus(&args.export, &guilds, &args.name)?;
    let path = model.save(&config.model_directory, file_name, |existing| {
        args.yes || confirm(existing).unwrap_or(false)
    })?;

    println!("Saved {} words to {}", model.words.len(), path.display());
    Ok(())
}

/// Asks on stdin whether an existing model may be replaced.
fn confirm(existing: &Path) -> io::Result<bool> {
    print!("Model {} already exists, overwrite? y/n ", existing.display());
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn print_guilds(guilds: &[Guild]) {
    for guild in guilds {
        println!("{} {}", guild.id, guild.name);
        for channel in &guild.channels {
            println!("    {} {}", channel.id, channel.name);
        }
    }
}

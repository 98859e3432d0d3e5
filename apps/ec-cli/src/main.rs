use clap::{Parser, Subcommand, ValueEnum};
use ec_model::ModelError;
use ec_models::{BuildRequest, ModelKind, ModelSummary};
use ec_options::{DiffusionOrder, OptionError, Options};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Options(#[from] OptionError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ec-cli")]
#[command(about = "Electrochemical cell model assembly", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and validate an options file
    Validate {
        /// Path to the options YAML file
        options_path: PathBuf,
    },
    /// Assemble a model and print its summary
    Build {
        /// Path to the options YAML file
        options_path: PathBuf,
        /// Which model to assemble
        #[arg(long, value_enum, default_value_t = ModelArg::Sei)]
        model: ModelArg,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelArg {
    /// Lithium-ion SEI ageing model
    Sei,
    /// Lead-acid leading-order quasi-static model
    Loqs,
    Foqs,
    FoqsAverageCorrection,
    Composite,
    CompositeExtendedDistributed,
    CompositeExtendedAveraged,
    /// Lead-acid higher-order model picked by the "diffusion order" option
    HigherOrder,
}

impl ModelArg {
    fn kind(self, options: &Options) -> ModelKind {
        match self {
            ModelArg::Sei => ModelKind::SeiAgeing,
            ModelArg::Loqs => ModelKind::Loqs,
            ModelArg::Foqs => ModelKind::HigherOrder(DiffusionOrder::FirstOrder),
            ModelArg::FoqsAverageCorrection => {
                ModelKind::HigherOrder(DiffusionOrder::FirstOrderAverageCorrection)
            }
            ModelArg::Composite => ModelKind::HigherOrder(DiffusionOrder::Composite),
            ModelArg::CompositeExtendedDistributed => {
                ModelKind::HigherOrder(DiffusionOrder::CompositeExtendedDistributed)
            }
            ModelArg::CompositeExtendedAveraged => {
                ModelKind::HigherOrder(DiffusionOrder::CompositeExtendedAveraged)
            }
            ModelArg::HigherOrder => ModelKind::HigherOrder(options.diffusion_order()),
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { options_path } => cmd_validate(&options_path),
        Commands::Build {
            options_path,
            model,
            json,
        } => cmd_build(&options_path, model, json),
    }
}

fn cmd_validate(options_path: &Path) -> CliResult<()> {
    println!("Validating options: {}", options_path.display());
    let options = ec_options::load_yaml(options_path)?;
    println!("✓ Options are valid");
    print!("{}", serde_yaml::to_string(&options.to_raw())?);
    Ok(())
}

fn cmd_build(options_path: &Path, model: ModelArg, json: bool) -> CliResult<()> {
    let options = ec_options::load_yaml(options_path)?;
    let request = BuildRequest::new(model.kind(&options), options);
    info!(kind = %request.kind, "building model");
    let summary = ModelSummary::of(&request.build()?);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &ModelSummary) {
    println!("✓ Assembled: {}", summary.name);
    println!("  Solver: {}", summary.solver);
    println!("  Variables: {}", summary.variables);
    println!("  Submodels:");
    for name in &summary.submodels {
        println!("    {name}");
    }
    println!("  Differential states ({}):", summary.states.len());
    for name in &summary.states {
        println!("    {name}");
    }
    if !summary.algebraic.is_empty() {
        println!("  Algebraic states ({}):", summary.algebraic.len());
        for name in &summary.algebraic {
            println!("    {name}");
        }
    }
    if !summary.events.is_empty() {
        println!("  Events:");
        for name in &summary.events {
            println!("    {name}");
        }
    }
}

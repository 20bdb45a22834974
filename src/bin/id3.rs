use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use id3_tree::data::reader::{read_dataset, ReaderParams};
use id3_tree::plot::render::{save_svg, PlotParams};
use id3_tree::DecisionTreeClassifier;

#[derive(Parser)]
#[command(name = "id3")]
#[command(about = "Train and query ID3 decision trees on categorical data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build a tree from a delimited training file and print it
    Train {
        /// Path to the training file (label in the last column)
        #[arg(long)]
        data: PathBuf,

        /// Comma-separated feature names, one per feature column
        #[arg(long, value_delimiter = ',')]
        features: Option<Vec<String>>,

        /// Field delimiter of the training file
        #[arg(long, default_value_t = '\t')]
        delimiter: char,

        /// Treat the first line as column names
        #[arg(long, default_value_t = false)]
        header: bool,

        /// Write the trained model to this file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Draw the tree to this SVG file
        #[arg(long)]
        plot: Option<PathBuf>,

        /// Width of the drawing in pixels
        #[arg(long, default_value_t = 800)]
        width: u32,

        /// Height of the drawing in pixels
        #[arg(long, default_value_t = 600)]
        height: u32,
    },

    /// Classify one query with a saved model
    Classify {
        /// Path to the saved model
        #[arg(long)]
        model: PathBuf,

        /// Comma- or tab-separated feature values, in training column order
        #[arg(long, required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Print a saved model with its leaf count and depth
    Show {
        /// Path to the saved model
        #[arg(long)]
        model: PathBuf,
    },
}

type Model = DecisionTreeClassifier<String, String>;

/// Splits each query argument on commas and tabs into trimmed values.
fn split_query(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split([',', '\t']))
        .map(|value| value.trim().to_string())
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Train {
            data,
            features,
            delimiter,
            header,
            save,
            plot,
            width,
            height,
        } => {
            let mut params = ReaderParams::new();
            if !delimiter.is_ascii() {
                bail!("delimiter must be a single ASCII character, got {delimiter:?}");
            }
            params.set_delimiter(delimiter as u8)?;
            params.set_has_headers(header);

            let dataset = read_dataset(&data, &params)
                .with_context(|| format!("failed to load {}", data.display()))?;
            let features = features.unwrap_or_else(|| {
                (0..dataset.nfeatures()).map(|i| format!("feature_{i}")).collect()
            });
            info!(records = dataset.nrows(), features = features.len(), "training");

            let mut model = Model::new();
            model.fit(&dataset, &features).context("training failed")?;
            let tree = model.tree().context("training produced no tree")?;
            println!("{tree}");

            if let Some(path) = save {
                model
                    .save(&path)
                    .with_context(|| format!("failed to save model to {}", path.display()))?;
            }
            if let Some(path) = plot {
                let mut plot_params = PlotParams::new();
                plot_params.set_size(width, height)?;
                save_svg(tree, &path, &plot_params)
                    .with_context(|| format!("failed to draw tree to {}", path.display()))?;
            }
        }
        Command::Classify { model, query } => {
            let loaded = Model::load(&model)
                .with_context(|| format!("failed to load model from {}", model.display()))?;
            let query = split_query(&query);
            let label = loaded.classify(&query).context("classification failed")?;
            println!("{label}");
        }
        Command::Show { model } => {
            let loaded = Model::load(&model)
                .with_context(|| format!("failed to load model from {}", model.display()))?;
            println!("features: {}", loaded.feature_names().join(", "));
            let tree = loaded.into_tree().context("model holds no tree")?;
            println!("leaves: {}", tree.leaf_count());
            println!("depth: {}", tree.depth());
            println!("{tree}");
        }
    }

    Ok(())
}

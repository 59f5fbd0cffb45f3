use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};
use qa_chatbot::{
    init_logger, AssetStore, ChatShell, Classifier, LabelMappingSource, MappingFailurePolicy, RuntimeConfig,
    DEFAULT_LABEL_MAPPING_FILE, DEFAULT_MODEL_FILE,
};

#[derive(Parser)]
#[command(author, version, about = "Ask the packaged question answering model from the terminal", long_about = None)]
struct Args {
    /// Directory holding the model and label mapping (defaults to $QA_CHATBOT_ASSETS or the user data dir)
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Model file, relative to the assets directory
    #[arg(long, default_value = DEFAULT_MODEL_FILE)]
    model: String,

    /// Label mapping file, relative to the assets directory
    #[arg(long, default_value = DEFAULT_LABEL_MAPPING_FILE)]
    labels: String,

    /// Read the label mapping from the model's metadata instead of a file
    #[arg(long)]
    metadata_labels: bool,

    /// Refuse to start if the label mapping cannot be loaded
    #[arg(long)]
    strict_labels: bool,

    /// Expected SHA-256 of the model file
    #[arg(long)]
    model_sha256: Option<String>,

    /// Threads used within a single model run (0 lets ONNX Runtime decide)
    #[arg(long, default_value_t = 0)]
    intra_threads: usize,

    /// Give up on a question after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Answer a single question and exit
    #[arg(short, long)]
    question: Option<String>,
}

fn build_classifier(args: &Args) -> anyhow::Result<Classifier> {
    let store = match &args.assets_dir {
        Some(dir) => AssetStore::new(dir),
        None => AssetStore::new_default(),
    };
    info!("Using assets from {:?}", store.assets_dir());

    let model_bytes = match &args.model_sha256 {
        Some(hash) => store.read_verified_model(&args.model, hash),
        None => store.read_model(&args.model),
    }
    .context("failed to read model")?;

    let label_source = if args.metadata_labels {
        LabelMappingSource::model_metadata()
    } else {
        LabelMappingSource::file(store.get_path(&args.labels))
    };
    let policy = if args.strict_labels {
        MappingFailurePolicy::Fail
    } else {
        MappingFailurePolicy::Degrade
    };

    let classifier = Classifier::builder()
        .with_runtime_config(RuntimeConfig {
            intra_threads: args.intra_threads,
            ..RuntimeConfig::default()
        })
        .with_model_bytes(&model_bytes)?
        .with_label_source(label_source)
        .with_mapping_policy(policy)
        .build()
        .context("failed to start the chatbot")?;
    Ok(classifier)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Args::parse();

    info!("=== Starting QA Chatbot ===");
    let start_time = Instant::now();
    let classifier = build_classifier(&args)?;
    let info = classifier.info();
    info!(
        "=== Ready in {:.2?}: {} labels from {}, input '{}' ===",
        start_time.elapsed(),
        info.num_labels,
        info.label_source,
        info.input_name
    );

    let mut shell = ChatShell::new(Arc::new(classifier));
    if let Some(ms) = args.timeout_ms {
        shell = shell.with_timeout(Duration::from_millis(ms));
    }

    if let Some(question) = &args.question {
        if let Some(turn) = shell.respond_async(question).await {
            println!("{}", turn.reply);
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = io::stdout();
    print!("> ");
    stdout.flush()?;
    while let Some(line) = lines.next_line().await? {
        if let Some(turn) = shell.respond_async(&line).await {
            println!("{}", turn.reply);
        }
        print!("> ");
        stdout.flush()?;
    }
    println!();

    Ok(())
}

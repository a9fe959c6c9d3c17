//! `paperforge run` — Generate a research paper.
//!
//! Credentials are checked first, then topic and format are collected and
//! validated. Nothing touches the network until all three pass.

use chrono::Local;
use paperforge_config::{AppConfig, ConfigError};
use paperforge_core::error::PipelineError;
use paperforge_core::evidence::EvidenceProvider;
use paperforge_core::paper::{OutputFormat, Subcategory, SubcategoryResult, Topic};
use paperforge_core::provider::Provider;
use paperforge_pipeline::{Pipeline, PipelineObserver};
use std::error::Error;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const TOPIC_PROMPT: &str = "Enter the research topic: ";
const FORMAT_PROMPT: &str = "Enter the desired document format (txt, md, or docx): ";

/// The engine and evidence provider a run talks to.
type Collaborators = (Arc<dyn Provider>, Arc<dyn EvidenceProvider>);

pub struct RunArgs {
    pub topic: Option<String>,
    pub format: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub evidence: Option<String>,
}

pub async fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let mut stdin = BufReader::new(tokio::io::stdin());

    let path = execute(
        config,
        args,
        &mut stdin,
        |config| {
            (
                paperforge_providers::build_from_config(config),
                paperforge_evidence::build_from_config(config),
            )
        },
        Arc::new(ConsoleObserver),
    )
    .await?;

    println!("\n📄 Final research paper saved to '{}'", path.display());
    Ok(())
}

/// Resolve `work` unless `cancel` completes first, in which case `None`.
pub async fn until_cancelled<T>(work: impl Future<Output = T>, cancel: impl Future) -> Option<T> {
    tokio::select! {
        output = work => Some(output),
        _ = cancel => None,
    }
}

/// Validate inputs against `config`, then connect and generate.
///
/// `connect` is only invoked once credentials, topic and format are valid.
async fn execute<R, F>(
    mut config: AppConfig,
    args: RunArgs,
    input: &mut R,
    connect: F,
    observer: Arc<dyn PipelineObserver>,
) -> Result<PathBuf, Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    F: FnOnce(&AppConfig) -> Collaborators,
{
    apply_overrides(&mut config, &args)?;
    config.require_credentials()?;

    let raw_topic = match args.topic {
        Some(topic) => topic,
        None => prompt(input, TOPIC_PROMPT).await?,
    };
    let topic = Topic::parse(&raw_topic)?;

    let raw_format = match args.format {
        Some(format) => format,
        None => prompt(input, FORMAT_PROMPT).await?,
    };
    let format: OutputFormat = raw_format.parse()?;

    let (provider, evidence) = connect(&config);
    generate(&config, provider, evidence, &topic, format, observer).await
}

/// Command-line flags override the loaded configuration.
fn apply_overrides(config: &mut AppConfig, args: &RunArgs) -> Result<(), ConfigError> {
    if let Some(evidence) = &args.evidence {
        config.evidence.provider = evidence.trim().to_lowercase();
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    config.validate()
}

async fn prompt<R>(input: &mut R, question: &str) -> std::io::Result<String>
where
    R: AsyncBufRead + Unpin,
{
    print!("{question}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line).await?;
    Ok(line.trim().to_string())
}

/// Run the pipeline and write the document. Returns the written path.
pub async fn generate(
    config: &AppConfig,
    provider: Arc<dyn Provider>,
    evidence: Arc<dyn EvidenceProvider>,
    topic: &Topic,
    format: OutputFormat,
    observer: Arc<dyn PipelineObserver>,
) -> Result<PathBuf, Box<dyn Error>> {
    let report = Pipeline::new(provider, evidence, config)
        .with_observer(observer)
        .run(topic, format)
        .await?;

    let path = paperforge_render::write_report(
        &config.output.dir,
        &config.output.file_prefix,
        &report,
        Local::now().naive_local(),
    )?;

    println!("✅ Research paper generated and saved to '{}'", path.display());
    Ok(path)
}

/// Prints the step-by-step progress lines.
struct ConsoleObserver;

fn evidence_label(name: &str) -> &str {
    match name {
        "openalex" => "OpenAlex",
        "google" => "Google Search",
        other => other,
    }
}

impl PipelineObserver for ConsoleObserver {
    fn decomposing(&self, _topic: &Topic) {
        println!("Step 1: Generating subcategories...");
    }

    fn decomposed(&self, subcategories: &[Subcategory]) {
        let names: Vec<&str> = subcategories.iter().map(Subcategory::as_str).collect();
        println!("✅ Subcategories generated: {}", names.join(", "));
    }

    fn researching(&self, subcategory: &Subcategory, evidence: &str) {
        println!(
            "\nStep 2: Researching subcategory: '{subcategory}' with {}...",
            evidence_label(evidence)
        );
    }

    fn researched(&self, result: &SubcategoryResult) {
        println!("✅ Research for '{}' completed.", result.subcategory);
    }

    fn skipped(&self, subcategory: &Subcategory, reason: &PipelineError) {
        match reason {
            PipelineError::NoEvidence { .. } => {
                println!("❌ No sources found for '{subcategory}'.")
            }
            _ => println!("❌ No research data was collected for '{subcategory}'."),
        }
    }

    fn coalescing(&self, format: OutputFormat) {
        println!(
            "\nStep 3: Coalescing research into a final {} paper...",
            format.label()
        );
    }
}

// ABOUTME: Main entry point for the feed-slides program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use feed_slides::credentials::{self, CredentialStore};
use feed_slides::{
    Config, GeminiClient, GenerationClient, Generator, Project, ResultStore, RunState, export,
    utils,
};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample project file
    Init(InitArgs),

    /// Print the compiled prompt of each slide
    Prompts(PromptsArgs),

    /// Generate slide images
    Generate(GenerateArgs),

    /// Build the slide outline from a source text
    Structure(StructureArgs),

    /// Store the API key
    SetKey(SetKeyArgs),
}

#[derive(Args)]
struct ProjectArg {
    /// Path to the project file
    #[arg(short, long, default_value = "feed.json")]
    project: PathBuf,
}

#[derive(Args)]
struct InitArgs {
    #[command(flatten)]
    project: ProjectArg,

    /// Overwrite an existing project file
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct PromptsArgs {
    #[command(flatten)]
    project: ProjectArg,

    /// Only print this slide (1-based)
    #[arg(long)]
    slide: Option<usize>,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    project: ProjectArg,

    /// Directory for the slide images
    #[arg(short, long, default_value = "slides")]
    out: PathBuf,

    /// Regenerate only this slide (1-based), replacing any existing image
    #[arg(long)]
    only: Option<usize>,

    /// Also write insta_feed_slides.zip into the output directory
    #[arg(long)]
    zip: bool,
}

#[derive(Args)]
struct StructureArgs {
    #[command(flatten)]
    project: ProjectArg,

    /// Text file to structure
    #[arg(short, long)]
    source: PathBuf,
}

#[derive(Args)]
struct SetKeyArgs {
    /// The API key
    key: String,
}

fn slide_index(number: usize) -> anyhow::Result<usize> {
    number
        .checked_sub(1)
        .context("Slide numbers start at 1")
}

fn client_from_env(config: &Config) -> anyhow::Result<GeminiClient> {
    let store = CredentialStore::new(&config.credentials_path);
    let key = credentials::resolve_api_key(config.api_key.as_deref(), &store)?;
    Ok(GeminiClient::new(config, key)?)
}

fn init(args: &InitArgs) -> anyhow::Result<()> {
    let path = &args.project.project;
    if path.exists() && !args.force {
        bail!("{:?} already exists; pass --force to overwrite", path);
    }
    Project::default().to_file(path)?;
    println!("Sample project written to {:?}", path);
    Ok(())
}

fn prompts(args: &PromptsArgs) -> anyhow::Result<()> {
    let project = Project::from_file(&args.project.project)?;
    let slides = project.deck.slides();
    let selected = match args.slide {
        Some(number) => vec![slide_index(number)?],
        None => (0..slides.len()).collect(),
    };

    if let Some(palette) = project.design.brand_palette() {
        println!(
            "Brand palette: band {}, text {}, background {} / {}, accent {}, title stroke {}\n",
            palette.band,
            palette.text,
            palette.background_light,
            palette.background_very_light,
            palette.accent,
            palette.title_stroke
        );
    }

    for index in selected {
        let slide = project
            .deck
            .slide(index)
            .with_context(|| format!("Slide {} does not exist", index + 1))?;
        let references = feed_slides::resolve_references(&project, slide);
        println!("=== {} ({} reference image(s)) ===", slide.label(), references.len());
        println!("{}\n", feed_slides::compile_prompt(&project, slide));
    }
    Ok(())
}

fn generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let project = Project::from_file(&args.project.project)?;
    let config = Config::from_env();
    let client = client_from_env(&config)?;
    client.ensure_credential()?;

    utils::validate_directory_writable(&args.out)?;
    let existing = ResultStore::load_exported(&args.out)?;
    if !existing.is_empty() {
        info!("Resuming with {} existing slide image(s)", existing.len());
    }
    let deck = project.deck.clone();
    let out = args.out.clone();
    let generator = Generator::new(client, config.batch_options())
        .with_results(existing)
        .with_on_slide_done(move |index, image| {
            export::export_generated(&deck, index, image, &out).map(|_| ())
        });

    let handle = generator.handle();
    ctrlc::set_handler(move || {
        eprintln!("Interrupted; stopping after the current slide");
        handle.cancel();
    })
    .context("Failed to install the Ctrl-C handler")?;

    let mut failed = Vec::new();
    match args.only {
        Some(number) => {
            let index = slide_index(number)?;
            generator
                .generate_single(&project, index)
                .with_context(|| format!("Slide {} failed", number))?;
        }
        None => {
            let report = generator.run_batch(&project)?;
            println!(
                "{} generated, {} already present, {} failed",
                report.generated.len(),
                report.skipped.len(),
                report.failed.len()
            );
            if report.state == RunState::Cancelled {
                println!("Batch was cancelled");
            }
            let snapshot = generator.handle().snapshot();
            for index in &report.failed {
                let message = snapshot.errors.get(index).map(String::as_str).unwrap_or("");
                eprintln!("  slide {}: {}", index + 1, message);
            }
            failed = report.failed;
        }
    }

    let results = generator.results();
    let written = export::export_directory(&project.deck, &results, &args.out)?;
    println!("{} slide image(s) in {:?}", written.len(), args.out);

    if args.zip {
        match export::export_archive(&project.deck, &results, &args.out)? {
            Some(path) => println!("Archive written to {:?}", path),
            None => println!("No generated slides to archive"),
        }
    }

    if !failed.is_empty() {
        bail!("{} slide(s) failed to generate", failed.len());
    }
    Ok(())
}

fn structure(args: &StructureArgs) -> anyhow::Result<()> {
    let path = &args.project.project;
    let mut project = if path.exists() {
        Project::from_file(path)?
    } else {
        Project::default()
    };
    let source = utils::read_text_input(&args.source)?;

    let config = Config::from_env();
    let client = client_from_env(&config)?;
    let outline = client.generate_structure(&source)?;
    project.deck.apply_structure(&outline);
    project.to_file(path)?;

    println!("Outline applied to {:?}:", path);
    for slide in project.deck.slides() {
        println!("  {}", slide.label());
    }
    Ok(())
}

fn set_key(args: &SetKeyArgs) -> anyhow::Result<()> {
    let config = Config::from_env();
    let store = CredentialStore::new(&config.credentials_path);
    store.save(&args.key)?;
    println!("API key saved to {:?}", store.path());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Init(args)) => init(args),
        Some(Commands::Prompts(args)) => prompts(args),
        Some(Commands::Generate(args)) => generate(args),
        Some(Commands::Structure(args)) => structure(args),
        Some(Commands::SetKey(args)) => set_key(args),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

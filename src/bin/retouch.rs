// retouch - edit images with a generative model from the terminal

use anyhow::Context;
use clap::{Parser, Subcommand};
use retouch::editing::{
    EditController, EditOutcome, EditorError, GeminiEditService, Language, RetouchConfig,
    SessionSnapshot, catalog, codec,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Edit images with AI, with undo and redo", long_about = None)]
struct Args {
    /// Config file (default: ./.retouch.toml, then ~/.retouch.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Model name, overrides the config
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Prompt display language (en, fa)
    #[arg(short, long, global = true)]
    lang: Option<Language>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in prompts
    Prompts,

    /// Apply one edit and save the result
    Edit {
        /// Image to edit
        input: PathBuf,

        /// Prompt id from `retouch prompts`, or free text
        #[arg(short, long)]
        prompt: String,

        /// Output path (default: <output_dir>/edited-<name>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive session with undo and redo
    Session {
        /// Image to start with
        image: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may hold GEMINI_API_KEY
    if let Ok(path) = dotenvy::dotenv() {
        eprintln!("Loaded .env file from: {}", path.display());
    }

    let args = Args::parse();

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("retouch={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = RetouchConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(model) = args.model {
        config.service.model = model;
    }
    if let Some(lang) = args.lang {
        config.language = lang;
    }

    match args.command {
        Command::Prompts => {
            print_prompts(config.language);
            Ok(())
        }
        Command::Edit {
            input,
            prompt,
            output,
        } => run_edit(&config, &input, &prompt, output).await,
        Command::Session { image } => run_session(&config, image).await,
    }
}

fn print_prompts(language: Language) {
    for category in catalog::PROMPT_CATEGORIES {
        println!("{}", category.name);
        for prompt in category.prompts {
            println!("  {:<22} {}", prompt.id, prompt.display_text(language));
        }
        println!();
    }
    println!(
        "  {:<22} {}",
        catalog::ANALYZE_PROMPT.id,
        catalog::ANALYZE_PROMPT.display_text(language)
    );
}

fn controller_for(config: &RetouchConfig) -> anyhow::Result<EditController> {
    let service = GeminiEditService::new(&config.service)?;
    tracing::info!("Using model: {}", service.model());
    Ok(EditController::new(Arc::new(service)))
}

fn default_output(config: &RetouchConfig, snapshot: &SessionSnapshot) -> Option<PathBuf> {
    snapshot
        .displayed
        .as_ref()
        .map(|image| config.output_dir.join(codec::download_name(image)))
}

async fn run_edit(
    config: &RetouchConfig,
    input: &Path,
    prompt: &str,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let controller = controller_for(config)?;
    controller
        .open(input)
        .await
        .with_context(|| format!("Cannot open {}", input.display()))?;

    let instruction = catalog::resolve_instruction(prompt);
    match controller.request_edit(&instruction).await? {
        EditOutcome::Proposed => {}
        EditOutcome::Failed(reason) => anyhow::bail!("Failed to edit the image: {}", reason),
        EditOutcome::Discarded => anyhow::bail!("Edit result was discarded"),
    }

    let output = match output {
        Some(path) => path,
        None => default_output(config, &controller.snapshot().await)
            .context("No image to save")?,
    };
    controller.save(&output).await?;
    println!("Image saved to: {}", output.display());
    Ok(())
}

async fn run_session(config: &RetouchConfig, image: Option<PathBuf>) -> anyhow::Result<()> {
    let controller = controller_for(config)?;

    println!("Retouch session - type `help` for commands");
    if let Some(path) = image {
        open_image(&controller, &path).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => print_help(),
            "prompts" => print_prompts(config.language),
            "open" if !rest.is_empty() => open_image(&controller, Path::new(rest)).await,
            "edit" if !rest.is_empty() => spawn_edit(&controller, catalog::resolve_instruction(rest)),
            "analyze" => spawn_edit(&controller, catalog::ANALYZE_PROMPT.instruction().to_string()),
            "accept" => report(controller.accept_pending().await, "Edit accepted"),
            "undo" => report(controller.undo().await, "Undone"),
            "redo" => report(controller.redo().await, "Redone"),
            "clear" => {
                controller.clear().await;
                println!("Image cleared");
            }
            "status" => print_status(&controller.snapshot().await),
            "uri" => match controller.displayed_image().await {
                Some(image) => println!("{}", codec::renderable_uri(&image)),
                None => println!("No image loaded"),
            },
            "save" => {
                let target = if rest.is_empty() {
                    default_output(config, &controller.snapshot().await)
                } else {
                    Some(PathBuf::from(rest))
                };
                match target {
                    Some(path) => match controller.save(&path).await {
                        Ok(()) => println!("Saved to {}", path.display()),
                        Err(e) => println!("Save failed: {}", e),
                    },
                    None => println!("No image loaded"),
                }
            }
            _ => println!("Unknown command: {} (try `help`)", line),
        }
    }

    Ok(())
}

async fn open_image(controller: &EditController, path: &Path) {
    match controller.open(path).await {
        Ok(()) => println!("Opened {}", path.display()),
        Err(EditorError::UnsupportedFormat(_)) => println!("Please select an image file."),
        Err(e) => println!("Cannot open {}: {}", path.display(), e),
    }
}

// Edits run in the background so the session keeps accepting commands.
fn spawn_edit(controller: &EditController, instruction: String) {
    let controller = controller.clone();
    tokio::spawn(async move {
        match controller.request_edit(&instruction).await {
            Ok(EditOutcome::Proposed) => println!("Edit ready - `accept` to keep it, `save` to download"),
            Ok(EditOutcome::Failed(_)) => println!("Failed to edit the image. Please try again."),
            Ok(EditOutcome::Discarded) => tracing::debug!("Stale edit dropped"),
            Err(EditorError::InvalidState(reason)) => println!("Cannot edit now: {}", reason),
            Err(e) => println!("Edit error: {}", e),
        }
    });
    println!("Generating...");
}

fn report(result: retouch::editing::Result<()>, done: &str) {
    match result {
        Ok(()) => println!("{}", done),
        Err(e) => println!("{}", e),
    }
}

fn print_status(snapshot: &SessionSnapshot) {
    match &snapshot.displayed {
        Some(image) => println!(
            "{} ({}), step {}/{}{}",
            image.name,
            image.media_type,
            snapshot.position + 1,
            snapshot.len,
            if snapshot.has_pending { ", edit pending" } else { "" }
        ),
        None => println!("No image loaded"),
    }
    println!(
        "undo: {}  redo: {}  generating: {}",
        snapshot.can_undo, snapshot.can_redo, snapshot.is_generating
    );
    if let Some(kind) = snapshot.last_error {
        if kind.is_retryable() {
            println!("last error: {} (run `edit` again to retry)", kind.message());
        } else {
            println!("last error: {}", kind.message());
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  open <path>      load an image as the new baseline");
    println!("  prompts          list built-in prompts");
    println!("  edit <id|text>   request an edit of the current image");
    println!("  analyze          request a general enhancement");
    println!("  accept           keep the pending edit");
    println!("  undo / redo      move through accepted edits");
    println!("  save [path]      write the displayed image");
    println!("  uri              print the displayed image as a data URI");
    println!("  clear            drop the image and its history");
    println!("  status           show the session state");
    println!("  quit             leave");
}

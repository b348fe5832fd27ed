use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docquery::{
    config::{Config, EngineStrategy},
    constants::{ASSISTANT_LABEL, GREETING},
    engine,
    normalize::{normalize, NormalizeVariant},
    Session,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docquery")]
#[command(about = "Ask questions about a PDF, DOC/DOCX or TXT document")]
#[command(version)]
struct Cli {
    /// Config file (defaults to config/settings.toml or ~/.config/docquery/settings.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the text extracted from a document
    Extract {
        /// Document to read
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Character allow-list: strict or extended (overrides config)
        #[arg(long)]
        variant: Option<NormalizeVariant>,
        /// Print the raw extracted text instead of the normalized context
        #[arg(long)]
        raw: bool,
    },
    /// Ask a single question about a document
    Ask {
        /// Document to load
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Question to ask
        #[arg(value_name = "QUESTION", required = true, num_args = 1..)]
        question: Vec<String>,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Load a document and ask questions interactively
    Chat {
        /// Document to load
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        session: SessionArgs,
    },
}

#[derive(Args)]
struct SessionArgs {
    /// Answer engine: remote or local (overrides config)
    #[arg(long)]
    engine: Option<EngineStrategy>,
    /// Character allow-list: strict or extended (overrides config)
    #[arg(long)]
    variant: Option<NormalizeVariant>,
    /// OpenAI API key (overrides OPENAI_API_KEY; prompted for when missing)
    #[arg(long)]
    api_key: Option<String>,
    /// Save the transcript to this file when done
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
}

/// Resolve the credential for the remote engine; held in memory only
fn resolve_api_key(config: &Config, flag: Option<String>) -> Result<Option<String>> {
    if config.engine.strategy != EngineStrategy::Remote {
        return Ok(None);
    }
    if let Some(key) = flag.filter(|k| !k.trim().is_empty()) {
        return Ok(Some(key));
    }
    if let Some(key) = Config::openai_api_key_from_env() {
        return Ok(Some(key));
    }

    let key = dialoguer::Password::new()
        .with_prompt("OpenAI API Key")
        .allow_empty_password(true)
        .interact()
        .context("Failed to read API key")?;
    Ok(Some(key))
}

fn build_session(config: &mut Config, args: &SessionArgs) -> Result<Session> {
    if let Some(strategy) = args.engine {
        config.engine.strategy = strategy;
    }
    if let Some(variant) = args.variant {
        config.normalizer.variant = variant;
    }

    let api_key = resolve_api_key(config, args.api_key.clone())?;
    let engine = engine::from_config(config, api_key.as_deref())?;
    Ok(Session::new(engine, config.normalizer.variant))
}

async fn load_into(session: &mut Session, file: &Path) -> Result<()> {
    let chars = session
        .load_document(file)
        .await
        .with_context(|| format!("Failed to load document: {}", file.display()))?;
    println!("Document loaded and text extracted ({} characters).", chars);
    Ok(())
}

/// Ask through the session with a spinner while the engine works
async fn ask_with_spinner(session: &mut Session, question: &str) -> Result<docquery::AnswerResult<String>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Asking {}...", session.engine().name()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = session.ask(question).await;
    spinner.finish_and_clear();
    Ok(result)
}

async fn save_transcript(session: &Session, path: &Path) -> Result<()> {
    session
        .save(path)
        .await
        .with_context(|| format!("Failed to save transcript: {}", path.display()))?;
    println!("Output saved to {}", path.display());
    Ok(())
}

async fn run_chat(session: &mut Session, save: Option<PathBuf>) -> Result<()> {
    use dialoguer::{Confirm, Input};

    println!("{}: {}", ASSISTANT_LABEL, GREETING);
    println!("Commands: :load <file>, :save <file>, :quit");

    loop {
        let line = match Input::<String>::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(_) => break, // stdin closed
        };
        let line = line.trim();

        if let Some(command) = line.strip_prefix(':') {
            let (name, arg) = command
                .split_once(char::is_whitespace)
                .map(|(n, a)| (n, a.trim()))
                .unwrap_or((command, ""));
            match name {
                "q" | "quit" | "exit" => break,
                "load" if !arg.is_empty() => {
                    if let Err(e) = load_into(session, Path::new(arg)).await {
                        eprintln!("Error: {:#}", e);
                    }
                }
                "save" if !arg.is_empty() => {
                    if let Err(e) = save_transcript(session, Path::new(arg)).await {
                        eprintln!("Error: {:#}", e);
                    }
                }
                _ => eprintln!("Commands: :load <file>, :save <file>, :quit"),
            }
            continue;
        }

        match ask_with_spinner(session, line).await? {
            Ok(answer) => println!("{}: {}\n", ASSISTANT_LABEL, answer),
            Err(e) => eprintln!("Error: {}\n", e),
        }
    }

    if let Some(path) = save {
        return save_transcript(session, &path).await;
    }

    if !session.transcript().is_empty() {
        let wants_save = Confirm::new()
            .with_prompt("Save transcript?")
            .default(false)
            .interact()
            .unwrap_or(false);
        if wants_save {
            let path = Input::<String>::new()
                .with_prompt("Save to")
                .default("transcript.txt".to_string())
                .interact_text()
                .context("Failed to read user input")?;
            save_transcript(session, Path::new(&path)).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract { file, variant, raw } => {
            let text = docquery::extract_path(&file)
                .await
                .with_context(|| format!("Failed to extract text: {}", file.display()))?;
            if raw {
                println!("{}", text);
            } else {
                let variant = variant.unwrap_or(config.normalizer.variant);
                println!("{}", normalize(&text, variant));
            }
        }
        Commands::Ask {
            file,
            question,
            session: args,
        } => {
            let mut session = build_session(&mut config, &args)?;
            load_into(&mut session, &file).await?;

            let question = question.join(" ");
            let result = ask_with_spinner(&mut session, &question).await?;

            if let Some(path) = &args.save {
                save_transcript(&session, path).await?;
            }

            let answer = result?;
            println!("{}: {}", ASSISTANT_LABEL, answer);
        }
        Commands::Chat {
            file,
            session: args,
        } => {
            let mut session = build_session(&mut config, &args)?;
            load_into(&mut session, &file).await?;
            run_chat(&mut session, args.save).await?;
        }
    }

    Ok(())
}

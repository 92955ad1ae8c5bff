use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use promptforge_agent::Role;
use promptforge_core::{PipelineOutcome, PipelineRunner, StageType};
use promptforge_llm::OpenAiClient;
use promptforge_logging::{init_tracing, LogFormat, Logger};

mod config;

use config::ForgeConfig;

#[derive(Parser, Debug)]
#[command(
    name = "promptforge",
    about = "Three-stage prompt refinement pipeline",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refine a prompt through the critic, refiner, and evaluator stages
    Refine {
        /// Prompt text (or reads from the prompt file if not provided)
        prompt: Option<String>,

        /// Professional role the prompt targets
        #[arg(short, long, default_value = "webdev")]
        role: String,

        /// Path to a prompt file used when no prompt argument is given
        #[arg(long, default_value = "prompt.md")]
        prompt_file: PathBuf,

        /// Single-call refinement that skips the staged pipeline
        #[arg(long)]
        direct: bool,

        /// Output the full outcome as JSON
        #[arg(long)]
        json_output: bool,

        /// Log output format
        #[arg(long, value_enum, default_value = "pretty")]
        log_format: LogFormatChoice,

        /// Model to use, overriding the config file
        #[arg(short, long)]
        model: Option<String>,

        /// Correlation id for this run (random if not provided)
        #[arg(long)]
        correlation_id: Option<String>,

        /// Explicit config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the supported roles
    Roles,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Roles => {
            print_roles();
            Ok(())
        }
        Command::Refine {
            prompt,
            role,
            prompt_file,
            direct,
            json_output,
            log_format,
            model,
            correlation_id,
            config,
        } => {
            refine(RefineArgs {
                prompt,
                role,
                prompt_file,
                direct,
                json_output,
                log_format: log_format.into(),
                model,
                correlation_id,
                config,
            })
            .await
        }
    }
}

struct RefineArgs {
    prompt: Option<String>,
    role: String,
    prompt_file: PathBuf,
    direct: bool,
    json_output: bool,
    log_format: LogFormat,
    model: Option<String>,
    correlation_id: Option<String>,
    config: Option<PathBuf>,
}

async fn refine(args: RefineArgs) -> Result<()> {
    init_tracing("warn", args.log_format);

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let forge_config = match args.config {
        Some(ref path) => ForgeConfig::load_file(path)?,
        None => ForgeConfig::load(&working_dir)?.unwrap_or_default(),
    };

    let prompt = resolve_prompt(args.prompt.as_deref(), &args.prompt_file)?;
    let model = args
        .model
        .unwrap_or_else(|| forge_config.model().to_string());
    let api_key = api_key_from_env()?;

    let client = Arc::new(OpenAiClient::with_timeout(
        forge_config.base_url(),
        api_key,
        forge_config.timeout(),
    ));
    let runner = PipelineRunner::new(client, model)
        .with_profiles(forge_config.stage_profiles())
        .with_logger(Arc::new(Logger::new(args.log_format)));

    if args.direct {
        let role: Role = args
            .role
            .parse()
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        let refined = runner
            .run_direct(&prompt, role)
            .await
            .context("Direct refinement failed")?;
        println!("{refined}");
        return Ok(());
    }

    let correlation_id = args
        .correlation_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let outcome = runner
        .run_for_role_id(&prompt, &args.role, &correlation_id)
        .await;

    if args.json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    std::process::exit(outcome.exit_code());
}

fn resolve_prompt(arg: Option<&str>, prompt_file: &PathBuf) -> Result<String> {
    if let Some(prompt) = arg {
        return Ok(prompt.to_string());
    }
    if prompt_file.exists() {
        let content = std::fs::read_to_string(prompt_file)
            .with_context(|| format!("Failed to read {}", prompt_file.display()))?;
        return Ok(content.trim().to_string());
    }
    anyhow::bail!(
        "No prompt provided. Pass it as an argument or create {}",
        prompt_file.display()
    )
}

fn api_key_from_env() -> Result<String> {
    std::env::var("PROMPTFORGE_API_KEY")
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .context("Set PROMPTFORGE_API_KEY or OPENAI_API_KEY in the environment")
}

fn print_roles() {
    for role in Role::ALL {
        println!("{:<10} {}", role.id(), role.display_name());
    }
}

fn print_outcome(outcome: &PipelineOutcome) {
    for message in &outcome.messages {
        let label = match message.stage {
            StageType::Critique => "CRITIQUE".bright_magenta(),
            StageType::Refinement => "REFINEMENT".bright_cyan(),
            StageType::Evaluation => "EVALUATION".bright_yellow(),
            StageType::Error => "ERROR".bright_red(),
        };
        eprintln!();
        eprintln!(
            "{} {}",
            label.bold(),
            format!("(confidence {:.0}%)", message.metadata.confidence * 100.0).dimmed()
        );
        eprintln!("{}", message.content);
        if !message.metadata.suggestions.is_empty() {
            eprintln!("{}", "Suggestions:".dimmed());
            for suggestion in &message.metadata.suggestions {
                eprintln!("  - {suggestion}");
            }
        }
    }

    eprintln!();
    if outcome.success {
        eprintln!("{}", "=== REFINED PROMPT ===".bright_green().bold());
    } else {
        if let Some(ref error) = outcome.error {
            eprintln!("{} {}", "Pipeline failed:".bright_red().bold(), error);
        }
        eprintln!("{}", "=== ORIGINAL PROMPT ===".bright_red().bold());
    }
    // The usable prompt goes to stdout so it can be piped
    println!("{}", outcome.final_prompt);
}

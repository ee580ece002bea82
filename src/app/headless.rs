//! Subcommands that run without the TUI.
//!
//! `generate` starts from the saved form, applies command-line overrides,
//! saves the result back, and blocks until the request ends. The helper
//! subcommands call their endpoint once and print the answer.
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use ac_base::agents::{AgentCatalog, AgentCategory, AgentName, InputField};
use ac_base::config::Settings;
use ac_base::config::constants::{GENERATE_TIMEOUT_SECS, SNAPSHOT_FILE};
use ac_base::console::{ConsoleLog, LogLevel};
use ac_base::error::{SubmitError, ValidationError};
use ac_base::form::FormState;
use ac_mod_api::{ActionBackend, AdminClient, Backend, GenerationResult, HelperAction, SubmissionController, SubmitOutcome, SubmitStart};

use crate::state::persistence::SnapshotStore;

pub const USAGE: &str = "\
Usage: agent-console [COMMAND]

Commands:
  (none)                      Interactive console
  generate [OPTIONS]          Submit the saved form, with overrides
      --agent-type <TYPE>       blog_researcher_ai_agent | blog_artist_ai_agent
      --agent-name <NAME>       topic_researcher | topic_engineer | prompt_artist | random_prompt_artist
      --topic <TEXT>
      --image-prompt <TEXT>
      --webhook-url <URL>
      --chaos <0-100>
  deploy [FILENAME]           Deploy a generated post (default: last result)
  voice [FILENAME]            Generate a voice-over (default: last result)
  start-server <COMMAND>      Ask the backend to launch a server command
  run-ngrok                   Start the NGROK tunnel
  run-midjourney              Start the Midjourney webhook server
  help                        Show this message";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),
    #[error("Missing value for {0}")]
    MissingValue(String),
    #[error("Missing operand for {0}")]
    MissingOperand(&'static str),
    #[error("{0}")]
    InvalidValue(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateArgs {
    pub agent_type: Option<AgentCategory>,
    pub agent_name: Option<AgentName>,
    pub topic: Option<String>,
    pub image_prompt: Option<String>,
    pub webhook_url: Option<String>,
    pub chaos: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tui,
    Help,
    Generate(GenerateArgs),
    Deploy(Option<String>),
    Voice(Option<String>),
    StartServer(String),
    RunNgrok,
    RunMidjourney,
}

/// Parse everything after the program name.
pub fn parse_args(args: &[String]) -> Result<Command, UsageError> {
    let Some(first) = args.first() else {
        return Ok(Command::Tui);
    };
    let rest = &args[1..];
    match first.as_str() {
        "help" | "-h" | "--help" => Ok(Command::Help),
        "generate" => parse_generate(rest).map(Command::Generate),
        "deploy" => Ok(Command::Deploy(single_optional(rest)?)),
        "voice" => Ok(Command::Voice(single_optional(rest)?)),
        "start-server" => {
            if rest.is_empty() {
                return Err(UsageError::MissingOperand("start-server"));
            }
            // Allow the command unquoted: `start-server ngrok http 9119`
            Ok(Command::StartServer(rest.join(" ")))
        }
        "run-ngrok" => no_operands(rest).map(|_| Command::RunNgrok),
        "run-midjourney" => no_operands(rest).map(|_| Command::RunMidjourney),
        other => Err(UsageError::UnknownArgument(other.to_string())),
    }
}

fn parse_generate(args: &[String]) -> Result<GenerateArgs, UsageError> {
    let mut out = GenerateArgs::default();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = || {
            args.get(i + 1)
                .filter(|v| !v.starts_with("--"))
                .cloned()
                .ok_or_else(|| UsageError::MissingValue(flag.to_string()))
        };
        match flag {
            "--agent-type" => out.agent_type = Some(value()?.parse().map_err(UsageError::InvalidValue)?),
            "--agent-name" => out.agent_name = Some(value()?.parse().map_err(UsageError::InvalidValue)?),
            "--topic" => out.topic = Some(value()?),
            "--image-prompt" => out.image_prompt = Some(value()?),
            "--webhook-url" => out.webhook_url = Some(value()?),
            "--chaos" => out.chaos = Some(value()?),
            _ => return Err(UsageError::UnknownArgument(flag.to_string())),
        }
        i += 2;
    }
    Ok(out)
}

fn single_optional(args: &[String]) -> Result<Option<String>, UsageError> {
    match args {
        [] => Ok(None),
        [one] => Ok(Some(one.clone())),
        [_, extra, ..] => Err(UsageError::UnknownArgument(extra.clone())),
    }
}

fn no_operands(args: &[String]) -> Result<(), UsageError> {
    match args.first() {
        None => Ok(()),
        Some(extra) => Err(UsageError::UnknownArgument(extra.clone())),
    }
}

/// Apply overrides in the same order the UI would: category, then name,
/// then field values.
pub fn apply_overrides(form: &mut FormState, catalog: &AgentCatalog, args: &GenerateArgs) -> Result<(), ValidationError> {
    let category = args.agent_type.or(args.agent_name.map(|n| n.category()));
    if let Some(category) = category
        && category != form.category()
    {
        form.select_category(catalog, category);
    }
    if let Some(name) = args.agent_name
        && !form.select_name(name)
    {
        return Err(ValidationError::NameNotInCategory { category: form.category(), name });
    }

    let values = [
        (InputField::Topic, &args.topic),
        (InputField::ImagePrompt, &args.image_prompt),
        (InputField::WebhookUrl, &args.webhook_url),
        (InputField::ChaosPercentage, &args.chaos),
    ];
    for (field, value) in values {
        if let Some(value) = value {
            form.set_value(field, value.clone());
        }
    }
    Ok(())
}

/// Print a console entry as it is logged.
fn echo(log: &mut ConsoleLog, level: LogLevel, message: impl Into<String>) {
    log.push(level, message);
    if let Some(entry) = log.last() {
        let line = entry.render();
        match level {
            LogLevel::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
        let _ = io::stdout().flush();
    }
}

/// Submit the saved form with `args` applied and wait for the outcome.
pub fn run_generate(
    backend: Arc<dyn Backend>,
    timeout: Duration,
    catalog: &AgentCatalog,
    store: &SnapshotStore,
    args: &GenerateArgs,
    log: &mut ConsoleLog,
) -> Result<GenerationResult, SubmitError> {
    let mut form = match store.load() {
        Some(snapshot) => FormState::rehydrate(catalog, &snapshot),
        None => FormState::new(catalog),
    };
    let applied = apply_overrides(&mut form, catalog, args);
    form.set_last_result(None);
    store.save(&form.snapshot());

    echo(log, LogLevel::Info, "Starting post generation...");
    echo(log, LogLevel::Info, format!("Agent Type: {}", form.category()));
    echo(log, LogLevel::Info, format!("Agent Name: {}", form.name()));
    if let Err(e) = applied {
        echo(log, LogLevel::Error, format!("Error: {}", e));
        return Err(e.into());
    }

    let mut controller = SubmissionController::new(backend, timeout);
    let outcome = match controller.submit(&form) {
        SubmitStart::Sent(_) => {
            echo(log, LogLevel::Info, "Sending request to server...");
            controller.wait()
        }
        SubmitStart::Finished(outcome) => Some(outcome),
        SubmitStart::Ignored => None,
    };

    match outcome {
        Some(SubmitOutcome::Succeeded(result)) => {
            echo(log, LogLevel::Info, "Response received from server...");
            echo(log, LogLevel::Success, result.summary());
            if let Some(url) = &result.blog_url {
                echo(log, LogLevel::Info, format!("Blog URL generated: {}", url));
            }
            form.set_last_result(result.identifier().map(str::to_string));
            store.save(&form.snapshot());
            Ok(result)
        }
        Some(SubmitOutcome::Failed(e)) => {
            if matches!(e, SubmitError::ServerReported(_)) {
                echo(log, LogLevel::Info, "Response received from server...");
            }
            echo(log, LogLevel::Error, format!("Error: {}", e));
            Err(e)
        }
        None => Err(SubmitError::ServerReported("No outcome from submission".to_string())),
    }
}

/// Run one helper action synchronously. Returns the process exit code.
pub fn run_action(backend: &dyn ActionBackend, action: HelperAction, log: &mut ConsoleLog) -> i32 {
    echo(log, LogLevel::Info, format!("{}...", action.label()));
    match backend.perform(&action) {
        Ok(message) => {
            echo(log, LogLevel::Success, message);
            0
        }
        Err(e) => {
            echo(log, LogLevel::Error, format!("Error: {}", e));
            1
        }
    }
}

/// Dispatch a non-interactive command. Returns the process exit code.
pub fn run(command: Command, settings: &Settings, store_dir: &Path) -> i32 {
    let store = SnapshotStore::new(store_dir.join(SNAPSHOT_FILE));
    let client = match AdminClient::new(&settings.base_url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Cannot create HTTP client: {}", e);
            return 1;
        }
    };
    let mut log = ConsoleLog::new();
    let last_result = || store.load().and_then(|s| s.filename);

    let action = match command {
        Command::Tui | Command::Help => return 0,
        Command::Generate(args) => {
            let timeout = Duration::from_secs(GENERATE_TIMEOUT_SECS);
            let result = run_generate(Arc::new(client), timeout, &settings.catalog(), &store, &args, &mut log);
            return if result.is_ok() { 0 } else { 1 };
        }
        Command::Deploy(filename) => HelperAction::deploy(filename.or_else(last_result).as_deref()),
        Command::Voice(filename) => HelperAction::generate_voice(filename.or_else(last_result).as_deref()),
        Command::StartServer(command) => Ok(HelperAction::StartServer { label: command.clone(), command }),
        Command::RunNgrok => Ok(HelperAction::RunNgrok),
        Command::RunMidjourney => Ok(HelperAction::RunMidjourney),
    };

    match action {
        Ok(action) => run_action(&client, action, &mut log),
        Err(e) => {
            echo(&mut log, LogLevel::Error, format!("Error: {}", e));
            1
        }
    }
}

// atcomplete CLI - find the active trigger region in text and the token to complete

mod exit_codes;
mod input;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use atcomplete_config::{ConfigError, Settings};
use atcomplete_engine::query::analyze_query_with;
use atcomplete_engine::{Grammar, TriggerSet};

use exit_codes::{EXIT_CONFIG, EXIT_IO, EXIT_NO_MATCH, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "atc")]
#[command(about = "Find the @-mention or @(formula) being typed at the end of text")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Settings file (default: ~/.config/atcomplete/settings.json, or $ATCOMPLETE_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log matcher decisions to stderr (overrides RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct TextArgs {
    /// Text up to the caret (omit to read stdin)
    text: Option<String>,

    /// Trigger character. Repeatable; defaults to trigger.chars from settings
    #[arg(long, short = 't', value_name = "CHAR")]
    trigger: Vec<char>,

    /// Keep the final line ending of stdin input
    #[arg(long)]
    raw: bool,

    /// Print a single JSON object
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the candidate after the active trigger (exit 1 if none)
    #[command(after_help = "\
Examples:
  atc match 'Hi @contact.na'
  atc match 'Total @(SUM(contact.age, ' --json
  echo 'Hi @@contact' | atc match          # escaped, exit 1
  atc match -t @ -t '#' 'see #tag'")]
    Match {
        #[command(flatten)]
        args: TextArgs,
    },

    /// Print the identifier being completed inside a matched candidate
    #[command(after_help = "\
Examples:
  atc query contact.age                    # contact.age
  atc query '(SUM(contact.age, step.ca'    # step.ca
  atc query '(SUM(contact.age)'            # SUM")]
    Query {
        /// Candidate as printed by `atc match`
        candidate: String,

        /// Print a single JSON object
        #[arg(long)]
        json: bool,
    },

    /// Match and extract the query in one step (exit 1 if no match)
    Complete {
        #[command(flatten)]
        args: TextArgs,
    },

    /// Settings file location and effective values
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the settings file path
    Path,
    /// Print the effective settings as JSON
    Show,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  atcomplete-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
        "\ncontract_version(json): 1",
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: atc <command> [options]");
            eprintln!("       atc --help for more information");
            Ok(())
        }
        Some(Commands::Match { args }) => cmd_match(cli.config.as_deref(), args),
        Some(Commands::Query { candidate, json }) => cmd_query(cli.config.as_deref(), candidate, json),
        Some(Commands::Complete { args }) => cmd_complete(cli.config.as_deref(), args),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => cmd_config_path(cli.config.as_deref()),
            ConfigCommands::Show => cmd_config_show(cli.config.as_deref()),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // log records from the library crates are bridged by tracing-log
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError, path: &Path) -> Self {
        Self {
            code: EXIT_CONFIG,
            message: format!("{}: {}", path.display(), err),
            hint: Some("run `atc config path` to see which settings file is used".to_string()),
        }
    }

    /// Not a failure: nothing to print, just a non-zero exit.
    pub fn no_match() -> Self {
        Self { code: EXIT_NO_MATCH, message: String::new(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// settings
// ============================================================================

/// An explicit --config must exist and be valid; the default location falls back.
fn load_settings(config: Option<&Path>) -> Result<Settings, CliError> {
    match config {
        Some(path) => Settings::load_from(path).map_err(|e| CliError::config(e, path)),
        None => Ok(Settings::load()),
    }
}

fn trigger_set(settings: &Settings, overrides: &[char]) -> Result<TriggerSet, CliError> {
    let mut effective = settings.clone();
    if !overrides.is_empty() {
        effective.trigger_chars = overrides.to_vec();
        effective.validate().map_err(|e| {
            CliError::args(e.to_string()).with_hint("triggers must be punctuation such as @, # or $")
        })?;
    }

    log::debug!(
        "triggers {:?}, formula opens with {:?}",
        effective.trigger_chars,
        effective.formula_open
    );

    Ok(TriggerSet::new(effective.trigger_chars.iter().copied())
        .with_grammar(Grammar::new(effective.formula_open)))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string(value).map_err(|e| CliError::io(e.to_string()))?;
    println_out(&json)
}

fn println_out(line: &str) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", line).map_err(|e| CliError::io(e.to_string()))
}

/// `{"matched": false}` or `{"matched": true, ...fields}`
#[derive(Serialize)]
struct MatchedOutput<'a, T: Serialize> {
    matched: bool,
    #[serde(flatten)]
    result: Option<&'a T>,
}

// ============================================================================
// match / complete
// ============================================================================

fn cmd_match(config: Option<&Path>, args: TextArgs) -> Result<(), CliError> {
    let settings = load_settings(config)?;
    let set = trigger_set(&settings, &args.trigger)?;
    let text = input::read_text(args.text, args.raw || settings.keep_trailing_newline)?;

    let found = set.find(&text);

    if args.json {
        print_json(&MatchedOutput { matched: found.is_some(), result: found.as_ref() })?;
    } else if let Some(m) = &found {
        println_out(&m.candidate)?;
    }

    match found {
        Some(_) => Ok(()),
        None => Err(CliError::no_match()),
    }
}

fn cmd_complete(config: Option<&Path>, args: TextArgs) -> Result<(), CliError> {
    let settings = load_settings(config)?;
    let set = trigger_set(&settings, &args.trigger)?;
    let text = input::read_text(args.text, args.raw || settings.keep_trailing_newline)?;

    let completion = set.complete(&text);

    if args.json {
        print_json(&MatchedOutput { matched: completion.is_some(), result: completion.as_ref() })?;
    } else if let Some(c) = &completion {
        println_out(c.query())?;
    }

    match completion {
        Some(_) => Ok(()),
        None => Err(CliError::no_match()),
    }
}

// ============================================================================
// query
// ============================================================================

fn cmd_query(config: Option<&Path>, candidate: String, json: bool) -> Result<(), CliError> {
    let settings = load_settings(config)?;
    let ctx = analyze_query_with(settings.formula_open, &candidate);

    if json {
        print_json(&ctx)
    } else {
        println_out(&ctx.query)
    }
}

// ============================================================================
// config
// ============================================================================

fn cmd_config_path(config: Option<&Path>) -> Result<(), CliError> {
    match config {
        Some(path) => println_out(&path.to_string_lossy()),
        None => println_out(&Settings::config_path_display()),
    }
}

fn cmd_config_show(config: Option<&Path>) -> Result<(), CliError> {
    let settings = load_settings(config)?;
    let json = serde_json::to_string_pretty(&settings).map_err(|e| CliError::io(e.to_string()))?;
    println_out(&json)
}

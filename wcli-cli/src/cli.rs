use std::{
    io::{self, IsTerminal, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, bail};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, error::ErrorKind};
use tracing::{debug, info};
use wcli_core::{
    CredentialStore, Credentials, WeatherClient, WeatherResponse,
    config::{self, CREDENTIAL_KEYS, DEFAULT_CREDENTIALS_FILE},
    render,
};

pub const UNKNOWN_ARGUMENT: &str = "Unknown argument. Use 'wcli help' for a list of commands.";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wcli", version, about = "A simple CLI weather app.", disable_help_subcommand = true)]
pub struct Cli {
    /// Credentials file written by `setup` and read by the other commands.
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_CREDENTIALS_FILE)]
    pub env_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Words after the command name. Only the first word selects the command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct TrailingArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub rest: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Configure your location and API key
    Setup(TrailingArgs),
    /// Show current weather info
    Current(TrailingArgs),
    /// Show the temperature for each forecast day
    Daily(TrailingArgs),
    /// Print the unmodified provider response
    Raw(TrailingArgs),
    /// Display this help message
    Help(TrailingArgs),
}

impl Command {
    pub fn trailing(&self) -> &TrailingArgs {
        let (Command::Setup(args)
        | Command::Current(args)
        | Command::Daily(args)
        | Command::Raw(args)
        | Command::Help(args)) = self;
        args
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let stdout = io::stdout();
        self.run_with(&mut stdout.lock()).await
    }

    /// Run the selected command, writing everything user-facing to `out`.
    pub async fn run_with<W: Write>(self, out: &mut W) -> anyhow::Result<()> {
        let Some(command) = self.command else {
            write!(out, "{}", usage())?;
            bail!("no arguments provided");
        };
        info!(?command, "running command");

        let ignored = &command.trailing().rest;
        if !ignored.is_empty() {
            debug!(?ignored, "ignoring arguments after the command");
        }

        let store = CredentialStore::new(self.env_file);

        match command {
            Command::Setup(_) => setup(&store, out)?,
            Command::Current(_) => {
                let resp = fetch(&store).await?;
                render::render_today(&resp, out)?;
            }
            Command::Daily(_) => {
                let resp = fetch(&store).await?;
                render::render_daily(&resp, out)?;
            }
            Command::Raw(_) => {
                let credentials = store.read()?;
                let body = WeatherClient::new().fetch_raw(&credentials).await?;
                writeln!(out, "{body}")?;
            }
            Command::Help(_) => write!(out, "{}", usage())?,
        }

        Ok(())
    }
}

/// Exit status for arguments clap rejected: 0 for `--help`/`--version`, 1 otherwise.
pub fn parse_failure_status(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Report a rejected command line. Unknown commands never reach the credential
/// file or the network.
pub fn report_parse_failure(err: clap::Error) -> ExitCode {
    let status = parse_failure_status(&err);
    let printed = if status == 0 {
        err.print()
    } else {
        writeln!(io::stdout(), "{UNKNOWN_ARGUMENT}")
    };

    match printed {
        Ok(()) => ExitCode::from(status),
        Err(_) => ExitCode::FAILURE,
    }
}

/// Usage text with one row per subcommand, in declaration order.
pub fn usage() -> String {
    let cmd = Cli::command();

    let mut text = format!("\nUsage: {} <command>\n", cmd.get_name());
    if let Some(about) = cmd.get_about() {
        text.push_str(&format!("{about}\n"));
    }
    text.push_str("USAGE:\n");

    for sub in cmd.get_subcommands() {
        let about = sub.get_about().map(ToString::to_string).unwrap_or_default();
        text.push_str(&format!("  {:<10} {about}\n", sub.get_name()));
    }
    text.push('\n');

    text
}

async fn fetch(store: &CredentialStore) -> anyhow::Result<WeatherResponse> {
    let credentials = store.read()?;
    Ok(WeatherClient::new().fetch(&credentials).await?)
}

fn setup<W: Write>(store: &CredentialStore, out: &mut W) -> anyhow::Result<()> {
    let credentials = if io::stdin().is_terminal() {
        prompt_interactive()?
    } else {
        config::prompt_credentials(io::stdin().lock(), &mut *out)?
    };

    store.write(&credentials)?;
    writeln!(out, "{} file created successfully.", store.path().display())?;

    Ok(())
}

fn prompt_interactive() -> anyhow::Result<Credentials> {
    let mut answers = Vec::with_capacity(CREDENTIAL_KEYS.len());

    for key in CREDENTIAL_KEYS {
        let message = format!("Enter {key}:");
        let answer = inquire::Text::new(&message)
            .prompt()
            .with_context(|| format!("Failed to read {key}"))?;
        answers.push(answer);
    }

    Ok(Credentials::from_input(&answers[0], &answers[1], &answers[2]))
}

//! Shtag CLI - run a `{}` command template through `/bin/sh`
//!
//! stdout carries the command's (decoded, trimmed) output; logs and errors
//! go to stderr.

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shtag_core::domain::{OutputMode, Payload, RunnerConfig, RunnerOptions, Template};
use shtag_core::{CommandOutput, ShellError, ShellRunner};
use shtag_infra_system::shell_executor::SHELL_ENV_VAR;
use shtag_infra_system::{ShellExecutor, DEFAULT_SHELL};

const DEFAULT_LOG_FILTER: &str = "shtag=warn,shtag_core=warn,shtag_infra_system=warn";

#[derive(Parser)]
#[command(name = "shtag")]
#[command(about = "Run shell command templates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a template and run it
    ///
    /// Each `{}` in PATTERN is replaced, in order, by the next --arg value.
    /// Values are NOT quoted: the shell expands them.
    Run {
        /// Command pattern with `{}` placeholders
        pattern: String,

        /// Value for the next `{}` placeholder
        #[arg(short, long = "arg", value_name = "VALUE")]
        args: Vec<String>,

        /// Text written to the command's stdin
        #[arg(long, conflicts_with = "input_file")]
        input: Option<String>,

        /// File whose bytes are written to the command's stdin
        #[arg(long, value_name = "PATH")]
        input_file: Option<PathBuf>,

        #[command(flatten)]
        runner: RunnerArgs,
    },

    /// Print the configuration a run would use
    Config {
        #[command(flatten)]
        runner: RunnerArgs,
    },
}

#[derive(Args)]
struct RunnerArgs {
    /// JSON options record ({"ignoreExitCode", "encoding", "trim"}); flags override it
    #[arg(long, value_name = "PATH")]
    options: Option<PathBuf>,

    /// Return stdout even when the command exits non-zero
    ///
    /// From the environment, anything but an empty value, `0`, `false`,
    /// `no`, `n` or `off` turns it on.
    #[arg(
        long,
        env = "SHTAG_IGNORE_EXIT_CODE",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    ignore_exit_code: bool,

    /// Output decoder label (any WHATWG label: utf-8, latin1, shift_jis, ...)
    #[arg(long, env = "SHTAG_ENCODING", conflicts_with = "raw")]
    encoding: Option<String>,

    /// Write stdout bytes unchanged (no decoding, no trimming)
    #[arg(long)]
    raw: bool,

    /// Keep leading/trailing whitespace
    #[arg(long)]
    no_trim: bool,

    /// Shell binary
    #[arg(long, env = SHELL_ENV_VAR, default_value = DEFAULT_SHELL)]
    shell: PathBuf,
}

impl RunnerArgs {
    fn options(&self) -> Result<RunnerOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read options file {}", path.display()))?;
                RunnerOptions::from_json(&json)?
            }
            None => RunnerOptions::default(),
        };

        if self.ignore_exit_code {
            options.ignore_exit_code = true;
        }
        if let Some(encoding) = &self.encoding {
            options.encoding = Some(encoding.clone());
        }
        if self.raw {
            options = options.without_encoding().with_trim(false);
        }
        if self.no_trim {
            options.trim = false;
        }

        Ok(options)
    }

    fn runner(&self) -> Result<ShellRunner> {
        let executor = Arc::new(ShellExecutor::new(&self.shell));
        Ok(ShellRunner::configure(&self.options()?, executor)?)
    }
}

fn init_logging() {
    let log_format = std::env::var("SHTAG_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn read_payload(input: Option<String>, input_file: Option<PathBuf>) -> Result<Option<Payload>> {
    if let Some(text) = input {
        return Ok(Some(Payload::Text(text)));
    }
    match input_file {
        Some(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read input file {}", path.display()))?;
            Ok(Some(Payload::Bytes(bytes)))
        }
        None => Ok(None),
    }
}

/// Write a run's result; a newline is added only to trimmed text, so
/// untrimmed and raw output reach stdout byte-for-byte
fn write_output(out: &mut impl Write, output: CommandOutput, mode: OutputMode) -> Result<()> {
    match (output, mode) {
        (CommandOutput::Text(text), OutputMode::Text { trim: true, .. }) => {
            writeln!(out, "{}", text)?
        }
        (CommandOutput::Text(text), _) => out.write_all(text.as_bytes())?,
        (CommandOutput::Bytes(bytes), _) => out.write_all(&bytes)?,
    }
    out.flush()?;
    Ok(())
}

fn print_config(config: &RunnerConfig, shell: &std::path::Path) {
    println!("{}", "Runner Configuration".cyan().bold());
    println!();
    println!("  {} {}", "Shell:".bold(), shell.display());
    println!(
        "  {} {}",
        "Ignore exit code:".bold(),
        config.ignore_exit_code()
    );
    match config.output() {
        OutputMode::Raw => println!("  {} {}", "Output:".bold(), "raw bytes".yellow()),
        OutputMode::Text { encoding, trim } => {
            println!("  {} {}", "Encoding:".bold(), encoding);
            println!("  {} {}", "Trim:".bold(), trim);
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            pattern,
            args,
            input,
            input_file,
            runner,
        } => {
            let runner = runner.runner()?;
            let values: Vec<&dyn std::fmt::Display> =
                args.iter().map(|a| a as &dyn std::fmt::Display).collect();
            let template = Template::from_pattern(&pattern, &values)?;

            let output = match read_payload(input, input_file)? {
                Some(payload) => runner.with_input(payload).run_template(&template).await?,
                None => runner.run_template(&template).await?,
            };

            write_output(&mut std::io::stdout().lock(), output, runner.config().output())?;
        }

        Commands::Config { runner: args } => {
            let runner = args.runner()?;
            print_config(runner.config(), &args.shell);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "✗".red().bold(), err);

            // mirror the child's status when that is what failed
            let code = err
                .downcast_ref::<ShellError>()
                .and_then(ShellError::exit_code)
                .and_then(|code| u8::try_from(code).ok())
                .filter(|code| *code != 0)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

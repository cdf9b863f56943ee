//*** START FILE: src/main.rs ***//
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use configurator_rust_gui::color::table::{convert_hex_table, HEX_COLUMN};
use configurator_rust_gui::config::{self, Config, DEFAULT_CONFIG_FILE};
use configurator_rust_gui::error::Result;
use configurator_rust_gui::form::FormData;
use configurator_rust_gui::generator::uid::RandomUids;
use configurator_rust_gui::gui::app::run_gui;
use configurator_rust_gui::logging::init_logging;
use configurator_rust_gui::submit::Session;

const DEFAULT_FORM_FILE: &str = "configurator_form.toml";

#[derive(Parser, Debug)]
#[command(name = "configurator", version, about = "Builds product configurator JSON from a form")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the form window (default).
    Gui {
        /// Form file used by the Save Form / Load Form buttons.
        #[arg(long, default_value = DEFAULT_FORM_FILE)]
        form: PathBuf,
    },
    /// Generate the configurator JSON from a form file without opening a window.
    Generate {
        #[arg(long)]
        form: PathBuf,
        /// Overrides `output_file` from the configuration.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also print the document to stdout.
        #[arg(long)]
        print: bool,
    },
    /// Add an RGBA column to a semicolon CSV of hex colors.
    ConvertColors {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value = HEX_COLUMN)]
        column: String,
    },
    /// Write a starter form file.
    FormTemplate {
        #[arg(long, default_value = DEFAULT_FORM_FILE)]
        output: PathBuf,
    },
}

fn run_generate(config: Config, form_path: &Path, output: Option<PathBuf>, print: bool) -> Result<()> {
    let form = FormData::load(form_path)?;
    let output = output.unwrap_or_else(|| config.output_file.clone());
    let mut session = Session::open(config)?;
    let (document, report) = session.submit(&form, &output, RandomUids)?;

    if print {
        println!("{}", document.to_pretty_json()?);
    }
    println!(
        "JSON saved to {} ({} images, last_record = {})",
        report.output_file.display(),
        report.image_count,
        report.counter_value
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command.unwrap_or(Command::Gui {
        form: PathBuf::from(DEFAULT_FORM_FILE),
    }) {
        Command::Gui { form } => {
            let output = config.output_file.clone();
            let session = Session::open(config).map_err(|e| {
                tracing::error!("Error initializing application: {}", e);
                e.to_string()
            });
            if let Err(e) = run_gui(session, form, output) {
                tracing::error!("GUI terminated with an error: {}", e);
            }
            Ok(())
        }
        Command::Generate { form, output, print } => run_generate(config, &form, output, print),
        Command::ConvertColors { input, output, column } => {
            let rows = convert_hex_table(&input, &output, &column)?;
            println!("Processing complete. {} rows saved to {}", rows, output.display());
            Ok(())
        }
        Command::FormTemplate { output } => {
            FormData::template().save(&output)?;
            println!("Form template written to {}", output.display());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load_config_from_file(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading {}: {}", cli.config.display(), err);
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging(&config.log_file) {
        eprintln!("{}", err);
    }

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
//*** END FILE: src/main.rs ***//

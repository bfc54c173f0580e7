//! spellbook-markup: context queries, format commands and the directive
//! overlay from the command line, plus a terminal viewer.

mod view;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use spellbook_markup_config::Config;
use spellbook_markup_engine::{
    ContextAssembler, DirectiveTemplate, FormatEngine, FormatOutcome, FormatParams, Operation,
    Selection, highlight_spans, render_html,
};

/// Cursor-aware markup context and formatting for directive-flavoured Markdown.
#[derive(Parser)]
#[command(name = "spellbook-markup", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file [default: ~/.config/spellbook-markup/config.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the formatting context at a byte offset as JSON.
    Context {
        file: PathBuf,
        /// Selection start (byte offset).
        #[arg(long)]
        offset: usize,
        /// Selection end; defaults to `offset`.
        #[arg(long)]
        end: Option<usize>,
    },

    /// Apply a format command and print (or write) the result.
    Format {
        file: PathBuf,
        /// Operation name, e.g. bold, header2, orderedList, codeBlock, directive.
        #[arg(long)]
        op: String,
        #[arg(long)]
        start: usize,
        #[arg(long)]
        end: Option<usize>,
        /// Link or image target.
        #[arg(long)]
        url: Option<String>,
        /// Directive to insert, looked up in the configured catalog.
        #[arg(long)]
        directive: Option<String>,
        /// Write the result back to the file instead of printing it.
        #[arg(long)]
        write: bool,
        /// Print the new text and selection as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the directive highlight overlay.
    Highlight {
        file: PathBuf,
        /// Print the raw spans as JSON instead of HTML.
        #[arg(long)]
        spans: bool,
    },

    /// Open the terminal viewer.
    View { file: PathBuf },

    /// Show or create the configuration file.
    Config {
        /// Print the resolved configuration as JSON.
        #[arg(long)]
        show: bool,
        /// Write a default configuration file if none exists.
        #[arg(long)]
        init: bool,
    },

    /// List the format operation names.
    Operations,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The viewer owns the terminal; keep log output out of its way
    let level = match (&cli.command, cli.verbose) {
        (Commands::View { .. }, _) => LevelFilter::Warn,
        (_, 0) => LevelFilter::Info,
        (_, 1) => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Context { file, offset, end } => {
            cmd_context(&load_config(config_path)?, &file, offset, end)?
        }
        Commands::Format {
            file,
            op,
            start,
            end,
            url,
            directive,
            write,
            json,
        } => {
            let config = load_config(config_path)?;
            let params = format_params(&config, url, directive)?;
            let selection = Selection::new(start, end.unwrap_or(start));
            cmd_format(&config, &file, &op, selection, &params, write, json)?
        }
        Commands::Highlight { file, spans } => cmd_highlight(&file, spans)?,
        Commands::View { file } => view::run(&file, load_config(config_path)?)?,
        Commands::Config { show, init } => cmd_config(config_path, show, init)?,
        Commands::Operations => {
            for op in Operation::ALL {
                println!("{op}");
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(loaded.unwrap_or_else(|| {
        log::debug!("No config file found, using defaults");
        Config::default()
    }))
}

fn read_buffer(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn format_params(
    config: &Config,
    url: Option<String>,
    directive: Option<String>,
) -> Result<FormatParams> {
    let directive = match directive {
        Some(name) => {
            let catalog = config.directive_catalog()?;
            Some(match catalog.find(&name) {
                Some(template) => template.clone(),
                None => {
                    log::info!("Directive {name} is not in the catalog, inserting it bare");
                    DirectiveTemplate::new(name)
                }
            })
        }
        None => None,
    };

    Ok(FormatParams {
        url,
        last_directive: directive.clone(),
        directive,
    })
}

fn cmd_context(config: &Config, file: &Path, offset: usize, end: Option<usize>) -> Result<()> {
    let text = read_buffer(file)?;
    let assembler = ContextAssembler::new(config.context.clone());
    let ctx = assembler.context(&text, Selection::new(offset, end.unwrap_or(offset)));
    println!("{}", serde_json::to_string_pretty(&ctx)?);
    Ok(())
}

fn cmd_format(
    config: &Config,
    file: &Path,
    op: &str,
    selection: Selection,
    params: &FormatParams,
    write: bool,
    json: bool,
) -> Result<()> {
    let text = read_buffer(file)?;
    let engine = FormatEngine::new(config.format.clone());

    let edit = match engine.run(&text, selection, op, params) {
        FormatOutcome::Applied(edit) => edit,
        FormatOutcome::Declined { reason, .. } => bail!("{reason}"),
    };

    if write {
        std::fs::write(file, &edit.text)
            .with_context(|| format!("Failed to write {}", file.display()))?;
        log::info!(
            "Wrote {} (selection {}..{})",
            file.display(),
            edit.selection.start,
            edit.selection.end
        );
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&edit)?);
    } else if !write {
        print!("{}", edit.text);
    }
    Ok(())
}

fn cmd_highlight(file: &Path, spans: bool) -> Result<()> {
    let text = read_buffer(file)?;
    if spans {
        println!("{}", serde_json::to_string_pretty(&highlight_spans(&text))?);
    } else {
        println!("{}", render_html(&text));
    }
    Ok(())
}

fn cmd_config(config_path: Option<&Path>, show: bool, init: bool) -> Result<()> {
    let path = config_path.map_or_else(Config::config_path, Path::to_path_buf);

    if init {
        if path.exists() {
            println!("Configuration already exists at '{}'.", path.display());
        } else {
            match config_path {
                Some(path) => Config::default().save_to_path(path)?,
                None => Config::default().save()?,
            }
            println!("Wrote default configuration to '{}'.", path.display());
        }
    }

    let config = load_config(config_path)?;
    if show {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else if !init {
        println!("Configuration at '{}' is valid.", path.display());
    }
    Ok(())
}

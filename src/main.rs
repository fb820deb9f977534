use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use jotdown_parse::compile::CompileOptions;
use jotdown_parse::{IdNumbering, RenderOptions};
use std::path::PathBuf;

mod config;
mod render;

#[derive(Parser)]
#[command(name = "jotdown", version, about = "Compile jotdown markup into HTML pages")]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a jotdown.json config file (default: ./jotdown.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum PrintFormat {
    Html,
    Body,
    Css,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Numbering {
    Start,
    End,
}

impl From<Numbering> for IdNumbering {
    fn from(n: Numbering) -> Self {
        match n {
            Numbering::Start => IdNumbering::Start,
            Numbering::End => IdNumbering::End,
        }
    }
}

/// Page options shared by `render` and `print`.
#[derive(clap::Args)]
struct PageArgs {
    /// Value of the <html lang> attribute
    #[arg(long)]
    lang: Option<String>,

    /// Page <title>
    #[arg(long)]
    title: Option<String>,

    /// Which line numbers table and list anchors use
    #[arg(long, value_enum)]
    id_numbering: Option<Numbering>,
}

impl PageArgs {
    fn apply(&self, mut options: RenderOptions) -> RenderOptions {
        if let Some(lang) = &self.lang {
            options.language = lang.clone();
        }
        if let Some(title) = &self.title {
            options.title = title.clone();
        }
        if let Some(numbering) = self.id_numbering {
            options.id_numbering = numbering.into();
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile jotdown files (or directories of them) into HTML pages
    Render {
        /// Source files or directories
        #[arg(required = true)]
        inputs: Vec<String>,

        #[command(flatten)]
        page: PageArgs,

        /// Directory to write pages into (default: next to each source)
        #[arg(long)]
        out_dir: Option<String>,

        /// Write notes.html instead of notes.jd.html
        #[arg(long)]
        replace_extension: bool,

        /// Re-render whenever a source file changes
        #[arg(long)]
        watch: bool,
    },

    /// Render a single file to stdout
    Print {
        /// Path to the jotdown file
        file: String,

        #[command(flatten)]
        page: PageArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "html")]
        format: PrintFormat,
    },

    /// Report diagnostics for jotdown file(s)
    Check {
        /// Path to the jotdown file(s)
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Write a default jotdown.json
    Init {
        /// Directory to write into (default: current directory)
        path: Option<String>,

        /// Overwrite an existing jotdown.json
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Render {
            inputs,
            page,
            out_dir,
            replace_extension,
            watch,
        } => {
            let cfg = config::load_config(cli.config.as_deref(), &cwd)?;
            let options = CompileOptions {
                render: page.apply(cfg.render_options()),
                out_dir: out_dir.or(cfg.out_dir.clone()).map(PathBuf::from),
                replace_extension: replace_extension || cfg.replace_extension,
            };
            let files = render::collect_inputs(&inputs, &cfg.source_extension)?;
            render::handle_render(&files, &options, cli.quiet)?;
            if watch {
                render::watch_and_rebuild(&files, &options, cli.quiet)?;
            }
        }
        Commands::Print { file, page, format } => {
            let cfg = config::load_config(cli.config.as_deref(), &cwd)?;
            handle_print(&file, &page.apply(cfg.render_options()), format)?;
        }
        Commands::Check { files } => {
            handle_check(&files)?;
        }
        Commands::Init { path, force } => {
            let dir = path.map(PathBuf::from).unwrap_or(cwd);
            let written = config::write_default_config(&dir, force)?;
            if !cli.quiet {
                println!("  {} {}", "Created".green(), written.display());
            }
        }
    }

    Ok(())
}

fn handle_print(file: &str, options: &RenderOptions, format: PrintFormat) -> Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read '{}'", file))?;

    let result = jotdown_parse::parse_with(&content, options.id_numbering);
    render::print_diagnostics(
        file,
        result
            .diagnostics
            .iter()
            .filter(|d| d.severity != jotdown_parse::Severity::Info),
        true,
    );

    let output = match format {
        PrintFormat::Html => result.to_html_page(options),
        PrintFormat::Body => result.assemble().body,
        PrintFormat::Css => result.assemble().style,
        PrintFormat::Json => {
            let rendered = result.assemble();
            serde_json::to_string_pretty(&serde_json::json!({
                "elements": result.elements,
                "diagnostics": result.diagnostics,
                "body": rendered.body,
                "style": rendered.style,
            }))?
        }
    };

    println!("{output}");
    Ok(())
}

fn handle_check(files: &[String]) -> Result<()> {
    let mut has_errors = false;

    for file in files {
        let content =
            std::fs::read_to_string(file).with_context(|| format!("Failed to read '{}'", file))?;

        let result = jotdown_parse::parse(&content);
        has_errors |= result.has_errors();

        if result.diagnostics.is_empty() {
            println!("{}: {}", file, "OK".green());
        } else {
            render::print_diagnostics(file, &result.diagnostics, false);
        }
    }

    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}

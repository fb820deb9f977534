//! `jotdown render`: compile jotdown files into HTML pages.
//!
//! Inputs may be files or directories; directories are walked for files with
//! the configured source extension.

use anyhow::{Result, bail};
use colored::Colorize;
use jotdown_parse::compile::{CompileOptions, compile_file, output_path};
use jotdown_parse::{Diagnostic, Severity};
use notify::{EventKind, RecursiveMode, Watcher};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// A source file to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Directory of `path` relative to the walked input directory. Empty for
    /// files named directly. Reproduced under `--out-dir`.
    pub subdir: PathBuf,
}

impl SourceFile {
    /// Compile options for this file, with its subdirectory applied to `out_dir`.
    fn options(&self, base: &CompileOptions) -> CompileOptions {
        let mut options = base.clone();
        if let Some(dir) = &base.out_dir {
            options.out_dir = Some(dir.join(&self.subdir));
        }
        options
    }
}

/// Expand the command-line inputs into a sorted, de-duplicated file list.
pub fn collect_inputs(inputs: &[String], extension: &str) -> Result<Vec<SourceFile>> {
    let mut files = BTreeMap::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(true) {
                let entry = entry?;
                let matches_ext = entry
                    .path()
                    .extension()
                    .is_some_and(|e| e == extension);
                if !entry.file_type().is_file() || !matches_ext {
                    continue;
                }
                let subdir = entry
                    .path()
                    .parent()
                    .and_then(|p| p.strip_prefix(path).ok())
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                files.entry(entry.into_path()).or_insert(subdir);
            }
        } else {
            files.entry(path.to_path_buf()).or_insert_with(PathBuf::new);
        }
    }

    Ok(files
        .into_iter()
        .map(|(path, subdir)| SourceFile { path, subdir })
        .collect())
}

/// Compile every file, printing a line per output unless `quiet`.
///
/// A failing file is reported and skipped; the remaining files are still
/// rendered and the run fails at the end. Two sources that would write the
/// same output path count as a failure for the second one.
pub fn handle_render(files: &[SourceFile], options: &CompileOptions, quiet: bool) -> Result<()> {
    if files.is_empty() {
        log::warn!("no input files to render");
    }

    let mut written: BTreeMap<PathBuf, &Path> = BTreeMap::new();
    let mut failed = 0;

    for file in files {
        let file_options = file.options(options);
        let output = output_path(&file.path, &file_options);
        if let Some(first) = written.get(&output) {
            failed += 1;
            log::error!("duplicate output path {}", output.display());
            eprintln!(
                "{} {} and {} both render to {}",
                "Render error:".red().bold(),
                first.display(),
                file.path.display(),
                output.display()
            );
            continue;
        }

        let report = match compile_file(&file.path, &file_options) {
            Ok(report) => report,
            Err(e) => {
                failed += 1;
                log::error!("{e}");
                eprintln!("{} {}", "Render error:".red().bold(), e);
                continue;
            }
        };
        written.insert(report.output.clone(), file.path.as_path());

        let reportable: Vec<&Diagnostic> = report
            .diagnostics
            .iter()
            .filter(|d| d.severity != Severity::Info)
            .collect();
        if !quiet {
            let name = file.path.display().to_string();
            print_diagnostics(&name, reportable.iter().copied(), true);
            println!(
                "{} {} → {}",
                "Rendered".green().bold(),
                report.input.display(),
                report.output.display()
            );
        }
    }

    if failed > 0 {
        bail!("{failed} of {} file(s) failed to render", files.len());
    }

    Ok(())
}

/// Print diagnostics as `file:line: severity: [code] message`.
pub fn print_diagnostics<'a>(
    file: &str,
    diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
    to_stderr: bool,
) {
    for diag in diagnostics {
        let severity_str = match diag.severity {
            Severity::Error => format!("{}", "error".red().bold()),
            Severity::Warning => format!("{}", "warning".yellow().bold()),
            Severity::Info => format!("{}", "info".cyan().bold()),
        };

        // Diagnostics carry 0-based lines; editors count from 1.
        let line_info = match diag.line {
            Some(line) => format!("{}:{}", file, line + 1),
            None => file.to_string(),
        };

        let code_str = match &diag.code {
            Some(c) => format!("[{}] ", c),
            None => String::new(),
        };

        let message = format!("{line_info}: {severity_str}: {code_str}{}", diag.message);
        if to_stderr {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    }
}

/// Watch the source files for changes and re-render each one on save.
///
/// Debounces rapid events (e.g. editors that write in stages) with a 200ms window.
/// Ctrl+C exits cleanly.
pub fn watch_and_rebuild(
    files: &[SourceFile],
    options: &CompileOptions,
    quiet: bool,
) -> Result<()> {
    let watched: Vec<(PathBuf, &SourceFile)> = files
        .iter()
        .map(|f| {
            std::fs::canonicalize(&f.path)
                .map(|canonical| (canonical, f))
                .map_err(|e| anyhow::anyhow!("Cannot resolve path '{}': {}", f.path.display(), e))
        })
        .collect::<Result<_>>()?;

    let dirs: BTreeSet<&Path> = watched.iter().filter_map(|(f, _)| f.parent()).collect();

    println!(
        "{} {} file(s) for changes (Ctrl+C to stop)",
        "Watching".cyan().bold(),
        watched.len()
    );

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for dir in &dirs {
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
    }

    let mut last_rebuild = Instant::now();
    let debounce = Duration::from_millis(200);

    loop {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(event) => {
                let relevant_kind =
                    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
                if !relevant_kind || last_rebuild.elapsed() <= debounce {
                    continue;
                }

                let touched: Vec<PathBuf> =
                    event.paths.iter().filter_map(|p| p.canonicalize().ok()).collect();
                let changed: Vec<SourceFile> = watched
                    .iter()
                    .filter(|(canonical, _)| touched.contains(canonical))
                    .map(|(_, source)| (*source).clone())
                    .collect();
                if changed.is_empty() {
                    continue;
                }

                // Small delay to let the editor finish writing
                std::thread::sleep(Duration::from_millis(50));

                match handle_render(&changed, options, quiet) {
                    Ok(()) => {
                        last_rebuild = Instant::now();
                    }
                    Err(e) => {
                        eprintln!("{} {}", "Render error:".red().bold(), e);
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // Keep looping
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

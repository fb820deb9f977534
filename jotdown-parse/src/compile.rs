//! File-system glue: read a jotdown source, render it, write the page.

use std::path::{Path, PathBuf};

use crate::error::{CompileError, Diagnostic};
use crate::types::RenderOptions;

/// Options for compiling a file on disk.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub render: RenderOptions,
    /// Directory to write output into. Defaults to the input's own directory.
    pub out_dir: Option<PathBuf>,
    /// Replace the input extension with `.html` instead of appending `.html`.
    pub replace_extension: bool,
}

/// What a single compile produced.
#[derive(Debug, Clone)]
pub struct CompileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub elements: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Where the page for `input` is written.
///
/// `notes.jd` becomes `notes.jd.html`, or `notes.html` with
/// `replace_extension`.
pub fn output_path(input: &Path, options: &CompileOptions) -> PathBuf {
    let named = if options.replace_extension {
        input.with_extension("html")
    } else {
        let mut name = input.as_os_str().to_os_string();
        name.push(".html");
        PathBuf::from(name)
    };

    match (&options.out_dir, named.file_name()) {
        (Some(dir), Some(file_name)) => dir.join(file_name),
        _ => named,
    }
}

/// Read `input`, render it to a full page and write the result.
pub fn compile_file(
    input: &Path,
    options: &CompileOptions,
) -> Result<CompileReport, CompileError> {
    let source = std::fs::read_to_string(input).map_err(|source| CompileError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let result = crate::parse::parse_with(&source, options.render.id_numbering);
    let html = result.to_html_page(&options.render);
    let output = output_path(input, options);

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| CompileError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&output, html).map_err(|source| CompileError::Write {
        path: output.clone(),
        source,
    })?;

    log::info!("compiled {} -> {}", input.display(), output.display());

    Ok(CompileReport {
        input: input.to_path_buf(),
        output,
        elements: result.elements.len(),
        diagnostics: result.diagnostics,
    })
}

//! Subcommand implementations

pub mod init;
pub mod parse;
pub mod render;

use std::fs;
use std::path::Path;

use markview_parser::{MarkdownParser, ParseOptions, Parser};
use markview_render::{CONFIG_FILE_NAME, ViewConfig};
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{info, warn};

use crate::cli::Cli;

/// Loads the config named on the command line, or `.markview.json` in the
/// current directory, or the defaults.
pub fn load_config(cli: &Cli) -> Result<ViewConfig> {
    if let Some(ref path) = cli.config {
        return ViewConfig::from_file(path).into_diagnostic();
    }

    let path = Path::new(CONFIG_FILE_NAME);
    if path.is_file() {
        info!("Using config: {}", path.display());
        return ViewConfig::from_file(path).into_diagnostic();
    }

    Ok(ViewConfig::new())
}

pub fn read_source(file: &Path) -> Result<String> {
    fs::read_to_string(file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", file.display()))
}

/// Builds the Markdown parser, warning when `file` has an unexpected extension.
pub fn parser_for(file: &Path, options: ParseOptions) -> MarkdownParser {
    let parser = MarkdownParser::with_options(options);
    let extension = file.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    if !parser.can_parse(extension) {
        warn!("{} does not look like a {} file, parsing anyway", file.display(), parser.name());
    }
    parser
}

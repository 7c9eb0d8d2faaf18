//! Parse command implementation

use std::path::Path;

use markview_parser::Parser;
use markview_render::ExtensionRegistry;
use miette::{IntoDiagnostic, Result};

use super::{load_config, parser_for, read_source};
use crate::cli::Cli;

pub fn run_parse(cli: &Cli, file: &Path) -> Result<()> {
    let config = load_config(cli)?;
    let source = read_source(file)?;

    let parser = parser_for(file, ExtensionRegistry::new().parse_options(config.encode_html));
    let nodes = parser.parse(&source).into_diagnostic()?;

    println!("{}", serde_json::to_string_pretty(&nodes).into_diagnostic()?);
    Ok(())
}

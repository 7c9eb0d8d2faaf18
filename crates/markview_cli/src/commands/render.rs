//! Render command implementation

use std::path::Path;
use std::sync::Arc;

use markview_parser::Parser;
use markview_render::{AmbientTheme, ExtensionRegistry, MarkdownView, ThemeKind};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

use super::{load_config, parser_for, read_source};
use crate::cli::{Cli, OutputFormat, ThemeArg};

pub fn run_render(cli: &Cli, file: &Path, format: OutputFormat, theme: Option<ThemeArg>, dark: bool) -> Result<()> {
    let mut config = load_config(cli)?;
    if let Some(theme) = theme {
        config.theme = match theme {
            ThemeArg::Primary => ThemeKind::Primary,
            ThemeArg::Alternate => ThemeKind::Alternate,
            ThemeArg::Platform => ThemeKind::PlatformAppropriate,
        };
    }
    // Relative images sit next to the document unless configured otherwise.
    if config.image_directory.is_none() && config.base_url.is_none() {
        config.image_directory = file.parent().map(Path::to_path_buf);
    }

    let source = read_source(file)?;
    let registry = ExtensionRegistry::new();
    let parser = parser_for(file, registry.parse_options(config.encode_html));
    let ast = Arc::new(parser.parse(&source).into_diagnostic()?);
    debug!(nodes = ast.len(), "parsed {}", file.display());

    let ambient = if dark {
        AmbientTheme::dark()
    } else {
        AmbientTheme::light()
    };
    let mut view = MarkdownView::new(config, registry);
    let root = view.render(Some(ast), None, &ambient).into_diagnostic()?;

    match format {
        OutputFormat::Outline => print!("{}", root.outline()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(root).into_diagnostic()?),
    }

    info!("Rendered {} ({} links)", file.display(), root.link_handles().len());
    Ok(())
}

//! richtext CLI - rich-text document rendering tool

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use richtext::{
    DocumentWalker, HyperlinkResolver, JsonFormat, LayoutParent, RenderContext, RenderOptions,
    RenderResult, RichText, StaticLookup,
};

#[derive(Parser)]
#[command(name = "richtext")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Render rich-text documents to HTML, Markdown, text, and JSON", long_about = None)]
struct Cli {
    /// Input rich-text JSON file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document
    Render {
        /// Input rich-text JSON file (`{"json": ..., "links": ...}`)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "html")]
        format: Format,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Semantic parent the document is rendered inside (e.g. "quote")
        #[arg(long, value_name = "ROLE")]
        parent: Option<String>,

        /// JSON file answering hyperlink lookups (`{"id": {"page": {"slug": ...}}}`)
        #[arg(long, value_name = "FILE", env = "RICHTEXT_LOOKUP")]
        lookup: Option<PathBuf>,

        /// Ask the lookup service for preview content
        #[arg(long)]
        preview: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Maximum nesting of documents inside entities
        #[arg(long, default_value = "16")]
        max_depth: usize,
    },

    /// Show document structure and reference information
    Inspect {
        /// Input rich-text JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// HTML fragment
    Html,
    /// Markdown
    #[value(alias = "md")]
    Markdown,
    /// Plain text
    Text,
    /// JSON output tree
    Json,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Render {
            input,
            format,
            output,
            parent,
            lookup,
            preview,
            compact,
            max_depth,
        }) => {
            let options = RenderOptions::new()
                .with_preview(preview)
                .with_max_depth(max_depth);
            cmd_render(
                &input,
                format,
                output.as_deref(),
                parent.as_deref(),
                lookup.as_deref(),
                options,
                compact,
            )
        }
        Some(Commands::Inspect { input, json }) => cmd_inspect(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: render to HTML on stdout if input is provided
            if let Some(input) = cli.input {
                cmd_render(
                    &input,
                    Format::Html,
                    None,
                    None,
                    None,
                    RenderOptions::new(),
                    false,
                )
            } else {
                println!("{}", "Usage: richtext <FILE>".yellow());
                println!("       richtext --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_render(
    input: &Path,
    format: Format,
    output: Option<&Path>,
    parent: Option<&str>,
    lookup: Option<&Path>,
    options: RenderOptions,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = richtext::parse_file(input)?;
    let context = match parent {
        Some(role) => RenderContext::within(role.parse::<LayoutParent>()?),
        None => RenderContext::root(),
    };

    let result = match lookup {
        Some(path) => render_with_lookup(&doc, &context, options, load_lookup(path)?)?,
        None => DocumentWalker::new()
            .with_options(options)
            .render(&doc, &context)?,
    };

    let rendered = format_output(&result, format, compact)?;

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
        print_stats(&result);
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

/// Render, wait for all hyperlink lookups, and render again.
fn render_with_lookup(
    doc: &RichText,
    context: &RenderContext,
    options: RenderOptions,
    lookup: StaticLookup,
) -> Result<RenderResult, Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    let (resolver, _events) = HyperlinkResolver::new(Arc::new(lookup), rt.handle().clone());
    let resolver = Arc::new(resolver);

    let walker = DocumentWalker::new()
        .with_options(options)
        .with_resolver(Arc::clone(&resolver));

    let first = walker.render(doc, context)?;
    if first.stats.pending_link_count == 0 {
        return Ok(first);
    }

    log::debug!(
        "Waiting for {} hyperlink lookups",
        first.stats.pending_link_count
    );
    rt.block_on(resolver.settle(doc.instance));
    Ok(walker.render(doc, context)?)
}

fn load_lookup(path: &Path) -> Result<StaticLookup, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    StaticLookup::from_json_str(&json)
        .map_err(|e| format!("Invalid lookup file {}: {}", path.display(), e).into())
}

fn format_output(
    result: &RenderResult,
    format: Format,
    compact: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        Format::Html => richtext::render::to_html(&result.output),
        Format::Markdown => richtext::render::to_markdown(&result.output),
        Format::Text => richtext::render::to_text(&result.output),
        Format::Json => {
            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            richtext::render::to_json(&result.output, json_format)?
        }
    })
}

fn print_stats(result: &RenderResult) {
    let stats = &result.stats;
    println!("  {} {} nodes", "├─".dimmed(), stats.node_count);
    println!("  {} {} links", "├─".dimmed(), stats.link_count);
    println!("  {} {} fallbacks", "├─".dimmed(), stats.fallback_count);
    if stats.error_count > 0 {
        println!(
            "  {} {}",
            "└─".dimmed(),
            format!("{} errors", stats.error_count).red()
        );
    } else {
        println!("  {} 0 errors", "└─".dimmed());
    }
}

fn cmd_inspect(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = richtext::parse_file(input)?;
    let result = DocumentWalker::new().render(&doc, &RenderContext::root())?;
    let stats = &result.stats;

    if json {
        let missing: Vec<serde_json::Value> = doc
            .missing_references()
            .into_iter()
            .map(|(node_type, id)| serde_json::json!({"nodeType": node_type.as_str(), "id": id}))
            .collect();
        let report = serde_json::json!({
            "nodes": doc.node_count(),
            "entries": doc.table.entry_count(),
            "assets": doc.table.asset_count(),
            "stats": stats,
            "missing": missing,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Nodes".bold(), doc.node_count());
    println!("{}: {}", "Linked entries".bold(), doc.table.entry_count());
    println!("{}: {}", "Linked assets".bold(), doc.table.asset_count());

    println!();
    println!("{}", "Render Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Text segments".bold(), stats.text_segment_count);
    println!("{}: {}", "Resolved references".bold(), stats.resolved_reference_count);
    println!("{}: {}", "Dispatched entities".bold(), stats.dispatched_entity_count);
    println!("{}: {}", "Fallbacks".bold(), stats.fallback_count);
    println!("{}: {}", "Errors".bold(), stats.error_count);

    let missing = doc.missing_references();
    if !missing.is_empty() {
        println!();
        println!("{}", "Missing References".yellow().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (node_type, id) in &missing {
            println!("  {} {}", node_type.to_string().dimmed(), id);
        }
    }

    for error in result.output.errors() {
        if let richtext::Output::Error { node_type, message } = error {
            println!("{} {}: {}", "Malformed".red(), node_type, message);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "richtext".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Rich-text document renderer");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_lookup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"42": {{"page": {{"slug": "about"}}}}}}"#).unwrap();

        let lookup = load_lookup(file.path()).unwrap();
        assert_eq!(lookup.len(), 1);
    }

    #[test]
    fn test_load_lookup_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_lookup(file.path()).is_err());
    }

    #[test]
    fn test_render_with_lookup_links_hyperlink() {
        let doc = RichText::from_json_str(
            r#"{"json": {"nodeType": "document", "content": [{
                "nodeType": "paragraph",
                "content": [{
                    "nodeType": "entry-hyperlink",
                    "data": {"target": {"sys": {"id": "42"}}},
                    "content": [{"nodeType": "text", "value": "About"}]
                }]
            }]}}"#,
        )
        .unwrap();
        let lookup = StaticLookup::new().with_page("42", "about");

        let result =
            render_with_lookup(&doc, &RenderContext::root(), RenderOptions::new(), lookup).unwrap();
        let html = format_output(&result, Format::Html, false).unwrap();
        assert_eq!(
            html,
            "<div class=\"container\"><p><a href=\"/about\">About</a></p></div>"
        );
    }
}

//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use lexy_syntax::ast::NodeRef;
use lexy_syntax::lexer;
use lexy_syntax::parser::OsFileSystem;
use serde_json::json;

use super::{CliError, CliResult, ExitCode};
use crate::frontend::expectations::ScenarioOutcome;
use crate::frontend::pipeline::{LexyParser, ParseError, ParserOptions, ParserResult};

/// Maximum source file size (100 MB). Prevents memory exhaustion from maliciously large files.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Options shared by every command that parses.
///
/// Errors are collected rather than raised so the commands can print all of them.
pub fn parser_options(indent_width: usize) -> ParserOptions {
    ParserOptions::new()
        .with_indent_width(indent_width)
        .with_suppress_exceptions(true)
}

/// Read a source file with size validation.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", path.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            path.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", path.display(), e)))
}

/// Parse and validate `path` with includes resolved from disk.
pub fn parse_document(path: &Path, options: ParserOptions) -> CliResult<ParserResult> {
    let source = read_source(path)?;
    let lines: Vec<&str> = source.lines().collect();
    LexyParser::new(options)
        .parse_with(&lines, &path.to_string_lossy(), &OsFileSystem)
        .map_err(render_parse_error)
}

/// Render a pipeline error with miette's report handler.
fn render_parse_error(error: ParseError) -> CliError {
    CliError::failure(format!("{:?}", miette::Report::new(error)))
}

/// Check a file: print every diagnostic and the scenario outcomes.
pub fn check_file(path: &Path, options: ParserOptions) -> CliResult<ExitCode> {
    let result = parse_document(path, options)?;

    for (name, outcome) in result.scenario_outcomes() {
        match outcome {
            ScenarioOutcome::Run => println!("scenario {name}: ready to run"),
            ScenarioOutcome::Matched => println!("scenario {name}: expected errors logged"),
            ScenarioOutcome::Unmatched { messages } => {
                println!("scenario {name}: failed");
                for message in messages {
                    println!("  {message}");
                }
            }
        }
    }

    if !result.has_errors() {
        println!("✓ {} declarations checked", result.nodes.len());
        return Ok(ExitCode::SUCCESS);
    }
    Err(CliError::failure(format!(
        "{}\n{} error(s) in '{}'",
        result.logger.format_entries().trim_end(),
        result.logger.error_count(),
        path.display()
    )))
}

/// Tokenize every line and print the tokens.
pub fn tokens_file(path: &Path) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let file = path.display();
    let mut errors = String::new();
    for (index, line) in source.lines().enumerate() {
        match lexer::tokenize(line) {
            Ok(tokens) if tokens.is_empty() => {}
            Ok(tokens) => {
                let rendered: Vec<String> = tokens.iter().map(ToString::to_string).collect();
                println!("{:>4}: {}", index + 1, rendered.join(" "));
            }
            Err(error) => {
                let _ = writeln!(errors, "{file}({}, {}): {}", index + 1, error.column, error.message);
            }
        }
    }
    if errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::failure(errors.trim_end()))
    }
}

/// Print the declarations in dependency order.
pub fn order_file(path: &Path, options: ParserOptions, as_json: bool) -> CliResult<ExitCode> {
    let result = parse_document(path, options)?;
    let circular = result.graph.circular_references();
    let sorted = result.sorted_nodes().unwrap_or_default();

    if as_json {
        let order: Vec<_> = sorted
            .iter()
            .map(|node| json!({ "name": node.name(), "kind": node.kind().to_string() }))
            .collect();
        let document = json!({ "order": order, "circularReferences": circular });
        let rendered = serde_json::to_string_pretty(&document)
            .map_err(|e| CliError::failure(format!("Error rendering JSON: {e}")))?;
        println!("{rendered}");
    } else {
        for node in &sorted {
            println!("{} {}", node.keyword(), node.name());
        }
        if !circular.is_empty() {
            println!("circular references: {}", circular.join(", "));
        }
    }

    if circular.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Print the node tree of every root declaration.
pub fn tree_file(path: &Path, options: ParserOptions) -> CliResult<ExitCode> {
    let result = parse_document(path, options)?;
    let mut out = String::new();
    for node in result.nodes.iter() {
        render_tree(node.as_node(), 0, &mut out);
    }
    print!("{out}");
    Ok(ExitCode::SUCCESS)
}

fn render_tree(node: NodeRef<'_>, depth: usize, out: &mut String) {
    let children = node.children();
    let _ = write!(out, "{:indent$}{}", "", node.kind(), indent = depth * 2);
    if let Some(name) = node.name() {
        let _ = write!(out, " {name}");
    }
    if let NodeRef::Expression(expression) = node {
        let _ = write!(out, " `{expression}`");
    }
    let _ = writeln!(out, " ({})", children.len());
    for child in children {
        render_tree(child, depth + 1, out);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lexy_syntax::parser::DocumentOptions;
    use lexy_syntax::parser::DocumentParser;
    use lexy_syntax::parser::expressions::ExpressionFactory;

    #[test]
    fn test_render_tree() {
        let factory = ExpressionFactory::standard();
        let options = DocumentOptions::default();
        let document = DocumentParser::new(&factory, &options).parse_lines(&["enum Marital", "  Single"], "t.lexy");
        let mut out = String::new();
        render_tree(document.nodes.nodes[0].as_node(), 0, &mut out);
        insta::assert_snapshot!(out, @r"
        EnumDefinition Marital (1)
          EnumMember Single (0)
        ");
    }

    #[test]
    fn test_read_source_missing_file() {
        let error = read_source(Path::new("does/not/exist.lexy")).unwrap_err();
        assert!(error.message.starts_with("Cannot access file 'does/not/exist.lexy'"));
        assert_eq!(error.exit_code, ExitCode::FAILURE);
    }
}

#![forbid(unsafe_code)]

//! NetDSL CLI - parse, validate and project network topology descriptions.
//!
//! # Commands
//!
//! - `parse`: Print diagnostics, the parsed topology and the GoJS arrays
//! - `validate`: Check input and report diagnostics, exiting non-zero on errors
//! - `project`: Emit the GoJS graph-links model as JSON

use std::fmt::Write as _;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nd_core::{Net, ParseConfig, StructuredDiagnostic};
use nd_parser::{ParseResult, parse_with_config};
use nd_render_gojs::{GoJsModel, project};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// NetDSL CLI - parse, validate and project network topology descriptions.
#[derive(Debug, Parser)]
#[command(
    name = "nd-cli",
    version,
    about = "NetDSL CLI - parse, validate and project network topology descriptions",
    long_about = "Compiles NetDSL node/edge/group declarations into a graph model.\n\n\
        Every problem in the input is reported as a positioned diagnostic;\n\
        the rest of the input is still parsed and projected."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (can be repeated for more detail: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML file with `[parser]` and `[output]` tables
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse input and print diagnostics, topology and GoJS arrays.
    Parse {
        /// Input file path, "-" for stdin, or inline NetDSL text.
        #[arg(default_value = "-")]
        input: String,

        /// Output the net, structured diagnostics and model as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate input and report diagnostics.
    Validate {
        /// Input file path, "-" for stdin, or inline NetDSL text.
        #[arg(default_value = "-")]
        input: String,

        /// Output as JSON (structured diagnostics)
        #[arg(long)]
        json: bool,

        /// Exit with non-zero status on warnings (not just errors)
        #[arg(long)]
        strict: bool,
    },

    /// Project input into a GoJS model.
    Project {
        /// Input file path, "-" for stdin, or inline NetDSL text.
        #[arg(default_value = "-")]
        input: String,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Settings read from `--config`. Command-line flags win over these.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CliConfig {
    parser: ParseConfig,
    output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct OutputConfig {
    pretty: bool,
    strict: bool,
}

/// JSON form of the `parse` command.
#[derive(Debug, Serialize)]
struct ParseReport<'a> {
    net: &'a Net,
    diagnostics: Vec<StructuredDiagnostic>,
    model: GoJsModel,
}

/// Result of validating an input.
#[derive(Debug, Serialize)]
struct ValidateResult {
    valid: bool,
    node_count: usize,
    edge_count: usize,
    group_count: usize,
    error_count: usize,
    warning_count: usize,
    diagnostic_count: usize,
    diagnostics: Vec<StructuredDiagnostic>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Parse {
            input,
            json,
            pretty,
        } => cmd_parse(&input, &config, json, pretty || config.output.pretty),

        Command::Validate {
            input,
            json,
            strict,
        } => cmd_validate(&input, &config, json, strict || config.output.strict),

        Command::Project {
            input,
            output,
            pretty,
        } => cmd_project(
            &input,
            &config,
            output.as_deref(),
            pretty || config.output.pretty,
        ),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn load_config(path: Option<&str>) -> Result<CliConfig> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };
    let text = std::fs::read_to_string(path).context(format!("Failed to read config: {path}"))?;
    let config: CliConfig =
        toml::from_str(&text).context(format!("Failed to parse config: {path}"))?;
    config
        .parser
        .validate()
        .context(format!("Invalid [parser] table in {path}"))?;
    debug!(path, comment_prefix = %config.parser.comment_prefix, "loaded config");
    Ok(config)
}

fn load_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if Path::new(input).exists() {
        std::fs::read_to_string(input).context(format!("Failed to read file: {input}"))
    } else {
        // Treat as inline NetDSL text
        Ok(input.to_string())
    }
}

fn write_output(output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).context(format!("Failed to write to: {path}"))?;
            info!("Wrote output to: {path}");
        }
        None => {
            io::stdout()
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn parse_input(input: &str, config: &CliConfig) -> Result<ParseResult> {
    let source = load_input(input)?;
    let parsed = parse_with_config(&source, &config.parser);
    for line in parsed.rendered_diagnostics() {
        debug!("{line}");
    }
    Ok(parsed)
}

fn encode_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    json.push('\n');
    Ok(json)
}

// =============================================================================
// Command: parse
// =============================================================================

fn cmd_parse(input: &str, config: &CliConfig, json_output: bool, pretty: bool) -> Result<()> {
    let parsed = parse_input(input, config)?;
    let model = project(&parsed.net);

    let output = if json_output {
        let report = ParseReport {
            net: &parsed.net,
            diagnostics: parsed.structured_diagnostics(),
            model,
        };
        encode_json(&report, pretty)?
    } else {
        render_text_report(&parsed, &model)?
    };

    write_output(None, &output)
}

/// Diagnostics, then the topology dump, then both GoJS arrays.
fn render_text_report(parsed: &ParseResult, model: &GoJsModel) -> Result<String> {
    let net = &parsed.net;
    let mut out = String::new();

    for line in parsed.rendered_diagnostics() {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;

    for node in &net.nodes {
        writeln!(out, "{}", net.display_node(node))?;
    }
    for edge in &net.edges {
        writeln!(out, "{}", net.display_edge(edge))?;
    }
    for group in &net.groups {
        writeln!(out, "{group}")?;
        for member in net.members(group) {
            writeln!(out, "{}", member.id)?;
        }
        writeln!(out, "{}", nd_core::END_GROUP_KEYWORD)?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "{}",
        serde_json::to_string_pretty(&model.node_data_array)?
    )?;
    writeln!(
        out,
        "{}",
        serde_json::to_string_pretty(&model.link_data_array)?
    )?;
    Ok(out)
}

// =============================================================================
// Command: validate
// =============================================================================

fn cmd_validate(input: &str, config: &CliConfig, json_output: bool, strict: bool) -> Result<()> {
    let parsed = parse_input(input, config)?;
    let counts = parsed.diagnostic_counts();
    let valid = counts.errors == 0 && (!strict || counts.warnings == 0);

    let result = ValidateResult {
        valid,
        node_count: parsed.net.nodes.len(),
        edge_count: parsed.net.edges.len(),
        group_count: parsed.net.groups.len(),
        error_count: counts.errors,
        warning_count: counts.warnings,
        diagnostic_count: counts.total(),
        diagnostics: parsed.structured_diagnostics(),
    };

    if json_output {
        let output = serde_json::to_string_pretty(&result)?;
        println!("{output}");
    } else {
        if result.valid {
            println!("✓ Valid NetDSL input");
        } else {
            println!("✗ Invalid NetDSL input");
        }

        println!("  Nodes: {}", result.node_count);
        println!("  Edges: {}", result.edge_count);
        println!("  Groups: {}", result.group_count);

        print_diagnostic_section("Errors", &result.diagnostics, "Error");
        print_diagnostic_section("Warnings", &result.diagnostics, "Warning");
    }

    if !result.valid {
        std::process::exit(1);
    }

    Ok(())
}

fn print_diagnostic_section(title: &str, diagnostics: &[StructuredDiagnostic], severity: &str) {
    let mut matching = diagnostics
        .iter()
        .filter(|diag| diag.severity == severity)
        .peekable();
    if matching.peek().is_none() {
        return;
    }
    println!("\n{title}:");
    for diag in matching {
        println!(
            "  [{}] {} (line {}, col {})",
            diag.error_code, diag.message, diag.line, diag.column
        );
    }
}

// =============================================================================
// Command: project
// =============================================================================

fn cmd_project(
    input: &str,
    config: &CliConfig,
    output: Option<&str>,
    pretty: bool,
) -> Result<()> {
    let parsed = parse_input(input, config)?;
    if parsed.has_errors() {
        info!(
            errors = parsed.diagnostic_counts().errors,
            "projecting partial net; run `validate` for details"
        );
    }

    let model = project(&parsed.net);
    let json = if pretty {
        model.to_json_pretty()
    } else {
        model.to_json()
    }
    .context("Failed to encode GoJS model")?;

    write_output(output, &format!("{json}\n"))
}

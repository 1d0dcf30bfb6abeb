//! solscope: query the externally-readable interface of Solidity source.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use solscope_core::{extract, signature, Declaration, ParseResult};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Solidity interface extraction toolchain.
#[derive(Parser)]
#[command(name = "solscope", version, about = "Solidity interface extractor")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract queryable declarations from a Solidity source file
    Extract {
        /// Path to the .sol source file
        file: PathBuf,
    },

    /// Print only the JSON ABI for the queryable declarations
    Abi {
        /// Path to the .sol source file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { file } => cmd_extract(&file, cli.output),
        Commands::Abi { file } => cmd_abi(&file),
    }
}

fn cmd_extract(file: &Path, output: OutputFormat) {
    let result = extract(&read_source(file));

    match output {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "declarations": result.abi_items,
                "signatures": result
                    .declarations
                    .iter()
                    .map(signature)
                    .collect::<Vec<String>>(),
                "diagnostics": result.diagnostics,
            });
            let pretty = serde_json::to_string_pretty(&value)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            for decl in &result.declarations {
                println!("{}", render_declaration(decl));
            }
            for diag in &result.diagnostics {
                eprintln!("warning: {}", diag.message);
            }
        }
    }
}

fn cmd_abi(file: &Path) {
    let result: ParseResult = extract(&read_source(file));
    for diag in &result.diagnostics {
        eprintln!("warning: {}", diag.message);
    }
    let pretty = serde_json::to_string_pretty(&result.abi_items)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}

/// One text line per declaration: `name(inputs) -> outputs [mutability]`.
fn render_declaration(decl: &Declaration) -> String {
    let inputs: Vec<String> = decl
        .inputs
        .iter()
        .map(|p| {
            if p.name.is_empty() {
                p.source_type.clone()
            } else {
                format!("{} {}", p.source_type, p.name)
            }
        })
        .collect();
    let outputs: Vec<String> = decl.outputs.iter().map(|p| p.source_type.clone()).collect();
    format!(
        "{}({}) -> ({}) [{}]",
        decl.name,
        inputs.join(", "),
        outputs.join(", "),
        decl.mutability.as_str()
    )
}

fn read_source(file: &Path) -> String {
    match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error reading file '{}': {}", file.display(), e);
            process::exit(1);
        }
    }
}

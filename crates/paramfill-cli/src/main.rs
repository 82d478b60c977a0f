//! paramfill CLI entrypoint
//! Parses command-line arguments and dispatches to the core parameter filler.

// Internal imports (std, crate)
use std::collections::BTreeMap;
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use paramfill_core::{
    fill_operation, fill_operations, Config, FilledOperation, OpenApiContext, ParameterHandler,
};
use serde_json::{json, Value as JsonValue};
use tokio::fs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "paramfill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Fill the parameters of the operations declared in an OpenAPI spec
    Fill {
        /// Path or URL to OpenAPI schema (YAML or JSON)
        ///
        /// Can be a local file path or an HTTP/HTTPS URL
        /// Example: --schema-path path/to/swagger.json
        /// Example: --schema-path https://example.com/openapi.json
        #[arg(long)]
        schema_path: Option<String>,
        /// Operation id to fill, repeatable (default: every operation)
        #[arg(long = "operation")]
        operations: Vec<String>,
        /// Also emit a variant of each operation with optional parameters filled
        #[arg(long)]
        include_optional: bool,
        /// Write the result to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Configuration file (YAML, JSON or TOML); flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
        /// Fail the run when any operation cannot be filled instead of skipping it
        #[arg(long)]
        strict: bool,
    },
    /// List the operations declared in an OpenAPI spec
    List {
        /// Path or URL to OpenAPI schema (YAML or JSON)
        #[arg(long)]
        schema_path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout only carries the result
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fill {
            schema_path,
            operations,
            include_optional,
            output,
            config,
            strict,
        } => {
            let mut settings = match &config {
                Some(path) => Config::from_file(path)
                    .await
                    .with_context(|| format!("Failed to load config from {}", path.display()))?,
                None => Config::new(String::new()),
            };
            if let Some(schema_path) = schema_path {
                settings.schema_path = schema_path;
            }
            if !operations.is_empty() {
                settings.operations = operations;
            }
            settings.include_optional |= include_optional;
            if let Some(output) = output {
                settings.output = Some(output.display().to_string());
            }

            settings
                .validate()
                .context("Invalid settings, use --schema-path or a config file")?;

            fill(&settings, strict).await
        }
        Commands::List { schema_path } => {
            let spec = load(&schema_path).await?;
            for operation in spec.parse_operations()? {
                let line = format!(
                    "{}\t{}\t{}\t{}",
                    operation.id,
                    operation.method.to_uppercase(),
                    operation.path,
                    operation.params.len()
                );
                let handler = ParameterHandler::new(&spec, operation);
                if handler.has_optional_parameters() {
                    println!("{}\toptional", line);
                } else {
                    println!("{}", line);
                }
            }
            Ok(())
        }
    }
}

async fn load(schema_path: &str) -> anyhow::Result<OpenApiContext> {
    tracing::info!("Loading OpenAPI schema from: {}", schema_path);
    OpenApiContext::from_file_or_url(schema_path)
        .await
        .with_context(|| format!("Failed to load OpenAPI schema from {}", schema_path))
}

async fn fill(settings: &Config, strict: bool) -> anyhow::Result<()> {
    let spec = load(&settings.schema_path).await?;

    let operations: Vec<_> = spec
        .parse_operations()?
        .into_iter()
        .filter(|operation| settings.selects(&operation.id))
        .collect();

    for wanted in &settings.operations {
        if !operations.iter().any(|operation| &operation.id == wanted) {
            tracing::warn!("Operation '{}' not found in {}", wanted, settings.schema_path);
        }
    }

    tracing::info!(
        "Filling {} operations (include_optional: {})",
        operations.len(),
        settings.include_optional
    );
    let filled = if strict {
        let mut filled = Vec::new();
        for operation in operations {
            let id = operation.id.clone();
            let variants = fill_operation(&spec, operation, settings.include_optional)
                .with_context(|| format!("Failed to fill operation {}", id))?;
            filled.extend(variants);
        }
        filled
    } else {
        fill_operations(&spec, operations, settings.include_optional)
    };

    let document = JsonValue::Array(filled.iter().map(render).collect());
    let content = serde_json::to_string_pretty(&document)?;

    match &settings.output {
        Some(path) => {
            fs::write(path, content + "\n")
                .await
                .with_context(|| format!("Failed to write {}", path))?;
            tracing::info!("Wrote {} filled operations to {}", filled.len(), path);
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn render(filled: &FilledOperation) -> JsonValue {
    let operation = &filled.operation;
    let parameters: BTreeMap<&str, JsonValue> = operation
        .params
        .values()
        .map(|param| {
            (
                param.name.as_str(),
                json!({
                    "in": param.location,
                    "required": param.required,
                    "fill": param.fill.as_ref().map(|value| value.to_json()),
                }),
            )
        })
        .collect();

    json!({
        "id": operation.id,
        "method": operation.method,
        "path": operation.path,
        "include_optional": filled.include_optional,
        "parameters": parameters,
    })
}

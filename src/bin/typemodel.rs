//! Type Model CLI
//!
//! Resolves the component schemas of an OpenAPI document and prints the
//! resulting type definitions and enum definitions.
//!
//! Usage:
//!   typemodel openapi.yaml
//!   typemodel openapi.json --config typemodel.toml --format text
//!   RUST_LOG=schema_typemodel=debug typemodel openapi.yaml

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use schema_typemodel::{
    collect_enum_definitions, generate_types, Document, EnumDefinition, ResolverConfig,
    TypeDefinition,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "typemodel")]
#[command(about = "Resolve OpenAPI component schemas into a language-agnostic type model")]
struct Cli {
    /// OpenAPI document (JSON, or YAML by .yaml/.yml extension)
    document: PathBuf,

    /// Configuration file (layered over typemodel.toml and TYPEMODEL_* variables)
    #[arg(short, long)]
    config: Option<String>,

    /// Keep objects with only additional properties as named structs
    #[arg(long)]
    no_flatten: bool,

    /// Prefix every enum identifier with its type name
    #[arg(long)]
    always_prefix_enums: bool,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json")]
    format: String,
}

#[derive(Serialize)]
struct Output<'a> {
    types: &'a [TypeDefinition<'a>],
    enums: &'a [EnumDefinition],
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ResolverConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    if cli.no_flatten {
        config.compatibility.disable_flatten_additional_properties = true;
    }
    if cli.always_prefix_enums {
        config.compatibility.always_prefix_enum_values = true;
    }

    let document = Document::load(&cli.document)
        .with_context(|| format!("failed to read {}", cli.document.display()))?;

    let types = generate_types(&document.components, &config)?;
    let enums = collect_enum_definitions(&types, &config);

    match cli.format.as_str() {
        "json" => {
            let output = Output {
                types: &types,
                enums: &enums,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        "text" => print_text(&types, &enums, &config),
        other => anyhow::bail!("unknown output format: {}", other),
    }
    Ok(())
}

fn print_text(types: &[TypeDefinition<'_>], enums: &[EnumDefinition], config: &ResolverConfig) {
    for def in types {
        let kind = if def.is_alias(config) { "=" } else { ":" };
        println!("{} {} {}", def.type_name, kind, def.schema.type_decl());
    }

    if !enums.is_empty() {
        println!();
    }
    for e in enums {
        let values: Vec<String> = e
            .values()
            .into_iter()
            .map(|v| format!("{} = {}{}{}", v.identifier, e.value_wrapper, v.value, e.value_wrapper))
            .collect();
        println!("enum {} {{ {} }}", e.type_name, values.join(", "));
    }
}

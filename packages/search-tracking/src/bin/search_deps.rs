//! Search dependency inspection CLI
//!
//! # Usage
//!
//! ```bash
//! # Catalog and registry summary
//! search-deps --schema schema.yaml --indexes indexes.yaml inspect
//!
//! # Root documents affected by a property change
//! search-deps --schema schema.yaml --indexes indexes.yaml update --entity Customer --property name
//!
//! # Root documents affected by a delete, as JSON
//! search-deps --schema schema.yaml --indexes indexes.yaml --format json delete --entity Customer
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use search_tracking::{
    load_index_definitions, DependencyCompiler, DependencyResolver, ImpactSet, IndexSettingsContext,
    PropertyPath, StaticSchema, TrackingConfig,
};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "search-deps")]
#[command(about = "Inspect search index dependencies compiled from index definitions", long_about = None)]
struct Cli {
    /// Schema YAML file
    #[arg(long)]
    schema: PathBuf,

    /// Index definitions YAML file
    #[arg(long)]
    indexes: PathBuf,

    /// Engine configuration YAML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show index configurations and tracked entities
    Inspect,

    /// Root documents to reindex after properties of an entity changed
    Update {
        /// Changed entity type
        #[arg(short, long)]
        entity: String,

        /// Changed property (repeatable)
        #[arg(short, long = "property", required = true)]
        properties: Vec<String>,
    },

    /// Root documents to reindex after an entity instance was deleted
    Delete {
        /// Deleted entity type
        #[arg(short, long)]
        entity: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "search_tracking=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TrackingConfig::from_yaml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TrackingConfig::default(),
    };
    let schema = StaticSchema::from_yaml(&cli.schema)
        .with_context(|| format!("loading schema {}", cli.schema.display()))?;
    let definitions = load_index_definitions(&cli.indexes)
        .with_context(|| format!("loading index definitions {}", cli.indexes.display()))?;

    let resolver = DependencyCompiler::new(&schema, &config)
        .compile_definitions(&definitions)
        .context("compiling index definitions")?;

    match cli.command {
        Commands::Inspect => {
            let settings = IndexSettingsContext::from_config(&config.settings);
            inspect(&resolver, &settings, cli.format)
        }
        Commands::Update { entity, properties } => {
            let impact = resolver.dependencies_for_update(&entity, &properties);
            print_impact(&format!("update {} {:?}", entity, properties), &impact, cli.format)
        }
        Commands::Delete { entity } => {
            let impact = resolver.dependencies_for_delete(&entity);
            print_impact(&format!("delete {}", entity), &impact, cli.format)
        }
    }
}

fn inspect(
    resolver: &DependencyResolver,
    settings: &IndexSettingsContext,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let catalog = resolver.catalog();
    let registry = resolver.registry();

    match format {
        OutputFormat::Json => {
            let indexes: Vec<_> = catalog
                .index_configurations()
                .map(|index| {
                    json!({
                        "entity": index.entity_name(),
                        "index_name": index.index_name(),
                        "fields": index.fields().map(|f| &f.field_name).collect::<Vec<_>>(),
                        "affected_entity_types": index.affected_entity_types(),
                        "settings": settings.effective_settings_for(index.entity_name().as_str()),
                    })
                })
                .collect();
            let tracked: serde_json::Map<String, serde_json::Value> = registry
                .tracked_entities()
                .into_iter()
                .map(|entity| {
                    (
                        entity.to_string(),
                        json!(registry.tracked_properties(entity.as_str())),
                    )
                })
                .collect();
            let out = json!({ "indexes": indexes, "tracked": tracked });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("Indexes ({}):", catalog.len());
            for index in catalog.index_configurations() {
                println!("  {} -> {}", index.entity_name(), index.index_name());
                for field in index.fields() {
                    let marker = if field.standalone { " (standalone)" } else { "" };
                    println!("    {}{}", field.field_name, marker);
                }
            }
            println!();
            println!("Tracked entities ({} facts):", registry.len());
            for entity in registry.tracked_entities() {
                let properties = registry.tracked_properties(entity.as_str());
                let deletes = registry.back_refs_for_delete(entity.as_str()).count();
                println!(
                    "  {}: properties [{}], delete dependencies {}",
                    entity,
                    properties.join(", "),
                    deletes
                );
            }
        }
    }
    Ok(())
}

fn print_impact(title: &str, impact: &ImpactSet, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let out: serde_json::Map<String, serde_json::Value> = impact
                .iter()
                .map(|(root, paths)| {
                    let dotted: Vec<String> = paths.iter().map(PropertyPath::dotted).collect();
                    (root.to_string(), json!(dotted))
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if impact.is_empty() {
                println!("{}: no dependent documents", title);
                return Ok(());
            }
            println!("{}:", title);
            for (root, paths) in impact {
                for path in paths {
                    let shown = if path.is_empty() { "<self>".to_string() } else { path.dotted() };
                    println!("  {} via {}", root, shown);
                }
            }
        }
    }
    Ok(())
}

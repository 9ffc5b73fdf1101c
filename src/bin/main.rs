//! Metaprofile CLI - Extract table metadata
//!
//! Usage:
//!   metaprofile extract -s <schema> -t <table> --database <file.db> [options]
//!   metaprofile extract -f <config.json> --database <file.db>
//!
//! Examples:
//!   metaprofile extract -s main -t orders --database ./orders.db
//!   metaprofile extract -f orders.json --database ./orders.db --gmeta orders.gmeta.json

use clap::{Parser, Subcommand};
use metaprofile::config::{ExtractionConfig, Settings, StoreConfig};
use metaprofile::export::store::MetadataStore;
use metaprofile::extract::run;
use metaprofile::reader::SqliteReader;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "metaprofile")]
#[command(about = "Metaprofile - Column-level type inference and metadata extraction")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract metadata for one table
    Extract {
        /// Schema of the source table
        #[arg(short, long, conflicts_with = "config", requires = "table")]
        schema: Option<String>,

        /// Name of the source table
        #[arg(short, long, conflicts_with = "config", requires = "schema")]
        table: Option<String>,

        /// Path to a JSON run configuration
        #[arg(short = 'f', long = "config")]
        config: Option<PathBuf>,

        /// Categorical threshold (ignored with -f)
        #[arg(short = 'c', long)]
        categorical_threshold: Option<i64>,

        /// Explicit date format, e.g. %Y-%m-%d (ignored with -f)
        #[arg(long)]
        date_format: Option<String>,

        /// Source SQLite database file
        #[arg(long)]
        database: PathBuf,

        /// Metadata store database (defaults to the settings file)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Skip writing to the metadata store
        #[arg(long)]
        no_store: bool,

        /// Where to write the Gmeta JSON document (ignored with -f)
        #[arg(long)]
        gmeta: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            schema,
            table,
            config,
            categorical_threshold,
            date_format,
            database,
            store,
            no_store,
            gmeta,
        } => cmd_extract(
            schema,
            table,
            config,
            categorical_threshold,
            date_format,
            database,
            store,
            no_store,
            gmeta,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_extract(
    schema: Option<String>,
    table: Option<String>,
    config_file: Option<PathBuf>,
    categorical_threshold: Option<i64>,
    date_format: Option<String>,
    database: PathBuf,
    store_path: Option<PathBuf>,
    no_store: bool,
    gmeta: Option<PathBuf>,
) -> ExitCode {
    let config = match build_config(
        schema,
        table,
        config_file,
        categorical_threshold,
        date_format,
        gmeta,
    ) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let reader = match SqliteReader::open(&database, &config.schema, &config.table) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("Error opening '{}': {}", database.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut store = if no_store {
        None
    } else {
        match open_store(store_path) {
            Ok(store) => Some(store),
            Err(message) => {
                eprintln!("{message}");
                return ExitCode::FAILURE;
            }
        }
    };

    match run(&reader, &config, store.as_mut()) {
        Ok(output) => {
            println!(
                "Extracted {} ({} rows, {} columns)",
                output.metadata.qualified_name(),
                output.metadata.row_count,
                output.metadata.column_count
            );
            for column in &output.metadata.columns {
                println!("  {} -> {}", column.name, column.semantic_type());
            }
            if let Some(path) = &output.gmeta_path {
                println!("Gmeta written to {}", path.display());
            }
            if let Some(id) = output.data_table_id {
                println!("Snapshot recorded (data_table_id {id})");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Extraction error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(
    schema: Option<String>,
    table: Option<String>,
    config_file: Option<PathBuf>,
    categorical_threshold: Option<i64>,
    date_format: Option<String>,
    gmeta: Option<PathBuf>,
) -> Result<ExtractionConfig, String> {
    match (config_file, schema, table) {
        (Some(path), None, None) => {
            ExtractionConfig::from_file(&path).map_err(|e| format!("Config error: {e}"))
        }
        (None, Some(schema), Some(table)) => {
            let mut config = ExtractionConfig::new(schema, table);
            if let Some(threshold) = categorical_threshold {
                config = config.with_categorical_threshold(threshold);
            }
            if let Some(format) = date_format {
                config = config.with_date_format(format);
            }
            if let Some(path) = gmeta {
                config = config.with_gmeta_output(path);
            }
            Ok(config)
        }
        _ => Err("Specify either -s <schema> -t <table> or -f <config.json>".to_string()),
    }
}

fn open_store(store_path: Option<PathBuf>) -> Result<MetadataStore, String> {
    let settings = Settings::load().map_err(|e| format!("Settings error: {e}"))?;
    let mut store_config: StoreConfig = settings
        .store_config()
        .map_err(|e| format!("Settings error: {e}"))?;
    if let Some(path) = store_path {
        store_config.path = path;
    }
    MetadataStore::open(&store_config).map_err(|e| format!("Store error: {e}"))
}

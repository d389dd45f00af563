//! csv-clusters CLI - load delimited tables as matrices or clusters

use clap::Parser;
use csv_clusters::{
    ColumnType, CsvLoader, LoadOutput, LoadedData, NumericMatrix, SourceType, StorageType, export,
    to_hex,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Load delimited text tables as numeric matrices or clusters.
///
/// Mixed tables are classified column by column; categorical and color
/// columns are turned into clusters of samples.
#[derive(Parser, Debug)]
#[command(name = "csv-clusters")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV/TSV file(s) to load
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Field separator (single character; .tsv files always use tab)
    #[arg(short = 's', long, default_value = ",")]
    separator: char,

    /// The first line is data, not column labels
    #[arg(long)]
    no_column_header: bool,

    /// The first field of every line is data, not a row label
    #[arg(long)]
    no_row_header: bool,

    /// Swap rows and columns
    #[arg(short = 't', long)]
    transpose: bool,

    /// How values are interpreted
    #[arg(long, default_value = "mixed")]
    source: SourceArg,

    /// Element type of numeric output
    #[arg(long, default_value = "float32")]
    storage: StorageArg,

    /// Load only these dimensions, in this order (comma separated)
    #[arg(long, value_delimiter = ',')]
    dimensions: Vec<String>,

    /// File with one sample label per line to align samples to
    #[arg(long)]
    parent_labels: Option<PathBuf>,

    /// Output format: text (default), json, or csv
    #[arg(short = 'f', long, default_value = "text")]
    format: OutputFormat,

    /// Show column and cluster details, and debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum SourceArg {
    Mixed,
    Numerical,
    Categorical,
}

impl From<SourceArg> for SourceType {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Mixed => SourceType::Mixed,
            SourceArg::Numerical => SourceType::Numerical,
            SourceArg::Categorical => SourceType::Categorical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum StorageArg {
    Float32,
    Bfloat16,
}

impl From<StorageArg> for StorageType {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Float32 => StorageType::Float32,
            StorageArg::Bfloat16 => StorageType::BFloat16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let loader = match configure(&args) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut exit_code = ExitCode::SUCCESS;

    for file in &args.files {
        if let Err(e) = load_file(file, &loader, &args) {
            eprintln!("Error processing {}: {}", file.display(), e);
            exit_code = ExitCode::FAILURE;
        }
    }

    exit_code
}

fn configure(args: &Args) -> Result<CsvLoader, Box<dyn std::error::Error>> {
    if !args.separator.is_ascii() {
        return Err(format!("separator {:?} is not a single ASCII character", args.separator).into());
    }

    let mut loader = CsvLoader::new();
    loader
        .separator(args.separator as u8)
        .column_header(!args.no_column_header)
        .row_header(!args.no_row_header)
        .transposed(args.transpose)
        .source_type(args.source.into())
        .storage_type(args.storage.into())
        .dimension_labels(args.dimensions.clone());

    if let Some(path) = &args.parent_labels {
        loader.parent_labels(read_labels(path)?);
    }

    Ok(loader)
}

/// One label per line; blank lines are skipped.
fn read_labels(path: &Path) -> io::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn load_file(path: &Path, loader: &CsvLoader, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let Some(output) = loader.load_path(path)? else {
        eprintln!("{}: nothing to load", path.display());
        return Ok(());
    };

    match args.format {
        OutputFormat::Text => print_text_output(path, &output, args.verbose),
        OutputFormat::Json => print_json_output(path, &output, args.verbose),
        OutputFormat::Csv => print_csv_output(&output, args.separator as u8)?,
    }

    Ok(())
}

fn print_text_output(path: &Path, output: &LoadOutput, verbose: bool) {
    println!("File: {}", path.display());
    println!("  Dataset: {}", output.name);

    match &output.data {
        LoadedData::Numeric(m) => {
            println!("  Samples: {}", m.rows());
            println!("  Dimensions: {}", m.columns());
            println!("  Storage: {:?}", m.storage_type());
        }
        LoadedData::Mixed(mixed) => {
            println!("  Samples: {}", mixed.row_header.len());
            println!(
                "  Numerical dimensions: {}",
                mixed.numeric.as_ref().map_or(0, NumericMatrix::columns)
            );
            println!("  Cluster sets: {}", mixed.clusters.len());

            if verbose {
                println!("  Columns:");
                for (i, (name, typ)) in mixed
                    .column_header
                    .iter()
                    .zip(mixed.column_types.iter())
                    .enumerate()
                {
                    println!("    {}: {} ({})", i + 1, name, typ);
                }
                println!("  Clusters:");
                for set in &mixed.clusters {
                    let source = match set.color_column {
                        Some(c) => format!(", colors from {}", mixed.column_header[c]),
                        None => String::new(),
                    };
                    println!("    {} [{}{}]", set.name, set.column_type, source);
                    for cluster in &set.clusters {
                        println!(
                            "      {} {} ({} samples)",
                            cluster.name,
                            to_hex(cluster.color),
                            cluster.indices.len()
                        );
                    }
                }
            }
        }
    }

    println!();
}

/// Quote and escape a string as a JSON literal.
fn json_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

fn print_json_output(path: &Path, output: &LoadOutput, verbose: bool) {
    print!(
        r#"{{"file":{},"name":{}"#,
        json_string(&path.display().to_string()),
        json_string(&output.name)
    );

    match &output.data {
        LoadedData::Numeric(m) => {
            print!(
                r#","kind":"numeric","samples":{},"dimensions":{}"#,
                m.rows(),
                m.columns()
            );
        }
        LoadedData::Mixed(mixed) => {
            print!(
                r#","kind":"mixed","samples":{},"numerical_dimensions":{}"#,
                mixed.row_header.len(),
                mixed.numeric.as_ref().map_or(0, NumericMatrix::columns)
            );

            if verbose {
                print!(r#","columns":["#);
                for (i, (name, typ)) in mixed
                    .column_header
                    .iter()
                    .zip(mixed.column_types.iter())
                    .enumerate()
                {
                    if i > 0 {
                        print!(",");
                    }
                    print!(r#"{{"name":{},"type":"{}"}}"#, json_string(name), typ);
                }
                print!("]");
            }

            print!(r#","cluster_sets":["#);
            for (i, set) in mixed.clusters.iter().enumerate() {
                if i > 0 {
                    print!(",");
                }
                let kind = match set.column_type {
                    ColumnType::Color => "color",
                    ColumnType::Unknown | ColumnType::Numerical | ColumnType::Categorical => {
                        "categorical"
                    }
                };
                print!(
                    r#"{{"name":{},"kind":"{}","clusters":["#,
                    json_string(&set.name),
                    kind
                );
                for (k, cluster) in set.clusters.iter().enumerate() {
                    if k > 0 {
                        print!(",");
                    }
                    print!(
                        r#"{{"name":{},"color":"{}","size":{}"#,
                        json_string(&cluster.name),
                        to_hex(cluster.color),
                        cluster.indices.len()
                    );
                    if verbose {
                        let indices: Vec<String> =
                            cluster.indices.iter().map(ToString::to_string).collect();
                        print!(r#","indices":[{}]"#, indices.join(","));
                    }
                    print!("}}");
                }
                print!("]}}");
            }
            print!("]");
        }
    }

    println!("}}");
}

/// Numeric loads print the matrix; mixed loads print cluster membership.
fn print_csv_output(output: &LoadOutput, separator: u8) -> csv_clusters::Result<()> {
    let corner = output.corner_label.as_deref().unwrap_or_default();
    let stdout = io::stdout().lock();
    match &output.data {
        LoadedData::Numeric(m) => export::write_numeric(stdout, m, corner, separator),
        LoadedData::Mixed(mixed) => {
            export::write_clusters(stdout, &mixed.clusters, &mixed.row_header, separator)
        }
    }
}

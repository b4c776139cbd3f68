//! chframe CLI - inspect ClickHouse type bindings and frame plans.

use chframe::{registry, Config, FrameError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "chframe")]
#[command(about = "Inspect how ClickHouse column types map onto frame fields")]
#[command(version)]
struct Cli {
    /// Output JSON to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registry entry
    List,

    /// Resolve column type names to their bindings
    Resolve {
        /// Column type names, e.g. "Nullable(Decimal(18,4))"
        #[arg(required = true)]
        types: Vec<String>,

        /// Fail if any type is unsupported
        #[arg(long)]
        strict: bool,
    },

    /// Plan a frame from a YAML column schema
    Plan {
        /// Path to YAML schema file
        #[arg(short, long, default_value = "schema.yaml")]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), FrameError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(FrameError::Config)?;

    match cli.command {
        Commands::List => {
            let reg = registry();
            if cli.output_json {
                let summaries: Vec<_> = reg.bindings().map(|b| b.summary()).collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                println!("{} type entries:", reg.len());
                for entry in reg.entries() {
                    let pattern = entry.pattern().map(|re| re.as_str()).unwrap_or("-");
                    let converter = entry.converter().map_or("unwrap", |c| c.name);
                    println!(
                        "  {:<28} {:<18} {:<20} {:<18} {}",
                        entry.name(),
                        entry.field_type(),
                        entry.scan_shape(),
                        converter,
                        pattern
                    );
                }
            }
        }

        Commands::Resolve { types, strict } => {
            let reg = registry();
            let mut unsupported = Vec::new();
            let mut results = Vec::with_capacity(types.len());

            for type_name in &types {
                let binding = reg.resolve(type_name);
                if !binding.is_supported() {
                    unsupported.push(type_name.clone());
                }
                results.push((type_name, binding.summary()));
            }

            if cli.output_json {
                let json: Vec<_> = results
                    .iter()
                    .map(|(name, summary)| {
                        serde_json::json!({ "type": name, "binding": summary })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else {
                for (name, summary) in &results {
                    match (&summary.entry, summary.field_type, summary.scan_shape) {
                        (Some(entry), Some(field_type), Some(shape)) => println!(
                            "{} -> {} (field: {}, scan: {}, converter: {})",
                            name,
                            entry,
                            field_type,
                            shape,
                            summary.converter.unwrap_or("unwrap")
                        ),
                        _ => println!("{} -> unsupported", name),
                    }
                }
            }

            if strict && !unsupported.is_empty() {
                return Err(FrameError::UnsupportedType(unsupported.join(", ")));
            }
        }

        Commands::Plan { config } => {
            let cfg = Config::load(&config)?;
            info!("Loaded schema from {:?}", config);

            let plan = cfg.plan(registry())?;
            let summary = plan.summary();

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Frame plan: {} of {} columns",
                    summary.len(),
                    plan.row_width()
                );
                for col in &summary {
                    let source = match (&col.entry, col.opaque) {
                        (Some(entry), _) => entry.as_str(),
                        (None, true) => "opaque",
                        (None, false) => "-",
                    };
                    println!(
                        "  {:<20} {:<40} {:<18} {}",
                        col.name, col.type_name, col.field_type, source
                    );
                }
            }
        }
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => return Err(format!("unknown verbosity '{}'", other)),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("unknown log format '{}'", other)),
    }

    Ok(())
}

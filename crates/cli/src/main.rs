use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plr_cli::bridge::Bridge;
use plr_cli::picker::PresetFolders;
use plr_cli::serve;
use plr_core::config;
use plr_core::models::{OrganizeOperation, OrganizeProgress};
use plr_core::scanner::ScanRequest;
use serde::Serialize;
use std::io::Read;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Parser)]
#[command(name = "plr-organizer")]
#[command(about = "Scan, score and organize a PLR content library", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer newline-delimited JSON bridge requests on stdin
    Serve,
    /// Print the folders configured for selection
    SelectFolders,
    /// List files under the given folders (configured folders if none given)
    Scan {
        paths: Vec<String>,
        /// Descend into subfolders
        #[arg(short, long, default_value_t = false)]
        recursive: bool,
        /// Accepted extensions (comma-separated, no dot); empty accepts all
        #[arg(long, value_delimiter = ',', num_args = 1.., default_values_t = Vec::<String>::new())]
        types: Vec<String>,
    },
    /// Score files for PLR evidence
    Analyze {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Execute a JSON move/copy plan ("-" reads stdin)
    Organize {
        plan: String,
        /// Replace existing targets instead of reporting a collision
        #[arg(long, default_value_t = false)]
        allow_overwrite: bool,
        /// Log progress after every operation
        #[arg(long, default_value_t = false)]
        progress: bool,
    },
    /// Extract a zip package into a directory
    Extract { zip: String, target: String },
    /// Report files with identical content under the given folders
    Duplicates {
        paths: Vec<String>,
        #[arg(short, long, default_value_t = false)]
        recursive: bool,
        #[arg(long, value_delimiter = ',', num_args = 1.., default_values_t = Vec::<String>::new())]
        types: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref())?;
    if let Commands::Organize {
        allow_overwrite: true,
        ..
    } = &cli.command
    {
        cfg.organize.allow_overwrite = true;
    }
    let picker = Arc::new(PresetFolders::new(cfg.scan.include.clone()));
    let bridge = Bridge::new(cfg, picker);

    match cli.command {
        Commands::Serve => {
            serve::serve(&bridge, tokio::io::stdin(), tokio::io::stdout()).await?;
            Ok(())
        }
        Commands::SelectFolders => print_json(&bridge.select_folders().await),
        Commands::Scan {
            paths,
            recursive,
            types,
        } => {
            let request = scan_request(&bridge, paths, recursive, types).await?;
            let roots = request.paths.len();
            let report = bridge.scan_report(request).await?;
            print_json(&report)?;
            if report.errors.len() == roots {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Analyze { paths } => print_json(&bridge.analyze_plr_files(paths).await),
        Commands::Organize { plan, progress, .. } => run_organize(&bridge, &plan, progress).await,
        Commands::Extract { zip, target } => {
            let response = bridge.extract_zip(&zip, &target).await;
            print_json(&response)?;
            if !response.success {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Duplicates {
            paths,
            recursive,
            types,
        } => {
            let request = scan_request(&bridge, paths, recursive, types).await?;
            let files = bridge.scan_folders(request).await?;
            let paths = files.into_iter().map(|f| f.path).collect();
            print_json(&bridge.find_duplicates(paths).await)
        }
    }
}

async fn scan_request(
    bridge: &Bridge,
    paths: Vec<String>,
    include_subfolders: bool,
    file_types: Vec<String>,
) -> Result<ScanRequest> {
    let paths = if paths.is_empty() {
        bridge
            .select_folders()
            .await
            .paths
            .context("no folders given and none configured under [scan] include")?
    } else {
        paths
    };
    Ok(ScanRequest {
        paths,
        include_subfolders,
        file_types,
    })
}

async fn run_organize(bridge: &Bridge, plan: &str, progress: bool) -> Result<()> {
    let raw = if plan == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(plan).with_context(|| format!("reading plan {plan}"))?
    };
    let operations: Vec<OrganizeOperation> =
        serde_json::from_str(&raw).context("plan must be a JSON array of operations")?;

    let results = if progress {
        let (tx, mut rx) = mpsc::channel::<OrganizeProgress>(32);
        let reporter = tokio::spawn(async move {
            while let Some(p) = rx.recv().await {
                info!(
                    completed = p.completed,
                    total = p.total,
                    source = %p.source.display(),
                    success = p.success,
                    "organize progress"
                );
            }
        });
        let results = bridge.organize_files_with_progress(operations, tx).await;
        reporter.await?;
        results
    } else {
        bridge.organize_files(operations).await
    };

    let failed = results.iter().filter(|r| !r.success).count();
    print_json(&results)?;
    if failed > 0 {
        eprintln!("organize: {} of {} operations failed", failed, results.len());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

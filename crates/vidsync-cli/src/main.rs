//! Vidsync CLI — reconcile course archives against the video registry.
//!
//! Set VIDSYNC_REGISTRY_URL (and optionally VIDSYNC_REGISTRY_TOKEN), or pass
//! --registry-url / --token.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vidsync_cli::{init_tracing, output_filename, tag_time};
use vidsync_core::RegistryConfig;
use vidsync_registry::RegistryClient;
use vidsync_services::{copy_archive, CourseTransformer};

#[derive(Parser)]
#[command(name = "vidsync", about = "Course video identity reconciliation")]
struct Cli {
    /// Registry base URL (overrides VIDSYNC_REGISTRY_URL)
    #[arg(long, global = true)]
    registry_url: Option<String>,
    /// Registry bearer token (overrides VIDSYNC_REGISTRY_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve video identifiers in course archives and write rewritten copies
    Convert {
        /// Archives (.tar.gz) or directories of archives to process
        inputs: Vec<PathBuf>,
        /// Course identifier (org/course/run); derived from course.xml when omitted
        #[arg(long)]
        course: Option<String>,
        /// Directory for converted archives
        #[arg(long, default_value = "converted_course_tarfile")]
        out_dir: PathBuf,
        /// Append each course's findings report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Snapshot an archive verbatim before conversion
    Copy {
        /// Archive (.tar.gz) to copy
        archive: PathBuf,
        /// Output path; defaults to a timestamped name next to the input
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Expand directories into their .tar.gz files, sorted for determinism.
fn collect_archives(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut archives = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in fs::read_dir(input)
                .with_context(|| format!("Failed to read directory {}", input.display()))?
            {
                let path = entry?.path();
                if path.to_string_lossy().ends_with(".tar.gz") {
                    found.push(path);
                }
            }
            found.sort();
            archives.extend(found);
        } else {
            archives.push(input.clone());
        }
    }
    if archives.is_empty() {
        bail!("No archives to process");
    }
    Ok(archives)
}

async fn convert_one(
    transformer: &CourseTransformer,
    path: &Path,
    course_hint: Option<&str>,
    out_dir: &Path,
    report_path: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let (archive, report) = transformer
        .transform(file, course_hint)
        .await
        .with_context(|| format!("Failed to convert {}", path.display()))?;

    let out_path = out_dir.join(output_filename(&report.course_id));
    fs::write(&out_path, &archive)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    let rendered = report.render_text();
    if let Some(report_path) = report_path {
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)
            .with_context(|| format!("Failed to open report {}", report_path.display()))?;
        log.write_all(rendered.as_bytes())?;
    }
    print!("{}", rendered);

    Ok(out_path)
}

fn registry_config(cli: &Cli) -> anyhow::Result<RegistryConfig> {
    let mut config = RegistryConfig::from_env()?;
    if let Some(url) = &cli.registry_url {
        config.base_url = url.clone();
    }
    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Convert {
            inputs,
            course,
            out_dir,
            report,
        } => {
            let client = RegistryClient::new(registry_config(&cli)?)
                .context("Failed to create registry client")?;
            let transformer = CourseTransformer::new(Arc::new(client));

            let archives = collect_archives(inputs)?;
            fs::create_dir_all(out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;

            // Courses are processed strictly sequentially; registry state and
            // report are per course.
            let mut failures = 0usize;
            for path in &archives {
                match convert_one(
                    &transformer,
                    path,
                    course.as_deref(),
                    out_dir,
                    report.as_deref(),
                )
                .await
                {
                    Ok(out_path) => {
                        println!("{}: converted -> {}", path.display(), out_path.display());
                    }
                    Err(err) => {
                        failures += 1;
                        tracing::error!(archive = %path.display(), error = ?err, "course failed");
                        eprintln!("{}: FAILED: {:#}", path.display(), err);
                    }
                }
            }

            if let Some(report) = report {
                println!("Check the issues in {} before importing", report.display());
            }
            if failures > 0 {
                bail!("{} of {} courses failed", failures, archives.len());
            }
        }
        Commands::Copy { archive, out } => {
            let file = File::open(archive)
                .with_context(|| format!("Failed to open {}", archive.display()))?;
            let copied = copy_archive(file)
                .with_context(|| format!("Failed to copy {}", archive.display()))?;

            let out_path = match out {
                Some(path) => path.clone(),
                None => {
                    let name = archive
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "archive.tar.gz".to_string());
                    archive.with_file_name(format!("{}{}", tag_time(), name))
                }
            };
            fs::write(&out_path, &copied)
                .with_context(|| format!("Failed to write {}", out_path.display()))?;
            println!("{} -> {}", archive.display(), out_path.display());
        }
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

mod config;

use config::FileConfig;
use stlmesh::stl::binary;
use stlmesh::{BoundingBox, Format, Mesh, Triangle, ValidationReport, decode_as, detect};

/// Inspect an STL file: detect its encoding, decode it and summarize the mesh
///
/// Examples:
///   # Print a summary
///   stlmesh part.stl
///
///   # Check normals and degenerate faces, list the first 10 triangles
///   stlmesh part.stl --validate --list 10
///
///   # Machine-readable output
///   stlmesh part.stl --json
#[derive(Parser, Debug)]
#[command(name = "stlmesh")]
#[command(version, about, long_about = None)]
struct Args {
    /// STL file to inspect
    file: PathBuf,

    /// Path to config file (optional, auto-searches stlmesh.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON document instead of text
    #[arg(long)]
    json: bool,

    /// Report degenerate triangles and suspicious normals
    #[arg(long)]
    validate: bool,

    /// Print the first N triangles
    #[arg(short = 'l', long)]
    list: Option<usize>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Effective settings after merging flags over the config file
#[derive(Debug, PartialEq)]
struct Settings {
    json: bool,
    validate: bool,
    list: usize,
    verbose: bool,
}

impl Settings {
    fn merge(args: &Args, file_config: Option<&FileConfig>) -> Self {
        Self {
            json: args.json || file_config.is_some_and(|c| c.json),
            validate: args.validate || file_config.is_some_and(|c| c.validate),
            list: args
                .list
                .or_else(|| file_config.map(|c| c.list))
                .unwrap_or(0),
            verbose: args.verbose || file_config.is_some_and(|c| c.verbose),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    file: &'a Path,
    format: Format,
    solid_name: &'a str,
    triangle_count: usize,
    bounding_box: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nonzero_attributes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<ValidationReport>,
    triangles: &'a [Triangle],
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = match args.config {
        Some(ref config_path) => Some(FileConfig::from_path(config_path)?),
        None => FileConfig::load(),
    };
    let settings = Settings::merge(&args, file_config.as_ref());

    init_tracing(settings.verbose);

    let start = Instant::now();
    let buffer = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read STL file: {}", args.file.display()))?;
    tracing::debug!(bytes = buffer.len(), file = %args.file.display(), "read input");

    let spinner = (!settings.json).then(|| create_spinner("Decoding STL..."));

    let decoded = decode_file(&buffer, &args.file);
    if let Some(spinner) = spinner {
        finish_spinner(&spinner, decoded.as_ref().map(|d| d.1.len()), start.elapsed());
    }
    let (format, mesh, nonzero_attributes) = decoded?;

    let validation = settings.validate.then(|| stlmesh::validate_mesh(&mesh));
    let shown = &mesh.triangles()[..settings.list.min(mesh.len())];

    let report = Report {
        file: &args.file,
        format,
        solid_name: mesh.solid_name(),
        triangle_count: mesh.len(),
        bounding_box: mesh.bounding_box(),
        nonzero_attributes,
        validation,
        triangles: shown,
    };

    if settings.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print_report(&report, &mesh, &buffer, settings.verbose);
    }

    Ok(())
}

/// Detect and decode `buffer`, counting non-zero attribute fields for binary input
fn decode_file(buffer: &[u8], path: &Path) -> Result<(Format, Mesh, Option<usize>)> {
    let format = detect(buffer)
        .with_context(|| format!("Failed to detect STL format: {}", path.display()))?;
    let mesh = decode_as(format, buffer)
        .with_context(|| format!("Failed to decode {} STL: {}", format, path.display()))?;

    let nonzero_attributes = match format {
        Format::Binary => Some(
            binary::attributes(buffer)?
                .iter()
                .filter(|&&a| a != 0)
                .count(),
        ),
        Format::Ascii => None,
    };

    Ok((format, mesh, nonzero_attributes))
}

/// Stop the spinner with the outcome of decoding
fn finish_spinner(spinner: &ProgressBar, triangles: Result<usize, &anyhow::Error>, elapsed: Duration) {
    match triangles {
        Ok(count) => spinner.finish_with_message(format!(
            "Decoded {} triangles [{:.1}s]",
            count,
            elapsed.as_secs_f32()
        )),
        Err(_) => spinner.abandon_with_message("Decoding failed"),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &Report<'_>, mesh: &Mesh, buffer: &[u8], verbose: bool) {
    println!();
    println!("File:      {}", report.file.display());
    println!("Format:    {}", report.format);
    if report.format == Format::Ascii {
        println!("Solid:     {:?}", report.solid_name);
    }
    println!("Triangles: {}", report.triangle_count);

    if verbose
        && report.format == Format::Binary
        && let Ok(header) = binary::header(buffer)
    {
        let text = String::from_utf8_lossy(header);
        println!("Header:    {:?}", text.trim_end_matches(|c: char| c == '\0' || c == ' '));
    }

    if let Some(count) = report.nonzero_attributes
        && count > 0
    {
        println!("Attributes: {} records carry a non-zero attribute", count);
    }

    match report.bounding_box {
        Some(bounds) => {
            let size = bounds.size();
            println!(
                "Bounds:    ({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3})",
                bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
            );
            println!("Size:      {:.3} x {:.3} x {:.3}", size.x, size.y, size.z);
        }
        None => println!("Bounds:    (empty mesh)"),
    }

    if let Some(ref validation) = report.validation {
        println!();
        println!("{}", validation.summary());
        for warning in &validation.warnings {
            println!("  - {}", warning);
        }
    }

    if !report.triangles.is_empty() {
        println!();
        println!(
            "First {} of {} triangles:",
            report.triangles.len(),
            mesh.len()
        );
        for (i, tri) in report.triangles.iter().enumerate() {
            let n = tri.normal();
            println!("  #{} normal ({}, {}, {})", i, n.x, n.y, n.z);
            for v in tri.vertices() {
                println!("      vertex ({}, {}, {})", v.x, v.y, v.z);
            }
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

//! Resume Renderer
//!
//! Renders a resume record JSON file into a PDF.
//!
//! Usage:
//!   cargo run --example render_resume -- [input.json] [output.pdf]
//!
//! Examples:
//!   cargo run --example render_resume
//!   RESUME_COMPRESS=false cargo run --example render_resume -- my_resume.json out.pdf

use anyhow::Context;
use resume::{ResumeConfig, ResumeRecord, ResumeRenderer};
use std::path::{Path, PathBuf};

const DEFAULT_INPUT: &str = "demos/input/sample_resume.json";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let input_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_INPUT);

    let body = std::fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read input '{input_path}'"))?;
    let record = ResumeRecord::from_json(&body)?;

    let config = ResumeConfig::from_env()?;
    let renderer = ResumeRenderer::new(&config)?;
    let document = renderer.render(&record)?;

    // Default output is named after the resume owner
    let output_path = match args.get(2) {
        Some(path) => PathBuf::from(path),
        None => Path::new("output").join(&document.filename),
    };
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&output_path, &document.bytes)
        .with_context(|| format!("Failed to write '{}'", output_path.display()))?;

    println!(
        "Generated: {} ({} template, {} bytes)",
        output_path.display(),
        record.template,
        document.bytes.len()
    );

    Ok(())
}

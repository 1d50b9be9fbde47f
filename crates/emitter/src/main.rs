use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use common::{get_example_files, Config, TestResult, EXAMPLE_DIR};
use emitter::{DdlEmitter, EmitError};
use normalizer::SchemaDocument;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    if config.should_process_all() {
        if !run_all_examples(&config) {
            process::exit(1);
        }
        return;
    }

    if let Err(e) = emit_file(&config, Path::new(config.schema())) {
        error!("{}", e);
        process::exit(1);
    }
}

/// Normalize one document and write its DDL; returns the number of tables.
fn emit_file(config: &Config, path: &Path) -> emitter::Result<usize> {
    let document = SchemaDocument::from_path(path)?;
    let mut normalizer = document.to_normalizer()?;
    let relations = normalizer.normalize(config.target(), config.canonical())?;
    let script = DdlEmitter::new(&normalizer, &relations).script()?;

    match config.output_dir() {
        Some(dir) if !config.output_to_stdout() => {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("schema");
            let target = PathBuf::from(dir).join(format!("{}.sql", stem));
            write_script(&target, &script)?;
            info!("Wrote {} tables to {}", relations.len(), target.display());
        }
        _ => println!("{}", script),
    }
    Ok(relations.len())
}

fn write_script(target: &Path, script: &str) -> emitter::Result<()> {
    let io_error = |e: std::io::Error| EmitError::Io {
        path: target.display().to_string(),
        e: e.to_string(),
    };
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(target, script).map_err(io_error)
}

fn run_all_examples(config: &Config) -> bool {
    let files = match get_example_files(EXAMPLE_DIR) {
        Ok(files) => files,
        Err(e) => {
            error!("Error: {}", e);
            return false;
        }
    };

    let mut result = TestResult::new("emitter", files.len());
    for path in &files {
        let file_name = path.display().to_string();
        match emit_file(config, path) {
            Ok(tables) => result.report_success(&file_name, Some(&format!("tables={}", tables))),
            Err(e) => result.report_failure(&file_name, Some(&e.to_string())),
        }
    }
    result.finish()
}

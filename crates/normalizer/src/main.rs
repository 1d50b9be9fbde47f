use std::path::Path;
use std::process;

use clap::Parser;
use common::{get_example_files, Config, TestResult, EXAMPLE_DIR};
use normalizer::{NormalizedRelation, Normalizer, SchemaDocument};
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

    match normalize_file(&config, Path::new(config.schema())) {
        Ok((normalizer, relations)) => report(&normalizer, &relations),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

fn normalize_file(
    config: &Config,
    path: &Path,
) -> normalizer::Result<(Normalizer, Vec<NormalizedRelation>)> {
    let document = SchemaDocument::from_path(path)?;
    let mut normalizer = document.to_normalizer()?;
    let relations = normalizer.normalize(config.target(), config.canonical())?;
    Ok((normalizer, relations))
}

fn report(normalizer: &Normalizer, relations: &[NormalizedRelation]) {
    info!("Input:\n{}", normalizer);
    for (i, relation) in relations.iter().enumerate() {
        info!(
            "Table {}: {} [{}]",
            i + 1,
            relation.schema().display(normalizer),
            relation.normal_form()
        );
    }
}

fn run_all_examples(config: &Config) -> bool {
    let files = match get_example_files(EXAMPLE_DIR) {
        Ok(files) => files,
        Err(e) => {
            error!("Error: {}", e);
            return false;
        }
    };

    let mut result = TestResult::new("normalizer", files.len());
    for path in &files {
        let file_name = path.display().to_string();
        match normalize_file(config, path) {
            Ok((_, relations)) => {
                let weakest = relations.iter().map(|r| r.normal_form()).min();
                let stats = format!(
                    "tables={}, weakest={}",
                    relations.len(),
                    weakest.map_or_else(|| "-".to_string(), |nf| nf.to_string())
                );
                result.report_success(&file_name, Some(&stats));
            }
            Err(e) => result.report_failure(&file_name, Some(&e.to_string())),
        }
    }
    result.finish()
}

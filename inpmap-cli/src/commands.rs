//! Subcommand handlers
//!
//! Human-readable results go to stdout, diagnostics to stderr. Every handler returns an
//! error for the conditions that should end the process with status 1.

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use inpmap_config::MapperConfig;
use inpmap_parser::inp::{
    validate as validate_model, ErrorPolicy, Freshness, GenerateError, GenerateOptions,
    DiscoveryWarning, Generation, InterfaceDocument, ModelLoader, ValidationReport,
};
use std::path::{Path, PathBuf};
use tracing::info;

fn path_arg<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a PathBuf> {
    matches
        .get_one::<PathBuf>(id)
        .with_context(|| format!("missing required argument '{}'", id))
}

fn names(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn load(path: &Path) -> Result<ModelLoader> {
    info!("Processing {}", path.display());
    ModelLoader::from_path(path).with_context(|| format!("Cannot load model {}", path.display()))
}

fn report_issues(report: &ValidationReport) {
    for issue in report.issues() {
        eprintln!("{}", issue);
    }
}

/// Skipped references are printed whatever the log level.
fn report_warnings(warnings: &[DiscoveryWarning]) {
    for warning in warnings {
        eprintln!("WARNING: {}", warning);
    }
}

pub fn generate(matches: &ArgMatches, config: &MapperConfig) -> Result<()> {
    let path = path_arg(matches, "path")?;
    let options = GenerateOptions {
        policy: if config.generate.abort_on_error {
            ErrorPolicy::Abort
        } else {
            ErrorPolicy::Annotate
        },
        inputs: names(matches, "input"),
        outputs: names(matches, "output"),
    };

    let generation = match load(path)?.generate(&options) {
        Ok(generation) => generation,
        Err(GenerateError::Blocked(report)) => {
            report_issues(&report);
            bail!(
                "{} has {} validation error(s); fix them or pass --allow-errors",
                path.display(),
                report.errors().count()
            );
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Cannot map {}", path.display()));
        }
    };
    report_issues(&generation.report);
    report_warnings(&generation.warnings);

    let output = &config.generate.output_file;
    generation
        .document
        .write_to(output)
        .context("Cannot write interface document")?;

    print_summary(&generation, config, output);
    Ok(())
}

fn print_summary(generation: &Generation, config: &MapperConfig, output: &Path) {
    let document = &generation.document;

    println!("Parsed {} sections", generation.sections.len());
    if config.summary.list_sections {
        for section in generation.sections.iter() {
            println!("  [{}]: {} entries", section.name(), section.rows().len());
        }
    }
    println!("Content fingerprint: {}", document.content_fingerprint);

    println!("Inputs ({}):", document.input_count);
    for entry in &document.inputs {
        println!(
            "  [{}] {} ({} -> {})",
            entry.index, entry.name, entry.object_type, entry.property
        );
    }
    println!("Outputs ({}):", document.output_count);
    for entry in &document.outputs {
        println!(
            "  [{}] {} ({} -> {})",
            entry.index, entry.name, entry.object_type, entry.property
        );
    }
    println!("Wrote {}", output.display());
}

pub fn validate(matches: &ArgMatches) -> Result<()> {
    let path = path_arg(matches, "path")?;
    let sections = load(path)?.parse()?;
    let report = validate_model(&sections);

    if report.is_empty() {
        println!("No validation issues found in {}", path.display());
        return Ok(());
    }

    for issue in report.issues() {
        println!("{}", issue);
    }
    let errors = report.errors().count();
    println!("{} error(s), {} warning(s)", errors, report.warnings().count());

    if errors > 0 {
        bail!("{} has {} validation error(s)", path.display(), errors);
    }
    Ok(())
}

pub fn check(matches: &ArgMatches) -> Result<()> {
    let path = path_arg(matches, "path")?;
    let mapping = path_arg(matches, "mapping")?;

    let current = load(path)?.fingerprint();
    let document = InterfaceDocument::read_from(mapping)
        .with_context(|| format!("Invalid interface document {}", mapping.display()))?;

    match document.freshness(&current) {
        Freshness::Fresh => {
            println!(
                "{} is up to date ({} inputs, {} outputs)",
                mapping.display(),
                document.input_count,
                document.output_count
            );
            Ok(())
        }
        Freshness::Stale => bail!(
            "{} is stale: generated from {}, model is now {}",
            mapping.display(),
            document.content_fingerprint,
            current
        ),
    }
}

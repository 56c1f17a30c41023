use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::core::model::PositionalProbabilityModel;
use crate::parsing::confidence::parse_confidence_file;
use crate::parsing::fasta::{read_reference, SequenceRecord};

#[derive(Args)]
pub struct ModelArgs {
    /// Reference FASTA file (first record is used)
    #[arg(short, long, required = true)]
    pub reference: PathBuf,

    /// Confidence file with one probability per reference base
    #[arg(short, long, required = true)]
    pub confidence: PathBuf,
}

/// Read a reference and its confidence values and build the model
pub(crate) fn load_model(
    reference: &Path,
    confidence: &Path,
) -> anyhow::Result<(SequenceRecord, PositionalProbabilityModel)> {
    let record = read_reference(reference)
        .with_context(|| format!("Failed to read reference {}", reference.display()))?;
    let values = parse_confidence_file(confidence)
        .with_context(|| format!("Failed to read confidence values {}", confidence.display()))?;
    let model = PositionalProbabilityModel::build(&record.sequence, &values)
        .with_context(|| format!("Invalid model input for reference {}", record.name))?;
    Ok((record, model))
}

/// Execute the model command
///
/// # Errors
///
/// Returns an error if the reference or confidence file cannot be parsed, or
/// if they do not describe a valid model.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ModelArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (record, model) = load_model(&args.reference, &args.confidence)?;

    if verbose {
        eprintln!("Reference {}: {} positions", record.name, model.len());
    }

    match format {
        OutputFormat::Text => {
            println!("Reference: {} ({} bp)\n", record.name, model.len());
            println!(
                "{:>8}  {:>3}  {:>6}  {:>6}  {:>6}  {:>6}  {:>6}",
                "pos", "obs", "conf", "A", "T", "G", "C"
            );
            for d in model.distributions() {
                println!(
                    "{:>8}  {:>3}  {:>6.3}  {:>6.3}  {:>6.3}  {:>6.3}  {:>6.3}",
                    d.position, d.observed, d.confidence, d.a, d.t, d.g, d.c
                );
            }
        }
        OutputFormat::Json => {
            let distributions: Vec<_> = model.distributions().collect();
            println!("{}", serde_json::to_string_pretty(&distributions)?);
        }
        OutputFormat::Tsv => {
            println!("position\tobserved\tconfidence\tA\tT\tG\tC");
            for d in model.distributions() {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    d.position, d.observed, d.confidence, d.a, d.t, d.g, d.c
                );
            }
        }
    }

    Ok(())
}

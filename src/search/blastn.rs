//! `blastn` subprocess wrapper.
//!
//! The reference is written to a temporary FASTA file and indexed with
//! `makeblastdb` once; each query is then written to its own single-sequence
//! FASTA file and searched with `blastn`, requesting only the four seed
//! coordinate columns.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tracing::{debug, info};

use super::{SearchError, SeedSource};
use crate::core::types::{QueryRecord, SeedMatch};
use crate::parsing::fasta::{write_record, SequenceRecord};
use crate::parsing::hits::{parse_hits_text, SEED_OUTFMT};

/// Search parameters passed to `blastn`.
///
/// Only plus-strand ungapped hits can be scored, so `-strand plus` and
/// `-ungapped` are always passed and are not configurable. Unknown keys such as
/// `strand` or `ungapped` are rejected when a configuration is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlastParams {
    /// Expectation value threshold
    pub evalue: f64,
    /// Length of the initial exact word match
    pub word_size: u32,
    /// Minimum percent identity of reported hits
    pub perc_identity: f64,
}

impl Default for BlastParams {
    fn default() -> Self {
        Self {
            evalue: 10.0,
            word_size: 11,
            perc_identity: 0.0,
        }
    }
}

impl BlastParams {
    /// Arguments for `blastn`, excluding `-query` and `-db`
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "-outfmt".to_string(),
            SEED_OUTFMT.to_string(),
            "-evalue".to_string(),
            self.evalue.to_string(),
            "-word_size".to_string(),
            self.word_size.to_string(),
            "-perc_identity".to_string(),
            self.perc_identity.to_string(),
            "-strand".to_string(),
            "plus".to_string(),
            "-ungapped".to_string(),
        ]
    }
}

/// Locations of the BLAST+ executables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlastTools {
    pub blastn: PathBuf,
    pub makeblastdb: PathBuf,
}

impl Default for BlastTools {
    fn default() -> Self {
        Self {
            blastn: PathBuf::from("blastn"),
            makeblastdb: PathBuf::from("makeblastdb"),
        }
    }
}

/// Name of the temporary database inside the working directory
const DB_NAME: &str = "reference";

/// A prepared `blastn` search against one reference
pub struct BlastnSearch {
    tools: BlastTools,
    params: BlastParams,
    /// Holds the database and per-query files; removed on drop
    workdir: TempDir,
}

impl BlastnSearch {
    /// Index `reference` with `makeblastdb` using the tools on `PATH`
    ///
    /// # Errors
    ///
    /// Returns `SearchError::ExternalTool` if `makeblastdb` cannot be run or fails.
    pub fn prepare(reference: &SequenceRecord, params: BlastParams) -> Result<Self, SearchError> {
        Self::with_tools(reference, params, BlastTools::default())
    }

    /// Index `reference` with `makeblastdb` using explicit tool paths
    ///
    /// # Errors
    ///
    /// Returns `SearchError::ExternalTool` if `makeblastdb` cannot be run or fails,
    /// or `SearchError::Io` if the temporary files cannot be written.
    pub fn with_tools(
        reference: &SequenceRecord,
        params: BlastParams,
        tools: BlastTools,
    ) -> Result<Self, SearchError> {
        let workdir = tempfile::Builder::new().prefix("pblast-").tempdir()?;

        let reference_path = workdir.path().join("reference.fa");
        let mut file = std::fs::File::create(&reference_path)?;
        write_record(&mut file, &reference.name, &reference.sequence)?;
        drop(file);

        let db_path = workdir.path().join(DB_NAME);
        let args: Vec<OsString> = vec![
            "-in".into(),
            reference_path.into_os_string(),
            "-dbtype".into(),
            "nucl".into(),
            "-out".into(),
            db_path.into_os_string(),
        ];
        run_tool(&tools.makeblastdb, &args)?;

        info!(
            "Indexed reference {} ({} bp) for blastn",
            reference.name,
            reference.sequence.len()
        );

        Ok(Self {
            tools,
            params,
            workdir,
        })
    }

    fn db_path(&self) -> PathBuf {
        self.workdir.path().join(DB_NAME)
    }
}

impl SeedSource for BlastnSearch {
    fn seeds(&self, query: &QueryRecord) -> Result<Vec<SeedMatch>, SearchError> {
        let mut query_file = tempfile::Builder::new()
            .prefix("query-")
            .suffix(".fa")
            .tempfile_in(self.workdir.path())?;
        let sequence: Vec<u8> = query.symbols.iter().map(|n| n.as_byte()).collect();
        write_record(&mut query_file, &query.id, &sequence)?;

        let mut args: Vec<OsString> = vec![
            "-query".into(),
            query_file.path().as_os_str().to_owned(),
            "-db".into(),
            self.db_path().into_os_string(),
        ];
        args.extend(self.params.to_args().into_iter().map(OsString::from));

        let output = run_tool(&self.tools.blastn, &args)?;
        let stdout = String::from_utf8(output.stdout).map_err(|e| SearchError::ExternalTool {
            tool: tool_name(&self.tools.blastn),
            message: format!("output is not UTF-8: {e}"),
        })?;

        let seeds: Vec<SeedMatch> = parse_hits_text(&stdout)
            .map_err(|source| SearchError::Output {
                tool: tool_name(&self.tools.blastn),
                source,
            })?
            .into_iter()
            .map(|hit| hit.seed)
            .collect();

        debug!(query = %query.id, seeds = seeds.len(), "blastn finished");
        Ok(seeds)
    }

    fn name(&self) -> &'static str {
        "blastn"
    }
}

fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .map_or_else(|| program.display().to_string(), |n| n.to_string_lossy().to_string())
}

/// Run a program to completion, failing on launch errors or a non-zero exit
fn run_tool(program: &Path, args: &[OsString]) -> Result<Output, SearchError> {
    debug!("Running {} {:?}", program.display(), args);

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| SearchError::ExternalTool {
            tool: tool_name(program),
            message: format!("failed to start {}: {e}", program.display()),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SearchError::ExternalTool {
            tool: tool_name(program),
            message: format!("exit status {}: {}", output.status, stderr.trim()),
        });
    }

    Ok(output)
}

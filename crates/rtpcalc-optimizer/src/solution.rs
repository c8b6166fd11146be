//! The optimizer's answer and its on-disk form.
//!
//! The output document is a JSON array with one probability per tier, in
//! input order, pretty-printed with four-space indentation.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use serde::Serialize as _;
use serde_json::ser::PrettyFormatter;

use crate::{genetic::Individual, problem::Problem};

/// File name the calculator writes its result to.
pub const OUTPUT_FILE_NAME: &str = "rtp_probabilities.json";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum WriteOutputError {
    #[display("failed to write output file: {}", path.display())]
    Unwritable { path: PathBuf, source: io::Error },
    #[display("failed to serialize probabilities to {}", path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Best probability vector found by a run, with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    probabilities: Vec<f64>,
    fitness: f64,
    expected_payout: f64,
}

impl Solution {
    /// Builds a solution from a freshly evaluated individual.
    #[must_use]
    pub fn from_individual(individual: Individual, problem: &Problem) -> Self {
        let fitness = individual.fitness();
        let probabilities = individual.into_probabilities();
        let expected_payout = problem.expected_payout(&probabilities);
        Self {
            probabilities,
            fitness,
            expected_payout,
        }
    }

    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn expected_payout(&self) -> f64 {
        self.expected_payout
    }

    /// Writes the probability vector as a single complete JSON document.
    ///
    /// The document is written to a temporary sibling file and renamed over
    /// `path`, so `path` holds either the previous content or the full new
    /// document.
    pub fn save_json<P>(&self, path: P) -> Result<(), WriteOutputError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let tmp_path = temporary_path(path);
        let result = self
            .write_json(&tmp_path)
            .and_then(|()| fs::rename(&tmp_path, path).map_err(|e| unwritable(path, e)));
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    fn write_json(&self, tmp_path: &Path) -> Result<(), WriteOutputError> {
        let file = File::create(tmp_path).map_err(|e| unwritable(tmp_path, e))?;
        let mut writer = BufWriter::new(file);
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
        self.probabilities
            .serialize(&mut ser)
            .map_err(|source| WriteOutputError::Serialize {
                path: tmp_path.to_owned(),
                source,
            })?;
        writeln!(writer).map_err(|e| unwritable(tmp_path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| unwritable(tmp_path, e.into_error()))?;
        file.sync_all().map_err(|e| unwritable(tmp_path, e))?;
        Ok(())
    }
}

fn unwritable(path: &Path, source: io::Error) -> WriteOutputError {
    WriteOutputError::Unwritable {
        path: path.to_owned(),
        source,
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_owned();
    name.push(".tmp");
    path.with_file_name(name)
}

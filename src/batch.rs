use crate::errors::PatchError;
use crate::Patch;
use log::debug;
use std::path::{Path, PathBuf};

/// What happened to a single input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<String, PatchError>,
}

/// Per-file results of running one patch over several manifests, in input
/// order. A failing file never stops the ones after it.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn run<P: Patch + ?Sized>(patch: &P, paths: &[PathBuf]) -> Self {
        let outcomes = paths
            .iter()
            .map(|path| {
                debug!("Processing {}", path.display());
                FileOutcome {
                    path: path.clone(),
                    result: patch.process(path),
                }
            })
            .collect();
        BatchReport { outcomes }
    }

    pub fn documents(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.result {
            Ok(document) => Some((outcome.path.as_path(), document.as_str())),
            Err(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &PatchError)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.result {
            Ok(_) => None,
            Err(e) => Some((outcome.path.as_path(), e)),
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

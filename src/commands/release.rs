use super::SubCommand;
use clap::Args;
use csv_patcher::release::DEFAULT_OPERATOR_NAME;
use csv_patcher::{CsvVersion, Patch, ReleasePatch};
use simplelog::*;
use std::io::Write;
use std::path::PathBuf;

/// Stamps a release version and operator image into a CSV
#[derive(Args)]
pub struct ReleaseCommand {
    /// Path to the ClusterServiceVersion manifest
    csv_file: PathBuf,
    /// Release version including its prefix, e.g. v0.18.0
    #[arg(value_name = "VERSION")]
    csv_version: String,
    /// Operator container image reference
    image: String,
    /// Resource name prefix, joined to the version with a dot
    #[arg(long = "operator-name", default_value = DEFAULT_OPERATOR_NAME)]
    operator_name: String,
    /// Overwrite metadata.namespace
    #[arg(long = "namespace", short = 'n')]
    namespace: Option<String>,
}

impl SubCommand for ReleaseCommand {
    fn execute(&self) -> Result<(), anyhow::Error> {
        // parsed here rather than by clap so its warnings reach the logger
        let version: CsvVersion = self.csv_version.parse()?;
        let patch = ReleasePatch {
            version,
            image: self.image.clone(),
            operator_name: self.operator_name.clone(),
            namespace: self.namespace.clone(),
        };
        info!(
            "Patching {} as {}",
            self.csv_file.display(),
            patch.versioned_name()
        );

        let document = patch.process(&self.csv_file)?;
        std::io::stdout().lock().write_all(document.as_bytes())?;
        Ok(())
    }
}

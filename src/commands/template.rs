use super::SubCommand;
use anyhow::bail;
use clap::Args;
use csv_patcher::{get_profile, BatchReport, ProfileType, TemplateProfile};
use simplelog::*;
use std::io::Write;
use std::path::PathBuf;

/// Overwrites CSV fields with a template profile, one file after another
#[derive(Args)]
pub struct TemplateCommand {
    /// Manifests to patch
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Built-in profile to apply
    #[arg(long = "profile", short = 'p', value_enum, default_value_t = ProfileType::default())]
    profile: ProfileType,
    /// Read the profile from a YAML file instead of using a built-in one
    #[arg(long = "profile-file", conflicts_with = "profile")]
    profile_file: Option<PathBuf>,
    /// Exit with an error if any file could not be patched
    #[arg(long)]
    strict: bool,
}

impl TemplateCommand {
    fn load_profile(&self) -> Result<TemplateProfile, anyhow::Error> {
        match &self.profile_file {
            Some(path) => Ok(TemplateProfile::from_file(path)?),
            None => Ok(get_profile(self.profile)),
        }
    }
}

impl SubCommand for TemplateCommand {
    fn execute(&self) -> Result<(), anyhow::Error> {
        let profile = self.load_profile()?;
        let report = BatchReport::run(&profile, &self.files);

        let mut stdout = std::io::stdout().lock();
        let mut written = 0;
        for outcome in &report.outcomes {
            match &outcome.result {
                Ok(document) => {
                    if written > 0 {
                        stdout.write_all(b"---\n")?;
                    }
                    stdout.write_all(document.as_bytes())?;
                    written += 1;
                }
                Err(e) => error!("error processing {:?}: {}", outcome.path, e),
            }
        }
        stdout.flush()?;

        if self.strict && report.has_failures() {
            bail!(
                "{} of {} files could not be patched",
                report.failures().count(),
                self.files.len()
            );
        }
        Ok(())
    }
}

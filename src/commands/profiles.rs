use super::SubCommand;
use clap::Args;
use csv_patcher::{get_profile, ProfileType};
use std::io::Write;
use strum::IntoEnumIterator;

/// Lists the built-in template profiles, or prints one as YAML
#[derive(Args)]
pub struct ProfilesCommand {
    /// Profile to print; usable as a starting point for --profile-file
    #[arg(value_enum)]
    name: Option<ProfileType>,
}

impl SubCommand for ProfilesCommand {
    fn execute(&self) -> Result<(), anyhow::Error> {
        let mut stdout = std::io::stdout().lock();
        match self.name {
            Some(name) => {
                let yaml = serde_yaml::to_string(&get_profile(name))?;
                stdout.write_all(yaml.as_bytes())?;
            }
            None => {
                for profile in ProfileType::iter() {
                    writeln!(stdout, "{}", profile)?;
                }
            }
        }
        Ok(())
    }
}

// Template profiles are fixed sets of field overrides stamped onto a CSV
// (used before the release values are known, placeholders get substituted later)

use crate::errors::{PatchError, Result};
use crate::manifest::{KeyPath, Manifest};
use crate::Patch;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::fs;
use std::path::Path;

lazy_static! {
    pub static ref OLM_BUNDLE: TemplateProfile =
        serde_yaml::from_str(include_str!("profiles/olm-bundle.yaml"))
            .expect("olm-bundle.yaml is not a valid profile");
    pub static ref PLACEHOLDER: TemplateProfile =
        serde_yaml::from_str(include_str!("profiles/placeholder.yaml"))
            .expect("placeholder.yaml is not a valid profile");
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    clap::ValueEnum,
    strum_macros::EnumIter,
    strum_macros::Display,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ProfileType {
    /// Namespace, annotations and descriptive spec fields for an OLM bundle
    #[default]
    OlmBundle,
    /// Only the name and version placeholders
    Placeholder,
}

pub fn get_profile(entity: ProfileType) -> TemplateProfile {
    match entity {
        ProfileType::OlmBundle => OLM_BUNDLE.clone(),
        ProfileType::Placeholder => PLACEHOLDER.clone(),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TemplateProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub annotations: Mapping,
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub spec: Mapping,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TemplateProfile {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| PatchError::Profile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_yaml::from_str(&contents).map_err(|e| PatchError::Profile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl Patch for TemplateProfile {
    /// Overwrites the profile's fields in `manifest`. Annotations and spec
    /// entries replace top-level keys only; their parents have to exist
    /// whenever the profile has something to merge into them.
    fn apply(&self, manifest: &mut Manifest) -> Result<()> {
        if let Some(namespace) = &self.namespace {
            manifest.set(&KeyPath::from("metadata.namespace"), namespace.as_str())?;
        }
        if !self.annotations.is_empty() {
            manifest.merge(&KeyPath::from("metadata.annotations"), &self.annotations)?;
        }
        if !self.spec.is_empty() {
            manifest.merge(&KeyPath::from("spec"), &self.spec)?;
        }
        if let Some(version) = &self.spec_version {
            manifest.set(&KeyPath::from("spec.version"), version.as_str())?;
        }
        if let Some(name) = &self.name {
            manifest.set(&KeyPath::from("metadata.name"), name.as_str())?;
        }
        Ok(())
    }
}

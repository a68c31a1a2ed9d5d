//! Patches ClusterServiceVersion manifests before they are packaged into an
//! OLM bundle.
//!
//! A [`Patch`] is a fixed set of mutations applied to a [`Manifest`]. Two
//! kinds exist: [`ReleasePatch`] stamps a concrete version and image into a
//! generated CSV, [`TemplateProfile`] overwrites fields with a preset.

pub mod batch;
pub mod errors;
pub mod manifest;
pub mod profile;
pub mod release;
pub mod version;

pub use batch::{BatchReport, FileOutcome};
pub use errors::{PatchError, Result};
pub use manifest::{KeyPath, Manifest};
pub use profile::{get_profile, ProfileType, TemplateProfile};
pub use release::ReleasePatch;
pub use version::CsvVersion;

use std::path::Path;

pub trait Patch {
    fn apply(&self, manifest: &mut Manifest) -> Result<()>;

    /// Loads `path`, applies the patch and returns the YAML document. Nothing
    /// is returned unless every mutation succeeded.
    fn process(&self, path: &Path) -> Result<String> {
        let mut manifest = Manifest::load(path)?;
        self.apply(&mut manifest)?;
        manifest.to_yaml()
    }
}

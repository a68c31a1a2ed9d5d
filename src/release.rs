//! Stamps a release version and operator image into a generated CSV.

use crate::errors::{PatchError, Result};
use crate::manifest::{KeyPath, Manifest};
use crate::version::CsvVersion;
use crate::Patch;
use log::debug;
use serde_yaml::Value;

pub const DEFAULT_OPERATOR_NAME: &str = "ssp-operator";
pub const OPERATOR_VERSION_ENV: &str = "OPERATOR_VERSION";
pub const WEBHOOK_PORT_NAME: &str = "webhook-server";

const POD_SPEC: &str = "spec.install.spec.deployments[0].spec.template.spec";

#[derive(Debug, Clone)]
pub struct ReleasePatch {
    pub version: CsvVersion,
    pub image: String,
    pub operator_name: String,
    pub namespace: Option<String>,
}

impl ReleasePatch {
    pub fn new(version: CsvVersion, image: impl Into<String>) -> Self {
        ReleasePatch {
            version,
            image: image.into(),
            operator_name: DEFAULT_OPERATOR_NAME.to_string(),
            namespace: None,
        }
    }

    pub fn versioned_name(&self) -> String {
        format!("{}.{}", self.operator_name, self.version.full())
    }
}

impl Patch for ReleasePatch {
    /// Applies every mutation in order. The manifest is left partially
    /// modified if a step fails, so callers should drop it on error.
    fn apply(&self, manifest: &mut Manifest) -> Result<()> {
        manifest.set(&KeyPath::from("metadata.name"), self.versioned_name())?;
        if let Some(namespace) = &self.namespace {
            manifest.set(&KeyPath::from("metadata.namespace"), namespace.as_str())?;
        }
        manifest.set(
            &KeyPath::from("metadata.annotations.containerImage"),
            self.image.as_str(),
        )?;
        manifest.set(&KeyPath::from("spec.version"), self.version.bare())?;

        let pod_spec = KeyPath::from(POD_SPEC);
        let container = pod_spec.clone().key("containers").index(0);

        let env = manifest.find_entry_mut(
            &container.clone().key("env"),
            "name",
            OPERATOR_VERSION_ENV,
        )?;
        env.insert(Value::from("value"), Value::from(self.version.full()));

        let port = webhook_port(manifest, &container)?;
        debug!("Webhook server listens on container port {:?}", port);
        let webhooks = KeyPath::from("spec.webhookdefinitions");
        for webhook in 0..manifest.sequence_mut(&webhooks)?.len() {
            manifest.set(
                &webhooks.clone().index(webhook).key("containerPort"),
                port.clone(),
            )?;
        }

        manifest.remove(&pod_spec.key("volumes"))?;
        manifest.remove(&container.key("volumeMounts"))?;

        Ok(())
    }
}

fn webhook_port(manifest: &mut Manifest, container: &KeyPath) -> Result<Value> {
    let ports = container.clone().key("ports");
    let entry = manifest.find_entry_mut(&ports, "name", WEBHOOK_PORT_NAME)?;
    entry
        .get("containerPort")
        .cloned()
        .ok_or_else(|| PatchError::MissingKey {
            path: format!("{}[name={}].containerPort", ports, WEBHOOK_PORT_NAME),
        })
}

//! In-memory YAML tree of a ClusterServiceVersion with path-aware access.
//!
//! Nothing here knows about CSV semantics; the patch modules describe where
//! they want to go with a [`KeyPath`] and get back a [`PatchError`] naming
//! the exact spot that was missing when the manifest doesn't have it.

use crate::errors::{PatchError, Result};
use serde_yaml::{Mapping, Sequence, Value};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A location inside a manifest, rendered as `spec.install.spec.deployments[0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn prefix(&self, len: usize) -> KeyPath {
        KeyPath {
            segments: self.segments[..len].to_vec(),
        }
    }

    fn split_last(&self) -> Option<(KeyPath, &Segment)> {
        let (last, _) = self.segments.split_last()?;
        Some((self.prefix(self.segments.len() - 1), last))
    }
}

impl From<&str> for KeyPath {
    /// Parses dotted notation with optional `[n]` suffixes. A part whose
    /// brackets don't hold plain indices is kept as a literal key.
    fn from(path: &str) -> Self {
        let mut segments = Vec::new();
        for part in path.split('.').filter(|part| !part.is_empty()) {
            match parse_indexed(part) {
                Some((key, indices)) => {
                    segments.push(Segment::Key(key.to_string()));
                    segments.extend(indices.into_iter().map(Segment::Index));
                }
                None => segments.push(Segment::Key(part.to_string())),
            }
        }
        KeyPath { segments }
    }
}

fn parse_indexed(part: &str) -> Option<(&str, Vec<usize>)> {
    let open = part.find('[')?;
    let (key, mut rest) = part.split_at(open);
    let mut indices = Vec::new();
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        indices.push(inner[..close].parse().ok()?);
        rest = &inner[close + 1..];
    }
    Some((key, indices))
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

fn missing(path: &KeyPath, depth: usize) -> PatchError {
    PatchError::MissingKey {
        path: path.prefix(depth + 1).to_string(),
    }
}

fn wrong_type(path: &KeyPath, expected: &'static str) -> PatchError {
    PatchError::WrongType {
        path: path.to_string(),
        expected,
    }
}

fn step<'v>(node: &'v Value, path: &KeyPath, depth: usize) -> Result<&'v Value> {
    let child = match (&path.segments[depth], node) {
        (Segment::Key(key), Value::Mapping(map)) => map.get(key.as_str()),
        (Segment::Index(index), Value::Sequence(seq)) => seq.get(*index),
        (Segment::Key(_), _) => return Err(wrong_type(&path.prefix(depth), "mapping")),
        (Segment::Index(_), _) => return Err(wrong_type(&path.prefix(depth), "sequence")),
    };
    child.ok_or_else(|| missing(path, depth))
}

fn step_mut<'v>(node: &'v mut Value, path: &KeyPath, depth: usize) -> Result<&'v mut Value> {
    let child = match (&path.segments[depth], node) {
        (Segment::Key(key), Value::Mapping(map)) => map.get_mut(key.as_str()),
        (Segment::Index(index), Value::Sequence(seq)) => seq.get_mut(*index),
        (Segment::Key(_), _) => return Err(wrong_type(&path.prefix(depth), "mapping")),
        (Segment::Index(_), _) => return Err(wrong_type(&path.prefix(depth), "sequence")),
    };
    child.ok_or_else(|| missing(path, depth))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    root: Value,
}

impl Manifest {
    /// Reads and parses the manifest at `path`. The file handle is released
    /// before parsing starts.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| PatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parses `contents`; `origin` is only used to label errors.
    pub fn parse(contents: &str, origin: &Path) -> Result<Self> {
        let root: Value = serde_yaml::from_str(contents).map_err(|source| PatchError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        if !root.is_mapping() {
            return Err(wrong_type(&KeyPath::root(), "mapping"));
        }
        Ok(Manifest { root })
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.root).map_err(PatchError::Serialize)
    }

    pub fn get(&self, path: &KeyPath) -> Result<&Value> {
        let mut node = &self.root;
        for depth in 0..path.segments.len() {
            node = step(node, path, depth)?;
        }
        Ok(node)
    }

    pub fn get_mut(&mut self, path: &KeyPath) -> Result<&mut Value> {
        let mut node = &mut self.root;
        for depth in 0..path.segments.len() {
            node = step_mut(node, path, depth)?;
        }
        Ok(node)
    }

    pub fn get_str(&self, path: &KeyPath) -> Result<&str> {
        self.get(path)?
            .as_str()
            .ok_or_else(|| wrong_type(path, "string"))
    }

    pub fn mapping_mut(&mut self, path: &KeyPath) -> Result<&mut Mapping> {
        self.get_mut(path)?
            .as_mapping_mut()
            .ok_or_else(|| wrong_type(path, "mapping"))
    }

    pub fn sequence_mut(&mut self, path: &KeyPath) -> Result<&mut Sequence> {
        self.get_mut(path)?
            .as_sequence_mut()
            .ok_or_else(|| wrong_type(path, "sequence"))
    }

    /// Writes `value` at `path`. Every parent must already exist; the last
    /// key is inserted if absent and overwritten otherwise.
    pub fn set(&mut self, path: &KeyPath, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let Some((parent, last)) = path.split_last() else {
            return Err(wrong_type(path, "key"));
        };
        match last {
            Segment::Key(key) => {
                self.mapping_mut(&parent)?.insert(Value::from(key.as_str()), value);
            }
            Segment::Index(index) => {
                let slot = self
                    .sequence_mut(&parent)?
                    .get_mut(*index)
                    .ok_or_else(|| missing(path, path.segments.len() - 1))?;
                *slot = value;
            }
        }
        Ok(())
    }

    /// Removes the key at `path` and returns its value. Removing a key that
    /// isn't there is an error, not a no-op.
    pub fn remove(&mut self, path: &KeyPath) -> Result<Value> {
        let Some((parent, Segment::Key(key))) = path.split_last() else {
            return Err(wrong_type(path, "key"));
        };
        self.mapping_mut(&parent)?
            .shift_remove(key.as_str())
            .ok_or_else(|| missing(path, path.segments.len() - 1))
    }

    /// Copies every top-level entry of `entries` into the mapping at `path`,
    /// replacing keys that are already there.
    pub fn merge(&mut self, path: &KeyPath, entries: &Mapping) -> Result<()> {
        let target = self.mapping_mut(path)?;
        for (key, value) in entries {
            target.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    /// Returns the first mapping in the sequence at `path` whose `field`
    /// equals `value`.
    pub fn find_entry_mut(
        &mut self,
        path: &KeyPath,
        field: &'static str,
        value: &str,
    ) -> Result<&mut Mapping> {
        self.sequence_mut(path)?
            .iter_mut()
            .filter_map(Value::as_mapping_mut)
            .find(|entry| entry.get(field).and_then(Value::as_str) == Some(value))
            .ok_or_else(|| PatchError::MissingEntry {
                path: path.to_string(),
                field,
                value: value.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
metadata:
  name: sample
  annotations:
    a: "1"
    b: "2"
    c: "3"
spec:
  items:
    - name: first
      value: x
    - name: second
      value: y
"#;

    fn sample() -> Manifest {
        Manifest::parse(SAMPLE, Path::new("sample.yaml")).unwrap()
    }

    #[test]
    fn key_path_parses_and_renders() {
        let path = KeyPath::from("spec.install.spec.deployments[0].spec");
        assert_eq!(path.segments().len(), 6);
        assert_eq!(path.segments()[4], Segment::Index(0));
        assert_eq!(path.to_string(), "spec.install.spec.deployments[0].spec");
        assert_eq!(KeyPath::root().to_string(), "<root>");
    }

    #[test]
    fn key_path_keeps_odd_brackets_as_keys() {
        let path = KeyPath::from("labels.app[x]");
        assert_eq!(path.segments()[1], Segment::Key("app[x]".to_string()));
    }

    #[test]
    fn get_reports_first_missing_segment() {
        let manifest = sample();
        let err = manifest
            .get(&KeyPath::from("spec.install.spec"))
            .unwrap_err();
        assert_eq!(err.to_string(), "missing key `spec.install`");
    }

    #[test]
    fn get_reports_wrong_container_type() {
        let manifest = sample();
        let err = manifest.get(&KeyPath::from("metadata.name.x")).unwrap_err();
        assert!(matches!(err, PatchError::WrongType { ref path, .. } if path == "metadata.name"));
    }

    #[test]
    fn set_overwrites_and_inserts() {
        let mut manifest = sample();
        manifest.set(&KeyPath::from("metadata.name"), "renamed").unwrap();
        manifest.set(&KeyPath::from("metadata.namespace"), "ns").unwrap();
        assert_eq!(manifest.get_str(&KeyPath::from("metadata.name")).unwrap(), "renamed");
        assert_eq!(manifest.get_str(&KeyPath::from("metadata.namespace")).unwrap(), "ns");
    }

    #[test]
    fn set_replaces_sequence_element() {
        let mut manifest = sample();
        let path = KeyPath::from("spec.items[1]");
        manifest.set(&path, "replaced").unwrap();
        assert_eq!(manifest.get_str(&path).unwrap(), "replaced");

        let err = manifest.set(&KeyPath::from("spec.items[5]"), "x").unwrap_err();
        assert!(matches!(err, PatchError::MissingKey { ref path } if path == "spec.items[5]"));
    }

    #[test]
    fn set_requires_parent() {
        let mut manifest = sample();
        let err = manifest.set(&KeyPath::from("status.phase"), "x").unwrap_err();
        assert!(matches!(err, PatchError::MissingKey { ref path } if path == "status"));
    }

    #[test]
    fn remove_preserves_order_and_fails_when_absent() {
        let mut manifest = sample();
        let removed = manifest.remove(&KeyPath::from("metadata.annotations.a")).unwrap();
        assert_eq!(removed, Value::from("1"));
        let keys: Vec<_> = manifest
            .get(&KeyPath::from("metadata.annotations"))
            .unwrap()
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, vec!["b", "c"]);

        let err = manifest.remove(&KeyPath::from("metadata.annotations.a")).unwrap_err();
        assert!(matches!(err, PatchError::MissingKey { .. }));
    }

    #[test]
    fn find_entry_by_field() {
        let mut manifest = sample();
        let entry = manifest
            .find_entry_mut(&KeyPath::from("spec.items"), "name", "second")
            .unwrap();
        assert_eq!(entry.get("value"), Some(&Value::from("y")));

        let err = manifest
            .find_entry_mut(&KeyPath::from("spec.items"), "name", "third")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "no entry in `spec.items` with name == \"third\""
        );
    }

    #[test]
    fn non_mapping_document_is_rejected() {
        let err = Manifest::parse("- a\n- b\n", Path::new("list.yaml")).unwrap_err();
        assert!(matches!(err, PatchError::WrongType { .. }));
    }

    #[test]
    fn malformed_yaml_names_the_file() {
        let err = Manifest::parse("a: [b", Path::new("broken.yaml")).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse broken.yaml"));
    }
}

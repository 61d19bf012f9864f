use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Material;
use crate::version::VersionKey;

/// One released state of a project: a version string plus its ordered BOM.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Version {
    version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    materials: Vec<Material>,
}

impl Version {
    pub fn new(version: impl Into<String>) -> Self {
        Version {
            version: version.into(),
            materials: Vec::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub(crate) fn push_material(&mut self, material: Material) {
        self.materials.push(material);
    }

    pub(crate) fn remove_material(&mut self, index: usize) -> Option<Material> {
        if index < self.materials.len() {
            Some(self.materials.remove(index))
        } else {
            None
        }
    }
}

/// A named project owning its versions, kept in ascending semantic-version
/// order regardless of insertion order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    name: String,
    #[serde(
        with = "versions_serde",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    versions: BTreeMap<VersionKey, Version>,
}

// On disk versions are an ordered list; in memory a map keyed by VersionKey
// so semantic ordering holds by construction.
mod versions_serde {
    use std::collections::BTreeMap;

    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Version;
    use crate::version::VersionKey;

    pub fn serialize<S>(
        versions: &BTreeMap<VersionKey, Version>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(versions.len()))?;
        for version in versions.values() {
            seq.serialize_element(version)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<VersionKey, Version>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let list = Vec::<Version>::deserialize(deserializer)?;
        Ok(list
            .into_iter()
            .map(|version| (VersionKey::new(version.version()), version))
            .collect())
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Project {
            name: name.into(),
            versions: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Versions in ascending semantic-version order.
    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.versions.values()
    }

    pub fn version(&self, version: &str) -> Option<&Version> {
        self.versions.get(&VersionKey::from(version))
    }

    pub fn contains_version(&self, version: &str) -> bool {
        self.versions.contains_key(&VersionKey::from(version))
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    pub(crate) fn version_mut(&mut self, version: &str) -> Option<&mut Version> {
        self.versions.get_mut(&VersionKey::from(version))
    }

    pub(crate) fn insert_version(&mut self, version: Version) {
        self.versions
            .insert(VersionKey::new(version.version()), version);
    }

    pub(crate) fn remove_version(&mut self, version: &str) -> Option<Version> {
        self.versions.remove(&VersionKey::from(version))
    }
}

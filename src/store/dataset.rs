use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::part::Part;
use crate::project::Project;

/// The persisted document: parts sorted by MPN, projects sorted by name,
/// versions inside each project already in semantic order.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Dataset {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Dataset {
    /// A missing or empty file is an empty dataset, not an error.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Dataset::default())
            }
            Err(err) => return Err(err.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Dataset::default());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the document so a failure never corrupts the previous file:
    /// the new content goes to a temp sibling first, the prior file is kept
    /// as `<path>.bak`, and the temp file is renamed into place.
    pub fn write(&self, path: &Path, pretty: bool) -> Result<(), StoreError> {
        let contents = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };

        let tmp = sibling(path, ".tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(contents.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        if path.exists() {
            fs::copy(path, sibling(path, ".bak"))?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

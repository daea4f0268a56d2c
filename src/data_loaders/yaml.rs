// ~/src/data_loaders/yaml.rs

use std::{fs, path::Path};

use serde_yaml::Value;

use crate::{warn, DEBUG_NAME};

/// Reads and parses a YAML document. A missing file is silent; a broken one is logged.
pub fn load_yaml(path: &Path) -> Option<Value> {
    let txt = fs::read_to_string(path).ok()?;

    match serde_yaml::from_str::<Value>(&txt) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("[{}][CONFIG] Failed to parse {}: {e}", DEBUG_NAME, path.display());
            None
        }
    }
}

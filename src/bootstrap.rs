// ~/src/bootstrap.rs

use std::{fs, path::Path};

use crate::{info, utility::app_root_dir, warn, DEBUG_NAME};

const DEFAULT_CONFIG: &str = r#"# wallguard configuration
debug: false
log_level: warn

settings:
  preview:
    width: 300
    height: 200
  diagnostics:
    log_enforcement_ticks: true
"#;

/// Creates `~/.wallguard/` and a default `config.yaml` if they are missing.
pub fn bootstrap_app() {
    let Some(root) = app_root_dir() else {
        warn!("[{}] Cannot resolve home directory; running without app dir", DEBUG_NAME);
        return;
    };

    if let Err(e) = fs::create_dir_all(&root) {
        warn!("[{}] Failed to create {}: {e}", DEBUG_NAME, root.display());
        return;
    }

    scaffold_config_yaml(&root);
}

fn scaffold_config_yaml(root: &Path) {
    let path = root.join("config.yaml");
    if path.exists() {
        return;
    }

    match fs::write(&path, DEFAULT_CONFIG) {
        Ok(()) => info!("[{}] Wrote default config to {}", DEBUG_NAME, path.display()),
        Err(e) => warn!("[{}] Failed to write {}: {e}", DEBUG_NAME, path.display()),
    }
}

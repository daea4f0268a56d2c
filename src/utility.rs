use std::{env, path::PathBuf};

pub const APP_DIR_NAME: &str = ".wallguard";

#[cfg(windows)]
pub fn to_wstring(s: &std::ffi::OsStr) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;

    s.encode_wide().chain(std::iter::once(0)).collect()
}

pub fn user_home_dir() -> Option<PathBuf> {
    // USERPROFILE first; HOME covers non-Windows hosts and msys shells.
    ["USERPROFILE", "HOME"]
        .iter()
        .filter_map(|key| env::var_os(key))
        .find(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// `~/.wallguard`, home of the log, the config and converted BMPs.
pub fn app_root_dir() -> Option<PathBuf> {
    user_home_dir().map(|home| home.join(APP_DIR_NAME))
}

use std::{
    ffi::{c_void, OsStr},
    mem,
    path::Path,
};

use windows::{
    core::{w, PCWSTR},
    Win32::{
        System::{
            Registry::{RegSetKeyValueW, HKEY_CURRENT_USER, REG_SZ},
            SystemInformation::{GetVersionExW, OSVERSIONINFOW},
        },
        UI::WindowsAndMessaging::{
            SystemParametersInfoW, SPIF_SENDWININICHANGE, SPIF_UPDATEINIFILE,
            SPI_SETDESKWALLPAPER,
        },
    },
};

use super::{PlatformVersion, WallpaperError, WallpaperStyle};
use crate::{info, utility::to_wstring, DEBUG_NAME};

const DESKTOP_KEY: PCWSTR = w!("Control Panel\\Desktop");

pub(super) fn os_version() -> Option<PlatformVersion> {
    let mut info = OSVERSIONINFOW {
        dwOSVersionInfoSize: mem::size_of::<OSVERSIONINFOW>() as u32,
        ..Default::default()
    };

    unsafe { GetVersionExW(&mut info) }.ok()?;
    Some(PlatformVersion::new(info.dwMajorVersion, info.dwMinorVersion))
}

pub(super) fn set_wallpaper(path: &Path, style: WallpaperStyle) -> Result<(), WallpaperError> {
    let (style_value, tile_value) = style.registry_values();
    write_desktop_value("WallpaperStyle", w!("WallpaperStyle"), style_value)?;
    write_desktop_value("TileWallpaper", w!("TileWallpaper"), tile_value)?;

    let mut wide_path = to_wstring(path.as_os_str());
    unsafe {
        SystemParametersInfoW(
            SPI_SETDESKWALLPAPER,
            0,
            Some(wide_path.as_mut_ptr() as *mut c_void),
            SPIF_UPDATEINIFILE | SPIF_SENDWININICHANGE,
        )
    }
    .map_err(|e| WallpaperError::SystemCall {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!(
        "[{}][DESKTOP] Applied {} as {:?} (WallpaperStyle={} TileWallpaper={})",
        DEBUG_NAME,
        path.display(),
        style,
        style_value,
        tile_value
    );
    Ok(())
}

fn write_desktop_value(name: &'static str, wide_name: PCWSTR, value: &str) -> Result<(), WallpaperError> {
    let data = to_wstring(OsStr::new(value));
    let byte_len = (data.len() * mem::size_of::<u16>()) as u32;

    unsafe {
        RegSetKeyValueW(
            HKEY_CURRENT_USER,
            DESKTOP_KEY,
            wide_name,
            REG_SZ.0,
            Some(data.as_ptr() as *const c_void),
            byte_len,
        )
    }
    .ok()
    .map_err(|e| WallpaperError::Registry {
        name,
        message: e.to_string(),
    })
}

//! Desktop background control.
//!
//! [`WallpaperSetter`] is the seam between the enforcement/preview logic and the host OS. The
//! real implementation is [`DesktopWallpaper`]; tests substitute a recording fake.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use thiserror::Error;

#[cfg(windows)]
mod win32;

const TILE_HELP: &str = "Repeat the image across the desktop";
const CENTER_HELP: &str = "Draw the image once in the middle of the desktop";
const STRETCH_HELP: &str = "Stretch the image to cover the desktop, ignoring aspect ratio";
const FIT_HELP: &str = "Scale the image to fit inside the desktop, keeping aspect ratio";
const FILL_HELP: &str = "Scale the image to cover the desktop, cropping the overflow";

/// How the desktop lays out the wallpaper image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum WallpaperStyle {
    #[value(help = TILE_HELP)]
    Tile,
    #[value(help = CENTER_HELP)]
    Center,
    #[value(help = STRETCH_HELP)]
    Stretch,
    #[value(help = FIT_HELP)]
    Fit,
    #[value(help = FILL_HELP)]
    Fill,
}

impl WallpaperStyle {
    pub const ALL: [WallpaperStyle; 5] = [
        WallpaperStyle::Tile,
        WallpaperStyle::Center,
        WallpaperStyle::Stretch,
        WallpaperStyle::Fit,
        WallpaperStyle::Fill,
    ];

    /// Fit and Fill need OS support; the others work everywhere.
    pub fn is_extended(self) -> bool {
        matches!(self, WallpaperStyle::Fit | WallpaperStyle::Fill)
    }

    pub fn description(self) -> &'static str {
        match self {
            WallpaperStyle::Tile => TILE_HELP,
            WallpaperStyle::Center => CENTER_HELP,
            WallpaperStyle::Stretch => STRETCH_HELP,
            WallpaperStyle::Fit => FIT_HELP,
            WallpaperStyle::Fill => FILL_HELP,
        }
    }

    /// `(WallpaperStyle, TileWallpaper)` values under `HKCU\Control Panel\Desktop`.
    pub fn registry_values(self) -> (&'static str, &'static str) {
        match self {
            WallpaperStyle::Tile => ("0", "1"),
            WallpaperStyle::Center => ("0", "0"),
            WallpaperStyle::Stretch => ("2", "0"),
            WallpaperStyle::Fit => ("6", "0"),
            WallpaperStyle::Fill => ("10", "0"),
        }
    }
}

/// Styles a user may pick on a host with or without extended-style support.
pub fn available_styles(extended: bool) -> Vec<WallpaperStyle> {
    WallpaperStyle::ALL
        .into_iter()
        .filter(|style| extended || !style.is_extended())
        .collect()
}

#[derive(Debug, Error)]
pub enum WallpaperError {
    #[error("setting the desktop wallpaper is not supported on this platform")]
    Unsupported,
    #[error("wallpaper path is empty")]
    EmptyPath,
    #[error("failed to write registry value '{name}': {message}")]
    Registry { name: &'static str, message: String },
    #[error("SystemParametersInfo rejected {path}: {message}")]
    SystemCall { path: PathBuf, message: String },
    #[error("failed to convert {path} to BMP: {source}")]
    Convert {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The OS-level collaborator that durably changes the desktop background.
pub trait WallpaperSetter {
    fn apply(&mut self, path: &Path, style: WallpaperStyle) -> Result<(), WallpaperError>;

    fn supports_extended_styles(&self) -> bool;
}

/// Host OS version, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlatformVersion {
    pub major: u32,
    pub minor: u32,
}

impl PlatformVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Fit and Fill arrived with Windows 7 (6.1).
    pub fn supports_extended_styles(self) -> bool {
        self >= Self::new(6, 1)
    }

    /// JPEG and PNG wallpapers arrived with Vista (6.0); older hosts need a BMP.
    pub fn supports_non_bmp(self) -> bool {
        self >= Self::new(6, 0)
    }
}

/// The host desktop.
#[derive(Debug)]
pub struct DesktopWallpaper {
    version: Option<PlatformVersion>,
    convert_dir: Option<PathBuf>,
}

impl DesktopWallpaper {
    /// Probes the host once; the result is reused for every later call.
    pub fn detect(convert_dir: Option<PathBuf>) -> Self {
        Self {
            version: platform_version(),
            convert_dir,
        }
    }

    pub fn version(&self) -> Option<PlatformVersion> {
        self.version
    }
}

impl WallpaperSetter for DesktopWallpaper {
    fn apply(&mut self, path: &Path, style: WallpaperStyle) -> Result<(), WallpaperError> {
        if path.as_os_str().is_empty() {
            return Err(WallpaperError::EmptyPath);
        }
        let Some(version) = self.version else {
            return Err(WallpaperError::Unsupported);
        };

        let source = if version.supports_non_bmp() || is_bmp(path) {
            path.to_path_buf()
        } else {
            let dir = self
                .convert_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir);
            convert_to_bmp(path, &dir)?
        };

        set_system_wallpaper(&source, style)
    }

    fn supports_extended_styles(&self) -> bool {
        self.version
            .is_some_and(PlatformVersion::supports_extended_styles)
    }
}

fn is_bmp(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"))
}

/// Re-encodes `path` as `<dir>/wallpaper.bmp` for hosts that only take bitmaps.
pub fn convert_to_bmp(path: &Path, dir: &Path) -> Result<PathBuf, WallpaperError> {
    std::fs::create_dir_all(dir).map_err(|source| WallpaperError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let target = dir.join("wallpaper.bmp");
    let image = image::open(path).map_err(|source| WallpaperError::Convert {
        path: path.to_path_buf(),
        source,
    })?;
    image
        .save_with_format(&target, image::ImageFormat::Bmp)
        .map_err(|source| WallpaperError::Convert {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(target)
}

#[cfg(windows)]
fn platform_version() -> Option<PlatformVersion> {
    win32::os_version()
}

#[cfg(not(windows))]
fn platform_version() -> Option<PlatformVersion> {
    None
}

#[cfg(windows)]
fn set_system_wallpaper(path: &Path, style: WallpaperStyle) -> Result<(), WallpaperError> {
    win32::set_wallpaper(path, style)
}

#[cfg(not(windows))]
fn set_system_wallpaper(_path: &Path, _style: WallpaperStyle) -> Result<(), WallpaperError> {
    Err(WallpaperError::Unsupported)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_values_match_desktop_conventions() {
        assert_eq!(WallpaperStyle::Tile.registry_values(), ("0", "1"));
        assert_eq!(WallpaperStyle::Center.registry_values(), ("0", "0"));
        assert_eq!(WallpaperStyle::Stretch.registry_values(), ("2", "0"));
        assert_eq!(WallpaperStyle::Fit.registry_values(), ("6", "0"));
        assert_eq!(WallpaperStyle::Fill.registry_values(), ("10", "0"));
    }

    #[test]
    fn only_fit_and_fill_are_extended() {
        let extended: Vec<_> = WallpaperStyle::ALL
            .into_iter()
            .filter(|s| s.is_extended())
            .collect();
        assert_eq!(extended, vec![WallpaperStyle::Fit, WallpaperStyle::Fill]);
    }

    #[test]
    fn available_styles_follow_capability() {
        assert_eq!(
            available_styles(false),
            vec![WallpaperStyle::Tile, WallpaperStyle::Center, WallpaperStyle::Stretch]
        );
        assert_eq!(available_styles(true), WallpaperStyle::ALL.to_vec());
    }

    #[test]
    fn capability_thresholds_by_version() {
        let xp = PlatformVersion::new(5, 1);
        let vista = PlatformVersion::new(6, 0);
        let seven = PlatformVersion::new(6, 1);
        let ten = PlatformVersion::new(10, 0);

        assert!(!xp.supports_non_bmp());
        assert!(!xp.supports_extended_styles());
        assert!(vista.supports_non_bmp());
        assert!(!vista.supports_extended_styles());
        assert!(seven.supports_extended_styles());
        assert!(ten.supports_extended_styles());
    }

    #[test]
    fn style_values_parse_case_insensitively() {
        assert_eq!(
            WallpaperStyle::from_str("FIT", true).unwrap(),
            WallpaperStyle::Fit
        );
        assert!(WallpaperStyle::from_str("zoom", true).is_err());
    }

    #[test]
    fn cli_help_matches_style_description() {
        for style in WallpaperStyle::ALL {
            let value = style.to_possible_value().unwrap();
            let help = value.get_help().map(ToString::to_string);
            assert_eq!(help.as_deref(), Some(style.description()), "{style:?}");
        }
    }

    #[test]
    fn bmp_extension_is_detected() {
        assert!(is_bmp(Path::new("a/wallpaper.BMP")));
        assert!(!is_bmp(Path::new("a/wallpaper.jpg")));
        assert!(!is_bmp(Path::new("a/wallpaper")));
    }

    #[test]
    fn convert_writes_a_bitmap() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("wallpaper.png");
        image::DynamicImage::new_rgb8(4, 3).save(&source).unwrap();

        let out = convert_to_bmp(&source, &dir.path().join("converted")).unwrap();
        assert_eq!(out.file_name().unwrap(), "wallpaper.bmp");
        let reopened = image::open(&out).unwrap();
        assert_eq!(image::GenericImageView::dimensions(&reopened), (4, 3));
    }

    #[test]
    fn convert_reports_undecodable_input() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("wallpaper.jpg");
        std::fs::write(&source, b"not an image").unwrap();

        let err = convert_to_bmp(&source, dir.path()).unwrap_err();
        assert!(matches!(err, WallpaperError::Convert { .. }));
    }

    #[test]
    fn empty_path_is_rejected_before_touching_the_host() {
        let mut desktop = DesktopWallpaper::detect(None);
        let err = desktop.apply(Path::new(""), WallpaperStyle::Fit).unwrap_err();
        assert!(matches!(err, WallpaperError::EmptyPath));
    }

    #[cfg(not(windows))]
    #[test]
    fn non_windows_hosts_are_unsupported() {
        let mut desktop = DesktopWallpaper::detect(None);
        assert!(!desktop.supports_extended_styles());
        let err = desktop
            .apply(Path::new("/tmp/wallpaper.jpg"), WallpaperStyle::Fit)
            .unwrap_err();
        assert!(matches!(err, WallpaperError::Unsupported));
    }
}

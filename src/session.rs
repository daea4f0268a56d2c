//! Manual selection: pick an image, preview it, apply it in a chosen style.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};
use thiserror::Error;

use crate::{
    desktop::{available_styles, WallpaperError, WallpaperSetter, WallpaperStyle},
    info,
    thumbnail::{self, Dimensions},
    DEBUG_NAME,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write preview to {path}: {source}")]
    SavePreview {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{0:?} is not available on this system (choose one of: {1})")]
    StyleUnavailable(WallpaperStyle, String),
    #[error("could not set the wallpaper: {0}")]
    Apply(#[from] WallpaperError),
}

/// The image the user picked, fixed once chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: PathBuf,
    pub source: Dimensions,
    pub preview: Dimensions,
}

/// A selection plus its rendered preview.
#[derive(Debug)]
pub struct Preview {
    pub selection: Selection,
    pub image: DynamicImage,
}

impl Preview {
    /// Writes the rendered preview to `out`, format chosen from its extension.
    pub fn save(&self, out: &Path) -> Result<(), SessionError> {
        self.image.save(out).map_err(|source| SessionError::SavePreview {
            path: out.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug)]
pub struct ManualSession {
    viewport: Dimensions,
    selected: Option<Selection>,
}

impl ManualSession {
    pub fn new(viewport: Dimensions) -> Self {
        Self {
            viewport,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    /// Loads `path`, renders it into the viewport and makes it the current selection.
    ///
    /// A load failure leaves the previous selection in place.
    pub fn select_image(&mut self, path: &Path) -> Result<Preview, SessionError> {
        let image = image::open(path).map_err(|source| SessionError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let (width, height) = image.dimensions();
        let source = Dimensions::new(width, height);
        let image = thumbnail::render_preview(image, self.viewport);
        let (pw, ph) = image.dimensions();

        let selection = Selection {
            path: path.to_path_buf(),
            source,
            preview: Dimensions::new(pw, ph),
        };
        info!(
            "[{}][MANUAL] Selected {} ({}x{}, preview {}x{})",
            DEBUG_NAME,
            path.display(),
            width,
            height,
            pw,
            ph
        );

        self.selected = Some(selection.clone());
        Ok(Preview { selection, image })
    }

    /// Applies the current selection. `Ok(false)` when nothing has been selected yet.
    pub fn apply_selected<S>(&self, setter: &mut S, style: WallpaperStyle) -> Result<bool, SessionError>
    where
        S: WallpaperSetter + ?Sized,
    {
        let Some(selection) = &self.selected else {
            return Ok(false);
        };

        let extended = setter.supports_extended_styles();
        if style.is_extended() && !extended {
            let offered = available_styles(extended)
                .iter()
                .map(|s| format!("{s:?}").to_lowercase())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(SessionError::StyleUnavailable(style, offered));
        }

        setter.apply(&selection.path, style)?;
        info!(
            "[{}][MANUAL] Applied {} as {:?}",
            DEBUG_NAME,
            selection.path.display(),
            style
        );
        Ok(true)
    }
}

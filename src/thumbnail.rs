//! Preview sizing.
//!
//! Computes the size an image should be drawn at inside a fixed preview viewport. The image is
//! never enlarged; when it does not fit it is shrunk along the constraining axis and the other
//! axis follows the source aspect ratio.

use image::{DynamicImage, GenericImageView};

/// Pixel size of an image or a viewport. Both axes must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "dimensions must be positive");
        Self { width, height }
    }

    fn ratio(self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Size to render `source` at inside `viewport`.
///
/// Sources strictly smaller than the viewport on both axes come back unchanged. Otherwise the
/// result touches the viewport edge on the constraining axis and never exceeds it on either.
pub fn fit(source: Dimensions, viewport: Dimensions) -> Dimensions {
    if source.width < viewport.width && source.height < viewport.height {
        return source;
    }

    let source_ratio = source.ratio();

    if source_ratio >= viewport.ratio() {
        let height = (viewport.width as f64 / source_ratio).round().max(1.0);
        Dimensions::new(viewport.width, height as u32)
    } else {
        let width = (viewport.height as f64 * source_ratio).round().max(1.0);
        Dimensions::new(width as u32, viewport.height)
    }
}

/// Resamples `image` to its fitted size inside `viewport`.
pub fn render_preview(image: DynamicImage, viewport: Dimensions) -> DynamicImage {
    let (width, height) = image.dimensions();
    let source = Dimensions::new(width, height);
    let target = fit(source, viewport);

    if target == source {
        return image;
    }

    image.thumbnail_exact(target.width, target.height)
}

//! Crop and scale geometry.
//!
//! Pure arithmetic: given the probed source size, the fixed crop margins and
//! the target output width, derive the crop rectangle and an output height
//! that keeps the cropped aspect ratio. The height uses truncating integer
//! division, `output_width * cropped_height / cropped_width`, with no rounding
//! and no clamping.

use crate::config::CropMargins;
use crate::error::{CoreError, CoreResult};

/// Crop rectangle and output size for one source video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoGeometry {
    pub source_width: u32,
    pub source_height: u32,
    pub crop: CropMargins,
    pub output_width: u32,
    output_height: u32,
}

impl VideoGeometry {
    /// Width of the region left after cropping.
    #[must_use]
    pub fn cropped_width(&self) -> u32 {
        self.source_width - self.crop.left - self.crop.right
    }

    /// Height of the region left after cropping.
    #[must_use]
    pub fn cropped_height(&self) -> u32 {
        self.source_height - self.crop.top - self.crop.bottom
    }

    /// Scaled height; always derived, never set directly.
    #[must_use]
    pub fn output_height(&self) -> u32 {
        self.output_height
    }
}

/// Computes the crop rectangle and aspect-preserving output height.
///
/// The output height is `floor(output_width * cropped_height / cropped_width)`
/// for every input that yields a usable frame.
///
/// Fails with `InvalidGeometry` when the margins remove the full source width
/// or height. This deliberately departs from the bare floor formula in one
/// case: a scaled height that truncates to zero is rejected instead of
/// returned, since ffmpeg cannot encode a zero-height GIF.
///
/// ```rust
/// use beatgif_core::config::CropMargins;
/// use beatgif_core::processing::geometry::compute_geometry;
///
/// let geometry = compute_geometry(1920, 1080, CropMargins::new(510, 140, 510, 40), 256).unwrap();
/// assert_eq!((geometry.cropped_width(), geometry.cropped_height()), (900, 900));
/// assert_eq!(geometry.output_height(), 256);
/// ```
pub fn compute_geometry(
    source_width: u32,
    source_height: u32,
    crop: CropMargins,
    output_width: u32,
) -> CoreResult<VideoGeometry> {
    if output_width == 0 {
        return Err(CoreError::InvalidGeometry(
            "output width must be positive".to_string(),
        ));
    }

    let cropped_width = u64::from(source_width)
        .checked_sub(crop.horizontal())
        .filter(|w| *w > 0)
        .ok_or_else(|| {
            CoreError::InvalidGeometry(format!(
                "crop margins left {} + right {} remove the full source width {}",
                crop.left, crop.right, source_width
            ))
        })?;
    let cropped_height = u64::from(source_height)
        .checked_sub(crop.vertical())
        .filter(|h| *h > 0)
        .ok_or_else(|| {
            CoreError::InvalidGeometry(format!(
                "crop margins top {} + bottom {} remove the full source height {}",
                crop.top, crop.bottom, source_height
            ))
        })?;

    // cropped_height <= u32::MAX and output_width <= u32::MAX, so the product fits in u64.
    let scaled = u64::from(output_width) * cropped_height / cropped_width;
    let output_height = u32::try_from(scaled).map_err(|_| {
        CoreError::InvalidGeometry(format!("scaled height {scaled} is out of range"))
    })?;
    if output_height == 0 {
        return Err(CoreError::InvalidGeometry(format!(
            "scaled height truncates to zero for a {}x{} crop at width {}",
            cropped_width, cropped_height, output_width
        )));
    }

    log::debug!(
        "Geometry: source {}x{}, crop {}x{}+{}+{}, output {}x{}",
        source_width,
        source_height,
        cropped_width,
        cropped_height,
        crop.left,
        crop.top,
        output_width,
        output_height
    );

    Ok(VideoGeometry {
        source_width,
        source_height,
        crop,
        output_width,
        output_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_CROP: CropMargins = CropMargins::new(510, 140, 510, 40);

    #[test]
    fn test_reference_clip_is_square() {
        let geometry = compute_geometry(1920, 1080, REFERENCE_CROP, 256).unwrap();
        assert_eq!(geometry.cropped_width(), 900);
        assert_eq!(geometry.cropped_height(), 900);
        assert_eq!(geometry.output_height(), 256);
    }

    #[test]
    fn test_height_truncates_instead_of_rounding() {
        // 256 * 999 / 1000 = 255.744
        let geometry = compute_geometry(1000, 999, CropMargins::new(0, 0, 0, 0), 256).unwrap();
        assert_eq!(geometry.output_height(), 255);

        // 100 * 2 / 3 = 66.67
        let geometry = compute_geometry(3, 2, CropMargins::new(0, 0, 0, 0), 100).unwrap();
        assert_eq!(geometry.output_height(), 66);
    }

    #[test]
    fn test_truncation_matches_floor_formula() {
        let crop = CropMargins::new(7, 3, 11, 5);
        for (w, h, out) in [(640, 480, 256), (1280, 720, 333), (1921, 1081, 255), (50, 400, 17)] {
            let geometry = compute_geometry(w, h, crop, out).unwrap();
            let expected = u64::from(out) * u64::from(h - 8) / u64::from(w - 18);
            assert_eq!(u64::from(geometry.output_height()), expected, "{w}x{h} -> {out}");
        }
    }

    #[test]
    fn test_crop_removing_full_width_fails() {
        let result = compute_geometry(1020, 1080, REFERENCE_CROP, 256);
        assert!(matches!(result, Err(CoreError::InvalidGeometry(_))));

        let result = compute_geometry(1000, 1080, REFERENCE_CROP, 256);
        assert!(matches!(result, Err(CoreError::InvalidGeometry(_))));
    }

    #[test]
    fn test_crop_removing_full_height_fails() {
        let result = compute_geometry(1920, 180, REFERENCE_CROP, 256);
        assert!(matches!(result, Err(CoreError::InvalidGeometry(_))));
    }

    #[test]
    fn test_one_pixel_remaining_is_valid() {
        let geometry = compute_geometry(1021, 181, REFERENCE_CROP, 256).unwrap();
        assert_eq!(geometry.cropped_width(), 1);
        assert_eq!(geometry.cropped_height(), 1);
        assert_eq!(geometry.output_height(), 256);
    }

    #[test]
    fn test_zero_scaled_height_fails() {
        // floor(256 * 1 / 4000) is 0: rejected rather than returned.
        let result = compute_geometry(4000, 1, CropMargins::new(0, 0, 0, 0), 256);
        assert!(matches!(result, Err(CoreError::InvalidGeometry(ref msg)) if msg.contains("truncates to zero")));

        // Smallest crop width that still yields one row.
        let geometry = compute_geometry(256, 1, CropMargins::new(0, 0, 0, 0), 256).unwrap();
        assert_eq!(geometry.output_height(), 1);
    }
}

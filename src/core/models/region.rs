use serde::{Deserialize, Serialize};

use crate::core::errors::ValidationError;

/// Crop rectangle in source-image pixel coordinates.
///
/// Width and height are always greater than zero; every constructor and the
/// serde path go through the same validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRegion", into = "RawRegion")]
pub struct Region {
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawRegion {
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

impl TryFrom<RawRegion> for Region {
    type Error = ValidationError;

    fn try_from(raw: RawRegion) -> Result<Self, Self::Error> {
        Region::new(raw.left, raw.top, raw.width, raw.height)
    }
}

impl From<Region> for RawRegion {
    fn from(region: Region) -> Self {
        Self {
            left: region.left,
            top: region.top,
            width: region.width,
            height: region.height,
        }
    }
}

impl Region {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Result<Self, ValidationError> {
        if width == 0 {
            return Err(ValidationError::NotPositive { field: "width" });
        }
        if height == 0 {
            return Err(ValidationError::NotPositive { field: "height" });
        }

        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// Builds a region from a `(left, top, right, bottom)` crop box.
    pub fn from_crop_box(
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
    ) -> Result<Self, ValidationError> {
        Self::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn crop_box(&self) -> (u32, u32, u32, u32) {
        (
            self.left,
            self.top,
            self.left.saturating_add(self.width),
            self.top.saturating_add(self.height),
        )
    }

    /// Intersects the region with an image of the given size.
    ///
    /// Returns `None` when nothing of the region lies inside the image.
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> Option<Region> {
        if self.left >= image_width || self.top >= image_height {
            return None;
        }

        let right = self.left.saturating_add(self.width).min(image_width);
        let bottom = self.top.saturating_add(self.height).min(image_height);

        Some(Region {
            left: self.left,
            top: self.top,
            width: right - self.left,
            height: bottom - self.top,
        })
    }

    /// Maps a region defined on a reference image onto an image of another size.
    pub fn scale_between(
        &self,
        reference_size: (u32, u32),
        target_size: (u32, u32),
    ) -> Region {
        let (reference_width, reference_height) = reference_size;
        let (target_width, target_height) = target_size;

        if reference_width == 0 || reference_height == 0 {
            return *self;
        }

        let scale_x = target_width as f64 / reference_width as f64;
        let scale_y = target_height as f64 / reference_height as f64;

        Region {
            left: (self.left as f64 * scale_x).round() as u32,
            top: (self.top as f64 * scale_y).round() as u32,
            width: ((self.width as f64 * scale_x).round() as u32).max(1),
            height: ((self.height as f64 * scale_y).round() as u32).max(1),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.left, self.top
        )
    }
}

/// A rectangle as reported by the drawing canvas, in floating-point image
/// pixels. Width and height are negative when the drag went up or left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnRectangle {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DrawnRectangle {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rounds to integer pixel bounds. Degenerate shapes yield `None`.
    pub fn to_region(&self) -> Option<Region> {
        let (x_start, x_end) = ordered_span(self.left, self.left + self.width);
        let (y_start, y_end) = ordered_span(self.top, self.top + self.height);

        if ![x_start, x_end, y_start, y_end]
            .iter()
            .all(|value| value.is_finite())
        {
            return None;
        }

        let left = x_start.max(0.0).round();
        let right = x_end.max(0.0).round();
        let top = y_start.max(0.0).round();
        let bottom = y_end.max(0.0).round();

        Region::new(
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        )
        .ok()
    }
}

fn ordered_span(first: f32, second: f32) -> (f32, f32) {
    if first <= second {
        (first, second)
    } else {
        (second, first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_new_rejects_zero_width() {
        let result = Region::new(10, 10, 0, 5);

        assert_eq!(result, Err(ValidationError::NotPositive { field: "width" }));
    }

    #[test]
    fn test_region_new_rejects_zero_height() {
        let result = Region::new(10, 10, 5, 0);

        assert_eq!(
            result,
            Err(ValidationError::NotPositive { field: "height" })
        );
    }

    #[test]
    fn test_from_crop_box_converts_right_and_bottom_to_size() {
        let region = Region::from_crop_box(45, 29, 201, 72).unwrap();

        assert_eq!(region.left(), 45);
        assert_eq!(region.top(), 29);
        assert_eq!(region.width(), 156);
        assert_eq!(region.height(), 43);
        assert_eq!(region.crop_box(), (45, 29, 201, 72));
    }

    #[test]
    fn test_from_crop_box_rejects_inverted_box() {
        assert!(Region::from_crop_box(100, 10, 50, 40).is_err());
    }

    #[test]
    fn test_clamp_to_keeps_region_fully_inside_image() {
        let region = Region::new(10, 10, 20, 20).unwrap();

        assert_eq!(region.clamp_to(100, 100), Some(region));
    }

    #[test]
    fn test_clamp_to_trims_region_crossing_image_edge() {
        let region = Region::new(90, 80, 50, 50).unwrap();

        let clamped = region.clamp_to(100, 100).unwrap();

        assert_eq!(clamped.crop_box(), (90, 80, 100, 100));
    }

    #[test]
    fn test_clamp_to_returns_none_for_region_outside_image() {
        let region = Region::new(150, 10, 20, 20).unwrap();

        assert_eq!(region.clamp_to(100, 100), None);
    }

    #[test]
    fn test_scale_between_maps_to_half_size_image() {
        let region = Region::new(100, 50, 40, 20).unwrap();

        let scaled = region.scale_between((1000, 500), (500, 250));

        assert_eq!(scaled.crop_box(), (50, 25, 70, 35));
    }

    #[test]
    fn test_scale_between_never_collapses_to_zero_size() {
        let region = Region::new(0, 0, 1, 1).unwrap();

        let scaled = region.scale_between((1000, 1000), (10, 10));

        assert_eq!(scaled.width(), 1);
        assert_eq!(scaled.height(), 1);
    }

    #[test]
    fn test_region_deserialization_rejects_zero_size() {
        let json = r#"{"left": 1, "top": 2, "width": 0, "height": 4}"#;

        assert!(serde_json::from_str::<Region>(json).is_err());
    }

    #[test]
    fn test_region_serialization_uses_plain_fields() {
        let region = Region::new(1, 2, 3, 4).unwrap();

        let json = serde_json::to_value(region).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"left": 1, "top": 2, "width": 3, "height": 4})
        );
    }

    #[test]
    fn test_drawn_rectangle_rounds_to_pixel_bounds() {
        let drawn = DrawnRectangle::new(10.4, 20.6, 30.2, 9.7);

        let region = drawn.to_region().unwrap();

        assert_eq!(region.crop_box(), (10, 21, 41, 30));
    }

    #[test]
    fn test_drawn_rectangle_normalises_negative_drag() {
        let drawn = DrawnRectangle::new(50.0, 40.0, -20.0, -10.0);

        let region = drawn.to_region().unwrap();

        assert_eq!(region.crop_box(), (30, 30, 50, 40));
    }

    #[test]
    fn test_drawn_rectangle_keeps_image_pixel_size() {
        let drawn = DrawnRectangle::new(0.0, 0.0, 20.0, 15.0);

        let region = drawn.to_region().unwrap();

        assert_eq!(region.width(), 20);
        assert_eq!(region.height(), 15);
    }

    #[test]
    fn test_drawn_rectangle_without_drag_is_discarded() {
        let drawn = DrawnRectangle::new(12.0, 12.0, 0.2, 0.1);

        assert!(drawn.to_region().is_none());
    }

    #[test]
    fn test_drawn_rectangle_with_nan_is_discarded() {
        let drawn = DrawnRectangle::new(f32::NAN, 0.0, 10.0, 10.0);

        assert!(drawn.to_region().is_none());
    }
}

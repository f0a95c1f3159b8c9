use crate::core::errors::ValidationError;
use crate::core::models::{DrawnRectangle, Region};

/// Text of the four numeric region fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualRegionFields {
    pub left: String,
    pub top: String,
    pub width: String,
    pub height: String,
}

#[derive(Debug, Clone)]
pub enum RegionSource {
    Preset(Vec<Region>),
    Manual(ManualRegionFields),
    Drawn(Vec<DrawnRectangle>),
}

impl RegionSource {
    pub fn kind_name(&self) -> &'static str {
        match self {
            RegionSource::Preset(_) => "preset",
            RegionSource::Manual(_) => "manual",
            RegionSource::Drawn(_) => "drawn",
        }
    }
}

pub fn define_regions(source: &RegionSource) -> Result<Vec<Region>, ValidationError> {
    let regions = match source {
        RegionSource::Preset(regions) => regions.clone(),
        RegionSource::Manual(fields) => vec![parse_manual_region(fields)?],
        RegionSource::Drawn(rectangles) => convert_drawn_rectangles(rectangles),
    };

    log::debug!(
        "[REGIONS] {} source produced {} regions",
        source.kind_name(),
        regions.len()
    );

    Ok(regions)
}

pub fn parse_manual_region(fields: &ManualRegionFields) -> Result<Region, ValidationError> {
    let left = parse_coordinate("left", &fields.left)?;
    let top = parse_coordinate("top", &fields.top)?;
    let width = parse_coordinate("width", &fields.width)?;
    let height = parse_coordinate("height", &fields.height)?;

    Region::new(left, top, width, height)
}

fn parse_coordinate(field: &'static str, raw_value: &str) -> Result<u32, ValidationError> {
    let value: i64 = raw_value
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotAnInteger {
            field,
            value: raw_value.to_string(),
        })?;

    if value < 0 {
        return Err(ValidationError::Negative { field, value });
    }

    u32::try_from(value).map_err(|_| ValidationError::OutOfRange { field, value })
}

pub fn convert_drawn_rectangles(rectangles: &[DrawnRectangle]) -> Vec<Region> {
    rectangles
        .iter()
        .filter_map(|rectangle| {
            let region = rectangle.to_region();
            if region.is_none() {
                log::debug!(
                    "[REGIONS] discarding degenerate drawn rectangle {:?}",
                    rectangle
                );
            }
            region
        })
        .collect()
}

/// Collects rectangles from the drawing canvas as each one is finalised.
#[derive(Debug, Clone, Default)]
pub struct RegionDrawingBoard {
    rectangles: Vec<DrawnRectangle>,
}

impl RegionDrawingBoard {
    pub fn accept_rectangle(&mut self, rectangle: DrawnRectangle) -> Option<Region> {
        let region = rectangle.to_region()?;
        log::info!(
            "[REGIONS] region {} drawn: {}",
            self.rectangles.len() + 1,
            region
        );
        self.rectangles.push(rectangle);
        Some(region)
    }

    pub fn undo_last(&mut self) -> Option<Region> {
        self.rectangles.pop().and_then(|rectangle| rectangle.to_region())
    }

    pub fn clear(&mut self) {
        self.rectangles.clear();
    }

    pub fn rectangles(&self) -> &[DrawnRectangle] {
        &self.rectangles
    }
}

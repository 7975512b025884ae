use serde::{Deserialize, Serialize};

/// Geographic bounding box in WGS84 decimal degrees
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

/// A position on the widget as percentages of its width and height.
/// Values outside 0..=100 are off-screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPercent {
    pub x: f64,
    pub y: f64,
}

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl MapBounds {
    /// The fixed extent of the mine site
    pub const fn site() -> Self {
        Self {
            min_lat: 39.7580,
            max_lat: 39.7640,
            min_lng: 29.1820,
            max_lng: 29.1900,
        }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            lat: (self.min_lat + self.max_lat) / 2.0,
            lng: (self.min_lng + self.max_lng) / 2.0,
        }
    }

    /// Linear interpolation of a coordinate into the box.
    /// North is up, so latitude is inverted. No clamping.
    pub fn project(&self, lat: f64, lng: f64) -> ScreenPercent {
        ScreenPercent {
            x: (lng - self.min_lng) / (self.max_lng - self.min_lng) * 100.0,
            y: (self.max_lat - lat) / (self.max_lat - self.min_lat) * 100.0,
        }
    }
}

impl Default for MapBounds {
    fn default() -> Self {
        Self::site()
    }
}

impl ScreenPercent {
    /// Scale to pixels inside a widget of the given size
    pub fn to_pixels(self, width: f32, height: f32) -> (f32, f32) {
        (
            (self.x / 100.0) as f32 * width,
            (self.y / 100.0) as f32 * height,
        )
    }
}

use serde::Serialize;

use crate::*;

/// Per-channel slack allowed when a sampled color is not an exact reference color.
pub const COLOR_TOLERANCE: u8 = 5;

/// Zone names containing this marker count towards a player's twenties.
pub const TWENTY_MARKER: &str = "20";

/// Named scoring region of the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Zone {
    pub name: &'static str,
    pub points: u8,
}

impl Zone {
    pub const UNKNOWN: Zone = Zone::new("Unknown", 0);

    const fn new(name: &'static str, points: u8) -> Self {
        Self { name, points }
    }

    pub fn is_twenty(&self) -> bool {
        is_twenty_zone(self.name)
    }

    /// Reference color painted for the zone called `name`.
    pub fn color_of(name: &str) -> Option<Rgb> {
        ZONE_TABLE
            .iter()
            .find(|(_, zone)| zone.name == name)
            .map(|&(color, _)| color)
    }

    /// Resolves a sampled color: exact reference colors first, then the first table entry within
    /// [`COLOR_TOLERANCE`] on every channel, otherwise [`Zone::UNKNOWN`].
    pub fn from_color(color: Rgb) -> Zone {
        ZONE_TABLE
            .iter()
            .find(|&&(reference, _)| reference == color)
            .or_else(|| {
                ZONE_TABLE
                    .iter()
                    .find(|&&(reference, _)| reference.is_close_to(color, COLOR_TOLERANCE))
            })
            .map(|&(_, zone)| zone)
            .unwrap_or(Zone::UNKNOWN)
    }
}

pub fn is_twenty_zone(name: &str) -> bool {
    name.contains(TWENTY_MARKER)
}

/// Reference colors of the classification surface. Several 20 point zones exist so the record
/// keeps track of how the twenty was made. Order matters for tolerant matching.
pub const ZONE_TABLE: [(Rgb, Zone); 15] = [
    (Rgb(255, 82, 0), Zone::new("Gutter", 0)),
    (Rgb(0, 136, 255), Zone::new("Outer Ring", 5)),
    (Rgb(17, 231, 127), Zone::new("Middle Ring", 10)),
    (Rgb(254, 255, 0), Zone::new("Inner Ring", 15)),
    (Rgb(0, 255, 251), Zone::new("Open 20", 20)),
    (Rgb(50, 199, 157), Zone::new("Rebound 20", 20)),
    (Rgb(0, 114, 255), Zone::new("Touch 20", 20)),
    (Rgb(94, 149, 218), Zone::new("Follow Thru 20", 20)),
    (Rgb(228, 28, 229), Zone::new("Bounce Back 20", 20)),
    (Rgb(160, 156, 94), Zone::new("Angle In 20", 20)),
    (Rgb(162, 162, 153), Zone::new("Magic 20", 20)),
    (Rgb(246, 173, 0), Zone::new("Invalid Shot", 20)),
    (Rgb(101, 102, 184), Zone::new("Opponent 20", 20)),
    (Rgb(217, 171, 196), Zone::new("Other Shot", 20)),
    (Rgb(0, 191, 255), Zone::new("Take Out 20", 20)),
];

/// Converts canonical board coordinates into scoring zones by sampling a reference surface.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneClassifier<S> {
    surface: S,
}

impl<S: ClassificationSurface> ZoneClassifier<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// `point` clamped into the surface. Non-finite axes land on zero.
    pub fn clamp_point(&self, point: Point) -> Point {
        let (width, height) = self.surface.size();
        Point::new(clamp_axis(point.x, width), clamp_axis(point.y, height))
    }

    /// Pixel sampled for `point`: clamped into the surface, then rounded half up.
    pub fn pixel_for(&self, point: Point) -> Dim2 {
        let clamped = self.clamp_point(point);
        ((clamped.x + 0.5) as Dim, (clamped.y + 0.5) as Dim)
    }

    pub fn classify(&self, point: Point) -> Zone {
        let coords = self.pixel_for(point);
        let color = self.surface.sample(coords);
        let zone = Zone::from_color(color);
        if zone == Zone::UNKNOWN {
            log::warn!("No zone for color {:?} at {:?}", color, coords);
        } else {
            log::trace!("{:?} -> {:?} is {} ({} points)", point, coords, zone.name, zone.points);
        }
        zone
    }
}

fn clamp_axis(value: f64, len: Dim) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, f64::from(len.saturating_sub(1)))
    }
}

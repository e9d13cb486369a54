//! Fixed-point coordinates and bounding boxes.
//!
//! Coordinates are stored as `i32` in units of 1e-7 degrees, which is
//! the precision of the OSM database. `i32::MAX` marks an undefined
//! coordinate, so a default [`Location`] is undefined on both axes.

use std::fmt;

/// Number of fixed-point units per degree.
pub const COORDINATE_PRECISION: i32 = 10_000_000;

/// Fixed-point value of an unset coordinate.
pub const UNDEFINED_COORDINATE: i32 = i32::MAX;

/// Convert degrees to fixed point.
///
/// Non-finite input maps to [`UNDEFINED_COORDINATE`]. Values beyond the
/// `i32` range saturate, stopping one unit short of the undefined marker
/// so a present coordinate never reads back as missing.
pub fn double_to_fix(degrees: f64) -> i32 {
    if !degrees.is_finite() {
        return UNDEFINED_COORDINATE;
    }
    let fixed = (degrees * COORDINATE_PRECISION as f64).round() as i32;
    fixed.min(UNDEFINED_COORDINATE - 1)
}

/// Convert fixed point to degrees.
pub fn fix_to_double(fixed: i32) -> f64 {
    fixed as f64 / COORDINATE_PRECISION as f64
}

/// Parse a decimal coordinate, yielding 0.0 for unparsable text.
///
/// Uses Rust's locale-independent float parser.
pub fn parse_degrees_lossy(text: &str) -> f64 {
    text.trim().parse().unwrap_or(0.0)
}

/// A position on the earth's surface, or an undefined position.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    x: i32,
    y: i32,
}

impl Location {
    /// Create a location from degrees.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            x: double_to_fix(lon),
            y: double_to_fix(lat),
        }
    }

    /// Create a location from raw fixed-point values.
    pub fn from_fixed(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Undefined on both axes.
    pub const fn undefined() -> Self {
        Self {
            x: UNDEFINED_COORDINATE,
            y: UNDEFINED_COORDINATE,
        }
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        fix_to_double(self.x)
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        fix_to_double(self.y)
    }

    /// Raw fixed-point longitude.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Raw fixed-point latitude.
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Set the longitude in degrees.
    pub fn set_lon(&mut self, lon: f64) {
        self.x = double_to_fix(lon);
    }

    /// Set the latitude in degrees.
    pub fn set_lat(&mut self, lat: f64) {
        self.y = double_to_fix(lat);
    }

    /// Whether both coordinates have been set.
    pub fn is_defined(&self) -> bool {
        self.x != UNDEFINED_COORDINATE && self.y != UNDEFINED_COORDINATE
    }

    /// Whether both coordinates are set and within the WGS84 range.
    pub fn is_valid(&self) -> bool {
        let max_x = 180 * COORDINATE_PRECISION;
        let max_y = 90 * COORDINATE_PRECISION;
        (-max_x..=max_x).contains(&self.x) && (-max_y..=max_y).contains(&self.y)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::undefined()
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_defined() {
            write!(f, "Location({}, {})", self.lon(), self.lat())
        } else {
            f.write_str("Location(undefined)")
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_defined() {
            write!(f, "({:.7},{:.7})", self.lon(), self.lat())
        } else {
            f.write_str("(undefined)")
        }
    }
}

/// Axis-aligned box grown by [`extend`](BoundingBox::extend).
///
/// A fresh box is empty; extending with undefined locations leaves it
/// unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundingBox {
    min: Location,
    max: Location,
}

impl BoundingBox {
    /// An empty box.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the box to contain `location`.
    pub fn extend(&mut self, location: Location) -> &mut Self {
        if !location.is_defined() {
            return self;
        }
        if self.is_empty() {
            self.min = location;
            self.max = location;
        } else {
            self.min = Location::from_fixed(self.min.x.min(location.x), self.min.y.min(location.y));
            self.max = Location::from_fixed(self.max.x.max(location.x), self.max.y.max(location.y));
        }
        self
    }

    /// Whether nothing has been added yet.
    pub fn is_empty(&self) -> bool {
        !self.min.is_defined()
    }

    /// South-west corner (undefined while empty).
    pub fn bottom_left(&self) -> Location {
        self.min
    }

    /// North-east corner (undefined while empty).
    pub fn top_right(&self) -> Location {
        self.max
    }

    /// Whether `location` lies inside the box, borders included.
    pub fn contains(&self, location: Location) -> bool {
        !self.is_empty()
            && location.is_defined()
            && (self.min.x..=self.max.x).contains(&location.x)
            && (self.min.y..=self.max.y).contains(&location.y)
    }
}

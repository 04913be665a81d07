//! Latitude/longitude bounding boxes.

use std::fmt;

use crate::error::FieldError;

/// Normalises a longitude to [0, 360).
pub fn normalize_lon(lon: f64) -> f64 {
    lon.rem_euclid(360.0)
}

/// Names of the built-in regions accepted by [`Region::named`].
pub const NAMED_REGIONS: [&str; 5] = [
    "nino34",
    "equatorial_pacific",
    "western_equatorial_pacific",
    "tropic",
    "global",
];

/// A latitude/longitude box in degrees.
///
/// Latitude bounds are inclusive and must satisfy `south < north`.
/// Longitudes are compared after normalising to [0, 360); when `west` lies
/// east of `east` after normalisation the box wraps through the 0° meridian.
/// A box spanning 360° or more covers every longitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    name: String,
    south: f64,
    north: f64,
    west: f64,
    east: f64,
}

impl Region {
    /// Creates a region.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidRegion`] if a bound is not finite, a
    /// latitude lies outside [-90, 90], or `south >= north`.
    pub fn new(
        name: impl Into<String>,
        south: f64,
        north: f64,
        west: f64,
        east: f64,
    ) -> Result<Self, FieldError> {
        let name = name.into();
        let invalid = |reason: String| FieldError::InvalidRegion {
            name: name.clone(),
            reason,
        };
        if ![south, north, west, east].iter().all(|b| b.is_finite()) {
            return Err(invalid("bounds must be finite".to_string()));
        }
        if south < -90.0 || north > 90.0 {
            return Err(invalid(format!(
                "latitudes ({south}, {north}) outside [-90, 90]"
            )));
        }
        if south >= north {
            return Err(invalid(format!(
                "south ({south}) must be below north ({north})"
            )));
        }
        Ok(Self {
            name,
            south,
            north,
            west,
            east,
        })
    }

    /// Looks up a built-in region by name.
    ///
    /// | name | lat | lon |
    /// |------|-----|-----|
    /// | `nino34` | 5S–5N | 190–240 |
    /// | `equatorial_pacific` | 5S–5N | 120–280 |
    /// | `western_equatorial_pacific` | 5S–5N | 120–205 |
    /// | `tropic` | 20S–20N | 0–360 |
    /// | `global` | 90S–90N | 0–360 |
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::UnknownRegion`] for any other name.
    pub fn named(name: &str) -> Result<Self, FieldError> {
        let (south, north, west, east) = match name {
            "nino34" => (-5.0, 5.0, 190.0, 240.0),
            "equatorial_pacific" => (-5.0, 5.0, 120.0, 280.0),
            "western_equatorial_pacific" => (-5.0, 5.0, 120.0, 205.0),
            "tropic" => (-20.0, 20.0, 0.0, 360.0),
            "global" => (-90.0, 90.0, 0.0, 360.0),
            other => {
                return Err(FieldError::UnknownRegion {
                    name: other.to_string(),
                });
            }
        };
        Self::new(name, south, north, west, east)
    }

    /// Niño3.4 box (5S–5N, 170W–120W).
    pub fn nino34() -> Self {
        Self {
            name: "nino34".to_string(),
            south: -5.0,
            north: 5.0,
            west: 190.0,
            east: 240.0,
        }
    }

    /// Tropical band (20S–20N, all longitudes).
    pub fn tropic() -> Self {
        Self {
            name: "tropic".to_string(),
            south: -20.0,
            north: 20.0,
            west: 0.0,
            east: 360.0,
        }
    }

    /// Region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Southern bound.
    pub fn south(&self) -> f64 {
        self.south
    }

    /// Northern bound.
    pub fn north(&self) -> f64 {
        self.north
    }

    /// Western bound as given.
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Eastern bound as given.
    pub fn east(&self) -> f64 {
        self.east
    }

    /// Whether the box covers every longitude.
    pub fn is_full_circle(&self) -> bool {
        self.east - self.west >= 360.0
    }

    /// Whether the latitude lies inside the box.
    pub fn contains_lat(&self, lat: f64) -> bool {
        lat >= self.south && lat <= self.north
    }

    /// Whether the longitude lies inside the box (any convention).
    pub fn contains_lon(&self, lon: f64) -> bool {
        if self.is_full_circle() {
            return true;
        }
        let l = normalize_lon(lon);
        let w = normalize_lon(self.west);
        let e = normalize_lon(self.east);
        if w <= e {
            l >= w && l <= e
        } else {
            l >= w || l <= e
        }
    }

    /// Whether a cell centre lies inside the box.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.contains_lat(lat) && self.contains_lon(lon)
    }

    /// Eastward distance of `lon` from the western edge, in [0, 360).
    pub(crate) fn eastward_offset(&self, lon: f64) -> f64 {
        normalize_lon(normalize_lon(lon) - normalize_lon(self.west))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}..{}N, {}..{}E)",
            self.name, self.south, self.north, self.west, self.east
        )
    }
}

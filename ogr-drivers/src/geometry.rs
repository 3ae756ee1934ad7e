//! Codes de type de géométrie (WKB) et aplatissement

use std::fmt;

use geo::Geometry;
use serde::{Deserialize, Serialize};

/// Drapeau 2.5D historique
const WKB_25D_BIT: u32 = 0x8000_0000;

/// Type de géométrie au sens WKB, variantes Z/M comprises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometryType(pub u32);

impl GeometryType {
    pub const UNKNOWN: Self = Self(0);
    pub const POINT: Self = Self(1);
    pub const LINE_STRING: Self = Self(2);
    pub const POLYGON: Self = Self(3);
    pub const MULTI_POINT: Self = Self(4);
    pub const MULTI_LINE_STRING: Self = Self(5);
    pub const MULTI_POLYGON: Self = Self(6);
    pub const GEOMETRY_COLLECTION: Self = Self(7);
    pub const TRIANGLE: Self = Self(17);
    pub const NONE: Self = Self(100);
    pub const LINEAR_RING: Self = Self(101);

    /// Retire les variantes Z/M pour ne garder que la forme de base
    pub fn flatten(self) -> Self {
        let code = self.0 & !WKB_25D_BIT;
        if (1000..4000).contains(&code) {
            Self(code % 1000)
        } else {
            Self(code)
        }
    }

    pub fn has_z(self) -> bool {
        self.0 & WKB_25D_BIT != 0 || (1000..2000).contains(&self.0) || (3000..4000).contains(&self.0)
    }

    pub fn has_m(self) -> bool {
        (2000..4000).contains(&(self.0 & !WKB_25D_BIT))
    }

    /// Type correspondant à une géométrie `geo`
    pub fn of(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point(_) => Self::POINT,
            Geometry::Line(_) | Geometry::LineString(_) => Self::LINE_STRING,
            Geometry::Polygon(_) | Geometry::Rect(_) => Self::POLYGON,
            Geometry::Triangle(_) => Self::TRIANGLE,
            Geometry::MultiPoint(_) => Self::MULTI_POINT,
            Geometry::MultiLineString(_) => Self::MULTI_LINE_STRING,
            Geometry::MultiPolygon(_) => Self::MULTI_POLYGON,
            Geometry::GeometryCollection(_) => Self::GEOMETRY_COLLECTION,
        }
    }

    pub fn name(self) -> &'static str {
        match self.flatten() {
            Self::UNKNOWN => "Unknown",
            Self::POINT => "Point",
            Self::LINE_STRING => "LineString",
            Self::POLYGON => "Polygon",
            Self::MULTI_POINT => "MultiPoint",
            Self::MULTI_LINE_STRING => "MultiLineString",
            Self::MULTI_POLYGON => "MultiPolygon",
            Self::GEOMETRY_COLLECTION => "GeometryCollection",
            Self::TRIANGLE => "Triangle",
            Self::NONE => "None",
            Self::LINEAR_RING => "LinearRing",
            _ => "Other",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        match (self.has_z(), self.has_m()) {
            (true, true) => f.write_str(" ZM"),
            (true, false) => f.write_str(" Z"),
            (false, true) => f.write_str(" M"),
            (false, false) => Ok(()),
        }
    }
}

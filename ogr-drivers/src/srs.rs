//! Référence spatiale minimale (autorité + code)
//!
//! Aucune transformation de coordonnées ici: on se contente d'identifier le
//! système de référence à partir des notations usuelles.

use std::fmt;

use serde::Serialize;

use crate::DriverError;

/// Système de référence identifié par une autorité et un code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SpatialRef {
    pub authority: String,
    pub code: u32,
}

impl SpatialRef {
    pub fn from_epsg(code: u32) -> Self {
        Self {
            authority: "EPSG".to_string(),
            code,
        }
    }

    /// Interprète une chaîne saisie par l'utilisateur
    ///
    /// Formes acceptées: `EPSG:n`, `urn:ogc:def:crs:EPSG:[version]:n`,
    /// `http://www.opengis.net/def/crs/EPSG/0/n`,
    /// `http://www.opengis.net/gml/srs/epsg.xml#n`, `WGS84`, `CRS84`, `CRS:84`.
    pub fn from_user_input(input: &str) -> Result<Self, DriverError> {
        let value = input.trim();
        let fail = || DriverError::SpatialReferenceParse(input.to_string());

        if value.eq_ignore_ascii_case("WGS84")
            || value.eq_ignore_ascii_case("CRS84")
            || value.eq_ignore_ascii_case("CRS:84")
        {
            return Ok(Self::from_epsg(4326));
        }

        let code = if let Some(rest) = strip_prefix_ci(value, "EPSG:") {
            rest
        } else if let Some(rest) = strip_prefix_ci(value, "urn:ogc:def:crs:EPSG:") {
            // La version est optionnelle: urn:ogc:def:crs:EPSG::4326 ou EPSG:6.3:4326
            rest.rsplit(':').next().ok_or_else(fail)?
        } else if let Some(rest) = strip_prefix_ci(value, "http://www.opengis.net/def/crs/EPSG/") {
            rest.rsplit('/').next().ok_or_else(fail)?
        } else if let Some(rest) = strip_prefix_ci(value, "http://www.opengis.net/gml/srs/epsg.xml#") {
            rest
        } else {
            return Err(fail());
        };

        code.parse::<u32>().map(Self::from_epsg).map_err(|_| fail())
    }

    pub fn epsg(&self) -> Option<u32> {
        self.authority.eq_ignore_ascii_case("EPSG").then_some(self.code)
    }

    pub fn to_urn(&self) -> String {
        format!("urn:ogc:def:crs:{}::{}", self.authority, self.code)
    }
}

impl fmt::Display for SpatialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

/// `strip_prefix` insensible à la casse ASCII
pub(crate) fn strip_prefix_ci<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

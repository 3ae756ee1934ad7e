//! Modèle de features générique (champs, valeurs, features)

use geo::Geometry;
use serde::{Deserialize, Serialize};

use crate::geometry::GeometryType;

/// FID non encore attribué
pub const NULL_FID: i64 = -1;

/// Type sémantique d'un champ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Integer,
    Integer64,
    Real,
    String,
    Date,
    Time,
    DateTime,
    StringList,
    IntegerList,
    RealList,
    Binary,
}

/// Définition d'un champ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefn {
    pub name: String,
    pub field_type: FieldType,
    /// Largeur (0 = non précisée)
    #[serde(default)]
    pub width: i32,
    /// Précision (0 = non précisée)
    #[serde(default)]
    pub precision: i32,
}

impl FieldDefn {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            width: 0,
            precision: 0,
        }
    }

    pub fn with_width(mut self, width: i32) -> Self {
        self.width = width;
        self
    }

    pub fn with_precision(mut self, precision: i32) -> Self {
        self.precision = precision;
        self
    }
}

/// Définition d'une couche: nom, champs et type de géométrie
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDefn {
    pub name: String,
    pub fields: Vec<FieldDefn>,
    pub geometry_type: GeometryType,
}

impl FeatureDefn {
    pub fn new(name: impl Into<String>, geometry_type: GeometryType) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            geometry_type,
        }
    }

    pub fn add_field(&mut self, field: FieldDefn) {
        self.fields.push(field);
    }

    /// Index d'un champ (comparaison insensible à la casse)
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// Valeur brute d'un champ
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Integer(i32),
    Integer64(i64),
    Real(f64),
    String(String),
    IntegerList(Vec<i32>),
    RealList(Vec<f64>),
    StringList(Vec<String>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Feature générique: géométrie optionnelle, valeurs positionnelles et style OGR
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub fid: i64,
    pub geometry: Option<Geometry>,
    pub fields: Vec<FieldValue>,
    pub style: Option<String>,
}

impl Feature {
    pub fn new(fields: Vec<FieldValue>) -> Self {
        Self {
            fid: NULL_FID,
            geometry: None,
            fields,
            style: None,
        }
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_fid(mut self, fid: i64) -> Self {
        self.fid = fid;
        self
    }

    /// Type de géométrie (`NONE` si la feature n'a pas de géométrie)
    pub fn geometry_type(&self) -> GeometryType {
        self.geometry
            .as_ref()
            .map(GeometryType::of)
            .unwrap_or(GeometryType::NONE)
    }

    pub fn field(&self, index: usize) -> Option<&FieldValue> {
        self.fields.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    #[test]
    fn test_new_feature_has_null_fid() {
        let feature = Feature::new(vec![FieldValue::Integer(1)]);
        assert_eq!(feature.fid, NULL_FID);
        assert_eq!(feature.geometry_type(), GeometryType::NONE);
    }

    #[test]
    fn test_feature_geometry_type() {
        let feature = Feature::new(vec![]).with_geometry(Geometry::Point(Point::new(1.0, 2.0)));
        assert_eq!(feature.geometry_type(), GeometryType::POINT);
    }

    #[test]
    fn test_field_index_is_case_insensitive() {
        let mut defn = FeatureDefn::new("test", GeometryType::NONE);
        defn.add_field(FieldDefn::new("gml_id", FieldType::String));
        assert_eq!(defn.field_index("GML_ID"), Some(0));
        assert_eq!(defn.field_index("other"), None);
    }
}

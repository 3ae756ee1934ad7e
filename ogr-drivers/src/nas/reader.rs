//! Lecteur de schéma et de features NAS (classes GML)
//!
//! Le parsing XML/GML est hors du périmètre de ce crate: un lecteur expose les
//! classes déjà analysées et les features brutes via le trait [`NasReader`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::GeometryType;
use crate::DriverError;

/// Type d'une propriété GML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PropertyType {
    #[default]
    Untyped,
    String,
    Integer,
    Real,
    Complex,
    StringList,
    IntegerList,
    RealList,
    FeatureProperty,
    FeaturePropertyList,
}

/// Propriété déclarée par une classe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefn {
    pub name: String,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub width: i32,
}

impl PropertyDefn {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            width: 0,
        }
    }

    /// Affine le type d'après une nouvelle valeur observée
    ///
    /// Le type ne fait que s'élargir: Integer → Real → String, et passe à la
    /// variante liste dès qu'une valeur multiple est rencontrée.
    pub fn analyse_values(&mut self, values: &[String]) {
        if values.is_empty() {
            return;
        }

        let mut observed = PropertyType::Untyped;
        for value in values {
            let value_type = if value.trim().parse::<i64>().is_ok() {
                PropertyType::Integer
            } else if fast_float::parse::<f64, _>(value.trim()).is_ok() {
                PropertyType::Real
            } else {
                PropertyType::String
            };
            observed = widen(observed, value_type);
            if value_type == PropertyType::String {
                self.width = self.width.max(value.chars().count() as i32);
            }
        }

        if values.len() > 1 {
            observed = match observed {
                PropertyType::Integer => PropertyType::IntegerList,
                PropertyType::Real => PropertyType::RealList,
                _ => PropertyType::StringList,
            };
        }

        self.property_type = widen(self.property_type, observed);
    }
}

/// Élargit deux types observés vers le plus général
fn widen(current: PropertyType, observed: PropertyType) -> PropertyType {
    use PropertyType::*;

    match (current, observed) {
        (Untyped, t) | (t, Untyped) => t,
        (a, b) if a == b => a,
        (Integer, Real) | (Real, Integer) => Real,
        (IntegerList, RealList) | (RealList, IntegerList) => RealList,
        (Integer, IntegerList) | (IntegerList, Integer) => IntegerList,
        (Real | Integer, RealList | IntegerList) | (RealList | IntegerList, Real | Integer) => RealList,
        (StringList, _) | (_, StringList) => StringList,
        (IntegerList | RealList, String) | (String, IntegerList | RealList) => StringList,
        _ => String,
    }
}

/// Propriété géométrique d'une classe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryPropertyDefn {
    pub name: String,
    pub geometry_type: GeometryType,
}

/// Classe de features (schéma d'une couche NAS)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureClass {
    pub name: String,
    #[serde(default)]
    pub geometry_properties: Vec<GeometryPropertyDefn>,
    #[serde(default)]
    pub properties: Vec<PropertyDefn>,
    #[serde(default)]
    pub srs_name: Option<String>,
    /// Nombre de features connues, -1 si inconnu
    #[serde(default = "unknown_count")]
    pub feature_count: i64,
}

fn unknown_count() -> i64 {
    -1
}

impl FeatureClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry_properties: Vec::new(),
            properties: Vec::new(),
            srs_name: None,
            feature_count: -1,
        }
    }

    /// Index d'une propriété (comparaison insensible à la casse)
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Propriété d'une feature: une ou plusieurs sous-valeurs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmlProperty {
    pub name: String,
    pub values: Vec<String>,
}

/// Feature GML brute telle que lue dans le fichier NAS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmlFeature {
    pub class_name: String,
    #[serde(default)]
    pub properties: Vec<GmlProperty>,
    /// Propriétés auxiliaires `nom=valeur` (références "OB" hors schéma)
    #[serde(default)]
    pub ob_properties: Vec<String>,
}

impl GmlFeature {
    /// Propriété par nom (comparaison insensible à la casse)
    pub fn property(&self, name: &str) -> Option<&GmlProperty> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Lecteur de schéma et de features NAS
pub trait NasReader {
    /// Fichier source à lire
    fn set_source_file(&mut self, path: &Path);

    /// Charge un schéma en cache; `Ok(false)` si le fichier ne contient aucune classe
    fn load_classes(&mut self, path: &Path) -> Result<bool, DriverError>;

    /// Sauvegarde le schéma courant
    fn save_classes(&self, path: &Path) -> Result<(), DriverError>;

    /// Parcourt le fichier source pour établir le schéma
    fn prescan_for_schema(&mut self, get_extents: bool) -> Result<bool, DriverError>;

    /// Classes connues, dans l'ordre de découverte
    fn classes(&self) -> &[FeatureClass];

    /// Revient au début du flux de features
    fn reset_reading(&mut self);

    /// Feature suivante, `None` en fin de flux
    fn next_feature(&mut self) -> Result<Option<GmlFeature>, DriverError>;
}

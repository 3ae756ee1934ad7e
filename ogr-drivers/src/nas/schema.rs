//! Traduction des classes GML en couches

use tracing::{debug, warn};

use super::reader::{FeatureClass, PropertyType};
use crate::geometry::GeometryType;
use crate::srs::{strip_prefix_ci, SpatialRef};
use crate::types::{FeatureDefn, FieldDefn, FieldType};

/// Alias des identifiants AdV vers EPSG (`*` final = préfixe)
const URN_NAMES: &[(&str, &str)] = &[
    ("DE_DHDN_3GK2_*", "EPSG:31466"),
    ("DE_DHDN_3GK3_*", "EPSG:31467"),
    ("ETRS89_UTM32", "EPSG:25832"),
    ("ETRS89_UTM33", "EPSG:25833"),
];

/// Préfixe de namespace retiré des noms de champs
const RESERVED_PREFIX: &str = "ogr:";

/// Couche issue d'une classe NAS
#[derive(Debug, Clone, PartialEq)]
pub struct NasLayer {
    pub defn: FeatureDefn,
    pub srs: Option<SpatialRef>,
}

impl NasLayer {
    pub fn name(&self) -> &str {
        &self.defn.name
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.defn.geometry_type
    }
}

/// Construit la couche correspondant à une classe
///
/// Toutes les propriétés deviennent des champs, dans l'ordre déclaré. Un SRS
/// non reconnu est journalisé et la couche est créée sans SRS.
pub fn translate_schema(class: &FeatureClass) -> NasLayer {
    let geometry_type = match class.geometry_properties.first() {
        None => GeometryType::NONE,
        // type réel inconnu tant qu'aucune feature n'a été vue
        Some(_) if class.feature_count == 0 => GeometryType::UNKNOWN,
        Some(property) => property.geometry_type,
    };

    let srs = class.srs_name.as_deref().and_then(resolve_srs);

    let mut defn = FeatureDefn::new(class.name.clone(), geometry_type);
    for property in &class.properties {
        let field_type = match property.property_type {
            PropertyType::Untyped | PropertyType::String => FieldType::String,
            PropertyType::Integer => FieldType::Integer,
            PropertyType::Real => FieldType::Real,
            PropertyType::StringList => FieldType::StringList,
            PropertyType::IntegerList => FieldType::IntegerList,
            PropertyType::RealList => FieldType::RealList,
            _ => FieldType::String,
        };

        let name = strip_prefix_ci(&property.name, RESERVED_PREFIX).unwrap_or(property.name.as_str());
        let mut field = FieldDefn::new(name, field_type);
        if property.width > 0 {
            field.width = property.width;
        }
        defn.add_field(field);
    }

    NasLayer { defn, srs }
}

/// Résout un `srsName` GML en référence spatiale
///
/// Seul l'identifiant après le dernier `:` est comparé à la table d'alias;
/// sans `:` aucun SRS n'est attribué.
pub fn resolve_srs(srs_name: &str) -> Option<SpatialRef> {
    let (_, handle) = srs_name.rsplit_once(':')?;

    let input = lookup_alias(handle).unwrap_or(srs_name);
    match SpatialRef::from_user_input(input) {
        Ok(srs) => {
            debug!(srs_name, srs = %srs, "Resolved srsName");
            Some(srs)
        }
        Err(e) => {
            warn!(srs_name = input, error = %e, "Failed to translate srsName");
            None
        }
    }
}

fn lookup_alias(handle: &str) -> Option<&'static str> {
    URN_NAMES.iter().find_map(|&(target, alias)| {
        let matched = match target.strip_suffix('*') {
            Some(prefix) => strip_prefix_ci(handle, prefix).is_some(),
            None => target.eq_ignore_ascii_case(handle),
        };
        matched.then_some(alias)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nas::reader::{GeometryPropertyDefn, PropertyDefn};

    fn class_with_polygon(feature_count: i64) -> FeatureClass {
        let mut class = FeatureClass::new("AX_Flurstueck");
        class.geometry_properties.push(GeometryPropertyDefn {
            name: "position".to_string(),
            geometry_type: GeometryType::POLYGON,
        });
        class.feature_count = feature_count;
        class
    }

    #[test]
    fn test_no_geometry_property() {
        let layer = translate_schema(&FeatureClass::new("AX_Person"));
        assert_eq!(layer.geometry_type(), GeometryType::NONE);
        assert_eq!(layer.name(), "AX_Person");
    }

    #[test]
    fn test_empty_class_has_unknown_geometry() {
        let layer = translate_schema(&class_with_polygon(0));
        assert_eq!(layer.geometry_type(), GeometryType::UNKNOWN);
    }

    #[test]
    fn test_declared_geometry_type() {
        assert_eq!(translate_schema(&class_with_polygon(12)).geometry_type(), GeometryType::POLYGON);
        // nombre inconnu: le type déclaré est conservé
        assert_eq!(translate_schema(&class_with_polygon(-1)).geometry_type(), GeometryType::POLYGON);
    }

    #[test]
    fn test_field_translation() {
        let mut class = FeatureClass::new("AX_Gebaeude");
        class.properties = vec![
            PropertyDefn::new("gml_id", PropertyType::Untyped),
            PropertyDefn {
                name: "OGR:name".to_string(),
                property_type: PropertyType::String,
                width: 40,
            },
            PropertyDefn::new("anzahl", PropertyType::Integer),
            PropertyDefn::new("hoehe", PropertyType::Real),
            PropertyDefn::new("namen", PropertyType::StringList),
            PropertyDefn::new("codes", PropertyType::IntegerList),
            PropertyDefn::new("werte", PropertyType::RealList),
            PropertyDefn::new("lage", PropertyType::Complex),
        ];

        let layer = translate_schema(&class);
        let fields = &layer.defn.fields;

        assert_eq!(fields.len(), 8);
        assert_eq!(fields[0].field_type, FieldType::String);
        assert_eq!(fields[1].name, "name");
        assert_eq!(fields[1].width, 40);
        assert_eq!(fields[2].field_type, FieldType::Integer);
        assert_eq!(fields[3].field_type, FieldType::Real);
        assert_eq!(fields[4].field_type, FieldType::StringList);
        assert_eq!(fields[5].field_type, FieldType::IntegerList);
        assert_eq!(fields[6].field_type, FieldType::RealList);
        assert_eq!(fields[7].field_type, FieldType::String);
        assert_eq!(fields[7].width, 0);
    }

    #[test]
    fn test_srs_wildcard_alias() {
        let srs = resolve_srs("urn:adv:crs:DE_DHDN_3GK2_NW177").unwrap();
        assert_eq!(srs.epsg(), Some(31466));
        let srs = resolve_srs("urn:adv:crs:de_dhdn_3gk3_BW100").unwrap();
        assert_eq!(srs.epsg(), Some(31467));
    }

    #[test]
    fn test_srs_exact_alias() {
        assert_eq!(resolve_srs("urn:adv:crs:ETRS89_UTM32").unwrap().epsg(), Some(25832));
        // correspondance exacte uniquement
        assert!(resolve_srs("urn:adv:crs:ETRS89_UTM32_X").is_none());
    }

    #[test]
    fn test_srs_without_alias_uses_original_string() {
        assert_eq!(resolve_srs("urn:ogc:def:crs:EPSG::4258").unwrap().epsg(), Some(4258));
        assert_eq!(resolve_srs("EPSG:25833").unwrap().epsg(), Some(25833));
    }

    #[test]
    fn test_srs_unknown_is_none() {
        assert!(resolve_srs("urn:adv:crs:UNKNOWN_CRS").is_none());
        assert!(resolve_srs("nocolon").is_none());
    }

    #[test]
    fn test_layer_with_unknown_srs_is_still_created() {
        let mut class = class_with_polygon(3);
        class.srs_name = Some("urn:adv:crs:FOO".to_string());
        let layer = translate_schema(&class);
        assert!(layer.srs.is_none());
        assert_eq!(layer.geometry_type(), GeometryType::POLYGON);
    }
}

//! Lecture des features GeoJSON et déduction du schéma

use std::path::Path;

use anyhow::{Context, Result};
use geojson::GeoJson;
use serde_json::Value;

use ogr_drivers::{Feature, FieldDefn, FieldType, FieldValue};

/// Propriété portant la chaîne de style OGR
pub const STYLE_PROPERTY: &str = "style";

/// Features GeoJSON lues et schéma déduit de leurs propriétés
pub struct Input {
    pub fields: Vec<FieldDefn>,
    pub features: Vec<geojson::Feature>,
}

/// Lit un fichier GeoJSON (FeatureCollection, Feature ou Geometry seule)
pub fn read_geojson(path: &Path) -> Result<Input> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read file: {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .context(format!("Failed to parse GeoJSON: {}", path.display()))?;

    let features = match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![geojson::Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    };

    Ok(Input {
        fields: infer_fields(&features),
        features,
    })
}

/// Déduit les champs depuis les propriétés, dans l'ordre de première apparition
///
/// La largeur des champs texte est celle de la plus longue valeur.
fn infer_fields(features: &[geojson::Feature]) -> Vec<FieldDefn> {
    let mut fields: Vec<FieldDefn> = Vec::new();
    let mut longest: Vec<i32> = Vec::new();

    for properties in features.iter().filter_map(|f| f.properties.as_ref()) {
        for (name, value) in properties {
            if name == STYLE_PROPERTY || value.is_null() {
                continue;
            }

            let observed = value_type(value);
            let index = match fields.iter().position(|f| f.name == *name) {
                Some(index) => index,
                None => {
                    fields.push(FieldDefn::new(name.clone(), observed));
                    longest.push(0);
                    fields.len() - 1
                }
            };

            fields[index].field_type = widen(fields[index].field_type, observed);
            longest[index] = longest[index].max(text(value).chars().count() as i32);
        }
    }

    for (field, len) in fields.iter_mut().zip(longest) {
        if field.field_type == FieldType::String {
            field.width = len;
        }
    }

    fields
}

fn value_type(value: &Value) -> FieldType {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) if i32::try_from(i).is_ok() => FieldType::Integer,
            Some(_) => FieldType::Integer64,
            None => FieldType::Real,
        },
        Value::Array(items) => {
            let types: Vec<FieldType> = items.iter().map(value_type).collect();
            if !types.is_empty() && types.iter().all(|t| *t == FieldType::Integer) {
                FieldType::IntegerList
            } else if !types.is_empty()
                && types
                    .iter()
                    .all(|t| matches!(t, FieldType::Integer | FieldType::Integer64 | FieldType::Real))
            {
                FieldType::RealList
            } else {
                FieldType::StringList
            }
        }
        _ => FieldType::String,
    }
}

fn widen(current: FieldType, observed: FieldType) -> FieldType {
    use FieldType::*;

    match (current, observed) {
        (a, b) if a == b => a,
        (Integer, Integer64) | (Integer64, Integer) => Integer64,
        (Integer | Integer64 | Real, Integer | Integer64 | Real) => Real,
        (IntegerList, RealList) | (RealList, IntegerList) => RealList,
        (IntegerList | RealList | StringList, IntegerList | RealList | StringList) => StringList,
        _ => String,
    }
}

fn text(value: &Value) -> std::borrow::Cow<'_, str> {
    match value {
        Value::String(s) => std::borrow::Cow::Borrowed(s),
        other => std::borrow::Cow::Owned(other.to_string()),
    }
}

/// Convertit une valeur JSON vers le type du champ (`Null` si incompatible)
pub fn to_field_value(value: Option<&Value>, field_type: FieldType) -> FieldValue {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return FieldValue::Null;
    };

    let converted = match field_type {
        FieldType::Integer => value
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(FieldValue::Integer),
        FieldType::Integer64 => value.as_i64().map(FieldValue::Integer64),
        FieldType::Real => value.as_f64().map(FieldValue::Real),
        FieldType::IntegerList => value.as_array().map(|items| {
            FieldValue::IntegerList(
                items
                    .iter()
                    .filter_map(|v| v.as_i64().and_then(|i| i32::try_from(i).ok()))
                    .collect(),
            )
        }),
        FieldType::RealList => value
            .as_array()
            .map(|items| FieldValue::RealList(items.iter().filter_map(Value::as_f64).collect())),
        FieldType::StringList => value.as_array().map(|items| {
            FieldValue::StringList(items.iter().map(|v| text(v).into_owned()).collect())
        }),
        _ => Some(FieldValue::String(text(value).into_owned())),
    };

    converted.unwrap_or_default()
}

/// Construit la feature générique correspondant à une feature GeoJSON
pub fn build_feature(source: &geojson::Feature, fields: &[FieldDefn]) -> Result<Feature> {
    let properties = source.properties.as_ref();

    let values = fields
        .iter()
        .map(|field| {
            let value = properties.and_then(|p| p.get(&field.name));
            to_field_value(value, field.field_type)
        })
        .collect();

    let mut feature = Feature::new(values);

    if let Some(geometry) = source.geometry.clone() {
        let geometry = geo::Geometry::<f64>::try_from(geometry).context("Unsupported geometry")?;
        feature = feature.with_geometry(geometry);
    }

    if let Some(style) = properties
        .and_then(|p| p.get(STYLE_PROPERTY))
        .and_then(Value::as_str)
    {
        feature = feature.with_style(style);
    }

    Ok(feature)
}

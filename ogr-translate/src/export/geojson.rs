//! Export des features natives MapInfo vers GeoJSON avec geozero

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;
use serde_json::{Map, Value};

use ogr_drivers::mitab::{MemoryStore, NativeFeature, NativeField, NativeKind};
use ogr_drivers::FieldValue;

/// Exporte le contenu d'un stockage MapInfo en GeoJSON
///
/// Chaque feature porte sa variante native (`_native`) et ses attributs de
/// style (`_symbol`, `_pen`, `_brush`) en plus de ses champs.
pub fn export_native_features(store: &MemoryStore, charset: Option<&str>, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    write!(writer, r#"{{"type":"FeatureCollection","#)?;
    if let Some(charset) = charset {
        write!(writer, r#""charset":{},"#, Value::String(charset.to_string()))?;
    }
    write!(writer, r#""features":["#)?;

    for (i, feature) in store.features().iter().enumerate() {
        if i > 0 {
            write!(writer, ",")?;
        }
        write_feature(&mut writer, feature, store.fields())?;
    }

    write!(writer, "]}}")?;
    writer.flush()?;

    Ok(())
}

/// Écrit une feature native en GeoJSON
fn write_feature<W: Write>(writer: &mut W, feature: &NativeFeature, fields: &[NativeField]) -> Result<()> {
    write!(writer, r#"{{"type":"Feature","id":{},"#, feature.fid)?;

    write!(writer, r#""geometry":"#)?;
    match &feature.geometry {
        Some(geometry) => {
            let mut geom_buf = Vec::new();
            let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
            geometry.process_geom(&mut geom_writer)?;
            writer.write_all(&geom_buf)?;
        }
        None => write!(writer, "null")?,
    }

    write!(writer, r#","properties":"#)?;
    serde_json::to_writer(&mut *writer, &properties(feature, fields)?)?;
    write!(writer, "}}")?;

    Ok(())
}

fn properties(feature: &NativeFeature, fields: &[NativeField]) -> Result<Map<String, Value>> {
    let mut properties = Map::new();

    for (field, value) in fields.iter().zip(&feature.fields) {
        properties.insert(field.name.clone(), field_value_to_json(value));
    }

    properties.insert("_native".to_string(), Value::from(feature.kind.name()));
    match &feature.kind {
        NativeKind::Point { symbol: Some(symbol) } => {
            properties.insert("_symbol".to_string(), serde_json::to_value(symbol)?);
        }
        NativeKind::Region { pen, brush } => {
            if let Some(pen) = pen {
                properties.insert("_pen".to_string(), serde_json::to_value(pen)?);
            }
            if let Some(brush) = brush {
                properties.insert("_brush".to_string(), serde_json::to_value(brush)?);
            }
        }
        NativeKind::Polyline { pen: Some(pen) } => {
            properties.insert("_pen".to_string(), serde_json::to_value(pen)?);
        }
        _ => {}
    }

    Ok(properties)
}

fn field_value_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Integer(i) => Value::from(*i),
        FieldValue::Integer64(i) => Value::from(*i),
        FieldValue::Real(r) => Value::from(*r),
        FieldValue::String(s) => Value::from(s.as_str()),
        FieldValue::IntegerList(items) => Value::from(items.clone()),
        FieldValue::RealList(items) => Value::from(items.clone()),
        FieldValue::StringList(items) => Value::from(items.clone()),
    }
}

//! Lecteur NAS sur un export JSON
//!
//! Format du fichier source:
//!
//! ```json
//! {
//!   "classes": [{ "name": "AX_Flurstueck", "properties": [...] }],
//!   "features": [{ "class_name": "AX_Flurstueck", "properties": [...], "ob_properties": [...] }]
//! }
//! ```
//!
//! `classes` est optionnel: sans lui, le schéma est déduit des features. Le
//! schéma en cache (.gfs) est la liste de classes sérialisée en JSON.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::reader::{FeatureClass, GmlFeature, NasReader, PropertyDefn, PropertyType};
use crate::DriverError;

#[derive(Debug, Default, Deserialize, Serialize)]
struct Document {
    #[serde(default)]
    classes: Option<Vec<FeatureClass>>,
    #[serde(default)]
    features: Vec<GmlFeature>,
}

/// Lecteur NAS adossé à un document JSON chargé en mémoire
#[derive(Debug, Default)]
pub struct JsonNasReader {
    source: Option<PathBuf>,
    document: Option<Document>,
    classes: Vec<FeatureClass>,
    cursor: usize,
}

impl JsonNasReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charge (une seule fois) le document source
    fn document(&mut self) -> Result<&Document, DriverError> {
        if self.document.is_none() {
            let path = self.source.as_ref().ok_or_else(|| {
                DriverError::ResourceInstantiation("No NAS source file set".to_string())
            })?;
            let file = File::open(path)?;
            let document: Document = serde_json::from_reader(BufReader::new(file))?;
            debug!(path = %path.display(), features = document.features.len(), "Loaded NAS document");
            self.document = Some(document);
        }
        Ok(self.document.get_or_insert_with(Document::default))
    }
}

impl NasReader for JsonNasReader {
    fn set_source_file(&mut self, path: &Path) {
        self.source = Some(path.to_path_buf());
        self.document = None;
        self.cursor = 0;
    }

    fn load_classes(&mut self, path: &Path) -> Result<bool, DriverError> {
        let file = File::open(path).map_err(|e| DriverError::schema_load(path, e.to_string()))?;
        let classes: Vec<FeatureClass> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| DriverError::schema_load(path, e.to_string()))?;

        self.classes = classes;
        Ok(!self.classes.is_empty())
    }

    fn save_classes(&self, path: &Path) -> Result<(), DriverError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.classes)?;
        Ok(())
    }

    fn prescan_for_schema(&mut self, _get_extents: bool) -> Result<bool, DriverError> {
        let document = self.document()?;
        let mut classes = document.classes.clone().unwrap_or_default();
        let declared = classes.len();

        for class in &mut classes {
            class.feature_count = 0;
        }

        for feature in &document.features {
            let index = match classes
                .iter()
                .position(|c| c.name == feature.class_name)
            {
                Some(index) => index,
                None => {
                    let mut class = FeatureClass::new(feature.class_name.clone());
                    class.feature_count = 0;
                    classes.push(class);
                    classes.len() - 1
                }
            };
            let class = &mut classes[index];
            class.feature_count += 1;

            // les classes déclarées gardent leur schéma, les autres le déduisent
            if index < declared {
                continue;
            }
            for property in &feature.properties {
                let position = match class.property_index(&property.name) {
                    Some(position) => position,
                    None => {
                        class
                            .properties
                            .push(PropertyDefn::new(property.name.clone(), PropertyType::Untyped));
                        class.properties.len() - 1
                    }
                };
                class.properties[position].analyse_values(&property.values);
            }
        }

        debug!(classes = classes.len(), "Schema prescan complete");
        self.classes = classes;
        Ok(!self.classes.is_empty())
    }

    fn classes(&self) -> &[FeatureClass] {
        &self.classes
    }

    fn reset_reading(&mut self) {
        self.cursor = 0;
    }

    fn next_feature(&mut self) -> Result<Option<GmlFeature>, DriverError> {
        let cursor = self.cursor;
        let feature = self.document()?.features.get(cursor).cloned();
        if feature.is_some() {
            self.cursor += 1;
        }
        Ok(feature)
    }
}

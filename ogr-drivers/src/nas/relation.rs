//! Extraction des relations entre objets NAS
//!
//! Les références vers d'autres objets ne font pas partie du schéma: elles
//! arrivent sous forme de propriétés auxiliaires `nom=urn:adv:oid:XXXX`.

use serde::Serialize;
use tracing::{debug, info};

use super::reader::NasReader;
use crate::geometry::GeometryType;
use crate::srs::strip_prefix_ci;
use crate::types::{Feature, FeatureDefn, FieldDefn, FieldType, FieldValue};
use crate::DriverError;

/// Nom de la couche des relations
pub const RELATION_LAYER_NAME: &str = "ALKIS_beziehungen";

/// Préfixe d'une référence d'objet AdV
const OID_PREFIX: &str = "urn:adv:oid:";

/// Propriété portant l'identifiant de l'objet source
const GML_ID: &str = "gml_id";

/// Relation source → cible
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationRecord {
    pub source_id: String,
    pub name: String,
    pub target_id: String,
}

/// État de la couche des relations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PopulationState {
    Unpopulated,
    Populating,
    Populated,
}

/// Couche synthétique des relations, remplie en une seule passe
#[derive(Debug)]
pub struct RelationLayer {
    defn: FeatureDefn,
    records: Vec<RelationRecord>,
    state: PopulationState,
}

impl Default for RelationLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl RelationLayer {
    pub fn new() -> Self {
        let mut defn = FeatureDefn::new(RELATION_LAYER_NAME, GeometryType::NONE);
        defn.add_field(FieldDefn::new("beziehung_von", FieldType::String));
        defn.add_field(FieldDefn::new("beziehungsart", FieldType::String));
        defn.add_field(FieldDefn::new("beziehung_zu", FieldType::String));

        Self {
            defn,
            records: Vec::new(),
            state: PopulationState::Unpopulated,
        }
    }

    pub fn name(&self) -> &str {
        &self.defn.name
    }

    pub fn defn(&self) -> &FeatureDefn {
        &self.defn
    }

    pub fn state(&self) -> PopulationState {
        self.state
    }

    pub fn is_populated(&self) -> bool {
        self.state == PopulationState::Populated
    }

    /// Relations extraites; vide tant que la couche n'est pas remplie
    pub fn records(&self) -> &[RelationRecord] {
        if self.is_populated() {
            &self.records
        } else {
            &[]
        }
    }

    /// Relations exposées comme features génériques (FID à partir de 0)
    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        self.records().iter().enumerate().map(|(i, record)| {
            Feature::new(vec![
                FieldValue::String(record.source_id.clone()),
                FieldValue::String(record.name.clone()),
                FieldValue::String(record.target_id.clone()),
            ])
            .with_fid(i as i64)
        })
    }

    fn add_relation(&mut self, source_id: &str, name: &str, target_id: &str) {
        self.records.push(RelationRecord {
            source_id: source_id.to_string(),
            name: name.to_string(),
            target_id: target_id.to_string(),
        });
    }

    /// Parcourt tout le flux de features et extrait les relations
    ///
    /// Opération unique: un second appel échoue avec `RelationsAlreadyPopulated`.
    /// En cas d'erreur de lecture, la couche revient à l'état initial.
    pub fn populate<R: NasReader + ?Sized>(&mut self, reader: &mut R) -> Result<usize, DriverError> {
        if self.state != PopulationState::Unpopulated {
            return Err(DriverError::RelationsAlreadyPopulated);
        }
        self.state = PopulationState::Populating;

        match self.scan(reader) {
            Ok(()) => {
                self.state = PopulationState::Populated;
                info!(count = self.records.len(), "Relations populated");
                Ok(self.records.len())
            }
            Err(e) => {
                self.records.clear();
                self.state = PopulationState::Unpopulated;
                Err(e)
            }
        }
    }

    fn scan<R: NasReader + ?Sized>(&mut self, reader: &mut R) -> Result<(), DriverError> {
        reader.reset_reading();

        while let Some(feature) = reader.next_feature()? {
            // identifiant source: une et une seule valeur
            let source_id = feature
                .property(GML_ID)
                .filter(|p| p.values.len() == 1)
                .map(|p| p.values[0].as_str());

            for ob_property in &feature.ob_properties {
                let Some((name, value)) = parse_name_value(ob_property) else {
                    debug!(property = %ob_property, "Skipping malformed OB property");
                    continue;
                };

                if let (Some(target), Some(source)) = (strip_prefix_ci(value, OID_PREFIX), source_id) {
                    self.add_relation(source, name, target);
                }
            }
        }

        Ok(())
    }
}

/// Découpe `nom=valeur` (ou `nom:valeur`) au premier séparateur
///
/// Les espaces en tête de valeur sont ignorés.
pub fn parse_name_value(entry: &str) -> Option<(&str, &str)> {
    let pos = memchr::memchr2(b'=', b':', entry.as_bytes())?;
    let name = &entry[..pos];
    let value = entry[pos + 1..].trim_start_matches(' ');
    Some((name, value))
}

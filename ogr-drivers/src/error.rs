//! Types d'erreurs pour le crate ogr-drivers

use std::path::PathBuf;

use thiserror::Error;

use crate::types::FieldType;

/// Erreurs pouvant survenir lors de la traduction MapInfo / NAS
#[derive(Debug, Error)]
pub enum DriverError {
    /// Erreur d'I/O lors de la lecture d'un fichier
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Erreur de (dé)sérialisation JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Type de champ sans équivalent MapInfo
    #[error("Unsupported field type {field_type:?} for field '{field}' (MapInfo files don't support list field types)")]
    UnsupportedFieldType { field: String, field_type: FieldType },

    /// Échec de création d'une sous-feature lors de la décomposition d'une collection
    #[error("Failed to create part {index} of collection geometry: {source}")]
    GeometryDecomposition {
        index: usize,
        #[source]
        source: Box<DriverError>,
    },

    /// Chaîne SRS non interprétable
    #[error("Failed to translate srsName='{0}'")]
    SpatialReferenceParse(String),

    /// Schéma en cache (.gfs) illisible
    #[error("Failed to load schema {path}: {reason}")]
    SchemaLoad { path: PathBuf, reason: String },

    /// Lecteur ou driver impossible à instancier
    #[error("{0}")]
    ResourceInstantiation(String),

    /// Chaîne de style OGR mal formée
    #[error("Invalid style string '{style}': {reason}")]
    InvalidStyle { style: String, reason: String },

    /// Charset vide
    #[error("Charset must not be empty")]
    InvalidCharset,

    /// Mode d'accès non supporté
    #[error("Open() failed: access mode \"{0}\" not supported")]
    UnsupportedAccessMode(String),

    /// Écriture sur un fichier ouvert en lecture seule
    #[error("Cannot write to a MapInfo file opened in read mode")]
    ReadOnly,

    /// Fichier non reconnu comme dataset MapInfo
    #[error("{0} could not be opened as a MapInfo dataset")]
    NotMapInfo(PathBuf),

    /// FID déjà utilisé dans le fichier natif
    #[error("Feature id {0} already exists or is out of sequence")]
    DuplicateFid(i64),

    /// Nombre de valeurs différent du nombre de champs natifs
    #[error("Feature has {actual} field values but the native definition has {expected}")]
    FieldCountMismatch { expected: usize, actual: usize },

    /// Relations déjà extraites
    #[error("Relations have already been populated")]
    RelationsAlreadyPopulated,
}

impl DriverError {
    /// Crée une erreur de chargement de schéma avec contexte
    pub fn schema_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::SchemaLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de style avec contexte
    pub fn invalid_style(style: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStyle {
            style: style.into(),
            reason: reason.into(),
        }
    }

    /// Encapsule l'échec de la sous-feature `index` d'une collection
    pub fn decomposition(index: usize, source: DriverError) -> Self {
        Self::GeometryDecomposition {
            index,
            source: Box::new(source),
        }
    }
}

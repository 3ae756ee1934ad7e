//! Traduction des features génériques vers les features natives MapInfo
//!
//! MapInfo n'accepte que des features typées (point, région, polyligne ou sans
//! géométrie). Les collections et multipoints sont éclatés en autant de
//! features élémentaires.

pub mod charset;
pub mod feature;
pub mod field;
pub mod open;
pub mod style;

use encoding_rs::Encoding;
use tracing::debug;

pub use feature::{NativeFeature, NativeKind};
pub use field::{map_field_type, NativeFieldSpec, NativeFieldType};
pub use open::{detect_file_kind, smart_open, AccessMode, FileKind};
pub use style::{BrushDef, PenDef, SymbolDef};

use crate::types::{Feature, FieldDefn, NULL_FID};
use crate::DriverError;
use feature::Shape;

/// Stockage des features natives (fichier .tab, .mif, mémoire...)
pub trait NativeStore {
    /// Ajoute un champ natif et renvoie son index
    fn add_field(
        &mut self,
        name: &str,
        spec: NativeFieldSpec,
        indexed: bool,
        unique: bool,
        approx_ok: bool,
    ) -> Result<usize, DriverError>;

    /// Écrit une feature et renvoie le FID attribué
    fn write_feature(&mut self, feature: NativeFeature) -> Result<i64, DriverError>;
}

/// Résultat de la traduction d'une feature générique
#[derive(Debug)]
pub enum Mapped {
    /// Une feature native à écrire
    Single(NativeFeature),
    /// Collection déjà écrite sous forme de `n` features élémentaires
    Decomposed(usize),
}

/// Résultat de la création d'une feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    Single { fid: i64 },
    Decomposed(usize),
}

impl Created {
    /// Nombre de features natives écrites
    pub fn count(&self) -> usize {
        match self {
            Created::Single { .. } => 1,
            Created::Decomposed(n) => *n,
        }
    }
}

/// Fichier MapInfo ouvert, adossé à un stockage natif
#[derive(Debug)]
pub struct MapInfoFile<S> {
    kind: FileKind,
    access: AccessMode,
    store: S,
    charset: Option<String>,
}

impl<S: NativeStore> MapInfoFile<S> {
    pub fn new(kind: FileKind, access: AccessMode, store: S) -> Self {
        Self {
            kind,
            access,
            store,
            charset: None,
        }
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Définit le charset de l'en-tête (remplace la valeur précédente)
    pub fn set_charset(&mut self, charset: &str) -> Result<(), DriverError> {
        if charset.is_empty() {
            return Err(DriverError::InvalidCharset);
        }
        self.charset = Some(charset.to_string());
        Ok(())
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// Encodage correspondant au charset courant
    pub fn encoding(&self) -> Option<&'static Encoding> {
        self.charset.as_deref().and_then(charset::charset_to_encoding)
    }

    /// Crée un champ natif équivalent à la définition générique
    pub fn create_field(&mut self, field: &FieldDefn, approx_ok: bool) -> Result<usize, DriverError> {
        self.check_writable()?;
        let spec = map_field_type(field)?;
        self.store.add_field(&field.name, spec, false, false, approx_ok)
    }

    /// Traduit une feature générique en feature native
    ///
    /// Les collections et multipoints sont écrits immédiatement, partie par
    /// partie, via [`create_feature`](Self::create_feature) avec un FID remis à
    /// zéro. Le premier échec interrompt la décomposition.
    pub fn map_feature(&mut self, feature: &Feature) -> Result<Mapped, DriverError> {
        match feature::select_kind(feature) {
            Shape::Single(kind) => Ok(Mapped::Single(NativeFeature::build(kind, feature))),
            Shape::Collection => {
                let Some(geometry) = feature.geometry.as_ref() else {
                    return Ok(Mapped::Decomposed(0));
                };

                let mut part = Feature {
                    fid: NULL_FID,
                    geometry: None,
                    fields: feature.fields.clone(),
                    style: feature.style.clone(),
                };
                let mut written = 0;

                for (index, child) in feature::collection_parts(geometry).into_iter().enumerate() {
                    part.fid = NULL_FID;
                    part.geometry = Some(child);
                    let created = self
                        .create_feature(&mut part)
                        .map_err(|e| DriverError::decomposition(index, e))?;
                    written += created.count();
                }

                debug!(parts = written, "Collection geometry split into single features");
                Ok(Mapped::Decomposed(written))
            }
        }
    }

    /// Traduit puis écrit une feature; le FID attribué est reporté sur `feature`
    pub fn create_feature(&mut self, feature: &mut Feature) -> Result<Created, DriverError> {
        self.check_writable()?;
        match self.map_feature(feature)? {
            Mapped::Decomposed(n) => Ok(Created::Decomposed(n)),
            Mapped::Single(native) => {
                let fid = self.store.write_feature(native)?;
                feature.fid = fid;
                Ok(Created::Single { fid })
            }
        }
    }

    fn check_writable(&self) -> Result<(), DriverError> {
        match self.access {
            AccessMode::Write => Ok(()),
            AccessMode::Read => Err(DriverError::ReadOnly),
        }
    }
}

/// Champ natif enregistré dans un [`MemoryStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct NativeField {
    pub name: String,
    pub spec: NativeFieldSpec,
    pub indexed: bool,
    pub unique: bool,
}

/// Stockage en mémoire, FIDs séquentiels à partir de 1
#[derive(Debug, Default)]
pub struct MemoryStore {
    fields: Vec<NativeField>,
    features: Vec<NativeFeature>,
    last_fid: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[NativeField] {
        &self.fields
    }

    pub fn features(&self) -> &[NativeFeature] {
        &self.features
    }
}

impl NativeStore for MemoryStore {
    fn add_field(
        &mut self,
        name: &str,
        spec: NativeFieldSpec,
        indexed: bool,
        unique: bool,
        _approx_ok: bool,
    ) -> Result<usize, DriverError> {
        self.fields.push(NativeField {
            name: name.to_string(),
            spec,
            indexed,
            unique,
        });
        Ok(self.fields.len() - 1)
    }

    fn write_feature(&mut self, mut feature: NativeFeature) -> Result<i64, DriverError> {
        if feature.fields.len() != self.fields.len() {
            return Err(DriverError::FieldCountMismatch {
                expected: self.fields.len(),
                actual: feature.fields.len(),
            });
        }

        let fid = match feature.fid {
            NULL_FID => self.last_fid + 1,
            fid if fid > self.last_fid => fid,
            fid => return Err(DriverError::DuplicateFid(fid)),
        };

        feature.fid = fid;
        self.last_fid = fid;
        self.features.push(feature);
        Ok(fid)
    }
}

//! Datasource NAS (échange cadastral ALKIS en GML)
//!
//! À l'ouverture, chaque classe GML devient une couche, puis une couche
//! synthétique des relations est ajoutée. Les relations ne sont extraites
//! qu'à la première lecture de cette couche.

pub mod json;
pub mod reader;
pub mod relation;
pub mod schema;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info, warn};

pub use json::JsonNasReader;
pub use reader::{
    FeatureClass, GeometryPropertyDefn, GmlFeature, GmlProperty, NasReader, PropertyDefn,
    PropertyType,
};
pub use relation::{PopulationState, RelationLayer, RelationRecord, RELATION_LAYER_NAME};
pub use schema::{resolve_srs, translate_schema, NasLayer};

use crate::DriverError;

/// Nom de la couche des suppressions, toujours gardée en dernier
const DELETE_LAYER_NAME: &str = "Delete";

/// Options d'ouverture
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// Écrire le schéma déduit dans `<nom>.gfs` s'il n'existe pas encore
    pub save_schema_cache: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            save_schema_cache: true,
        }
    }
}

/// Couche d'un dataset NAS
#[derive(Debug, Clone, Copy)]
pub enum LayerRef<'a> {
    Class(&'a NasLayer),
    Relations(&'a RelationLayer),
}

impl LayerRef<'_> {
    pub fn name(&self) -> &str {
        match self {
            LayerRef::Class(layer) => layer.name(),
            LayerRef::Relations(layer) => layer.name(),
        }
    }
}

/// Dataset NAS ouvert
pub struct NasDataSource<R> {
    name: PathBuf,
    reader: R,
    layers: Vec<NasLayer>,
    relations: RelationLayer,
    /// Position de la couche des relations parmi les couches
    relation_index: usize,
}

impl<R: NasReader> NasDataSource<R> {
    /// Ouvre un fichier NAS
    ///
    /// `create_reader` fournit le lecteur GML; `None` signifie qu'il ne peut
    /// pas être instancié.
    ///
    /// # Errors
    ///
    /// `ResourceInstantiation` si aucun lecteur n'est disponible, ou l'erreur
    /// du prescan si le schéma ne peut pas être établi.
    pub fn open<F>(path: &Path, create_reader: F, options: &OpenOptions) -> Result<Self, DriverError>
    where
        F: FnOnce() -> Option<R>,
    {
        let mut reader = create_reader().ok_or_else(|| {
            DriverError::ResourceInstantiation(format!(
                "File {} appears to be NAS but the NAS reader cannot be instantiated",
                path.display()
            ))
        })?;
        reader.set_source_file(path);

        let gfs_path = path.with_extension("gfs");
        let have_schema = load_cached_schema(&mut reader, path, &gfs_path);

        if !have_schema {
            reader.prescan_for_schema(true)?;

            if options.save_schema_cache && !reader.classes().is_empty() {
                if gfs_path.exists() {
                    debug!(path = %gfs_path.display(), "Not saving schema, file already exists");
                } else if let Err(e) = reader.save_classes(&gfs_path) {
                    debug!(path = %gfs_path.display(), error = %e, "Schema file can't be created");
                }
            }
        }

        let layers: Vec<NasLayer> = reader.classes().iter().map(translate_schema).collect();

        // la couche Delete reste la dernière, les relations passent juste avant
        let relation_index = match layers.last() {
            Some(last) if last.name().eq_ignore_ascii_case(DELETE_LAYER_NAME) => layers.len() - 1,
            _ => layers.len(),
        };

        info!(path = %path.display(), layers = layers.len() + 1, "NAS dataset opened");

        Ok(Self {
            name: path.to_path_buf(),
            reader,
            layers,
            relations: RelationLayer::new(),
            relation_index,
        })
    }

    pub fn name(&self) -> &Path {
        &self.name
    }

    /// Nombre de couches, couche des relations comprise
    pub fn layer_count(&self) -> usize {
        self.layers.len() + 1
    }

    pub fn layer(&self, index: usize) -> Option<LayerRef<'_>> {
        match index.cmp(&self.relation_index) {
            std::cmp::Ordering::Less => self.layers.get(index).map(LayerRef::Class),
            std::cmp::Ordering::Equal => Some(LayerRef::Relations(&self.relations)),
            std::cmp::Ordering::Greater => self.layers.get(index - 1).map(LayerRef::Class),
        }
    }

    pub fn layer_by_name(&self, name: &str) -> Option<LayerRef<'_>> {
        (0..self.layer_count())
            .filter_map(|i| self.layer(i))
            .find(|layer| layer.name().eq_ignore_ascii_case(name))
    }

    pub fn layers(&self) -> impl Iterator<Item = LayerRef<'_>> {
        (0..self.layer_count()).filter_map(move |i| self.layer(i))
    }

    /// Extrait les relations en une passe complète sur les features
    ///
    /// # Errors
    ///
    /// `RelationsAlreadyPopulated` si l'extraction a déjà eu lieu.
    pub fn populate_relations(&mut self) -> Result<usize, DriverError> {
        self.relations.populate(&mut self.reader)
    }

    /// Couche des relations, remplie au premier accès
    pub fn relations(&mut self) -> Result<&RelationLayer, DriverError> {
        if self.relations.state() == PopulationState::Unpopulated {
            self.populate_relations()?;
        }
        Ok(&self.relations)
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

/// Charge le schéma en cache s'il est plus récent que le fichier source
///
/// Un cache illisible est ignoré: le schéma sera recalculé.
fn load_cached_schema<R: NasReader>(reader: &mut R, source: &Path, gfs_path: &Path) -> bool {
    let Some(gfs_mtime) = modified(gfs_path) else {
        return false;
    };

    if modified(source).is_some_and(|source_mtime| source_mtime > gfs_mtime) {
        debug!(
            path = %gfs_path.display(),
            "Ignoring schema file, it appears to be older than the associated NAS file"
        );
        return false;
    }

    match reader.load_classes(gfs_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!(error = %e, "Falling back to a full schema scan");
            false
        }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryType;

    /// Lecteur dont le schéma est fixé d'avance
    #[derive(Default)]
    struct SchemaReader {
        classes: Vec<FeatureClass>,
        prescanned: bool,
        fail_prescan: bool,
    }

    impl NasReader for SchemaReader {
        fn set_source_file(&mut self, _path: &Path) {}

        fn load_classes(&mut self, path: &Path) -> Result<bool, DriverError> {
            Err(DriverError::schema_load(path, "unexpected cache"))
        }

        fn save_classes(&self, _path: &Path) -> Result<(), DriverError> {
            Ok(())
        }

        fn prescan_for_schema(&mut self, _get_extents: bool) -> Result<bool, DriverError> {
            if self.fail_prescan {
                return Err(DriverError::Io(std::io::Error::other("not a NAS file")));
            }
            self.prescanned = true;
            Ok(!self.classes.is_empty())
        }

        fn classes(&self) -> &[FeatureClass] {
            &self.classes
        }

        fn reset_reading(&mut self) {}

        fn next_feature(&mut self) -> Result<Option<GmlFeature>, DriverError> {
            Ok(None)
        }
    }

    fn open(names: &[&str]) -> NasDataSource<SchemaReader> {
        let reader = SchemaReader {
            classes: names.iter().map(|n| FeatureClass::new(*n)).collect(),
            ..Default::default()
        };
        let options = OpenOptions {
            save_schema_cache: false,
        };
        NasDataSource::open(Path::new("/nonexistent/test.xml"), || Some(reader), &options).unwrap()
    }

    fn names(ds: &NasDataSource<SchemaReader>) -> Vec<String> {
        ds.layers().map(|l| l.name().to_string()).collect()
    }

    #[test]
    fn test_relation_layer_is_appended() {
        let ds = open(&["AX_Flurstueck", "AX_Gebaeude"]);
        assert_eq!(ds.layer_count(), 3);
        assert_eq!(names(&ds), vec!["AX_Flurstueck", "AX_Gebaeude", RELATION_LAYER_NAME]);
        assert!(matches!(ds.layer(2), Some(LayerRef::Relations(_))));
        assert!(ds.layer(3).is_none());
    }

    #[test]
    fn test_delete_layer_stays_last() {
        let ds = open(&["AX_Flurstueck", "Delete"]);
        assert_eq!(names(&ds), vec!["AX_Flurstueck", RELATION_LAYER_NAME, "Delete"]);
        assert!(matches!(ds.layer(2), Some(LayerRef::Class(_))));
    }

    #[test]
    fn test_empty_schema_has_only_relations() {
        let ds = open(&[]);
        assert_eq!(names(&ds), vec![RELATION_LAYER_NAME]);
    }

    #[test]
    fn test_layer_by_name() {
        let ds = open(&["AX_Flurstueck"]);
        match ds.layer_by_name("ax_flurstueck") {
            Some(LayerRef::Class(layer)) => assert_eq!(layer.geometry_type(), GeometryType::NONE),
            _ => panic!("Expected class layer"),
        }
        assert!(ds.layer_by_name("missing").is_none());
    }

    #[test]
    fn test_missing_reader_fails() {
        let result = NasDataSource::<SchemaReader>::open(
            Path::new("test.xml"),
            || None,
            &OpenOptions::default(),
        );
        assert!(matches!(result, Err(DriverError::ResourceInstantiation(_))));
    }

    #[test]
    fn test_prescan_failure_fails_open() {
        let reader = SchemaReader {
            fail_prescan: true,
            ..Default::default()
        };
        let result = NasDataSource::open(
            Path::new("/nonexistent/test.xml"),
            || Some(reader),
            &OpenOptions::default(),
        );
        assert!(matches!(result, Err(DriverError::Io(_))));
    }

    #[test]
    fn test_relations_are_populated_lazily_once() {
        let mut ds = open(&["AX_Flurstueck"]);
        assert!(ds.reader_mut().prescanned);
        assert!(ds.relations().unwrap().is_populated());
        // second accès: pas de nouvelle extraction
        assert!(ds.relations().is_ok());
        assert!(matches!(
            ds.populate_relations(),
            Err(DriverError::RelationsAlreadyPopulated)
        ));
    }
}

//! Définition et implémentation des commandes CLI
//!
//! - `sniff`: détection du type de fichier MapInfo
//! - `nas-info`: couches (et relations) d'un dataset NAS
//! - `to-mapinfo`: GeoJSON → features natives MapInfo

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use tracing::{debug, info, warn};

use ogr_drivers::mitab::{smart_open, AccessMode, Created, FileKind, MapInfoFile, MemoryStore};
use ogr_drivers::nas::{JsonNasReader, LayerRef, NasDataSource, OpenOptions, RelationRecord};
use ogr_drivers::{DriverError, FieldType};

use crate::config::Config;
use crate::export::geojson::export_native_features;
use crate::input;

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the MapInfo dataset kind of a .tab/.mif/.mid file
    Sniff {
        /// Path to the MapInfo file
        #[arg(short, long)]
        path: PathBuf,
    },

    /// Print the layers of a NAS dataset (JSON dump) as JSON
    NasInfo {
        /// Path to the NAS dataset
        #[arg(short, long)]
        path: PathBuf,

        /// Path to a JSON config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also extract the relations between objects
        #[arg(long)]
        relations: bool,
    },

    /// Map GeoJSON features to MapInfo native features and export them as GeoJSON
    ToMapinfo {
        /// Input GeoJSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output GeoJSON file
        #[arg(short, long)]
        output: PathBuf,

        /// MapInfo charset (e.g., WindowsLatin1), overrides the config
        #[arg(long)]
        charset: Option<String>,

        /// Path to a JSON config
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Exécute la commande sniff
pub fn cmd_sniff(path: &Path) -> Result<()> {
    match smart_open(path, true)? {
        Some(kind) => println!("{}: {:?}", path.display(), kind),
        None => {
            warn!(path = %path.display(), "Not a MapInfo dataset");
            println!("{}: unrecognised", path.display());
        }
    }
    Ok(())
}

/// Résumé d'un dataset NAS
#[derive(Debug, Serialize)]
struct DatasetSummary {
    name: String,
    layers: Vec<LayerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relations: Option<Vec<RelationRecord>>,
}

#[derive(Debug, Serialize)]
struct LayerSummary {
    name: String,
    geometry_type: &'static str,
    epsg: Option<u32>,
    fields: Vec<FieldSummary>,
}

#[derive(Debug, Serialize)]
struct FieldSummary {
    name: String,
    field_type: FieldType,
    width: i32,
}

impl LayerSummary {
    fn from_layer(layer: LayerRef<'_>) -> Self {
        let (defn, srs) = match layer {
            LayerRef::Class(layer) => (&layer.defn, layer.srs.as_ref()),
            LayerRef::Relations(layer) => (layer.defn(), None),
        };

        Self {
            name: defn.name.clone(),
            geometry_type: defn.geometry_type.name(),
            epsg: srs.and_then(|s| s.epsg()),
            fields: defn
                .fields
                .iter()
                .map(|f| FieldSummary {
                    name: f.name.clone(),
                    field_type: f.field_type,
                    width: f.width,
                })
                .collect(),
        }
    }
}

/// Exécute la commande nas-info
pub fn cmd_nas_info(path: &Path, config_path: Option<&Path>, relations: bool) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let options = OpenOptions {
        save_schema_cache: config.save_schema_cache,
    };

    let mut dataset = NasDataSource::open(path, || Some(JsonNasReader::new()), &options)
        .context(format!("Failed to open NAS dataset: {}", path.display()))?;

    let layers: Vec<LayerSummary> = dataset.layers().map(LayerSummary::from_layer).collect();
    info!(layers = layers.len(), "NAS schema translated");

    let relations = if relations || config.relations {
        let layer = dataset
            .relations()
            .context("Failed to populate relations")?;
        Some(layer.records().to_vec())
    } else {
        None
    };

    let summary = DatasetSummary {
        name: path.display().to_string(),
        layers,
        relations,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

/// Exécute la commande to-mapinfo
pub fn cmd_to_mapinfo(
    input_path: &Path,
    output: &Path,
    charset: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let input = input::read_geojson(input_path)?;

    let mut file = MapInfoFile::new(FileKind::Tab, AccessMode::Write, MemoryStore::new());

    if let Some(charset) = charset.or(config.charset) {
        file.set_charset(&charset)?;
        if file.encoding().is_none() {
            warn!(charset = %charset, "No known encoding for charset");
        }
    }

    // les champs sans équivalent MapInfo sont ignorés
    let mut kept = Vec::with_capacity(input.fields.len());
    for field in &input.fields {
        match file.create_field(field, true) {
            Ok(_) => kept.push(field.clone()),
            Err(e @ DriverError::UnsupportedFieldType { .. }) => {
                warn!(error = %e, "Skipping field");
            }
            Err(e) => return Err(e).context(format!("Failed to create field '{}'", field.name)),
        }
    }

    let mut written = 0;
    for (i, source) in input.features.iter().enumerate() {
        let mut feature = input::build_feature(source, &kept).context(format!("Invalid feature #{}", i))?;
        let created = file
            .create_feature(&mut feature)
            .context(format!("Failed to write feature #{}", i))?;
        if let Created::Decomposed(parts) = created {
            debug!(index = i, parts, "Collection decomposed");
        }
        written += created.count();
    }

    info!(
        input = input.features.len(),
        written,
        fields = kept.len(),
        "Features mapped to MapInfo"
    );

    export_native_features(file.store(), file.charset(), output)?;
    info!(output = %output.display(), "Export complete");

    Ok(())
}

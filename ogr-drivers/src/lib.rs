//! # ogr-drivers
//!
//! Traduction de features génériques vers deux formats vectoriels:
//!
//! - MapInfo TAB/MIF: correspondance des types de champs, choix de la variante
//!   native (point, région, polyligne) et éclatement des collections
//! - NAS (ALKIS): traduction des classes GML en couches et extraction des
//!   relations entre objets
//!
//! Les géométries utilisent les types `geo` pour l'interopérabilité avec
//! l'écosystème Rust géospatial.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ogr_drivers::mitab::{AccessMode, FileKind, MapInfoFile, MemoryStore};
//! use ogr_drivers::{Feature, FieldDefn, FieldType, FieldValue};
//!
//! let mut file = MapInfoFile::new(FileKind::Tab, AccessMode::Write, MemoryStore::new());
//! file.create_field(&FieldDefn::new("nom", FieldType::String), false)?;
//!
//! let mut feature = Feature::new(vec![FieldValue::String("a".into())]).with_geometry(geometry);
//! let created = file.create_feature(&mut feature)?;
//! println!("{} feature(s) écrite(s)", created.count());
//! ```

pub mod error;
pub mod geometry;
pub mod mitab;
pub mod nas;
pub mod srs;
pub mod style;
pub mod types;

pub use error::DriverError;
pub use geometry::GeometryType;
pub use srs::SpatialRef;
pub use types::{Feature, FeatureDefn, FieldDefn, FieldType, FieldValue, NULL_FID};

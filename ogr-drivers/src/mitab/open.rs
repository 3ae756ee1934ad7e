//! Détection du type de fichier MapInfo et modes d'accès

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::srs::strip_prefix_ci;
use crate::DriverError;

/// Variante de dataset MapInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileKind {
    /// Paire .mif/.mid
    Mif,
    /// Fichier .tab natif
    Tab,
    /// Vue (`create view`)
    View,
    /// Table seamless
    Seamless,
}

/// Mode d'ouverture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

impl AccessMode {
    /// Interprète un mode façon `fopen` (`"r"`, `"rb"`, `"w"`, ...)
    pub fn parse(access: &str) -> Result<Self, DriverError> {
        match access.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('r') => Ok(AccessMode::Read),
            Some('w') => Ok(AccessMode::Write),
            _ => Err(DriverError::UnsupportedAccessMode(access.to_string())),
        }
    }
}

/// Détecte le type de dataset d'après l'extension et, pour un .tab, l'en-tête
///
/// Renvoie `None` si le fichier n'est pas reconnu.
pub fn detect_file_kind(path: &Path) -> Result<Option<FileKind>, DriverError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_uppercase);

    match extension.as_deref() {
        Some("MIF") | Some("MID") => Ok(Some(FileKind::Mif)),
        Some("TAB") => {
            let file = File::open(path)?;
            scan_tab_header(BufReader::new(file))
        }
        _ => Ok(None),
    }
}

/// Ouvre un fichier MapInfo quelle que soit sa variante
///
/// Avec `test_open_no_error`, un fichier non reconnu donne `Ok(None)` au lieu
/// d'une erreur.
pub fn smart_open(path: &Path, test_open_no_error: bool) -> Result<Option<FileKind>, DriverError> {
    let kind = match detect_file_kind(path) {
        Ok(kind) => kind,
        Err(e) if test_open_no_error => {
            debug!(path = %path.display(), error = %e, "Test open failed");
            None
        }
        Err(e) => return Err(e),
    };

    match kind {
        Some(kind) => Ok(Some(kind)),
        None if test_open_no_error => Ok(None),
        None => Err(DriverError::NotMapInfo(path.to_path_buf())),
    }
}

/// Parcourt les lignes d'en-tête d'un .tab
fn scan_tab_header<R: BufRead>(mut reader: R) -> Result<Option<FileKind>, DriverError> {
    let mut found_fields = false;
    let mut found_view = false;
    let mut found_seamless = false;

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        // Les en-têtes sont ASCII, on tolère un charset quelconque pour le reste
        let line = match simdutf8::basic::from_utf8(&buf) {
            Ok(s) => std::borrow::Cow::Borrowed(s),
            Err(_) => encoding_rs::WINDOWS_1252.decode_without_bom_handling(&buf).0,
        };
        let line = line.trim_start();

        if strip_prefix_ci(line, "Fields").is_some() {
            found_fields = true;
        } else if strip_prefix_ci(line, "create view").is_some() {
            found_view = true;
        } else if strip_prefix_ci(line, "\"\\IsSeamless\" = \"TRUE\"").is_some() {
            found_seamless = true;
        }
    }

    let kind = if found_view {
        Some(FileKind::View)
    } else if found_fields && found_seamless {
        Some(FileKind::Seamless)
    } else if found_fields {
        Some(FileKind::Tab)
    } else {
        None
    };
    Ok(kind)
}

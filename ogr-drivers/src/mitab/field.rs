//! Correspondance des types de champs génériques vers les types MapInfo

use serde::Serialize;
use tracing::debug;

use crate::types::{FieldDefn, FieldType};
use crate::DriverError;

/// Largeur maximale d'un champ Char
pub const MAX_CHAR_WIDTH: i32 = 254;
/// Largeur maximale d'un champ Decimal
pub const MAX_DECIMAL_WIDTH: i32 = 20;
/// Précision maximale d'un champ Decimal
pub const MAX_DECIMAL_PRECISION: i32 = 16;

/// Type de champ natif MapInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NativeFieldType {
    Integer,
    Float,
    Decimal,
    Date,
    Time,
    DateTime,
    Char,
}

/// Type, largeur et précision d'un champ natif
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NativeFieldSpec {
    pub native_type: NativeFieldType,
    pub width: i32,
    pub precision: i32,
}

/// Déduit le champ natif correspondant à une définition générique
///
/// Les largeurs nulles prennent la valeur par défaut du type. Les limites
/// MapInfo (Char ≤ 254, Decimal ≤ 20 de largeur et ≤ 16 de précision, au moins
/// deux caractères hors décimales) sont appliquées silencieusement.
///
/// # Errors
///
/// `UnsupportedFieldType` pour les listes, les entiers 64 bits et le binaire.
pub fn map_field_type(field: &FieldDefn) -> Result<NativeFieldSpec, DriverError> {
    let mut width = field.width;
    let mut precision = field.precision;

    let native_type = match field.field_type {
        FieldType::Integer => {
            if width == 0 {
                width = 12;
            }
            NativeFieldType::Integer
        }
        FieldType::Real if width == 0 && precision == 0 => {
            width = 32;
            NativeFieldType::Float
        }
        FieldType::Real => {
            if width > MAX_DECIMAL_WIDTH
                || width - precision < 2
                || precision > MAX_DECIMAL_PRECISION
            {
                if width > MAX_DECIMAL_WIDTH {
                    width = MAX_DECIMAL_WIDTH;
                }
                if width - precision < 2 {
                    precision = width - 2;
                }
                if precision > MAX_DECIMAL_PRECISION {
                    precision = MAX_DECIMAL_PRECISION;
                }
                debug!(
                    field = %field.name,
                    from = ?(field.width, field.precision),
                    to = ?(width, precision),
                    "Adjusting initial width,precision"
                );
            }
            NativeFieldType::Decimal
        }
        FieldType::Date => {
            if width == 0 {
                width = 10;
            }
            NativeFieldType::Date
        }
        FieldType::Time => {
            if width == 0 {
                width = 9;
            }
            NativeFieldType::Time
        }
        FieldType::DateTime => {
            if width == 0 {
                width = 19;
            }
            NativeFieldType::DateTime
        }
        FieldType::String => {
            width = if width == 0 {
                MAX_CHAR_WIDTH
            } else {
                width.min(MAX_CHAR_WIDTH)
            };
            NativeFieldType::Char
        }
        other => {
            return Err(DriverError::UnsupportedFieldType {
                field: field.name.clone(),
                field_type: other,
            })
        }
    };

    Ok(NativeFieldSpec {
        native_type,
        width,
        precision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(field_type: FieldType, width: i32, precision: i32) -> NativeFieldSpec {
        let field = FieldDefn::new("f", field_type)
            .with_width(width)
            .with_precision(precision);
        map_field_type(&field).unwrap()
    }

    #[test]
    fn test_integer_default_width() {
        let spec = map(FieldType::Integer, 0, 0);
        assert_eq!(spec.native_type, NativeFieldType::Integer);
        assert_eq!(spec.width, 12);
        assert_eq!(map(FieldType::Integer, 5, 0).width, 5);
    }

    #[test]
    fn test_real_without_width_is_float() {
        let spec = map(FieldType::Real, 0, 0);
        assert_eq!(spec.native_type, NativeFieldType::Float);
        assert_eq!(spec.width, 32);
    }

    #[test]
    fn test_real_with_width_is_decimal() {
        let spec = map(FieldType::Real, 10, 3);
        assert_eq!(spec.native_type, NativeFieldType::Decimal);
        assert_eq!((spec.width, spec.precision), (10, 3));
    }

    #[test]
    fn test_decimal_clamping() {
        let spec = map(FieldType::Real, 25, 20);
        assert_eq!(spec.native_type, NativeFieldType::Decimal);
        assert_eq!(spec.width, 20);
        assert!(spec.precision <= MAX_DECIMAL_PRECISION);
        assert!(spec.width - spec.precision >= 2);
        assert_eq!(spec.precision, 16);
    }

    #[test]
    fn test_decimal_precision_too_close_to_width() {
        let spec = map(FieldType::Real, 8, 7);
        assert_eq!((spec.width, spec.precision), (8, 6));
    }

    #[test]
    fn test_decimal_precision_only() {
        // largeur nulle mais précision fournie: Decimal, précision ramenée
        let spec = map(FieldType::Real, 0, 4);
        assert_eq!(spec.native_type, NativeFieldType::Decimal);
        assert_eq!((spec.width, spec.precision), (0, -2));
    }

    #[test]
    fn test_date_time_defaults() {
        assert_eq!(map(FieldType::Date, 0, 0).width, 10);
        assert_eq!(map(FieldType::Time, 0, 0).width, 9);
        assert_eq!(map(FieldType::DateTime, 0, 0).width, 19);
        assert_eq!(map(FieldType::DateTime, 0, 0).native_type, NativeFieldType::DateTime);
    }

    #[test]
    fn test_string_width_clamped() {
        assert_eq!(map(FieldType::String, 0, 0).width, 254);
        assert_eq!(map(FieldType::String, 300, 0).width, 254);
        assert_eq!(map(FieldType::String, 80, 0).width, 80);
        assert_eq!(map(FieldType::String, 80, 0).native_type, NativeFieldType::Char);
    }

    #[test]
    fn test_unsupported_types() {
        for field_type in [
            FieldType::StringList,
            FieldType::IntegerList,
            FieldType::RealList,
            FieldType::Integer64,
            FieldType::Binary,
        ] {
            let field = FieldDefn::new("liste", field_type);
            match map_field_type(&field) {
                Err(DriverError::UnsupportedFieldType { field, .. }) => assert_eq!(field, "liste"),
                other => panic!("Expected UnsupportedFieldType, got {:?}", other),
            }
        }
    }
}

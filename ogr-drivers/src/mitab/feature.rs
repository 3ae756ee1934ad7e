//! Features natives MapInfo

use geo::Geometry;
use tracing::warn;

use super::style::{BrushDef, PenDef, SymbolDef};
use crate::geometry::GeometryType;
use crate::style::StyleString;
use crate::types::{Feature, FieldValue};

/// Variante de feature native, choisie une fois pour toutes à la construction
#[derive(Debug, Clone, PartialEq)]
pub enum NativeKind {
    Point { symbol: Option<SymbolDef> },
    Region { pen: Option<PenDef>, brush: Option<BrushDef> },
    Polyline { pen: Option<PenDef> },
    /// Géométrie absente ou non représentable
    Untyped,
}

impl NativeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NativeKind::Point { .. } => "Point",
            NativeKind::Region { .. } => "Region",
            NativeKind::Polyline { .. } => "Polyline",
            NativeKind::Untyped => "None",
        }
    }
}

/// Feature MapInfo prête à être écrite
#[derive(Debug, Clone, PartialEq)]
pub struct NativeFeature {
    pub fid: i64,
    pub kind: NativeKind,
    pub geometry: Option<Geometry>,
    pub fields: Vec<FieldValue>,
}

/// Résultat de la sélection de variante
pub(crate) enum Shape {
    Single(NativeKind),
    /// Collection à décomposer en features élémentaires
    Collection,
}

/// Choisit la variante native d'après le type aplati de la géométrie
pub(crate) fn select_kind(feature: &Feature) -> Shape {
    let style = feature.style.as_deref().and_then(parse_style);

    let kind = match feature.geometry_type().flatten() {
        GeometryType::POINT => NativeKind::Point {
            symbol: style.as_ref().map(SymbolDef::from_style),
        },
        GeometryType::POLYGON | GeometryType::MULTI_POLYGON => NativeKind::Region {
            pen: style.as_ref().map(PenDef::from_style),
            brush: style.as_ref().map(BrushDef::from_style),
        },
        GeometryType::LINE_STRING | GeometryType::MULTI_LINE_STRING => NativeKind::Polyline {
            pen: style.as_ref().map(PenDef::from_style),
        },
        GeometryType::GEOMETRY_COLLECTION | GeometryType::MULTI_POINT => return Shape::Collection,
        _ => NativeKind::Untyped,
    };

    Shape::Single(kind)
}

impl NativeFeature {
    /// Construit la feature native: géométrie clonée, champs copiés par position, FID hérité
    pub(crate) fn build(kind: NativeKind, feature: &Feature) -> Self {
        Self {
            fid: feature.fid,
            kind,
            geometry: feature.geometry.clone(),
            fields: feature.fields.clone(),
        }
    }
}

fn parse_style(style: &str) -> Option<StyleString> {
    match StyleString::parse(style) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(error = %e, "Ignoring unparsable style string");
            None
        }
    }
}

/// Enfants d'une géométrie multiple, dans leur ordre d'énumération
pub(crate) fn collection_parts(geometry: &Geometry) -> Vec<Geometry> {
    match geometry {
        Geometry::MultiPoint(mp) => mp.iter().map(|p| Geometry::Point(*p)).collect(),
        Geometry::GeometryCollection(gc) => gc.iter().cloned().collect(),
        other => vec![other.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point, polygon, GeometryCollection, MultiPoint};

    fn kind_of(feature: &Feature) -> NativeKind {
        match select_kind(feature) {
            Shape::Single(kind) => kind,
            Shape::Collection => panic!("Expected a single native feature"),
        }
    }

    #[test]
    fn test_point_with_symbol() {
        let feature = Feature::new(vec![])
            .with_geometry(Geometry::Point(point!(x: 1.0, y: 2.0)))
            .with_style(r#"SYMBOL(id:"mapinfo-sym-33",c:#FF0000)"#);
        match kind_of(&feature) {
            NativeKind::Point { symbol: Some(symbol) } => {
                assert_eq!(symbol.number, 33);
                assert_eq!(symbol.color, 0xFF0000);
            }
            other => panic!("Expected Point with symbol, got {:?}", other),
        }
    }

    #[test]
    fn test_point_without_style_has_no_symbol() {
        let feature = Feature::new(vec![]).with_geometry(Geometry::Point(point!(x: 1.0, y: 2.0)));
        assert_eq!(kind_of(&feature), NativeKind::Point { symbol: None });
    }

    #[test]
    fn test_polygon_is_region_with_pen_and_brush() {
        let poly = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)];
        let feature = Feature::new(vec![])
            .with_geometry(Geometry::Polygon(poly))
            .with_style("PEN(c:#0000FF,w:2px);BRUSH(fc:#00FF00,bc:#FFFFFF)");
        match kind_of(&feature) {
            NativeKind::Region {
                pen: Some(pen),
                brush: Some(brush),
            } => {
                assert_eq!(pen.color, 0x0000FF);
                assert_eq!(pen.pixel_width, 2);
                assert_eq!(brush.fg_color, 0x00FF00);
            }
            other => panic!("Expected Region, got {:?}", other),
        }
    }

    #[test]
    fn test_linestring_is_polyline() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)];
        let feature = Feature::new(vec![])
            .with_geometry(Geometry::LineString(line))
            .with_style("PEN(c:#FF0000)");
        match kind_of(&feature) {
            NativeKind::Polyline { pen: Some(pen) } => assert_eq!(pen.color, 0xFF0000),
            other => panic!("Expected Polyline, got {:?}", other),
        }
    }

    #[test]
    fn test_no_geometry_is_untyped() {
        assert_eq!(kind_of(&Feature::new(vec![])), NativeKind::Untyped);
    }

    #[test]
    fn test_unparsable_style_is_ignored() {
        let feature = Feature::new(vec![])
            .with_geometry(Geometry::Point(point!(x: 1.0, y: 2.0)))
            .with_style("SYMBOL(");
        assert_eq!(kind_of(&feature), NativeKind::Point { symbol: None });
    }

    #[test]
    fn test_collections_are_decomposed() {
        let mp = MultiPoint::new(vec![point!(x: 1.0, y: 1.0), point!(x: 2.0, y: 2.0)]);
        let feature = Feature::new(vec![]).with_geometry(Geometry::MultiPoint(mp.clone()));
        assert!(matches!(select_kind(&feature), Shape::Collection));

        let gc = GeometryCollection::new_from(vec![Geometry::MultiPoint(mp)]);
        let feature = Feature::new(vec![]).with_geometry(Geometry::GeometryCollection(gc));
        assert!(matches!(select_kind(&feature), Shape::Collection));
    }

    #[test]
    fn test_collection_parts_order() {
        let mp = MultiPoint::new(vec![point!(x: 1.0, y: 1.0), point!(x: 2.0, y: 2.0)]);
        let parts = collection_parts(&Geometry::MultiPoint(mp));
        assert_eq!(parts, vec![
            Geometry::Point(point!(x: 1.0, y: 1.0)),
            Geometry::Point(point!(x: 2.0, y: 2.0)),
        ]);
    }
}

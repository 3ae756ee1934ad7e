//! Attributs de style MapInfo (symbole, crayon, brosse)

use serde::Serialize;

use crate::style::{StyleString, StyleTool, ToolKind, Unit};

/// Correspondance des symboles OGR génériques vers les numéros MapInfo
const OGR_SYMBOLS: &[(u32, u16)] = &[
    (0, 49),  // croix
    (1, 50),  // diagonale
    (2, 40),  // cercle vide
    (3, 34),  // cercle plein
    (4, 38),  // carré vide
    (5, 32),  // carré plein
    (6, 42),  // triangle vide
    (7, 36),  // triangle plein
    (8, 41),  // étoile vide
    (9, 35),  // étoile pleine
    (10, 51), // barre verticale
];

/// Symbole d'un point MapInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymbolDef {
    pub number: u16,
    pub point_size: u16,
    pub color: u32,
}

impl Default for SymbolDef {
    fn default() -> Self {
        Self {
            number: 35,
            point_size: 12,
            color: 0x000000,
        }
    }
}

/// Crayon MapInfo (lignes et contours)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PenDef {
    /// 1 = invisible, 2 = continu, 3+ = tirets
    pub pattern: u8,
    pub pixel_width: u8,
    /// Largeur en points, prioritaire sur `pixel_width` si non nulle
    pub point_width: f64,
    pub color: u32,
}

impl Default for PenDef {
    fn default() -> Self {
        Self {
            pattern: 2,
            pixel_width: 1,
            point_width: 0.0,
            color: 0x000000,
        }
    }
}

/// Brosse MapInfo (remplissage des régions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrushDef {
    /// 1 = aucun remplissage, 2 = plein, 3+ = hachures
    pub pattern: u8,
    pub fg_color: u32,
    pub bg_color: u32,
    pub transparent: bool,
}

impl Default for BrushDef {
    fn default() -> Self {
        Self {
            pattern: 1,
            fg_color: 0x000000,
            bg_color: 0xFFFFFF,
            transparent: false,
        }
    }
}

impl SymbolDef {
    /// Construit un symbole depuis l'outil SYMBOL d'une chaîne de style
    pub fn from_style(style: &StyleString) -> Self {
        let mut symbol = Self::default();
        let Some(tool) = style.tool(&ToolKind::Symbol) else {
            return symbol;
        };

        if let Some(number) = tool.ids().into_iter().find_map(symbol_number) {
            symbol.number = number;
        }
        if let Some(size) = size_in_points(tool, "s") {
            symbol.point_size = size.round().clamp(1.0, 48.0) as u16;
        }
        if let Some(color) = tool.color("c") {
            symbol.color = color;
        }
        symbol
    }
}

impl PenDef {
    /// Construit un crayon depuis l'outil PEN d'une chaîne de style
    pub fn from_style(style: &StyleString) -> Self {
        let mut pen = Self::default();
        let Some(tool) = style.tool(&ToolKind::Pen) else {
            return pen;
        };

        if let Some(pattern) = tool.ids().into_iter().find_map(pen_pattern) {
            pen.pattern = pattern;
        }
        match tool.measure("w") {
            Some((width, Unit::Point)) => pen.point_width = width,
            Some((width, _)) => pen.pixel_width = width.round().clamp(1.0, 7.0) as u8,
            None => {}
        }
        if let Some(color) = tool.color("c") {
            pen.color = color;
        }
        pen
    }
}

impl BrushDef {
    /// Construit une brosse depuis l'outil BRUSH d'une chaîne de style
    pub fn from_style(style: &StyleString) -> Self {
        let mut brush = Self::default();
        let Some(tool) = style.tool(&ToolKind::Brush) else {
            return brush;
        };

        if let Some(pattern) = tool.ids().into_iter().find_map(brush_pattern) {
            brush.pattern = pattern;
        }
        if let Some(color) = tool.color("fc") {
            brush.fg_color = color;
        }
        match tool.color("bc") {
            Some(color) => brush.bg_color = color,
            None => brush.transparent = true,
        }
        brush
    }
}

fn symbol_number(id: &str) -> Option<u16> {
    if let Some(n) = id.strip_prefix("mapinfo-sym-") {
        return n.parse().ok();
    }
    let n: u32 = id.strip_prefix("ogr-sym-")?.parse().ok()?;
    OGR_SYMBOLS
        .iter()
        .find(|(ogr, _)| *ogr == n)
        .map(|(_, mapinfo)| *mapinfo)
}

fn pen_pattern(id: &str) -> Option<u8> {
    if let Some(n) = id.strip_prefix("mapinfo-pen-") {
        return n.parse().ok();
    }
    match id.strip_prefix("ogr-pen-")?.parse::<u8>().ok()? {
        0 => Some(2),
        1 => Some(1),
        2 => Some(5),
        3 => Some(10),
        4 => Some(14),
        5 => Some(20),
        6 => Some(24),
        _ => None,
    }
}

fn brush_pattern(id: &str) -> Option<u8> {
    if let Some(n) = id.strip_prefix("mapinfo-brush-") {
        return n.parse().ok();
    }
    match id.strip_prefix("ogr-brush-")?.parse::<u8>().ok()? {
        0 => Some(2),
        1 => Some(1),
        n @ 2..=7 => Some(n + 1),
        _ => None,
    }
}

fn size_in_points(tool: &StyleTool, key: &str) -> Option<f64> {
    match tool.measure(key)? {
        (size, Unit::Point) => Some(size),
        (size, Unit::Pixel) => Some(size * 0.75),
        (size, Unit::Millimeter) => Some(size * 72.0 / 25.4),
        _ => None,
    }
}

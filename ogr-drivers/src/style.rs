//! Parser pour les chaînes de style OGR
//!
//! Format: `PEN(c:#FF0000,w:2px);BRUSH(fc:#00FF00,id:"ogr-brush-2")`.
//! Chaque outil est un nom suivi de paramètres `clé:valeur` entre parenthèses.

use crate::DriverError;

/// Type d'outil de style
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolKind {
    Pen,
    Brush,
    Symbol,
    Label,
    Other(String),
}

impl ToolKind {
    fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "PEN" => ToolKind::Pen,
            "BRUSH" => ToolKind::Brush,
            "SYMBOL" => ToolKind::Symbol,
            "LABEL" => ToolKind::Label,
            other => ToolKind::Other(other.to_string()),
        }
    }
}

/// Unité d'une mesure de style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Pixel,
    Point,
    Millimeter,
    Degree,
    /// Pas de suffixe: unités de la carte
    Ground,
}

/// Un outil de style et ses paramètres
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTool {
    pub kind: ToolKind,
    params: Vec<(String, String)>,
}

impl StyleTool {
    /// Valeur brute d'un paramètre (guillemets retirés)
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Liste d'identifiants (`id:"mapinfo-pen-2,ogr-pen-0"`)
    pub fn ids(&self) -> Vec<&str> {
        self.param("id")
            .map(|v| v.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Mesure avec unité (`12pt`, `2px`, `0.5mm`)
    pub fn measure(&self, key: &str) -> Option<(f64, Unit)> {
        let value = self.param(key)?;
        let (number, consumed) = fast_float::parse_partial::<f64, _>(value).ok()?;
        let unit = match value[consumed..].trim().to_ascii_lowercase().as_str() {
            "px" => Unit::Pixel,
            "pt" => Unit::Point,
            "mm" => Unit::Millimeter,
            "g" => Unit::Degree,
            "" => Unit::Ground,
            _ => return None,
        };
        Some((number, unit))
    }

    /// Couleur `#RRGGBB` ou `#RRGGBBAA`, renvoyée en 0xRRGGBB
    pub fn color(&self, key: &str) -> Option<u32> {
        let hex = self.param(key)?.strip_prefix('#')?;
        if hex.len() != 6 && hex.len() != 8 {
            return None;
        }
        let rgb = u32::from_str_radix(hex.get(..6)?, 16).ok()?;
        Some(rgb)
    }
}

/// Chaîne de style décomposée en outils
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleString {
    tools: Vec<StyleTool>,
}

impl StyleString {
    pub fn parse(style: &str) -> Result<Self, DriverError> {
        let mut tools = Vec::new();

        for part in split_outside_quotes(style, ';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let open = part
                .find('(')
                .ok_or_else(|| DriverError::invalid_style(style, "missing '('"))?;
            if !part.ends_with(')') {
                return Err(DriverError::invalid_style(style, "missing ')'"));
            }

            let name = part[..open].trim();
            if name.is_empty() {
                return Err(DriverError::invalid_style(style, "empty tool name"));
            }

            let body = &part[open + 1..part.len() - 1];
            let mut params = Vec::new();
            for param in split_outside_quotes(body, ',') {
                let param = param.trim();
                if param.is_empty() {
                    continue;
                }
                let Some((key, value)) = param.split_once(':') else {
                    return Err(DriverError::invalid_style(
                        style,
                        format!("parameter '{}' has no value", param),
                    ));
                };
                params.push((key.trim().to_string(), unquote(value.trim()).to_string()));
            }

            tools.push(StyleTool {
                kind: ToolKind::from_name(name),
                params,
            });
        }

        Ok(Self { tools })
    }

    /// Premier outil d'un type donné
    pub fn tool(&self, kind: &ToolKind) -> Option<&StyleTool> {
        self.tools.iter().find(|t| &t.kind == kind)
    }

    pub fn tools(&self) -> &[StyleTool] {
        &self.tools
    }
}

/// Découpe sur `sep` en ignorant les séparateurs entre guillemets
fn split_outside_quotes(value: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == sep && !in_quotes {
            parts.push(&value[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&value[start..]);
    parts
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

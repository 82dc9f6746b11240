//! Kind-driven styling.
//!
//! A [`StyleTable`] maps each [`LayerKind`] to a pure function that turns a
//! descriptor into a [`DrawableSpec`]. Kinds without a rule use the generic
//! fallback, so adding a kind is a table insertion.

use std::collections::HashMap;

use catalog::{GeometryTemplate, LayerDescriptor, LayerKind};

pub type Rgba = [f32; 4];

pub const TRANSPARENT: Rgba = [0.0, 0.0, 0.0, 0.0];
pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub enum StyleError {
    InvalidColor { layer_id: String, value: String },
    InvalidStrokeWidth { layer_id: String, value: f32 },
}

impl std::fmt::Display for StyleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleError::InvalidColor { layer_id, value } => {
                write!(f, "layer {layer_id}: invalid color {value:?}")
            }
            StyleError::InvalidStrokeWidth { layer_id, value } => {
                write!(f, "layer {layer_id}: invalid stroke width {value}")
            }
        }
    }
}

impl std::error::Error for StyleError {}

/// Owned render description handed to a map surface.
///
/// Built from a snapshot of the descriptor; it holds no reference back to
/// the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableSpec {
    pub layer_id: String,
    pub geometry: GeometryTemplate,
    pub fill: Rgba,
    pub stroke: Rgba,
    pub stroke_width: f32,
    /// Higher values draw on top.
    pub z_index: i32,
    pub visible: bool,
    pub opacity: f32,
}

pub type RenderFn = fn(&LayerDescriptor) -> Result<DrawableSpec, StyleError>;

#[derive(Clone)]
pub struct StyleTable {
    rules: HashMap<LayerKind, RenderFn>,
    fallback: RenderFn,
}

impl std::fmt::Debug for StyleTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.rules.keys().map(LayerKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("StyleTable").field("rules", &kinds).finish()
    }
}

impl StyleTable {
    /// A table with no kind-specific rules; everything renders generically.
    pub fn generic_only() -> Self {
        Self {
            rules: HashMap::new(),
            fallback: generic,
        }
    }

    /// Registers `render` for `kind`, returning the rule it replaced.
    pub fn insert(&mut self, kind: LayerKind, render: RenderFn) -> Option<RenderFn> {
        self.rules.insert(kind, render)
    }

    pub fn with_rule(mut self, kind: LayerKind, render: RenderFn) -> Self {
        self.insert(kind, render);
        self
    }

    pub fn with_fallback(mut self, render: RenderFn) -> Self {
        self.fallback = render;
        self
    }

    pub fn has_rule(&self, kind: &LayerKind) -> bool {
        self.rules.contains_key(kind)
    }

    pub fn render(&self, descriptor: &LayerDescriptor) -> Result<DrawableSpec, StyleError> {
        let render = self
            .rules
            .get(&descriptor.kind)
            .copied()
            .unwrap_or(self.fallback);
        render(descriptor)
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::generic_only()
            .with_rule(LayerKind::AdministrativeBoundary, boundary)
            .with_rule(LayerKind::FloodRisk, hazard_area)
            .with_rule(LayerKind::LandslideRisk, hazard_area)
            .with_rule(LayerKind::EarthquakeRisk, hazard_area)
            .with_rule(LayerKind::TsunamiRisk, hazard_area)
            .with_rule(LayerKind::ForestCover, land_cover)
            .with_rule(LayerKind::EmergencyServices, facilities)
            .with_rule(LayerKind::PopulationDensity, density)
            .with_rule(LayerKind::Transportation, network)
    }
}

/// Parses `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
pub fn parse_color(raw: &str) -> Option<Rgba> {
    let hex = raw.trim().trim_start_matches('#');
    if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some([
        f32::from(channel(0)?) / 255.0,
        f32::from(channel(2)?) / 255.0,
        f32::from(channel(4)?) / 255.0,
        f32::from(alpha) / 255.0,
    ])
}

fn color(descriptor: &LayerDescriptor, raw: &str) -> Result<Rgba, StyleError> {
    parse_color(raw).ok_or_else(|| StyleError::InvalidColor {
        layer_id: descriptor.id.clone(),
        value: raw.to_string(),
    })
}

fn stroke_width(descriptor: &LayerDescriptor, default: f32) -> Result<f32, StyleError> {
    match descriptor.style_hint.stroke_width {
        None => Ok(default),
        Some(w) if w.is_finite() && w >= 0.0 => Ok(w),
        Some(w) => Err(StyleError::InvalidStrokeWidth {
            layer_id: descriptor.id.clone(),
            value: w,
        }),
    }
}

fn outline_or(descriptor: &LayerDescriptor, default: Rgba) -> Result<Rgba, StyleError> {
    match &descriptor.style_hint.outline_color {
        Some(raw) => color(descriptor, raw),
        None => Ok(default),
    }
}

fn spec(
    descriptor: &LayerDescriptor,
    geometry: GeometryTemplate,
    fill: Rgba,
    stroke: Rgba,
    stroke_width: f32,
    z_index: i32,
) -> DrawableSpec {
    DrawableSpec {
        layer_id: descriptor.id.clone(),
        geometry,
        fill,
        stroke,
        stroke_width,
        z_index,
        visible: descriptor.visible,
        opacity: descriptor.opacity.get(),
    }
}

/// Fallback for kinds without a rule: follow the hint as written.
pub fn generic(d: &LayerDescriptor) -> Result<DrawableSpec, StyleError> {
    let fill = color(d, &d.style_hint.color)?;
    let stroke = outline_or(d, fill)?;
    Ok(spec(d, d.style_hint.geometry, fill, stroke, stroke_width(d, 1.0)?, 0))
}

fn boundary(d: &LayerDescriptor) -> Result<DrawableSpec, StyleError> {
    let fill = color(d, &d.style_hint.color)?;
    let [r, g, b, _] = fill;
    let stroke = outline_or(d, [r, g, b, 1.0])?;
    Ok(spec(d, GeometryTemplate::Polygon, fill, stroke, stroke_width(d, 2.0)?, 30))
}

fn hazard_area(d: &LayerDescriptor) -> Result<DrawableSpec, StyleError> {
    let fill = color(d, &d.style_hint.color)?;
    let stroke = outline_or(d, fill)?;
    Ok(spec(d, GeometryTemplate::Polygon, fill, stroke, stroke_width(d, 1.0)?, 10))
}

fn land_cover(d: &LayerDescriptor) -> Result<DrawableSpec, StyleError> {
    let fill = color(d, &d.style_hint.color)?;
    let stroke = outline_or(d, TRANSPARENT)?;
    Ok(spec(d, GeometryTemplate::Polygon, fill, stroke, stroke_width(d, 0.0)?, 5))
}

fn facilities(d: &LayerDescriptor) -> Result<DrawableSpec, StyleError> {
    let fill = color(d, &d.style_hint.color)?;
    let stroke = outline_or(d, WHITE)?;
    Ok(spec(d, GeometryTemplate::Point, fill, stroke, stroke_width(d, 1.5)?, 40))
}

fn density(d: &LayerDescriptor) -> Result<DrawableSpec, StyleError> {
    let fill = color(d, &d.style_hint.color)?;
    Ok(spec(d, GeometryTemplate::Heatmap, fill, TRANSPARENT, 0.0, 1))
}

fn network(d: &LayerDescriptor) -> Result<DrawableSpec, StyleError> {
    let stroke = color(d, &d.style_hint.color)?;
    Ok(spec(d, GeometryTemplate::Polyline, TRANSPARENT, stroke, stroke_width(d, 2.5)?, 20))
}

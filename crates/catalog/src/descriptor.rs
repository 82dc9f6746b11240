use foundation::Opacity;
use serde::{Deserialize, Serialize};

/// Thematic category of an overlay layer.
///
/// Values outside the known set are carried verbatim in `Unrecognized` so a
/// remotely sourced catalog never fails to load because of a new kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerKind {
    AdministrativeBoundary,
    FloodRisk,
    LandslideRisk,
    ForestCover,
    EmergencyServices,
    EarthquakeRisk,
    TsunamiRisk,
    PopulationDensity,
    Transportation,
    Unrecognized(String),
}

impl LayerKind {
    pub const KNOWN: [LayerKind; 9] = [
        LayerKind::AdministrativeBoundary,
        LayerKind::FloodRisk,
        LayerKind::LandslideRisk,
        LayerKind::ForestCover,
        LayerKind::EmergencyServices,
        LayerKind::EarthquakeRisk,
        LayerKind::TsunamiRisk,
        LayerKind::PopulationDensity,
        LayerKind::Transportation,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            LayerKind::AdministrativeBoundary => "administrative-boundary",
            LayerKind::FloodRisk => "flood-risk",
            LayerKind::LandslideRisk => "landslide-risk",
            LayerKind::ForestCover => "forest-cover",
            LayerKind::EmergencyServices => "emergency-services",
            LayerKind::EarthquakeRisk => "earthquake-risk",
            LayerKind::TsunamiRisk => "tsunami-risk",
            LayerKind::PopulationDensity => "population-density",
            LayerKind::Transportation => "transportation",
            LayerKind::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, LayerKind::Unrecognized(_))
    }
}

impl From<String> for LayerKind {
    fn from(raw: String) -> Self {
        LayerKind::KNOWN
            .into_iter()
            .find(|k| k.as_str() == raw)
            .unwrap_or(LayerKind::Unrecognized(raw))
    }
}

impl From<&str> for LayerKind {
    fn from(raw: &str) -> Self {
        LayerKind::from(raw.to_string())
    }
}

impl From<LayerKind> for String {
    fn from(kind: LayerKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryTemplate {
    #[default]
    Polygon,
    Polyline,
    Point,
    Heatmap,
}

/// Presentation template carried by a descriptor.
///
/// Colors are `#RRGGBB` or `#RRGGBBAA`; they are only parsed when the layer
/// is materialized, so a malformed value fails that one layer and nothing
/// else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleHint {
    pub color: String,
    #[serde(default)]
    pub geometry: GeometryTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
}

impl StyleHint {
    pub fn new(color: impl Into<String>, geometry: GeometryTemplate) -> Self {
        Self {
            color: color.into(),
            geometry,
            outline_color: None,
            stroke_width: None,
        }
    }
}

impl Default for StyleHint {
    fn default() -> Self {
        Self::new("#888888", GeometryTemplate::Polygon)
    }
}

/// Logical definition of one overlay layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    pub id: String,
    pub display_name: String,
    pub kind: LayerKind,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub opacity: Opacity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub style_hint: StyleHint,
}

impl LayerDescriptor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind,
            visible: false,
            opacity: Opacity::OPAQUE,
            description: String::new(),
            style_hint: StyleHint::default(),
        }
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Out-of-range values are clamped; NaN keeps the current opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        if let Some(o) = Opacity::clamped(opacity) {
            self.opacity = o;
        }
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_style(mut self, style_hint: StyleHint) -> Self {
        self.style_hint = style_hint;
        self
    }
}

use crate::descriptor::{GeometryTemplate, LayerDescriptor, LayerKind, StyleHint};

/// Built-in hazard overlay set for Malaysia.
///
/// Nine layers, four of them visible by default: boundaries, flood risk,
/// emergency services and transportation.
pub fn malaysia_layers() -> Vec<LayerDescriptor> {
    vec![
        LayerDescriptor::new(
            "malaysia-boundaries",
            "Administrative Boundaries",
            LayerKind::AdministrativeBoundary,
        )
        .with_visible(true)
        .with_opacity(0.8)
        .with_description("State and district boundaries")
        .with_style(StyleHint {
            outline_color: Some("#2f4f4f".to_string()),
            stroke_width: Some(2.0),
            ..StyleHint::new("#00000000", GeometryTemplate::Polygon)
        }),
        LayerDescriptor::new("flood-risk-malaysia", "Flood Risk Zones", LayerKind::FloodRisk)
            .with_visible(true)
            .with_opacity(0.6)
            .with_description("Flood-prone areas from historical inundation records")
            .with_style(StyleHint::new("#1e90ff", GeometryTemplate::Polygon)),
        LayerDescriptor::new(
            "landslide-risk-malaysia",
            "Landslide Risk",
            LayerKind::LandslideRisk,
        )
        .with_opacity(0.6)
        .with_description("Slope failure susceptibility")
        .with_style(StyleHint::new("#8b4513", GeometryTemplate::Polygon)),
        LayerDescriptor::new("forest-cover-malaysia", "Forest Cover", LayerKind::ForestCover)
            .with_opacity(0.5)
            .with_description("Permanent forest reserves")
            .with_style(StyleHint::new("#228b22", GeometryTemplate::Polygon)),
        LayerDescriptor::new(
            "emergency-services-malaysia",
            "Emergency Services",
            LayerKind::EmergencyServices,
        )
        .with_visible(true)
        .with_description("Hospitals, fire and rescue stations, relief centres")
        .with_style(StyleHint::new("#dc143c", GeometryTemplate::Point)),
        LayerDescriptor::new(
            "earthquake-risk-malaysia",
            "Earthquake Risk",
            LayerKind::EarthquakeRisk,
        )
        .with_opacity(0.5)
        .with_description("Seismic hazard zones")
        .with_style(StyleHint::new("#ff8c00", GeometryTemplate::Polygon)),
        LayerDescriptor::new("tsunami-risk-malaysia", "Tsunami Risk", LayerKind::TsunamiRisk)
            .with_opacity(0.5)
            .with_description("Coastal inundation zones")
            .with_style(StyleHint::new("#008b8b", GeometryTemplate::Polygon)),
        LayerDescriptor::new(
            "population-density-malaysia",
            "Population Density",
            LayerKind::PopulationDensity,
        )
        .with_opacity(0.7)
        .with_description("Residents per square kilometre")
        .with_style(StyleHint::new("#800080", GeometryTemplate::Heatmap)),
        LayerDescriptor::new(
            "transportation-malaysia",
            "Transportation Network",
            LayerKind::Transportation,
        )
        .with_visible(true)
        .with_opacity(0.9)
        .with_description("Highways, rail and evacuation routes")
        .with_style(StyleHint {
            stroke_width: Some(3.0),
            ..StyleHint::new("#696969", GeometryTemplate::Polyline)
        }),
    ]
}

use egui::Color32;

#[derive(Debug, Clone)]
pub struct SettingsNavigation {
    /// Drag to pan, wheel or pinch to zoom
    pub zoom_and_pan_enabled: bool,

    /// Zoom levels per 100 px of mouse wheel scroll
    pub zoom_speed: f64,

    /// Zoom levels added when a cluster is clicked
    pub cluster_click_zoom: f64,
}

impl Default for SettingsNavigation {
    fn default() -> Self {
        Self {
            zoom_and_pan_enabled: true,
            zoom_speed: 0.5,
            cluster_click_zoom: 2.,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStyle {
    pub background: Color32,
    pub graticule: Color32,

    /// Show point counts on clusters
    pub cluster_labels: bool,
    pub label_size: f32,

    /// Ring drawn around the active event
    pub selection: Color32,
}

impl Default for SettingsStyle {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(24, 32, 44),
            graticule: Color32::from_rgba_unmultiplied(200, 200, 200, 40),
            cluster_labels: true,
            label_size: 12.,
            selection: Color32::from_rgb(253, 196, 1), // Star Gold
        }
    }
}

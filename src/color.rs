use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.7, 0.5).into_color();
            Color32::from_rgb(
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Band colours for the preview plot
// ---------------------------------------------------------------------------

/// Stable colour per selected band, rebuilt whenever the band list changes.
#[derive(Debug, Clone, Default)]
pub struct BandColors {
    mapping: BTreeMap<String, Color32>,
}

impl BandColors {
    pub fn new(bands: &[String]) -> Self {
        let mapping = bands
            .iter()
            .cloned()
            .zip(generate_palette(bands.len()))
            .collect();
        Self { mapping }
    }

    pub fn color_for(&self, band: &str) -> Color32 {
        self.mapping.get(band).copied().unwrap_or(Color32::GRAY)
    }
}

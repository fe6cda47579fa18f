use std::collections::BTreeMap;

use eframe::egui::Color32;
use egui_plot::MarkerShape;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Marker shapes cycled through per group so groups stay distinct in greyscale.
const MARKERS: [MarkerShape; 6] = [
    MarkerShape::Circle,
    MarkerShape::Square,
    MarkerShape::Diamond,
    MarkerShape::Up,
    MarkerShape::Down,
    MarkerShape::Cross,
];

// ---------------------------------------------------------------------------
// Colour mapping: group key → (Color32, marker)
// ---------------------------------------------------------------------------

/// Maps each group key (section label, mineral name) to a distinct colour
/// and marker shape.
#[derive(Debug, Clone)]
pub struct ColorMap<K: Ord> {
    mapping: BTreeMap<K, (Color32, MarkerShape)>,
    default_color: Color32,
}

impl<K: Ord> Default for ColorMap<K> {
    fn default() -> Self {
        ColorMap {
            mapping: BTreeMap::new(),
            default_color: Color32::GRAY,
        }
    }
}

impl<K: Ord + Clone> ColorMap<K> {
    /// Build a colour map from keys in their display order.
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a K>) -> Self
    where
        K: 'a,
    {
        let keys: Vec<&K> = keys.into_iter().collect();
        let palette = generate_palette(keys.len());
        let mapping = keys
            .into_iter()
            .zip(palette)
            .enumerate()
            .map(|(i, (k, c))| (k.clone(), (c, MARKERS[i % MARKERS.len()])))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given key.
    pub fn color_for(&self, key: &K) -> Color32 {
        self.mapping
            .get(key)
            .map(|(c, _)| *c)
            .unwrap_or(self.default_color)
    }

    pub fn marker_for(&self, key: &K) -> MarkerShape {
        self.mapping
            .get(key)
            .map(|(_, m)| *m)
            .unwrap_or(MarkerShape::Circle)
    }
}

use eframe::egui;
use serde::{Deserialize, Serialize};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    /// Fill used for any color key the palette does not know.
    pub const NEUTRAL_FILL: Rgba = Rgba::rgb(0xdd, 0xdd, 0xdd);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_egui(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

// ── Palette ─────────────────────────────────────────────────────────────────

/// Name of a palette entry. Polygons and the session store keys, not colors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorKey(pub String);

impl ColorKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColorKey {
    fn from(s: &str) -> Self {
        ColorKey(s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PaletteEntry {
    key: ColorKey,
    stroke: Rgba,
    light: Rgba,
}

/// Which light-fill table backs polygon interiors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FillScheme {
    /// Opaque pastel tints.
    #[default]
    Pastel,
    /// The stroke color at low opacity.
    Translucent,
}

const TRANSLUCENT_ALPHA: u8 = 51;

// name, stroke, pastel tint
const DEFAULT_COLORS: [(&str, Rgba, Rgba); 7] = [
    ("blue", Rgba::rgb(0x00, 0x00, 0xff), Rgba::rgb(0xef, 0xf6, 0xff)),
    ("green", Rgba::rgb(0x00, 0x80, 0x00), Rgba::rgb(0xdc, 0xfc, 0xe7)),
    ("purple", Rgba::rgb(0x80, 0x00, 0x80), Rgba::rgb(0xf3, 0xe8, 0xff)),
    ("red", Rgba::rgb(0xff, 0x00, 0x00), Rgba::rgb(0xfe, 0xe2, 0xe2)),
    ("orange", Rgba::rgb(0xff, 0xa5, 0x00), Rgba::rgb(0xff, 0xed, 0xd5)),
    ("brown", Rgba::rgb(0xa5, 0x2a, 0x2a), Rgba::rgb(0xed, 0xe0, 0xd4)),
    ("teal", Rgba::rgb(0x00, 0x80, 0x80), Rgba::rgb(0xcc, 0xfb, 0xf1)),
];

/// Ordered, non-empty color table. Selection is purely a function of how many
/// polygons already exist, so cycling is repeatable across resets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn with_scheme(scheme: FillScheme) -> Self {
        let entries = DEFAULT_COLORS
            .iter()
            .map(|(name, stroke, pastel)| PaletteEntry {
                key: ColorKey::from(*name),
                stroke: *stroke,
                light: match scheme {
                    FillScheme::Pastel => *pastel,
                    FillScheme::Translucent => stroke.with_alpha(TRANSLUCENT_ALPHA),
                },
            })
            .collect();
        Self { entries }
    }

    /// Color for the polygon that will be committed after `committed` others.
    pub fn color_for(&self, committed: usize) -> ColorKey {
        self.entries[committed % self.entries.len()].key.clone()
    }

    pub fn first(&self) -> ColorKey {
        self.color_for(0)
    }

    fn lookup(&self, key: &ColorKey) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| &e.key == key)
    }

    pub fn stroke_for(&self, key: &ColorKey) -> Rgba {
        self.lookup(key)
            .map(|e| e.stroke)
            .unwrap_or(Rgba::NEUTRAL_FILL)
    }

    pub fn fill_for(&self, key: &ColorKey) -> Rgba {
        self.lookup(key)
            .map(|e| e.light)
            .unwrap_or(Rgba::NEUTRAL_FILL)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::with_scheme(FillScheme::default())
    }
}

use crate::palette::{FillScheme, Palette};
use crate::render::RenderSettings;
use crate::session::DEFAULT_CLOSURE_THRESHOLD;
use crate::table::TagField;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    pub surface_width: f32,
    pub surface_height: f32,
    pub closure_threshold: f32,
    pub grid_spacing: f32,
    pub fill_scheme: FillScheme,
    pub tag_field: TagField,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            surface_width: 800.0,
            surface_height: 550.0,
            closure_threshold: DEFAULT_CLOSURE_THRESHOLD,
            grid_spacing: 50.0,
            fill_scheme: FillScheme::default(),
            tag_field: TagField::default(),
        }
    }
}

/// Values supplied on the command line; each one overrides the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    pub surface_width: Option<f32>,
    pub surface_height: Option<f32>,
    pub closure_threshold: Option<f32>,
    pub grid_spacing: Option<f32>,
    pub fill_scheme: Option<FillScheme>,
    pub tag_field: Option<TagField>,
}

impl AnnotatorConfig {
    /// Reads a JSON config. Missing keys keep their defaults and an empty
    /// file means all defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("deserialize config file {}", path.display()))
    }

    pub fn apply(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(v) = overrides.surface_width {
            self.surface_width = v;
        }
        if let Some(v) = overrides.surface_height {
            self.surface_height = v;
        }
        if let Some(v) = overrides.closure_threshold {
            self.closure_threshold = v;
        }
        if let Some(v) = overrides.grid_spacing {
            self.grid_spacing = v;
        }
        if let Some(v) = overrides.fill_scheme {
            self.fill_scheme = v;
        }
        if let Some(v) = overrides.tag_field {
            self.tag_field = v;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("surface_width", self.surface_width),
            ("surface_height", self.surface_height),
            ("closure_threshold", self.closure_threshold),
            ("grid_spacing", self.grid_spacing),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                bail!("{name} must be a positive number, got {value}");
            }
        }
        Ok(())
    }

    pub fn surface_size(&self) -> (f32, f32) {
        (self.surface_width, self.surface_height)
    }

    pub fn palette(&self) -> Palette {
        Palette::with_scheme(self.fill_scheme)
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            closure_threshold: self.closure_threshold,
            grid_spacing: self.grid_spacing,
        }
    }
}

//! Mapping from cell type to display color.

use crate::config::PaletteConfig;
use cytoseed_data::{CellType, Color};
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Prefix of override keys that target [`CellType::Custom`] names.
pub const CUSTOM_KEY_PREFIX: &str = "custom:";

#[derive(Debug, Clone, Default)]
pub struct CellPalette {
    overrides: BTreeMap<String, Color>,
}

impl CellPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &PaletteConfig) -> Self {
        Self {
            overrides: config.overrides.clone(),
        }
    }

    pub fn set_override(&mut self, type_name: impl Into<String>, color: Color) {
        self.overrides.insert(type_name.into(), color);
    }

    /// Override key for `cell_type`.
    ///
    /// Built-in types use their name; custom types are prefixed with
    /// [`CUSTOM_KEY_PREFIX`] so a custom `"glial"` never picks up the
    /// `Glial` override.
    pub fn override_key(cell_type: &CellType) -> Cow<'_, str> {
        match cell_type {
            CellType::Custom(name) => Cow::Owned(format!("{CUSTOM_KEY_PREFIX}{name}")),
            builtin => Cow::Borrowed(builtin.name()),
        }
    }

    /// Color for `cell_type`: configured override first, then the built-in color.
    pub fn color_for(&self, cell_type: &CellType) -> Color {
        if let Some(color) = self.overrides.get(&*Self::override_key(cell_type)) {
            return *color;
        }
        match cell_type {
            CellType::Unspecified => Color::rgb(255, 200, 0),
            CellType::Excitatory => Color::rgb(220, 60, 60),
            CellType::Inhibitory => Color::rgb(60, 100, 220),
            CellType::Glial => Color::rgb(90, 200, 120),
            CellType::Custom(name) => derived_color(name),
        }
    }
}

/// Stable color for an arbitrary type name.
fn derived_color(name: &str) -> Color {
    let digest = Sha256::digest(name.as_bytes());
    Color::rgb(digest[0], digest[1], digest[2])
}

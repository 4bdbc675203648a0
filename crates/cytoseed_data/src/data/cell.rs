use super::geometry::{Color, Position};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a [`Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub Uuid);

/// Identity of a [`SomaElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SomaId(pub Uuid);

/// Stable handle of a [`PhysicalSphere`], valid before and after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub Uuid);

/// Handle of a node owned by the spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceNodeId(pub u64);

macro_rules! uuid_handle {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                #[must_use]
                pub fn new_v4() -> Self {
                    Self(Uuid::new_v4())
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.fmt(f)
                }
            }
        )*
    };
}

uuid_handle!(CellId, SomaId, BodyId);

impl fmt::Display for SpaceNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Classification of a cell, used to pick its display color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    #[default]
    Unspecified,
    Excitatory,
    Inhibitory,
    Glial,
    Custom(String),
}

impl CellType {
    /// Key used for palette overrides in configuration.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            CellType::Unspecified => "unspecified",
            CellType::Excitatory => "excitatory",
            CellType::Inhibitory => "inhibitory",
            CellType::Glial => "glial",
            CellType::Custom(name) => name,
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Biological facet of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SomaElement {
    pub id: SomaId,
    /// Back-reference to the sphere carrying this soma.
    pub physical: Option<BodyId>,
}

impl SomaElement {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SomaId::new_v4(),
            physical: None,
        }
    }
}

impl Default for SomaElement {
    fn default() -> Self {
        Self::new()
    }
}

/// Physical facet of a cell: location, shape and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSphere {
    pub id: BodyId,
    pub soma: Option<SomaId>,
    pub mass_location: Option<Position>,
    pub color: Option<Color>,
    pub diameter: f64,
    pub space_node: Option<SpaceNodeId>,
}

impl PhysicalSphere {
    #[must_use]
    pub fn new(diameter: f64) -> Self {
        Self {
            id: BodyId::new_v4(),
            soma: None,
            mass_location: None,
            color: None,
            diameter,
            space_node: None,
        }
    }

    /// True once the sphere is linked to a soma, a spatial node and has a location and color.
    #[must_use]
    pub fn is_wired(&self) -> bool {
        self.soma.is_some()
            && self.space_node.is_some()
            && self.mass_location.is_some()
            && self.color.is_some()
    }
}

/// One simulated agent.
///
/// The cell owns its soma; the physical sphere lives in the environment's
/// registry and is addressed through [`Cell::body`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub cell_type: CellType,
    pub soma: SomaElement,
    pub body: BodyId,
}

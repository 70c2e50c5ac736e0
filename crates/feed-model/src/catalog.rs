//! Catalog tree: Catalog → Complex → Building → Unit.
//!
//! Ownership is strictly top-down. Nodes never point at their parent; error
//! attribution uses [`NodeLocation`] indices and path strings instead.

use serde::{Deserialize, Serialize};

use crate::issue::{IssueKind, Severity};
use crate::record::UnitRecord;

/// Label used in paths and messages for an implicit (unnamed) complex or building.
pub const IMPLICIT_NODE_LABEL: &str = "(default)";

/// Position of a node in the tree, used to order issues by traversal.
///
/// `None` sorts before `Some`, so a complex-level location precedes its
/// buildings, and a building-level location precedes its units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeLocation {
    pub complex: usize,
    pub building: Option<usize>,
    pub unit: Option<usize>,
}

impl NodeLocation {
    pub fn complex(complex: usize) -> Self {
        Self {
            complex,
            building: None,
            unit: None,
        }
    }

    pub fn building(complex: usize, building: usize) -> Self {
        Self {
            complex,
            building: Some(building),
            unit: None,
        }
    }

    pub fn unit(complex: usize, building: usize, unit: usize) -> Self {
        Self {
            complex,
            building: Some(building),
            unit: Some(unit),
        }
    }
}

/// A non-blocking finding attached to a node, rendered in verbose feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
}

/// Where a building's `floors_total` came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorsTotalSource {
    /// Stated by at least one source row.
    Declared,
    /// Derived as the highest member floor.
    Inferred,
    /// Neither stated nor derivable.
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub record: UnitRecord,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Unit {
    pub fn new(record: UnitRecord) -> Self {
        Self {
            record,
            diagnostics: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Empty for the implicit building of rows without a building name.
    pub name: String,
    pub floors_total: Option<i32>,
    pub floors_total_source: FloorsTotalSource,
    pub units: Vec<Unit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Building {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            floors_total: None,
            floors_total_source: FloorsTotalSource::Unknown,
            units: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_implicit(&self) -> bool {
        self.name.is_empty()
    }

    pub fn label(&self) -> &str {
        if self.is_implicit() {
            IMPLICIT_NODE_LABEL
        } else {
            &self.name
        }
    }

    /// Highest floor stated by any member unit.
    pub fn max_unit_floor(&self) -> Option<i32> {
        self.units.iter().filter_map(|unit| unit.record.floor).max()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    /// Empty for the implicit complex of rows without a complex name.
    pub name: String,
    pub buildings: Vec<Building>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Complex {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buildings: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_implicit(&self) -> bool {
        self.name.is_empty()
    }

    pub fn label(&self) -> &str {
        if self.is_implicit() {
            IMPLICIT_NODE_LABEL
        } else {
            &self.name
        }
    }

    pub fn unit_count(&self) -> usize {
        self.buildings.iter().map(|b| b.units.len()).sum()
    }
}

/// Root of the tree built once per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub complexes: Vec<Complex>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.complexes.is_empty()
    }

    pub fn building_count(&self) -> usize {
        self.complexes.iter().map(|c| c.buildings.len()).sum()
    }

    pub fn unit_count(&self) -> usize {
        self.complexes.iter().map(Complex::unit_count).sum()
    }

    /// Units in traversal order (complex, building, unit).
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.complexes
            .iter()
            .flat_map(|c| c.buildings.iter())
            .flat_map(|b| b.units.iter())
    }

    /// Human-readable path of a node, e.g. `Sunrise/B1/U1`.
    ///
    /// Returns `None` when the location does not exist in this catalog.
    pub fn path_of(&self, location: NodeLocation) -> Option<String> {
        let complex = self.complexes.get(location.complex)?;
        let Some(building_idx) = location.building else {
            return Some(complex.label().to_string());
        };
        let building = complex.buildings.get(building_idx)?;
        let Some(unit_idx) = location.unit else {
            return Some(node_path(&[complex.label(), building.label()]));
        };
        let unit = building.units.get(unit_idx)?;
        Some(node_path(&[
            complex.label(),
            building.label(),
            &unit.record.label(),
        ]))
    }

    /// Every diagnostic in traversal order, with its location.
    pub fn diagnostics(&self) -> Vec<(NodeLocation, &Diagnostic)> {
        let mut out = Vec::new();
        for (ci, complex) in self.complexes.iter().enumerate() {
            for diagnostic in &complex.diagnostics {
                out.push((NodeLocation::complex(ci), diagnostic));
            }
            for (bi, building) in complex.buildings.iter().enumerate() {
                for diagnostic in &building.diagnostics {
                    out.push((NodeLocation::building(ci, bi), diagnostic));
                }
                for (ui, unit) in building.units.iter().enumerate() {
                    for diagnostic in &unit.diagnostics {
                        out.push((NodeLocation::unit(ci, bi, ui), diagnostic));
                    }
                }
            }
        }
        out
    }
}

/// Join node labels into a `/`-separated path.
pub fn node_path(parts: &[&str]) -> String {
    parts.join("/")
}

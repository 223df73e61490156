//! Declarative piece documents for the cubecut puzzle splitter.
//!
//! A piece is described as a compound of translated unit cubes. Documents
//! carry no mesh data; turning one into a solid is left to whatever CAD tool
//! reads it.

pub mod sink;

pub use sink::{DocumentSink, ExportError, PieceSink};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for a node in a document graph.
pub type NodeId = u64;

/// 3D vector with f64 components (conventionally millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One unit cube of a piece: minimum corner and edge length, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubePlacement {
    /// Minimum corner.
    pub origin: Vec3,
    /// Edge length.
    pub size: f64,
}

impl CubePlacement {
    /// Placement of voxel (`x`, `y`, `z`) on a lattice of `unit_mm` cubes.
    pub fn at_voxel(x: usize, y: usize, z: usize, unit_mm: f64) -> Self {
        Self {
            origin: Vec3::new(x as f64 * unit_mm, y as f64 * unit_mm, z as f64 * unit_mm),
            size: unit_mm,
        }
    }
}

/// Operation held by a document node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CsgOp {
    /// Axis-aligned box with its minimum corner at the origin.
    Cube {
        /// Size along each axis.
        size: Vec3,
    },
    /// Translation by an offset vector.
    Translate {
        /// Child node to translate.
        child: NodeId,
        /// Translation offset.
        offset: Vec3,
    },
    /// Grouping of children into one object, without merging them.
    Compound {
        /// Member nodes.
        children: Vec<NodeId>,
    },
}

/// A node in the document graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Optional human-readable name.
    pub name: Option<String>,
    /// The operation this node represents.
    pub op: CsgOp,
}

/// An exported object: a named root node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntry {
    /// Root node of the object.
    pub root: NodeId,
    /// Object name.
    pub name: String,
}

/// A piece document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version string.
    pub version: String,
    /// All nodes in the graph, keyed by [`NodeId`].
    pub nodes: BTreeMap<NodeId, Node>,
    /// Exported objects.
    pub roots: Vec<SceneEntry>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            nodes: BTreeMap::new(),
            roots: Vec::new(),
        }
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: Option<String>, op: CsgOp) -> NodeId {
        let id = self.nodes.len() as NodeId + 1;
        self.nodes.insert(id, Node { id, name, op });
        id
    }

    /// Build the document for one piece: a translated cube per placement,
    /// grouped under a compound root named after the piece.
    pub fn from_cubes(name: &str, cubes: &[CubePlacement]) -> Self {
        let mut doc = Self::new();
        let mut children = Vec::with_capacity(cubes.len());
        for cube in cubes {
            let leaf = doc.push(
                None,
                CsgOp::Cube {
                    size: Vec3::new(cube.size, cube.size, cube.size),
                },
            );
            children.push(doc.push(
                None,
                CsgOp::Translate {
                    child: leaf,
                    offset: cube.origin,
                },
            ));
        }
        let root = doc.push(Some(name.to_string()), CsgOp::Compound { children });
        doc.roots.push(SceneEntry {
            root,
            name: name.to_string(),
        });
        doc
    }

    /// Cube placements reachable from the roots, in compound order.
    pub fn cubes(&self) -> Vec<CubePlacement> {
        let mut out = Vec::new();
        for entry in &self.roots {
            self.collect_cubes(entry.root, Vec3::new(0.0, 0.0, 0.0), &mut out);
        }
        out
    }

    fn collect_cubes(&self, id: NodeId, offset: Vec3, out: &mut Vec<CubePlacement>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        match &node.op {
            CsgOp::Cube { size } => out.push(CubePlacement {
                origin: offset,
                size: size.x,
            }),
            CsgOp::Translate { child, offset: by } => {
                let moved = Vec3::new(offset.x + by.x, offset.y + by.y, offset.z + by.z);
                self.collect_cubes(*child, moved, out);
            }
            CsgOp::Compound { children } => {
                for child in children {
                    self.collect_cubes(*child, offset, out);
                }
            }
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

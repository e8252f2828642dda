//! Owned node tree for a loaded rig.
//!
//! The root node exclusively owns its children; bones are reachable only by
//! walking the tree. Only nodes flagged `is_bone` take part in pose export.

use serde::{Deserialize, Serialize};

/// Euler rotation in radians, applied in fixed x-y-z order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Euler {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Euler {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Components paired with their axis label, in x, y, z order.
    pub fn axes(&self) -> [(Axis, f64); 3] {
        [(Axis::X, self.x), (Axis::Y, self.y), (Axis::Z, self.z)]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

fn default_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

/// A scene node. Bones carry `is_bone = true`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "isBone")]
    pub is_bone: bool,
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(default)]
    pub rotation: Euler,
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_bone: false,
            position: [0.0; 3],
            rotation: Euler::default(),
            scale: default_scale(),
            children: Vec::new(),
        }
    }

    pub fn bone(name: impl Into<String>) -> Self {
        Self {
            is_bone: true,
            ..Self::group(name)
        }
    }

    pub fn with_rotation(mut self, rotation: Euler) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }
}

/// A rig: the root node and everything below it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skeleton {
    pub root: Node,
}

impl Skeleton {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Pre-order depth-first walk over every node, children in declaration order.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![&self.root],
        }
    }

    /// Bones only, in depth-first order.
    pub fn bones(&self) -> impl Iterator<Item = &Node> {
        self.walk().filter(|n| n.is_bone)
    }

    pub fn bone_count(&self) -> usize {
        self.bones().count()
    }

    /// Mutable visit of every node in depth-first order.
    pub fn for_each_node_mut(&mut self, mut f: impl FnMut(&mut Node)) {
        let mut stack: Vec<&mut Node> = vec![&mut self.root];
        while let Some(node) = stack.pop() {
            f(&mut *node);
            stack.extend(node.children.iter_mut().rev());
        }
    }

    /// First node with the given name in depth-first order.
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.walk().find(|n| n.name == name)
    }
}

/// Worklist iterator produced by [`Skeleton::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

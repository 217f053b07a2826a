use crate::asset::ProtoMesh;
use crate::error::DecodeError;
use crate::AssetKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkeletonNode {
    pub name: String,
    pub parent: Option<usize>,
}

/// Node hierarchy, parents always come before their children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Skeleton {
    pub name: String,
    pub nodes: Vec<SkeletonNode>,
}

impl Skeleton {
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: Vec::new(),
        }
    }

    pub fn find_node(&self, name: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn validate(&self) -> Result<(), DecodeError> {
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(p) = node.parent {
                if p >= i {
                    return Err(DecodeError::malformed(
                        AssetKind::Skeleton,
                        format!("node {} ({}) has parent {}", i, node.name, p),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Maps the attachment nodes of a mesh onto the nodes of a skeleton.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttachBinder {
    /// Skeleton node for each entry of `ProtoMesh::nodes`.
    pub bind: Vec<Option<usize>>,
}

impl AttachBinder {
    pub fn new(skeleton: &Skeleton, mesh: &ProtoMesh) -> Self {
        let bind = mesh
            .nodes
            .iter()
            .map(|name| {
                let node = skeleton.find_node(name);
                if node.is_none() {
                    log::debug!(
                        "Node {} of {} not in skeleton {}",
                        name,
                        mesh.name,
                        skeleton.name
                    );
                }
                node
            })
            .collect();
        Self { bind }
    }

    pub fn is_complete(&self) -> bool {
        self.bind.iter().all(Option::is_some)
    }
}

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::error::{Result, SlurmError};
use super::nodes::{NodeCapabilities, NodeLoad, NodeLoads};

/// Nodes grouped by availability.
///
/// The groups are not disjoint: an idle node without free GPUs (e.g. a
/// CPU-only node) is both in `idle` and in `no_gpu`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeGroups {
    /// Nodes in the `IDLE` state
    pub idle: BTreeSet<String>,
    /// Nodes in use but with at least one free GPU
    pub gpu_available: BTreeSet<String>,
    /// Nodes without free GPUs
    pub no_gpu: BTreeSet<String>,
}

impl NodeGroups {
    pub fn classify(loads: &NodeLoads) -> NodeGroups {
        let mut groups = NodeGroups::default();
        for (name, load) in loads {
            if load.is_idle() {
                groups.idle.insert(name.clone());
            } else if load.free.gpus > 0 {
                groups.gpu_available.insert(name.clone());
            }

            if load.free.gpus == 0 {
                groups.no_gpu.insert(name.clone());
            }
        }

        groups
    }
}

/// The node with the most free VRAM
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestNode {
    pub name: String,
    /// Free VRAM in GiB
    pub vram: i64,
}

impl BestNode {
    /// Selects the node with the most free VRAM. Ties are broken by most
    /// free memory, then fewest free GPUs, then most free CPUs.
    pub fn select(loads: &NodeLoads, capabilities: &NodeCapabilities) -> Result<BestNode> {
        let vram = |name: &String, load: &NodeLoad| load.free_vram(capabilities.get(name));

        let best_vram = loads
            .iter()
            .map(|(name, load)| vram(name, load))
            .max()
            .ok_or(SlurmError::NoNodesAvailable)?;

        let (name, _) = loads
            .iter()
            .filter(|(name, load)| vram(name, load) == best_vram)
            .min_by(|(a_name, a), (b_name, b)| {
                tie_break(a, b).then_with(|| a_name.cmp(b_name))
            })
            .ok_or(SlurmError::NoNodesAvailable)?;

        Ok(BestNode {
            name: name.clone(),
            vram: best_vram,
        })
    }
}

/// Orders nodes with equal free VRAM; lesser is better
fn tie_break(a: &NodeLoad, b: &NodeLoad) -> Ordering {
    b.free
        .mem
        .cmp(&a.free.mem)
        .then(a.free.gpus.cmp(&b.free.gpus))
        .then(b.free.cpu.cmp(&a.free.cpu))
}

use std::collections::BTreeMap;

use log::debug;
use serde::Deserialize;

use super::error::{ParseError, Result};
use super::misc::run;
use super::tres::Tres;

/// Node capabilities keyed by node name
pub type NodeCapabilities = BTreeMap<String, NodeCapability>;
/// Node loads keyed by node name
pub type NodeLoads = BTreeMap<String, NodeLoad>;

/// Static GPU configuration of a node
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeCapability {
    /// Upper-case GPU model, e.g. `A100`; empty for nodes without GPUs
    pub gpu_model: String,
    /// Memory per GPU in GiB
    pub gpu_mem: i64,
}

impl NodeCapability {
    pub fn collect(exe: &str) -> Result<NodeCapabilities> {
        let output = run(exe, &["-o", "%n %G %f"])?;

        Self::parse(&String::from_utf8_lossy(&output))
    }

    /// Parses `sinfo -o "%n %G %f"` output, i.e. a header followed by one
    /// `<node> <gres> <features>` line per node and partition.
    pub fn parse(output: &str) -> Result<NodeCapabilities> {
        let mut nodes = NodeCapabilities::new();
        for line in output.lines().skip(1) {
            if let Some((name, capability)) = Self::parse_line(line)? {
                nodes.insert(name.to_string(), capability);
            }
        }

        debug!("parsed capabilities of {} nodes", nodes.len());
        Ok(nodes)
    }

    /// Returns `None` for lines with too few fields
    fn parse_line(line: &str) -> Result<Option<(&str, NodeCapability)>, ParseError> {
        let fields = line.split_whitespace().collect::<Vec<_>>();
        let [name, gres, features, ..] = fields[..] else {
            return Ok(None);
        };

        // GRES are formatted as `gpu:<model>:<count>(S:<sockets>)`
        let gpu_model = gres.split(':').nth(1).unwrap_or_default().to_uppercase();

        // GPU memory is advertised via features of the form `m<GiB>`
        let mut gpu_mem = 0;
        for feature in features.split(',') {
            if let Some(mem) = feature.strip_prefix('m') {
                if mem.starts_with(|c: char| c.is_ascii_digit()) {
                    let mem = mem
                        .parse::<i64>()
                        .map_err(|_| ParseError::new("GPU memory feature", feature))?;
                    gpu_mem = gpu_mem.max(mem);
                }
            }
        }

        Ok(Some((name, NodeCapability { gpu_model, gpu_mem })))
    }
}

/// A node as reported by `scontrol show nodes --json`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    /// Configured resources
    #[serde(default)]
    pub tres: Option<String>,
    /// Allocated resources; absent or null on some Slurm versions if idle
    #[serde(default)]
    pub tres_used: Option<String>,
    #[serde(default)]
    pub state: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NodeRecords {
    nodes: Vec<NodeRecord>,
}

/// Point-in-time resource usage of a node
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeLoad {
    pub total: Tres,
    /// Total minus used resources; may be negative if Slurm reports more
    /// resources in use than configured
    pub free: Tres,
    /// State flags such as `IDLE`, `MIXED` or `DRAIN`
    pub state: Vec<String>,
}

impl NodeLoad {
    pub fn collect(exe: &str) -> Result<NodeLoads> {
        let output = run(exe, &["show", "nodes", "--json"])?;

        Self::parse(&output)
    }

    pub fn from_record(record: &NodeRecord) -> Result<NodeLoad, ParseError> {
        let total = Tres::parse(record.tres.as_deref().unwrap_or_default())?;
        let used = Tres::parse(record.tres_used.as_deref().unwrap_or_default())?;

        Ok(NodeLoad {
            total,
            free: total - used,
            state: record.state.clone(),
        })
    }

    /// Parses the JSON output of `scontrol show nodes --json`
    pub fn parse(output: &[u8]) -> Result<NodeLoads> {
        let records: NodeRecords = serde_json::from_slice(output)?;

        let mut nodes = NodeLoads::new();
        for record in &records.nodes {
            nodes.insert(record.name.clone(), NodeLoad::from_record(record)?);
        }

        debug!("parsed load of {} nodes", nodes.len());
        Ok(nodes)
    }

    pub fn is_idle(&self) -> bool {
        self.state.iter().any(|v| v == "IDLE")
    }

    /// Free VRAM in GiB given the capabilities of the node
    pub fn free_vram(&self, capability: Option<&NodeCapability>) -> i64 {
        self.free.gpus * capability.map(|v| v.gpu_mem).unwrap_or_default()
    }
}

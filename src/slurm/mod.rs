mod elapsed;
mod error;
mod jobs;
mod misc;
mod nodes;
mod ranking;
mod tres;
mod usage;

pub use elapsed::parse_elapsed;
pub use error::{ParseError, SlurmError};
pub use jobs::{JobLine, PastJob, TimeWindow};
pub use nodes::{NodeCapabilities, NodeCapability, NodeLoad, NodeLoads, NodeRecord};
pub use ranking::{BestNode, NodeGroups};
pub use tres::Tres;
pub use usage::UserUsage;

use error::Result;
use log::info;

/// Locations of the Slurm executables queried for cluster state
#[derive(Clone, Debug)]
pub struct Slurm {
    pub sinfo: String,
    pub scontrol: String,
    pub sacct: String,
}

impl Slurm {
    /// GPU model and memory per node, via `sinfo`
    pub fn capabilities(&self) -> Result<NodeCapabilities> {
        NodeCapability::collect(&self.sinfo)
    }

    /// Current free and total resources per node, via `scontrol`
    pub fn loads(&self) -> Result<NodeLoads> {
        NodeLoad::collect(&self.scontrol)
    }

    /// Jobs active during `window`, via `sacct`
    pub fn past_jobs(&self, window: &TimeWindow) -> Result<Vec<PastJob>> {
        let capabilities = self.capabilities()?;
        let jobs = PastJob::collect(&self.sacct, window, &capabilities)?;

        info!(
            "collected {} jobs between {} and {}",
            jobs.len(),
            window.start,
            window.end
        );

        Ok(jobs)
    }
}

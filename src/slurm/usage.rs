use std::collections::BTreeMap;
use std::time::Duration;

use super::jobs::PastJob;

/// Resources consumed by a single user over time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserUsage {
    /// Sum of wall-clock time
    pub elapsed: Duration,
    /// CPUs times wall-clock time
    pub cpu_time: Duration,
    /// GPUs times wall-clock time
    pub gpu_time: Duration,
    /// GiB of memory per GPU times wall-clock time
    pub vram_time: Duration,
}

impl UserUsage {
    pub fn add(&mut self, job: &PastJob) {
        self.elapsed = self.elapsed.saturating_add(job.elapsed);
        self.cpu_time = self.cpu_time.saturating_add(scale(job.elapsed, job.cpus));
        self.gpu_time = self.gpu_time.saturating_add(scale(job.elapsed, job.gpus));
        self.vram_time = self
            .vram_time
            .saturating_add(scale(job.elapsed, job.gpu.gpu_mem));
    }

    /// Sums usage per user
    pub fn aggregate<'a, I>(jobs: I) -> BTreeMap<String, UserUsage>
    where
        I: IntoIterator<Item = &'a PastJob>,
    {
        let mut users = BTreeMap::<String, UserUsage>::new();
        for job in jobs {
            users.entry(job.user.clone()).or_default().add(job);
        }

        users
    }
}

/// Multiplies a duration by a resource count; negative counts contribute nothing
fn scale(elapsed: Duration, count: i64) -> Duration {
    elapsed.saturating_mul(u32::try_from(count.max(0)).unwrap_or(u32::MAX))
}

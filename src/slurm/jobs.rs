use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta};
use log::{debug, trace};

use super::elapsed::parse_elapsed;
use super::error::{ParseError, Result, SlurmError};
use super::misc::{run, sacct_time};
use super::nodes::{NodeCapabilities, NodeCapability};
use super::tres::Tres;

/// Columns requested from `sacct`, in order
const SACCT_FIELDS: [&str; 5] = ["JobID", "User", "Elapsed", "NodeList", "AllocTRES"];

/// Period for which jobs are reported
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl TimeWindow {
    /// The `days` days leading up to `end`; `None` if out of range
    pub fn last_days(days: u32, end: DateTime<Local>) -> Option<TimeWindow> {
        let start = end.checked_sub_signed(TimeDelta::try_days(days.into())?)?;
        Some(TimeWindow { start, end })
    }
}

/// A job recorded by `sacct`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PastJob {
    /// ID of the job, including array/het-job suffixes
    pub id: String,
    /// Owner of the job
    pub user: String,
    /// Wall-clock time used so far
    pub elapsed: Duration,
    /// Number of CPUs allocated
    pub cpus: i64,
    /// Memory allocated in GiB
    pub mem: i64,
    /// Number of GPUs allocated
    pub gpus: i64,
    /// Capabilities of the first allocated node with known capabilities
    pub gpu: NodeCapability,
}

/// Outcome of parsing a single line of `sacct` output
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobLine {
    Parsed(PastJob),
    /// Too few fields, e.g. blank or truncated lines
    Skipped,
    Errored(ParseError),
}

impl JobLine {
    pub fn classify(fields: &[&str], capabilities: &NodeCapabilities) -> JobLine {
        let [id, user, elapsed, nodelist, tres, ..] = fields[..] else {
            return JobLine::Skipped;
        };

        let parse = || -> Result<PastJob, ParseError> {
            let elapsed = parse_elapsed(elapsed)?;
            let tres = Tres::parse(tres)?;

            // The first node with known capabilities is used for the whole job
            let gpu = nodelist
                .split(',')
                .find_map(|node| capabilities.get(node))
                .cloned()
                .unwrap_or_default();

            Ok(PastJob {
                id: id.to_string(),
                user: user.to_string(),
                elapsed,
                cpus: tres.cpu,
                mem: tres.mem,
                gpus: tres.gpus,
                gpu,
            })
        };

        match parse() {
            Ok(job) => JobLine::Parsed(job),
            Err(error) => JobLine::Errored(error),
        }
    }
}

impl PastJob {
    /// Collects all jobs (but not job steps) active during `window`
    pub fn collect(
        exe: &str,
        window: &TimeWindow,
        capabilities: &NodeCapabilities,
    ) -> Result<Vec<PastJob>> {
        let start = sacct_time(&window.start);
        let end = sacct_time(&window.end);
        let format = SACCT_FIELDS.join(",");

        let output = run(
            exe,
            &[
                "-a",
                "-X",
                "-S",
                &start,
                "-E",
                &end,
                "-o",
                &format,
                "--noheader",
                "--parsable2",
            ],
        )?;

        Self::parse(std::io::Cursor::new(output), capabilities)
    }

    /// Parses `|`-delimited `sacct` output. A single malformed line fails
    /// the whole batch.
    pub fn parse<R>(reader: R, capabilities: &NodeCapabilities) -> Result<Vec<PastJob>>
    where
        R: std::io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut jobs = Vec::new();
        let mut skipped = 0;
        for record in reader.byte_records() {
            let record = record?;
            let decoded = record
                .iter()
                .map(String::from_utf8_lossy)
                .collect::<Vec<_>>();
            let fields = decoded.iter().map(|v| v.as_ref()).collect::<Vec<_>>();

            match JobLine::classify(&fields, capabilities) {
                JobLine::Parsed(job) => jobs.push(job),
                JobLine::Skipped => {
                    trace!("skipping sacct record {:?}", record);
                    skipped += 1;
                }
                JobLine::Errored(source) => {
                    let line = record.position().map(|p| p.line()).unwrap_or_default();

                    return Err(SlurmError::Record {
                        line: line as usize,
                        source,
                    });
                }
            }
        }

        debug!("parsed {} jobs; skipped {} records", jobs.len(), skipped);
        Ok(jobs)
    }
}

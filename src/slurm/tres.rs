use log::warn;

use super::error::ParseError;

/// Trackable resources (TRES) as reported by `scontrol` and `sacct`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tres {
    /// Number of CPUs
    pub cpu: i64,
    /// Memory in GiB
    pub mem: i64,
    /// Number of GPUs
    pub gpus: i64,
}

impl Tres {
    /// Parses a TRES descriptor such as `cpu=32,mem=256G,billing=32,gres/gpu=4`.
    ///
    /// Entries not of the form `key=value` and unsupported keys are skipped;
    /// resources not listed default to zero.
    pub fn parse(value: &str) -> Result<Tres, ParseError> {
        let mut tres = Tres::default();

        for resource in value.split(',') {
            let mut fields = resource.split('=');
            let (key, value) = match (fields.next(), fields.next(), fields.next()) {
                (Some(key), Some(value), None) => (key, value),
                _ => continue,
            };

            match key {
                "cpu" => tres.cpu = parse_count("cpu", value)?,
                "mem" => {
                    if let Some(mem) = parse_memory(value)? {
                        tres.mem = mem;
                    }
                }
                "gres/gpu" => tres.gpus = parse_count("gres/gpu", value)?,
                _ => {}
            }
        }

        Ok(tres)
    }
}

impl std::ops::Sub for Tres {
    type Output = Tres;

    /// Free = Total - Used; negative results are kept as reported
    fn sub(self, rhs: Tres) -> Tres {
        Tres {
            cpu: self.cpu - rhs.cpu,
            mem: self.mem - rhs.mem,
            gpus: self.gpus - rhs.gpus,
        }
    }
}

fn parse_count(field: &'static str, value: &str) -> Result<i64, ParseError> {
    value
        .parse()
        .map_err(|_| ParseError::new(field, value))
}

/// Parses a memory amount into GiB, returning `None` for unknown units
fn parse_memory(value: &str) -> Result<Option<i64>, ParseError> {
    let Some(unit) = value.chars().last() else {
        return Ok(None);
    };

    let amount = parse_count("mem", &value[..value.len() - unit.len_utf8()])
        .map_err(|_| ParseError::new("mem", value))?;

    let mem = match unit {
        // Slurm may report memory in any of these units depending on how
        // evenly the amount divides
        'M' => amount / 1024,
        'G' => amount,
        'T' => amount * 1024,
        _ => {
            warn!("skipping memory with unsupported unit: {:?}", value);
            return Ok(None);
        }
    };

    Ok(Some(mem))
}

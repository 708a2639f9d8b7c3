use std::process::Command;

use chrono::{DateTime, Local};
use log::debug;

use super::error::{Result, SlurmError};

/// Runs `exe` and returns its stdout, failing if it could not be started or
/// exited with a non-zero status
pub fn run(exe: &str, args: &[&str]) -> Result<Vec<u8>> {
    let command = std::iter::once(exe)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    debug!("executing `{}`", command);

    let output = match Command::new(exe).args(args).output() {
        Ok(output) => output,
        Err(error) => {
            return Err(SlurmError::SourceUnavailable {
                command,
                reason: error.to_string(),
            })
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        return Err(SlurmError::SourceUnavailable {
            command,
            reason: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    debug!("`{}` returned {} bytes", command, output.stdout.len());
    Ok(output.stdout)
}

/// Formats a timestamp as accepted by `sacct --starttime/--endtime`
pub fn sacct_time(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_run() {
        assert_eq!(run("echo", &["a", "b"]).unwrap(), b"a b\n");
        assert!(matches!(
            run("false", &[]),
            Err(SlurmError::SourceUnavailable { .. })
        ));
        match run("/nonexistent/sacct", &["-a"]) {
            Err(SlurmError::SourceUnavailable { command, .. }) => {
                assert_eq!(command, "/nonexistent/sacct -a")
            }
            result => panic!("unexpected {:?}", result),
        }
    }

    #[test]
    fn test_sacct_time() {
        let time = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(sacct_time(&time), "2024-01-02T03:04:05");
    }
}

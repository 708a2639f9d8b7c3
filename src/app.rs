use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Local};
use color_eyre::eyre::{bail, eyre, Context};
use color_eyre::Result;
use log::info;

use crate::args::{Args, Command};
use crate::slurm::{Slurm, TimeWindow, UserUsage};
use crate::ui::{NodeReport, UsageReport};

/// The report to generate
#[derive(Clone, Debug, PartialEq)]
pub enum Report {
    /// Free resources per node
    Load {
        /// Show only the best node
        best: bool,
    },
    /// Resources used per user
    Blame { days: u32, window: TimeWindow },
}

/// Everything needed to generate a report
#[derive(Clone, Debug)]
pub struct Config {
    pub slurm: Slurm,
    pub report: Report,
    /// Emit colors and other terminal styling
    pub color: bool,
}

impl Config {
    /// Builds the configuration from command-line arguments, with time
    /// windows ending at `now`
    pub fn from_args(args: &Args, now: DateTime<Local>) -> Result<Config> {
        let report = match &args.command {
            Some(Command::Load(load)) => Report::Load { best: load.best },
            Some(Command::Blame(blame)) => Report::Blame {
                days: blame.days,
                window: TimeWindow::last_days(blame.days, now)
                    .ok_or_else(|| eyre!("--days {} is out of range", blame.days))?,
            },
            None => bail!("no report selected; run with --help for usage"),
        };

        Ok(Config {
            slurm: Slurm {
                sinfo: args.sinfo.clone(),
                scontrol: args.scontrol.clone(),
                sacct: args.sacct.clone(),
            },
            report,
            color: !args.no_color && io::stdout().is_terminal(),
        })
    }
}

#[derive(Debug)]
pub struct App {
    config: Config,
}

impl App {
    /// Constructs a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Queries Slurm and writes the selected report to `out`
    pub fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        let slurm = &self.config.slurm;
        let color = self.config.color;

        match &self.config.report {
            Report::Load { best } => {
                let capabilities = slurm
                    .capabilities()
                    .wrap_err("failed to collect node capabilities")?;
                let loads = slurm.loads().wrap_err("failed to collect node loads")?;
                info!("collected load of {} nodes", loads.len());

                let report = NodeReport::new(loads, capabilities)?;
                if *best {
                    report.print_best(out, color)?;
                } else {
                    report.print(out, color)?;
                }
            }
            Report::Blame { days, window } => {
                let jobs = slurm
                    .past_jobs(window)
                    .wrap_err("failed to collect job history")?;

                let report = UsageReport {
                    days: *days,
                    users: UserUsage::aggregate(&jobs),
                };
                report.print(out, color)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use argh::FromArgs;
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn parse_config(args: &[&str]) -> Result<Config> {
        let args = Args::from_args(&["slurmusage"], args).unwrap();
        Config::from_args(&args, now())
    }

    #[test]
    fn test_config() {
        let config =
            parse_config(&["--no-color", "--sinfo", "/bin/sinfo", "load", "--best"]).unwrap();
        assert_eq!(config.report, Report::Load { best: true });
        assert_eq!(config.slurm.sinfo, "/bin/sinfo");
        assert_eq!(config.slurm.sacct, "sacct");
        assert!(!config.color);

        let config = parse_config(&["blame", "--days", "2"]).unwrap();
        match config.report {
            Report::Blame { days, window } => {
                assert_eq!(days, 2);
                assert_eq!(window.end, now());
                assert_eq!(
                    window.start,
                    Local.with_ymd_and_hms(2024, 5, 30, 8, 0, 0).unwrap()
                );
            }
            report => panic!("unexpected {:?}", report),
        }
    }

    #[test]
    fn test_config_without_command() {
        assert!(parse_config(&[]).is_err());
    }

    #[test]
    fn test_run_blame_without_jobs() {
        // `echo` prints its arguments as a single field, which is skipped
        let app = App::new(Config {
            slurm: Slurm {
                sinfo: "echo".into(),
                scontrol: "false".into(),
                sacct: "echo".into(),
            },
            report: Report::Blame {
                days: 7,
                window: TimeWindow::last_days(7, now()).unwrap(),
            },
            color: false,
        });

        let mut out = Vec::new();
        app.run(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Cluster usage in the last 7 days:\nCompute Time:\n"));
        assert!(out.contains("VRAM Time:"));
    }

    #[test]
    fn test_run_load_with_failing_source() {
        let app = App::new(Config {
            slurm: Slurm {
                sinfo: "echo".into(),
                scontrol: "false".into(),
                sacct: "false".into(),
            },
            report: Report::Load { best: false },
            color: false,
        });

        let mut out = Vec::new();
        let err = app.run(&mut out).unwrap_err();
        assert_eq!(err.to_string(), "failed to collect node loads");
        assert!(out.is_empty());
    }
}

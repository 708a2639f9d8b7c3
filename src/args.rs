use std::path::PathBuf;

use argh::FromArgs;
use log::LevelFilter;

/// Reports node availability and per-user resource usage for Slurm
#[derive(FromArgs, Debug)]
pub struct Args {
    /// location of `sinfo` executable
    #[argh(option, default = "\"sinfo\".to_string()")]
    pub sinfo: String,

    /// location of `scontrol` executable
    #[argh(option, default = "\"scontrol\".to_string()")]
    pub scontrol: String,

    /// location of `sacct` executable
    #[argh(option, default = "\"sacct\".to_string()")]
    pub sacct: String,

    /// disable colored output
    #[argh(switch)]
    pub no_color: bool,

    /// one of off, error, warn, info, debug, or trace
    #[argh(option, default = "LevelFilter::Warn")]
    pub log_level: LevelFilter,

    /// also write log messages to this file
    #[argh(option)]
    pub log_file: Option<PathBuf>,

    /// print version information
    #[argh(switch, short = 'v')]
    pub version: bool,

    #[argh(subcommand)]
    pub command: Option<Command>,
}

#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand)]
pub enum Command {
    Load(LoadArgs),
    Blame(BlameArgs),
}

/// Show free resources per node
#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand, name = "load")]
pub struct LoadArgs {
    /// show only the best node
    #[argh(switch)]
    pub best: bool,
}

/// Show resources used per user
#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand, name = "blame")]
pub struct BlameArgs {
    /// the number of days to look back
    #[argh(option, default = "7")]
    pub days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["slurmusage"], args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["load"]);
        assert_eq!(args.sinfo, "sinfo");
        assert_eq!(args.scontrol, "scontrol");
        assert_eq!(args.sacct, "sacct");
        assert_eq!(args.log_level, LevelFilter::Warn);
        assert_eq!(args.log_file, None);
        assert!(!args.no_color);
        assert_eq!(args.command, Some(Command::Load(LoadArgs { best: false })));

        let args = parse(&["blame"]);
        assert_eq!(args.command, Some(Command::Blame(BlameArgs { days: 7 })));
    }

    #[test]
    fn test_options() {
        let args = parse(&[
            "--sacct",
            "/opt/slurm/bin/sacct",
            "--log-level",
            "debug",
            "blame",
            "--days",
            "30",
        ]);
        assert_eq!(args.sacct, "/opt/slurm/bin/sacct");
        assert_eq!(args.log_level, LevelFilter::Debug);
        assert_eq!(args.command, Some(Command::Blame(BlameArgs { days: 30 })));

        let args = parse(&["load", "--best"]);
        assert_eq!(args.command, Some(Command::Load(LoadArgs { best: true })));
    }

    #[test]
    fn test_invalid() {
        assert!(Args::from_args(&["slurmusage"], &["blame", "--days", "-1"]).is_err());
        assert!(Args::from_args(&["slurmusage"], &["--log-level", "loud", "load"]).is_err());
    }
}

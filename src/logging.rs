use std::path::Path;

use color_eyre::{eyre::Context, Result};
use log::LevelFilter;

/// Sends log messages at or above `level` to stderr and, optionally, `file`
pub fn init(level: LevelFilter, file: Option<&Path>) -> Result<()> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Some(path) = file {
        let file = fern::log_file(path)
            .wrap_err_with(|| format!("failed to open log file {:?}", path))?;
        dispatch = dispatch.chain(file);
    }

    dispatch.apply().wrap_err("failed to initialize logging")
}

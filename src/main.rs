use std::io::{self, Write};

use chrono::Local;
use color_eyre::Result;

use slurmusage::app::{App, Config};
use slurmusage::args::Args;
use slurmusage::logging;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args: Args = argh::from_env();
    if args.version {
        println!("slurmusage v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    logging::init(args.log_level, args.log_file.as_deref())?;

    let config = Config::from_args(&args, Local::now())?;
    let app = App::new(config);

    let mut out = io::stdout().lock();
    app.run(&mut out)?;
    out.flush()?;

    Ok(())
}

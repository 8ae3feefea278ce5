//! CLI entrypoint for `attrctl`.

use std::io::Write;

use attrctl::cli::Args;
use attrctl::error::AttrctlError;
use clap::Parser;

fn main() -> Result<(), AttrctlError> {
    let args = Args::parse();
    attrctl::logging::init(args.verbose)?;
    tracing::debug!(manifest = %args.manifest, "starting attrctl");
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    attrctl::run(&args, &mut out)?;
    out.flush()?;
    Ok(())
}

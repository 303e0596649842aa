mod args;
mod survey;

use clap::Parser;
use log::{debug, LevelFilter};
use std::error::Error;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::builder().filter_level(LevelFilter::Debug).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
    debug!("args: {:?}", args);

    if let Err(e) = survey::run_projection(&args) {
        eprintln!("An error occured: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

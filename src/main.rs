#![doc = include_str!("../README.md")]

mod bill;
mod catalog;
mod cli;
mod core;
mod error;
mod prelude;
mod quantity;
mod tables;

use std::io;

use clap::{Parser, crate_version};

use crate::{cli::Args, prelude::*};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(io::stderr).init();
    info!(version = crate_version!(), "starting…");

    Args::parse().run()?;

    info!("done!");
    Ok(())
}

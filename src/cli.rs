mod batch;
mod burrow;
mod compare;

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use serde::Serialize;

pub use self::batch::Outcome;
use crate::{
    catalog::{Catalog, SharedCatalog},
    cli::{batch::BatchArgs, burrow::BurrowArgs, compare::CompareArgs},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub catalog: CatalogArgs,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn run(self) -> Result {
        match self.command {
            Command::Compare(args) => args.run(&self.catalog.load()),
            Command::Batch(args) => args.run(&self.catalog.share()),
            Command::Burrow(args) => args.run(&self.catalog.load()),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: compare the rate plans for a single bill.
    #[clap(name = "compare")]
    Compare(Box<CompareArgs>),

    /// Compare the rate plans for every bill record in the given files and directories.
    #[clap(name = "batch")]
    Batch(Box<BatchArgs>),

    /// Development tools.
    #[clap(name = "burrow")]
    Burrow(Box<BurrowArgs>),
}

#[derive(Parser)]
pub struct CatalogArgs {
    /// Tariff definition table, JSON or TOML. The built-in catalog is used when not set.
    #[clap(long = "catalog", env = "RATE_SCOUT_CATALOG", global = true)]
    pub path: Option<PathBuf>,
}

impl CatalogArgs {
    pub fn load(&self) -> Catalog {
        Catalog::load_or_builtin(self.path.as_deref())
    }

    pub fn share(&self) -> SharedCatalog {
        SharedCatalog::load_or_builtin(self.path.clone())
    }
}

#[instrument(skip_all, fields(path = %path.display()))]
fn write_json(path: &Path, value: &impl Serialize) -> Result {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).with_context(|| format!("failed to write `{}`", path.display()))?;
    debug!("written");
    Ok(())
}

use clap::{Parser, Subcommand};

use crate::{
    catalog::{Catalog, TariffKey},
    prelude::*,
    tables::build_catalog_table,
};

#[derive(Parser)]
pub struct BurrowArgs {
    #[command(subcommand)]
    command: BurrowCommand,
}

impl BurrowArgs {
    pub fn run(&self, catalog: &Catalog) -> Result {
        match &self.command {
            BurrowCommand::Catalog(args) => args.run(catalog),
            BurrowCommand::Resolve(args) => {
                args.run(catalog);
                Ok(())
            }
        }
    }
}

#[derive(Subcommand)]
enum BurrowCommand {
    /// Print the effective tariff catalog.
    Catalog(BurrowCatalogArgs),

    /// Resolve a tariff code against the catalog.
    Resolve(BurrowResolveArgs),
}

#[derive(Parser)]
struct BurrowCatalogArgs {
    /// Print the catalog in the JSON definition format, ready to be edited and loaded back.
    #[clap(long)]
    json: bool,
}

impl BurrowCatalogArgs {
    fn run(&self, catalog: &Catalog) -> Result {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&catalog.to_document())?);
        } else {
            info!(version = catalog.version().unwrap_or("unversioned"), "effective catalog");
            println!("{}", build_catalog_table(catalog));
        }
        Ok(())
    }
}

#[derive(Parser)]
struct BurrowResolveArgs {
    /// Tariff code, possibly corrupted.
    code: String,
}

impl BurrowResolveArgs {
    fn run(&self, catalog: &Catalog) {
        let resolution = catalog.resolve(&self.code);
        info!(
            key = %TariffKey::normalize(&self.code),
            kind = %resolution.kind,
            "resolved",
        );
        println!(
            "{} → {} ({}): {}",
            self.code, resolution.tariff.code, resolution.kind, resolution.tariff.description,
        );
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use itertools::Itertools;

use crate::{
    bill::BillRecord,
    catalog::{Catalog, SharedCatalog},
    cli::write_json,
    core::{Comparator, Comparison, UsageRecord},
    prelude::*,
    tables::build_batch_table,
};

const ANALYSIS_SUFFIX: &str = "_rate_analysis.json";

#[derive(Parser)]
pub struct BatchArgs {
    /// Bill record files, or directories containing them.
    #[clap(required = true)]
    paths: Vec<PathBuf>,

    /// Write `<bill>_rate_analysis.json` for every analysed bill into the directory.
    #[clap(long, env = "RATE_SCOUT_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
}

impl BatchArgs {
    #[instrument(skip_all)]
    pub fn run(&self, catalog: &SharedCatalog) -> Result {
        let bills = collect_bills(&self.paths)?;
        info!(n_bills = bills.len(), "collected the bill records");
        if let Some(output_dir) = &self.output_dir {
            fs::create_dir_all(output_dir)
                .with_context(|| format!("failed to create `{}`", output_dir.display()))?;
        }

        let outcomes = bills
            .into_iter()
            .map(|path| {
                catalog.reload_if_modified();
                let request = BillRequest::new(path, self.output_dir.as_deref());
                let result = request.analyze(&catalog.snapshot());
                if let Err(error) = &result {
                    error!(bill = %request.label, "failed to analyse: {error:#}");
                }
                Outcome { label: request.label, result }
            })
            .collect_vec();
        println!("{}", build_batch_table(&outcomes));

        let n_failed = outcomes.iter().filter(|outcome| outcome.result.is_err()).count();
        if n_failed == 0 {
            info!(n_bills = outcomes.len(), "all bills analysed");
        } else {
            warn!(n_bills = outcomes.len(), n_failed, "some bills could not be analysed");
        }
        Ok(())
    }
}

/// Analysis of a single bill.
pub struct Outcome {
    pub label: String,
    pub result: Result<Comparison>,
}

/// Per-bill request context.
struct BillRequest<'a> {
    label: String,
    path: PathBuf,
    output_dir: Option<&'a Path>,
}

impl<'a> BillRequest<'a> {
    fn new(path: PathBuf, output_dir: Option<&'a Path>) -> Self {
        let label = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        Self { label, path, output_dir }
    }

    #[instrument(skip_all, fields(bill = %self.label))]
    fn analyze(&self, catalog: &Catalog) -> Result<Comparison> {
        let usage = UsageRecord::try_from(BillRecord::from_path(&self.path)?)
            .context("unusable bill record")?;
        let comparison = Comparator::builder().catalog(catalog).usage(&usage).compare()?;
        info!(
            current = %comparison.current_plan.tariff_code,
            best = %comparison.best_plan.tariff_code,
            monthly_savings = %comparison.monthly_savings,
            "compared",
        );
        if let Some(output_dir) = self.output_dir {
            write_json(&output_dir.join(self.analysis_file_name()), &comparison)?;
        }
        Ok(comparison)
    }

    fn analysis_file_name(&self) -> String {
        let stem = self.path.file_stem().map_or_else(
            || self.label.clone(),
            |stem| stem.to_string_lossy().into_owned(),
        );
        format!("{stem}{ANALYSIS_SUFFIX}")
    }
}

/// Expand the directories into their JSON files sorted by name, skipping earlier analyses.
fn collect_bills(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut bills = Vec::new();
    for path in paths {
        if !path.is_dir() {
            bills.push(path.clone());
            continue;
        }
        let entries = fs::read_dir(path)
            .with_context(|| format!("failed to list `{}`", path.display()))?
            .map_ok(|entry| entry.path())
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("failed to list `{}`", path.display()))?;
        bills.extend(entries.into_iter().filter(|path| is_bill_record(path)).sorted());
    }
    Ok(bills)
}

fn is_bill_record(path: &Path) -> bool {
    path.is_file()
        && path.extension().is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
        && path
            .file_name()
            .is_some_and(|name| !name.to_string_lossy().ends_with(ANALYSIS_SUFFIX))
}

use std::path::PathBuf;

use clap::Parser;

use crate::{
    bill::BillRecord,
    catalog::Catalog,
    cli::write_json,
    core::{Comparator, UsageRecord},
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
    tables::{build_comparison_table, build_summary_table},
};

#[derive(Parser)]
pub struct CompareArgs {
    #[clap(flatten)]
    usage: UsageArgs,

    /// Print the comparison as JSON instead of the tables.
    #[clap(long)]
    json: bool,

    /// Also write the comparison JSON into the file.
    #[clap(long, env = "RATE_SCOUT_OUTPUT")]
    output: Option<PathBuf>,
}

impl CompareArgs {
    pub fn run(&self, catalog: &Catalog) -> Result {
        let usage = self.usage.to_record()?;
        let comparison = Comparator::builder().catalog(catalog).usage(&usage).compare()?;
        info!(
            current = %comparison.current_plan.tariff_code,
            best = %comparison.best_plan.tariff_code,
            monthly_savings = %comparison.monthly_savings,
            "compared",
        );
        if let Some(path) = &self.output {
            write_json(path, &comparison)?;
        }
        if self.json {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        } else {
            println!("{}", build_comparison_table(&comparison));
            println!("{}", build_summary_table(&comparison));
        }
        Ok(())
    }
}

/// Usage either from a bill record, or given explicitly.
#[derive(Parser)]
struct UsageArgs {
    /// Bill record JSON produced by the extraction pipeline.
    #[clap(long, conflicts_with_all = ["peak_usage", "off_peak_usage", "tariff"])]
    bill: Option<PathBuf>,

    /// Peak usage in kilowatt-hours.
    #[clap(long = "peak-kwh", required_unless_present = "bill")]
    peak_usage: Option<KilowattHours>,

    /// Off-peak usage in kilowatt-hours.
    #[clap(long = "off-peak-kwh", required_unless_present = "bill")]
    off_peak_usage: Option<KilowattHours>,

    /// Tariff code as printed on the bill.
    #[clap(long)]
    tariff: Option<String>,

    /// Total charge as printed on the bill, for cross-checking only.
    #[clap(long = "observed-total", conflicts_with = "bill")]
    observed_total_charge: Option<Cost>,

    #[clap(long, conflicts_with = "bill")]
    billing_days: Option<u32>,
}

impl UsageArgs {
    fn to_record(&self) -> Result<UsageRecord> {
        if let Some(path) = &self.bill {
            return UsageRecord::try_from(BillRecord::from_path(path)?)
                .with_context(|| format!("unusable bill record `{}`", path.display()));
        }
        let (Some(peak_usage), Some(off_peak_usage)) = (self.peak_usage, self.off_peak_usage)
        else {
            bail!("either `--bill` or both `--peak-kwh` and `--off-peak-kwh` are required");
        };
        Ok(UsageRecord::builder()
            .peak_usage(peak_usage)
            .off_peak_usage(off_peak_usage)
            .declared_tariff_code(self.tariff.clone().unwrap_or_default())
            .maybe_observed_total_charge(self.observed_total_charge)
            .maybe_billing_days(self.billing_days)
            .build())
    }
}

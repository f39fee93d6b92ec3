use bon::Builder;
use itertools::Itertools;

use crate::{
    catalog::Catalog,
    core::{ChargeCheck, Comparison, PlanCost, UsageRecord},
    error::CompareError,
    prelude::*,
    quantity::cost::Cost,
};

/// Prices the usage under every canonical tariff of the catalog.
#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Comparator<'a> {
    catalog: &'a Catalog,
    usage: &'a UsageRecord,
}

impl<S: comparator_builder::IsComplete> ComparatorBuilder<'_, S> {
    pub fn compare(self) -> Result<Comparison, CompareError> {
        self.build().compare()
    }
}

impl Comparator<'_> {
    #[instrument(skip_all, fields(declared = %self.usage.declared_tariff_code))]
    fn compare(self) -> Result<Comparison, CompareError> {
        self.usage.validate()?;

        let all_plans: Vec<PlanCost> = self
            .catalog
            .canonical()
            .map(|tariff| PlanCost::new(tariff, self.usage))
            .sorted_by(|lhs, rhs| {
                lhs.rounded_total()
                    .cmp(&rhs.rounded_total())
                    .then_with(|| lhs.tariff_code.cmp(&rhs.tariff_code))
            })
            .collect();
        let Some(best_plan) = all_plans.first().cloned() else {
            return Err(CompareError::EmptyCatalog);
        };

        let resolution = self.catalog.resolve(&self.usage.declared_tariff_code);
        let matched_plan = if resolution.is_unknown() {
            None
        } else {
            all_plans.iter().find(|plan| plan.tariff_code == resolution.tariff.code)
        };
        let current_plan_is_assumed = matched_plan.is_none();
        let current_plan = matched_plan.cloned().unwrap_or_else(|| best_plan.clone());
        debug!(
            current = %current_plan.tariff_code,
            kind = ?resolution.kind,
            best = %best_plan.tariff_code,
            "resolved the current plan",
        );

        let monthly_savings = (current_plan.rounded_total() - best_plan.rounded_total())
            .max(Cost::ZERO)
            .round_to_cents();
        let charge_check = self
            .usage
            .observed_total_charge
            .map(|observed| ChargeCheck::new(observed, current_plan.total_cost));

        Ok(Comparison {
            declared_tariff_code: self.usage.declared_tariff_code.clone(),
            current_plan_is_assumed,
            current_plan_match: resolution.kind,
            monthly_savings,
            yearly_savings: monthly_savings * 12.0,
            charge_check,
            average_daily_usage: self.usage.average_daily_usage(),
            current_plan,
            best_plan,
            all_plans,
        })
    }
}

use serde::Serialize;

use crate::{
    catalog::MatchKind,
    core::PlanCost,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// Ranked cost comparison of every canonical tariff for one usage record.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub declared_tariff_code: String,
    pub current_plan: PlanCost,

    /// The declared code matched nothing, and the cheapest plan is assumed to be the current one.
    pub current_plan_is_assumed: bool,

    pub current_plan_match: MatchKind,
    pub best_plan: PlanCost,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub monthly_savings: Cost,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub yearly_savings: Cost,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_check: Option<ChargeCheck>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_daily_usage: Option<KilowattHours>,

    /// Ascending by the total cost.
    pub all_plans: Vec<PlanCost>,
}

impl Comparison {
    pub fn is_switch_recommended(&self) -> bool {
        self.monthly_savings > Cost::ZERO
    }
}

/// Observed bill total against the computed cost of the current plan.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct ChargeCheck {
    #[serde(serialize_with = "Cost::serialize_cents")]
    pub observed: Cost,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub computed: Cost,

    /// Observed minus computed.
    #[serde(serialize_with = "Cost::serialize_cents")]
    pub difference: Cost,
}

impl ChargeCheck {
    pub fn new(observed: Cost, computed: Cost) -> Self {
        Self { observed, computed, difference: observed - computed }
    }
}

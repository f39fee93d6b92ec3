use serde::Serialize;

use crate::{
    catalog::TariffDefinition,
    core::UsageRecord,
    quantity::{cost::Cost, rate::KilowattHourRate},
};

/// Cost of the usage under a single canonical tariff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCost {
    pub tariff_code: String,
    pub description: String,
    pub peak_rate: KilowattHourRate,
    pub off_peak_rate: KilowattHourRate,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub peak_cost: Cost,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub off_peak_cost: Cost,

    #[serde(serialize_with = "Cost::serialize_cents")]
    pub total_cost: Cost,
}

impl PlanCost {
    pub fn new(tariff: &TariffDefinition, usage: &UsageRecord) -> Self {
        let peak_cost = usage.peak_usage * tariff.peak_rate;
        let off_peak_cost = usage.off_peak_usage * tariff.off_peak_rate;
        Self {
            tariff_code: tariff.code.clone(),
            description: tariff.description.clone(),
            peak_rate: tariff.peak_rate,
            off_peak_rate: tariff.off_peak_rate,
            peak_cost,
            off_peak_cost,
            total_cost: peak_cost + off_peak_cost,
        }
    }

    /// Total cost as it is displayed, used for ranking and savings.
    pub fn rounded_total(&self) -> Cost {
        self.total_cost.round_to_cents()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_new() {
        let tariff = TariffDefinition::builder()
            .code("E-TOU-B")
            .description("Time-of-Use (4-9pm Peak)")
            .peak_rate(0.42)
            .off_peak_rate(0.33)
            .build();
        let usage = UsageRecord::builder().peak_usage(70.616).off_peak_usage(559.264).build();
        let plan = PlanCost::new(&tariff, &usage);
        assert_abs_diff_eq!(plan.peak_cost.0.0, 29.658_72, epsilon = 1e-9);
        assert_abs_diff_eq!(plan.off_peak_cost.0.0, 184.557_12, epsilon = 1e-9);
        assert_abs_diff_eq!(plan.total_cost.0.0, 214.215_84, epsilon = 1e-9);
        assert_abs_diff_eq!(plan.rounded_total().0.0, 214.22);
    }

    #[test]
    fn test_serialize() -> serde_json::Result<()> {
        let tariff =
            TariffDefinition::builder().code("E-1").peak_rate(0.31).off_peak_rate(0.31).build();
        let usage = UsageRecord::builder().peak_usage(70.616).off_peak_usage(559.264).build();
        let value = serde_json::to_value(PlanCost::new(&tariff, &usage))?;
        assert_eq!(value["tariffCode"], "E-1");
        assert_eq!(value["peakRate"], 0.31);
        assert_eq!(value["totalCost"], 195.26);
        Ok(())
    }
}

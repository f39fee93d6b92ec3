use bon::Builder;

use crate::{
    error::InvalidUsageError,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// Normalized billing data handed over by the extraction pipeline.
#[derive(Clone, Debug, Builder)]
pub struct UsageRecord {
    #[builder(into)]
    pub peak_usage: KilowattHours,

    #[builder(into)]
    pub off_peak_usage: KilowattHours,

    /// Tariff code as printed on the bill, possibly corrupted or an alias.
    #[builder(into, default)]
    pub declared_tariff_code: String,

    /// Total charge printed on the bill, never used for ranking.
    #[builder(into)]
    pub observed_total_charge: Option<Cost>,

    pub billing_days: Option<u32>,
}

impl UsageRecord {
    pub fn validate(&self) -> Result<(), InvalidUsageError> {
        let fields = [("peakUsageKWh", self.peak_usage), ("offPeakUsageKWh", self.off_peak_usage)];
        for (field, usage) in fields {
            if !usage.is_finite() {
                return Err(InvalidUsageError::NotFinite { field });
            }
            if usage.is_negative() {
                return Err(InvalidUsageError::Negative { field, value: usage.0.0 });
            }
        }
        Ok(())
    }

    pub fn total_usage(&self) -> KilowattHours {
        self.peak_usage + self.off_peak_usage
    }

    /// Average usage per day of the billing period, if the period is known and non-empty.
    pub fn average_daily_usage(&self) -> Option<KilowattHours> {
        self.billing_days
            .filter(|billing_days| *billing_days != 0)
            .map(|billing_days| self.total_usage() / f64::from(billing_days))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn usage(peak: f64, off_peak: f64) -> UsageRecord {
        UsageRecord::builder().peak_usage(peak).off_peak_usage(off_peak).build()
    }

    #[test]
    fn test_validate_ok() {
        assert_eq!(usage(0.0, 0.0).validate(), Ok(()));
        assert_eq!(usage(70.616, 559.264).validate(), Ok(()));
    }

    #[test]
    fn test_validate_negative() {
        assert_eq!(
            usage(-1.0, 10.0).validate(),
            Err(InvalidUsageError::Negative { field: "peakUsageKWh", value: -1.0 }),
        );
        assert_eq!(
            usage(1.0, -0.5).validate(),
            Err(InvalidUsageError::Negative { field: "offPeakUsageKWh", value: -0.5 }),
        );
    }

    #[test]
    fn test_validate_not_finite() {
        assert_eq!(
            usage(f64::NAN, 1.0).validate(),
            Err(InvalidUsageError::NotFinite { field: "peakUsageKWh" }),
        );
        assert_eq!(
            usage(1.0, f64::NEG_INFINITY).validate(),
            Err(InvalidUsageError::NotFinite { field: "offPeakUsageKWh" }),
        );
    }

    #[test]
    fn test_average_daily_usage() {
        let mut usage = usage(70.616, 559.264);
        assert_eq!(usage.average_daily_usage(), None);

        usage.billing_days = Some(0);
        assert_eq!(usage.average_daily_usage(), None);

        usage.billing_days = Some(30);
        assert_abs_diff_eq!(usage.average_daily_usage().unwrap().0.0, 20.996, epsilon = 1e-9);
    }
}

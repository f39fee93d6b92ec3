use std::{fs, path::Path};

use serde::Deserialize;

use crate::{core::UsageRecord, error::InvalidUsageError, prelude::*};

/// Bill fields as extracted from a scanned bill.
///
/// Extraction is loose: numbers may come as strings with currency symbols, thousands
/// separators and units, and any field may be absent or `null` when it has not been determined.
#[derive(Debug, Default, Deserialize)]
pub struct BillRecord {
    #[serde(default, rename = "peakUsageKWh", alias = "PeakUsage", alias = "peakUsage")]
    pub peak_usage: Option<Decimal>,

    #[serde(default, rename = "offPeakUsageKWh", alias = "OffPeakUsage", alias = "offPeakUsage")]
    pub off_peak_usage: Option<Decimal>,

    /// Tariff code as is, taken over the rate schedule when both are present.
    #[serde(default, rename = "declaredTariffCode")]
    pub declared_tariff_code: Option<String>,

    #[serde(default, rename = "RateSchedule", alias = "rateSchedule", alias = "ratePlan")]
    pub rate_schedule: Option<RateSchedule>,

    #[serde(
        default,
        rename = "observedTotalCharge",
        alias = "TotalCharge",
        alias = "totalCharge",
        alias = "AmountDue",
        alias = "amountDue",
        alias = "TotalAmountDue",
        alias = "totalAmountDue"
    )]
    pub total_charge: Option<Decimal>,

    #[serde(default, rename = "billingDays", alias = "BillingDays")]
    pub billing_days: Option<Decimal>,
}

impl BillRecord {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read the bill record `{}`", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("malformed bill record `{}`", path.display()))
    }

    /// Explicit tariff code, or else the first word of the rate schedule, for example
    /// `E-TOU-B` in `E-TOU-B Time of Use`.
    pub fn declared_tariff_code(&self) -> &str {
        if let Some(code) = &self.declared_tariff_code {
            return code;
        }
        self.rate_schedule
            .as_ref()
            .and_then(RateSchedule::text)
            .and_then(|text| text.split_whitespace().next())
            .unwrap_or_default()
    }
}

impl TryFrom<BillRecord> for UsageRecord {
    type Error = InvalidUsageError;

    fn try_from(bill: BillRecord) -> Result<Self, Self::Error> {
        let peak_usage = bill
            .peak_usage
            .as_ref()
            .and_then(Decimal::value)
            .ok_or(InvalidUsageError::Missing { field: "peakUsageKWh" })?;
        let off_peak_usage = bill
            .off_peak_usage
            .as_ref()
            .and_then(Decimal::value)
            .ok_or(InvalidUsageError::Missing { field: "offPeakUsageKWh" })?;
        let billing_days = bill.billing_days.as_ref().and_then(Decimal::value).and_then(to_days);
        Ok(Self::builder()
            .peak_usage(peak_usage)
            .off_peak_usage(off_peak_usage)
            .declared_tariff_code(bill.declared_tariff_code())
            .maybe_observed_total_charge(bill.total_charge.as_ref().and_then(Decimal::value))
            .maybe_billing_days(billing_days)
            .build())
    }
}

/// Number as written by the extractor.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Decimal {
    Number(f64),
    Text(String),
}

impl Decimal {
    /// Finite value, or [`None`] when the text is not a number.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => parse_decimal(text),
        };
        value.filter(|value| value.is_finite())
    }
}

/// Rate schedule is either a plain string or an object with the code.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RateSchedule {
    Text(String),
    Object {
        #[serde(default, rename = "Code", alias = "code")]
        code: Option<String>,
    },
}

impl RateSchedule {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Object { code } => code.as_deref(),
        }
    }
}

/// Parse the leading number, ignoring currency symbols, thousands separators and units.
fn parse_decimal(text: &str) -> Option<f64> {
    let text: String = text.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    let number = text
        .trim()
        .split(|c: char| c.is_whitespace() || c.is_alphabetic() || c == '/')
        .next()?;
    number.parse().ok()
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_days(value: f64) -> Option<u32> {
    (value >= 0.0 && value <= f64::from(u32::MAX)).then(|| value.round() as u32)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        catalog::{Catalog, MatchKind},
        core::Comparator,
        quantity::{cost::Cost, energy::KilowattHours},
    };

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("$1,234.56"), Some(1234.56));
        assert_eq!(parse_decimal("70.616 kWh"), Some(70.616));
        assert_eq!(parse_decimal("559.264kWh"), Some(559.264));
        assert_eq!(parse_decimal(" 31 "), Some(31.0));
        assert_eq!(parse_decimal("0.42/kWh"), Some(0.42));
        assert_eq!(parse_decimal("N/A"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn test_extractor_record() -> Result {
        let bill: BillRecord = serde_json::from_str(
            r#"{
                "AccountNumber": "1234567890-1",
                "RateSchedule": {"Code": "ETOIJ3 Time of Use", "Description": "Residential"},
                "BillingDays": "30",
                "PeakUsage": "70.616 kWh",
                "OffPeakUsage": 559.264,
                "TotalAmountDue": "$439.51"
            }"#,
        )?;
        assert_eq!(bill.declared_tariff_code(), "ETOIJ3");

        let usage = UsageRecord::try_from(bill)?;
        assert_eq!(usage.peak_usage, KilowattHours::from(70.616));
        assert_eq!(usage.off_peak_usage, KilowattHours::from(559.264));
        assert_eq!(usage.declared_tariff_code, "ETOIJ3");
        assert_eq!(usage.observed_total_charge, Some(Cost::from(439.51)));
        assert_eq!(usage.billing_days, Some(30));
        Ok(())
    }

    #[test]
    fn test_camel_case_record() -> Result {
        let bill: BillRecord = serde_json::from_str(
            r#"{"peakUsage": 70.616, "offPeakUsage": "559.264", "ratePlan": "E-TOU-B", "totalCharge": null}"#,
        )?;
        let usage = UsageRecord::try_from(bill)?;
        assert_abs_diff_eq!(usage.total_usage().0.0, 629.88, epsilon = 1e-9);
        assert_eq!(usage.declared_tariff_code, "E-TOU-B");
        assert_eq!(usage.observed_total_charge, None);
        assert_eq!(usage.billing_days, None);
        Ok(())
    }

    #[test]
    fn test_declared_code_kept_whole() -> Result {
        let bill: BillRecord = serde_json::from_str(
            r#"{"peakUsageKWh": 70.616, "offPeakUsageKWh": 559.264, "declaredTariffCode": "E TOU B"}"#,
        )?;
        assert_eq!(bill.declared_tariff_code(), "E TOU B");

        let usage = UsageRecord::try_from(bill)?;
        let catalog = Catalog::builtin();
        let comparison = Comparator::builder().catalog(&catalog).usage(&usage).compare()?;
        assert_eq!(comparison.current_plan.tariff_code, "E-TOU-B");
        assert_eq!(comparison.current_plan_match, MatchKind::Exact);
        assert!(!comparison.current_plan_is_assumed);
        Ok(())
    }

    #[test]
    fn test_declared_code_takes_precedence() -> Result {
        let bill: BillRecord = serde_json::from_str(
            r#"{"RateSchedule": "EV2-A Time of Use", "declaredTariffCode": "E-TOU-D"}"#,
        )?;
        assert_eq!(bill.declared_tariff_code(), "E-TOU-D");
        let bill: BillRecord = serde_json::from_str(r#"{"ratePlan": "EV2-A Time of Use"}"#)?;
        assert_eq!(bill.declared_tariff_code(), "EV2-A");
        Ok(())
    }

    #[test]
    fn test_missing_rate_schedule() -> Result {
        let bill: BillRecord = serde_json::from_str(r#"{"PeakUsage": 1, "OffPeakUsage": 2}"#)?;
        assert_eq!(bill.declared_tariff_code(), "");
        let bill: BillRecord =
            serde_json::from_str(r#"{"RateSchedule": {"Description": "Residential"}}"#)?;
        assert_eq!(bill.declared_tariff_code(), "");
        Ok(())
    }

    #[test]
    fn test_missing_usage_rejected() -> Result {
        let bill: BillRecord = serde_json::from_str(r#"{"OffPeakUsage": 559.264}"#)?;
        assert_eq!(
            UsageRecord::try_from(bill).unwrap_err(),
            InvalidUsageError::Missing { field: "peakUsageKWh" },
        );

        let bill: BillRecord =
            serde_json::from_str(r#"{"PeakUsage": 70.616, "OffPeakUsage": "not determined"}"#)?;
        assert_eq!(
            UsageRecord::try_from(bill).unwrap_err(),
            InvalidUsageError::Missing { field: "offPeakUsageKWh" },
        );
        Ok(())
    }

    #[test]
    fn test_negative_usage_kept_for_validation() -> Result {
        let bill: BillRecord =
            serde_json::from_str(r#"{"PeakUsage": "-1", "OffPeakUsage": "10"}"#)?;
        let usage = UsageRecord::try_from(bill)?;
        assert!(usage.validate().is_err());
        Ok(())
    }
}

use crate::catalog::{Catalog, TariffDefinition};

impl Catalog {
    /// Small catalog of residential electric rate plans.
    ///
    /// Used whenever the definition table is not configured or cannot be loaded.
    pub fn builtin() -> Self {
        let tariffs = vec![
            canonical("E-1", "Flat Rate (Tiered Pricing)", 0.31, 0.31),
            canonical("E-TOU-B", "Time-of-Use (4-9pm Peak)", 0.42, 0.33),
            canonical("E-TOU-C", "Time-of-Use (4-9pm Peak)", 0.42, 0.33),
            canonical("E-TOU-D", "Time-of-Use (3-8pm Peak)", 0.40, 0.32),
            canonical("EV2-A", "Time-of-Use (EV Owners)", 0.35, 0.27),
            TariffDefinition::builder()
                .code("ETOIJ3")
                .description("Common OCR misread of E-TOU-B")
                .alias_of("E-TOU-B")
                .build(),
        ];
        let index = tariffs.iter().enumerate().map(|(i, tariff)| (tariff.key(), i)).collect();
        Self { version: Some(String::from("builtin")), tariffs, index }
    }
}

fn canonical(
    code: &str,
    description: &str,
    peak_rate: f64,
    off_peak_rate: f64,
) -> TariffDefinition {
    TariffDefinition::builder()
        .code(code)
        .description(description)
        .peak_rate(peak_rate)
        .off_peak_rate(off_peak_rate)
        .build()
}

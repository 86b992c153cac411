use serde::{Deserialize, Serialize};

use crate::{
    core::classification::{DangerWindow, Thresholds},
    prelude::*,
    quantity::{
        money::{Kronor, KronorPerKilowatt},
        price::OrePerKilowattHour,
    },
};

/// Whether a configured amount already contains VAT.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatTreatment {
    Included,
    Excluded,
}

/// VAT rate as a fraction, for example `0.25` for Swedish 25 % moms.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(transparent)]
pub struct VatRate(pub f64);

impl VatRate {
    #[must_use]
    pub fn multiplier(self) -> f64 {
        1.0 + self.0
    }

    /// Add VAT to the amount, or pass it through when it already contains VAT.
    pub fn apply<T: std::ops::Mul<f64, Output = T>>(self, amount: T, treatment: VatTreatment) -> T {
        match treatment {
            VatTreatment::Included => amount,
            VatTreatment::Excluded => amount * self.multiplier(),
        }
    }
}

/// Per-kilowatt-hour fee.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fee {
    #[serde(rename = "ore_per_kwh")]
    pub amount: OrePerKilowattHour,

    pub vat: VatTreatment,
}

impl Fee {
    pub const fn new(amount: OrePerKilowattHour, vat: VatTreatment) -> Self {
        Self { amount, vat }
    }
}

/// Named monthly subscription fee, like the grid connection fee or a retailer service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedFee {
    pub name: String,
    pub kronor: Kronor,
    pub vat: VatTreatment,
}

/// Household contract: everything needed to turn a spot price into what the household pays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, bon::Builder)]
#[serde(deny_unknown_fields)]
pub struct Tariff {
    pub vat_rate: VatRate,

    /// Grid operator's distribution charge («överföringsavgift»).
    pub transfer_fee: Fee,

    /// Energy tax («energiskatt»).
    pub energy_tax: Fee,

    /// Retailer's margin on top of the spot price («påslag»).
    pub markup: Fee,

    #[serde(default)]
    #[builder(default)]
    pub fixed_fees: Vec<FixedFee>,

    /// Peak-demand fee («effektavgift»).
    #[serde(default, rename = "peak_fee_kronor_per_kw")]
    pub peak_fee: Option<KronorPerKilowatt>,

    #[serde(default)]
    #[builder(default)]
    pub price_thresholds: Thresholds,

    #[serde(default)]
    #[builder(default)]
    pub danger_window: DangerWindow,
}

impl Tariff {
    /// All-in consumer price for the spot price.
    pub fn total_price(&self, spot_price: OrePerKilowattHour) -> OrePerKilowattHour {
        self.electricity_price(spot_price) + self.grid_price()
    }

    /// Retailer side: spot price with VAT plus the markup.
    pub fn electricity_price(&self, spot_price: OrePerKilowattHour) -> OrePerKilowattHour {
        self.vat_rate.apply(spot_price, VatTreatment::Excluded)
            + self.vat_rate.apply(self.markup.amount, self.markup.vat)
    }

    /// Grid side: transfer fee and energy tax, independent of the spot price.
    pub fn grid_price(&self) -> OrePerKilowattHour {
        self.vat_rate.apply(self.transfer_fee.amount, self.transfer_fee.vat)
            + self.vat_rate.apply(self.energy_tax.amount, self.energy_tax.vat)
    }

    /// Sum of the monthly fixed fees with VAT, skipping the excluded ones.
    pub fn fixed_fees_total(&self, excluded: &[String]) -> Kronor {
        self.fixed_fees
            .iter()
            .filter(|fee| !excluded.contains(&fee.name))
            .map(|fee| self.vat_rate.apply(fee.kronor, fee.vat))
            .sum()
    }

    pub fn validate(&self) -> Result {
        ensure!(
            self.vat_rate.0.is_finite() && (0.0..=1.0).contains(&self.vat_rate.0),
            "VAT rate must be a fraction within 0..=1, got {}",
            self.vat_rate.0,
        );
        for (name, fee) in
            [("transfer fee", self.transfer_fee), ("energy tax", self.energy_tax), ("markup", self.markup)]
        {
            ensure!(fee.amount.is_finite(), "{name} must be a finite number");
        }
        for fee in &self.fixed_fees {
            ensure!(fee.kronor.is_finite(), "fixed fee `{}` must be a finite number", fee.name);
        }
        if let Some(peak_fee) = self.peak_fee {
            ensure!(
                peak_fee.is_finite() && peak_fee >= KronorPerKilowatt::ZERO,
                "peak fee must be a non-negative number",
            );
        }
        self.price_thresholds.validate().context("invalid price thresholds")?;
        self.danger_window.validate().context("invalid danger window")?;
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    /// Ellevio transfer fee without VAT, energy tax and markup with VAT.
    pub fn ellevio_tariff() -> Tariff {
        Tariff::builder()
            .vat_rate(VatRate(0.25))
            .transfer_fee(Fee::new(OrePerKilowattHour(6.25), VatTreatment::Excluded))
            .energy_tax(Fee::new(OrePerKilowattHour(54.88), VatTreatment::Included))
            .markup(Fee::new(OrePerKilowattHour(17.5), VatTreatment::Included))
            .fixed_fees(vec![
                FixedFee {
                    name: "grid".to_string(),
                    kronor: Kronor(365.0),
                    vat: VatTreatment::Included,
                },
                FixedFee {
                    name: "priskollen".to_string(),
                    kronor: Kronor(39.2),
                    vat: VatTreatment::Excluded,
                },
            ])
            .peak_fee(KronorPerKilowatt(81.25))
            .build()
    }

    #[test]
    fn test_total_price_at_zero_spot_is_the_floor() {
        let total = ellevio_tariff().total_price(OrePerKilowattHour::ZERO);
        assert_abs_diff_eq!(total.0, 17.5 + 6.25 * 1.25 + 54.88, epsilon = 1e-9);
        assert_abs_diff_eq!(total.round_to(2).0, 80.19);
    }

    #[test]
    fn test_total_price() {
        let total = ellevio_tariff().total_price(OrePerKilowattHour(100.0));
        assert_abs_diff_eq!(total.0, 205.1925, epsilon = 1e-9);
        assert_abs_diff_eq!(total.round_to(2).0, 205.19);
    }

    #[test]
    fn test_negative_spot_price_passes_through() {
        let tariff = ellevio_tariff();
        let total = tariff.total_price(OrePerKilowattHour(-20.0));
        assert_abs_diff_eq!(total.0, -25.0 + 80.1925, epsilon = 1e-9);
    }

    #[test]
    fn test_monotonic() {
        let tariff = ellevio_tariff();
        let mut previous = tariff.total_price(OrePerKilowattHour(-500.0));
        for step in -499..=1500 {
            let total = tariff.total_price(OrePerKilowattHour(f64::from(step)));
            assert!(total >= previous, "{total:?} < {previous:?} at {step}");
            previous = total;
        }
    }

    #[test]
    fn test_deterministic() {
        let tariff = ellevio_tariff();
        let spot_price = OrePerKilowattHour(123.456);
        assert_eq!(
            tariff.total_price(spot_price).0.to_bits(),
            tariff.total_price(spot_price).0.to_bits(),
        );
    }

    #[test]
    fn test_vat_treatment_changes_by_the_vat_amount() {
        let mut tariff = ellevio_tariff();
        let included = tariff.total_price(OrePerKilowattHour(50.0));
        tariff.energy_tax.vat = VatTreatment::Excluded;
        let excluded = tariff.total_price(OrePerKilowattHour(50.0));
        assert_abs_diff_eq!((excluded - included).0, 54.88 * 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_excluded_markup_gets_vat() {
        let mut tariff = ellevio_tariff();
        tariff.markup = Fee::new(OrePerKilowattHour(3.9), VatTreatment::Excluded);
        assert_abs_diff_eq!(tariff.electricity_price(OrePerKilowattHour(100.0)).0, 129.875, epsilon = 1e-9);
    }

    #[test]
    fn test_grid_price() {
        assert_abs_diff_eq!(ellevio_tariff().grid_price().0, 62.6925, epsilon = 1e-9);
    }

    #[test]
    fn test_fixed_fees_total() {
        let tariff = ellevio_tariff();
        assert_abs_diff_eq!(tariff.fixed_fees_total(&[]).0, 365.0 + 49.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tariff.fixed_fees_total(&["priskollen".to_string()]).0, 365.0);
    }

    #[test]
    fn test_validate_ok() -> Result {
        ellevio_tariff().validate()
    }

    #[test]
    fn test_validate_rejects_percent_vat() {
        let mut tariff = ellevio_tariff();
        tariff.vat_rate = VatRate(25.0);
        assert!(tariff.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_not_finite_fee() {
        let mut tariff = ellevio_tariff();
        tariff.transfer_fee.amount = OrePerKilowattHour(f64::INFINITY);
        assert!(tariff.validate().is_err());
    }
}

use crate::quantity::{power::Kilowatts, time::Hours};

quantity!(KilowattHours, suffix: "kWh", precision: 1);

implement_mul!(Kilowatts, Hours, KilowattHours);

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_power_times_hours() {
        assert_abs_diff_eq!((Kilowatts(1.2) * Hours(1.5)).0, 1.8, epsilon = 1e-9);
        assert_abs_diff_eq!((Hours(2.0) * Kilowatts(6.0)).0, 12.0);
    }
}

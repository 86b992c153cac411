use crate::quantity::power::Kilowatts;

quantity!(
    /// Swedish krona.
    Kronor, suffix: "kr", precision: 2
);

quantity!(
    /// Monthly peak-demand fee per kilowatt of the highest recorded demand.
    KronorPerKilowatt, suffix: "kr/kW", precision: 2
);

implement_mul!(Kilowatts, KronorPerKilowatt, Kronor);

pub mod appliance;
pub mod bill;
pub mod classification;
pub mod interval;
pub mod row;
pub mod spot;
pub mod tariff;

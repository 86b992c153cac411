#[macro_use]
mod macros;

pub mod energy;
pub mod money;
pub mod power;
pub mod price;
pub mod time;

pub mod elprisetjustnu;
mod source;

pub use self::source::{FetchError, PriceSource, Upcoming};

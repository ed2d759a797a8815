pub mod crypto_prices;

pub use crypto_prices::PriceObservation;

pub mod coingecko;
pub mod exchangerate_api;
pub mod frankfurter;
pub mod util;

pub use coingecko::CoinGeckoProvider;
pub use exchangerate_api::ExchangeRateApiProvider;
pub use frankfurter::FrankfurterProvider;

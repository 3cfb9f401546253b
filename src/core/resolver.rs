//! Cross-rate computation over a single snapshot.

use super::currency::{Currency, CurrencyKind};
use super::error::RateError;
use super::snapshot::RateSnapshot;

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// How many units of `to` one unit of `from` buys, bridging through the base
/// fiat currency. Identical codes always give `1.0`.
///
/// Fails with [`RateError::InsufficientData`] when a required rate or price is
/// absent, zero, negative, or not finite.
pub fn cross_rate(
    from: &Currency,
    to: &Currency,
    snapshot: &RateSnapshot,
) -> Result<f64, RateError> {
    if from == to {
        return Ok(1.0);
    }

    let fiat = |c: &Currency| positive(snapshot.fiat_rate(c.code()));
    let crypto = |c: &Currency| positive(snapshot.crypto_price(c.code()));

    let rate = match (from.kind(), to.kind()) {
        (CurrencyKind::Fiat, CurrencyKind::Fiat) => fiat(from).zip(fiat(to)).map(|(a, b)| b / a),
        (CurrencyKind::Crypto, CurrencyKind::Fiat) => {
            crypto(from).zip(fiat(to)).map(|(p, b)| p * b)
        }
        (CurrencyKind::Fiat, CurrencyKind::Crypto) => {
            fiat(from).zip(crypto(to)).map(|(a, p)| 1.0 / (a * p))
        }
        (CurrencyKind::Crypto, CurrencyKind::Crypto) => {
            crypto(from).zip(crypto(to)).map(|(pf, pt)| pf / pt)
        }
    };

    rate.filter(|r| r.is_finite() && *r > 0.0)
        .ok_or_else(|| RateError::InsufficientData {
            from: from.code().to_string(),
            to: to.code().to_string(),
        })
}

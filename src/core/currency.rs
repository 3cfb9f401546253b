//! Supported currency codes and their classification.

use super::error::RateError;
use anyhow::{Result, bail};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyKind {
    Fiat,
    Crypto,
}

/// A code known to belong to the supported set. Only obtainable through
/// [`SupportedSet::lookup`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency {
    code: String,
    kind: CurrencyKind,
}

impl Currency {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> CurrencyKind {
        self.kind
    }

    pub fn is_fiat(&self) -> bool {
        self.kind == CurrencyKind::Fiat
    }

    pub fn is_crypto(&self) -> bool {
        self.kind == CurrencyKind::Crypto
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

/// Two disjoint code lists plus the base fiat every rate is expressed against.
#[derive(Debug, Clone)]
pub struct SupportedSet {
    base: String,
    fiat: BTreeSet<String>,
    // crypto code -> provider id
    crypto: BTreeMap<String, String>,
}

impl SupportedSet {
    pub fn new(
        base: &str,
        fiat: impl IntoIterator<Item = impl AsRef<str>>,
        crypto: impl IntoIterator<Item = (impl AsRef<str>, impl AsRef<str>)>,
    ) -> Result<Self> {
        let base = base.trim().to_uppercase();
        let fiat: BTreeSet<String> = fiat
            .into_iter()
            .map(|c| c.as_ref().trim().to_uppercase())
            .collect();
        let crypto: BTreeMap<String, String> = crypto
            .into_iter()
            .map(|(c, id)| (c.as_ref().trim().to_uppercase(), id.as_ref().to_string()))
            .collect();

        if !fiat.contains(&base) {
            bail!("Base currency {base} must be one of the fiat currencies");
        }
        if let Some(both) = crypto.keys().find(|c| fiat.contains(*c)) {
            bail!("Currency {both} is listed as both fiat and crypto");
        }

        Ok(Self { base, fiat, crypto })
    }

    pub fn base(&self) -> Currency {
        Currency {
            code: self.base.clone(),
            kind: CurrencyKind::Fiat,
        }
    }

    pub fn base_code(&self) -> &str {
        &self.base
    }

    pub fn lookup(&self, code: &str) -> Result<Currency, RateError> {
        let code = code.trim().to_uppercase();
        let kind = if self.fiat.contains(&code) {
            CurrencyKind::Fiat
        } else if self.crypto.contains_key(&code) {
            CurrencyKind::Crypto
        } else {
            return Err(RateError::Unsupported(code));
        };
        Ok(Currency { code, kind })
    }

    pub fn fiat_codes(&self) -> impl Iterator<Item = &str> {
        self.fiat.iter().map(String::as_str)
    }

    pub fn crypto_codes(&self) -> impl Iterator<Item = &str> {
        self.crypto.keys().map(String::as_str)
    }

    pub fn crypto_ids(&self) -> &BTreeMap<String, String> {
        &self.crypto
    }

    pub fn without_crypto(&self) -> Self {
        Self {
            base: self.base.clone(),
            fiat: self.fiat.clone(),
            crypto: BTreeMap::new(),
        }
    }
}

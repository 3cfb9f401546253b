//! Outbound notification of conversion results.

use super::error::NotifyError;
use async_trait::async_trait;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers a message. Implementations must call [`validate_address`]
    /// before attempting delivery.
    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Accepts `local@domain.tld`: no whitespace, exactly one `@`, and a dot in
/// the domain with text on both sides.
pub fn validate_address(address: &str) -> Result<&str, NotifyError> {
    let trimmed = address.trim();
    let invalid = || NotifyError::InvalidAddress(trimmed.to_string());

    if trimmed.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = trimmed.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let (name, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if name.is_empty() || tld.is_empty() {
        return Err(invalid());
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        assert_eq!(validate_address(" user@mail.example.com ").unwrap(), "user@mail.example.com");
        assert!(validate_address("a@b.c").is_ok());
    }

    #[test]
    fn test_invalid_addresses() {
        for addr in [
            "",
            "user",
            "user@",
            "@mail.com",
            "user@mail",
            "user@.com",
            "user@mail.",
            "a b@c.d",
            "a@b@c.d",
        ] {
            assert_eq!(
                validate_address(addr),
                Err(NotifyError::InvalidAddress(addr.trim().to_string())),
                "{addr}"
            );
        }
    }
}

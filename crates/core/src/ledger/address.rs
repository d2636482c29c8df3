use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use solana_pubkey::Pubkey;

use crate::errors::{Error, Result};

/// A validated base58 wallet address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalletAddress(Pubkey);

impl WalletAddress {
    /// Parse a user-supplied address. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_address(input, "address is empty"));
        }
        Pubkey::from_str(trimmed)
            .map(WalletAddress)
            .map_err(|e| Error::invalid_address(trimmed, e))
    }

    pub fn pubkey(&self) -> &Pubkey {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for WalletAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for WalletAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_address() {
        let address = WalletAddress::parse("  9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM ").unwrap();
        assert_eq!(address.to_string(), "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM");
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for input in ["", "   ", "not-an-address", "0OIl", "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM9WzD"] {
            let err = WalletAddress::parse(input).unwrap_err();
            assert!(matches!(err, Error::InvalidAddress { .. }), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_serializes_as_base58_string() {
        let address: WalletAddress = "83astBRguLMdt2h5U1Tpdq5tjFoJ6noeGwaY3mDLVcri".parse().unwrap();
        assert_eq!(
            serde_json::to_string(&address).unwrap(),
            "\"83astBRguLMdt2h5U1Tpdq5tjFoJ6noeGwaY3mDLVcri\""
        );
    }
}

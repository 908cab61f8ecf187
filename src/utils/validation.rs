//! Validation utilities

use crate::traits::*;
use crate::types::*;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: Amount) -> WalletResult<()> {
    if amount == 0 {
        Err(WalletError::InvalidAmount)
    } else {
        Ok(())
    }
}

/// Validate that an address is `0x` followed by 40 hex digits
pub fn validate_address(address: &Address) -> WalletResult<()> {
    let value = address.as_str();

    let digits = value.strip_prefix("0x").ok_or_else(|| {
        WalletError::Validation(format!("Address '{}' must start with 0x", value))
    })?;

    if digits.len() != 40 {
        return Err(WalletError::Validation(format!(
            "Address '{}' must have 40 hex digits, found {}",
            value,
            digits.len()
        )));
    }

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::Validation(format!(
            "Address '{}' contains non-hex characters",
            value
        )));
    }

    Ok(())
}

/// Enhanced transfer validator mirroring the checks clients run before
/// submitting a proposal
pub struct EnhancedTransferValidator;

impl TransferValidator for EnhancedTransferValidator {
    fn validate_transfer(&self, amount: Amount, recipient: &Address) -> WalletResult<()> {
        validate_positive_amount(amount)?;
        validate_address(recipient)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";

    #[test]
    fn test_validate_address() {
        assert!(validate_address(&VALID.into()).is_ok());
        assert!(validate_address(&"5B38Da6a701c568545dCfcB03FcB875f56beddC4".into()).is_err());
        assert!(validate_address(&"0x5B38".into()).is_err());
        assert!(validate_address(&"0xZZ38Da6a701c568545dCfcB03FcB875f56beddC4".into()).is_err());
    }

    #[test]
    fn test_enhanced_validator() {
        let validator = EnhancedTransferValidator;
        assert!(validator.validate_transfer(1, &VALID.into()).is_ok());
        assert_eq!(
            validator.validate_transfer(0, &VALID.into()),
            Err(WalletError::InvalidAmount)
        );
        assert!(matches!(
            validator.validate_transfer(10, &"bob".into()),
            Err(WalletError::Validation(_))
        ));
    }
}

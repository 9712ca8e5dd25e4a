//! Solidity panic codes and their human-readable descriptions.
//!
//! See <https://docs.soliditylang.org/en/v0.8.16/control-structures.html#panic-via-assert-and-error-via-require>

use alloy_primitives::U256;

/// Description reported for panic codes outside the known table.
pub const UNKNOWN_PANIC_REASON: &str = "Unknown panic code";

/// Resolves a panic code to its fixed description.
///
/// Codes above the highest known one (0x51) map to [`UNKNOWN_PANIC_REASON`].
pub fn panic_reason(code: U256) -> &'static str {
    let Ok(code) = u64::try_from(code) else {
        return UNKNOWN_PANIC_REASON;
    };
    match code {
        0x01 => "An `assert` condition failed",
        0x11 => "Arithmetic operation resulted in underflow or overflow",
        0x12 => "Division or modulo by zero (e.g. `5 / 0` or `23 % 0`)",
        0x21 => "Attempted to convert to an invalid type",
        0x22 => "Attempted to access a storage byte array that is incorrectly encoded",
        0x31 => "Performed `.pop()` on an empty array",
        0x32 => "Array index is out of bounds",
        0x41 => "Allocated too much memory or created an array which is too large",
        0x51 => "Attempted to call a zero-initialized variable of internal function type",
        _ => UNKNOWN_PANIC_REASON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(panic_reason(U256::from(1)), "An `assert` condition failed");
        assert_eq!(
            panic_reason(U256::from(17)),
            "Arithmetic operation resulted in underflow or overflow"
        );
        assert_eq!(panic_reason(U256::from(0x32)), "Array index is out of bounds");
    }

    #[test]
    fn unknown_codes_fall_through() {
        assert_eq!(panic_reason(U256::from(0x52)), UNKNOWN_PANIC_REASON);
        assert_eq!(panic_reason(U256::from(3)), UNKNOWN_PANIC_REASON);
        assert_eq!(panic_reason(U256::MAX), UNKNOWN_PANIC_REASON);
    }
}

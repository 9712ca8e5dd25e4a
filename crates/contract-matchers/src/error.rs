use crate::{call::CallError, state::MatcherName};

use alloy_primitives::TxHash;
use thiserror::Error;

/// Everything a matcher can raise.
///
/// Three families, with different propagation rules:
/// - assertion failures ([`MatcherError::AssertionFailed`]) are inverted by
///   negation and carry the human-readable report;
/// - usage errors (chaining violations, double `with_args`, missing calls,
///   names absent from the ABI) are raised before anything is awaited and are
///   never silenced by negation;
/// - harness faults ([`MatcherError::Call`], [`MatcherError::MissingReceipt`])
///   indicate the surrounding transport malfunctioned and are re-raised
///   verbatim, never asserted on.
#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("{0}")]
    AssertionFailed(String),

    #[error("the `{matcher}` matcher cannot be chained after `{previous}`")]
    NotChainable {
        matcher: MatcherName,
        previous: MatcherName,
    },

    #[error(
        "the `{matcher}` matcher cannot follow a hash-seeded `transaction`; only event matchers can assert on a raw transaction hash"
    )]
    HashOnlySubject { matcher: MatcherName },

    #[error("the `{matcher}` matcher must be used after a `read`, `write` or `transaction` call")]
    MissingCall { matcher: MatcherName },

    #[error("the error `{0}` was not found in the contract ABI")]
    UnknownError(String),

    #[error("the event `{0}` was not found in the contract ABI")]
    UnknownEvent(String),

    #[error("the function `{0}` was not found in the contract ABI")]
    UnknownFunction(String),

    #[error("`{function}` is not a read function")]
    NotAReadFunction { function: String },

    #[error("`{function}` is not a write function")]
    NotAWriteFunction { function: String },

    #[error("`with_args` can only be used once per assertion")]
    ArgsAlreadyAttached,

    #[error("the `{matcher}` matcher requires a transaction hash, but the call returned a value")]
    NoTransactionHash { matcher: MatcherName },

    #[error("no receipt found for transaction {0}")]
    MissingReceipt(TxHash),

    #[error(transparent)]
    Call(#[from] CallError),

    #[error("failed to decode event log: {0}")]
    LogDecode(#[from] alloy_dyn_abi::Error),
}

impl MatcherError {
    /// True for failures of the asserted contract behavior, as opposed to
    /// usage errors and harness faults.
    pub fn is_assertion_failure(&self) -> bool {
        matches!(self, Self::AssertionFailed(_))
    }

    /// True when the surrounding call machinery failed, not the contract.
    pub fn is_harness_fault(&self) -> bool {
        matches!(self, Self::Call(_) | Self::MissingReceipt(_))
    }

    /// The assertion report, if this is an assertion failure.
    pub fn assertion_message(&self) -> Option<&str> {
        match self {
            Self::AssertionFailed(msg) => Some(msg),
            _ => None,
        }
    }
}

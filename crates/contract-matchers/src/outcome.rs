//! Normalization of settled calls into a canonical outcome taxonomy.

use crate::{
    call::{CallError, CallValue},
    constants::panic_reason,
};

use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::JsonAbi;
use alloy_primitives::U256;
use alloy_sol_types::{Panic, Revert, SolError};
use tracing::debug;

/// The canonical outcome of awaiting a call. Exactly one variant applies per
/// settled call; classification is a total, deterministic function of the
/// ABI and the settlement.
#[derive(Debug, Clone)]
pub enum CallOutcome {
    /// The call did not revert.
    Success(CallValue),
    /// Reverted with zero-length return data.
    RevertedEmpty,
    /// The failure exposes no revert data at all. Carries the original error
    /// so callers can re-raise it unchanged; it indicates a harness fault,
    /// not a contract revert, and must never be asserted on.
    RevertedUnknownLocal(CallError),
    /// Revert data present but not decodable against the given ABI.
    RevertedUnknownContract,
    /// The standard `Panic(uint256)` error.
    RevertedPanic {
        code: U256,
        description: &'static str,
    },
    /// The standard `Error(string)` error.
    RevertedError { reason: String },
    /// A user-defined error declared in the ABI.
    RevertedCustom {
        name: String,
        args: Vec<DynSolValue>,
    },
}

/// Classifies a settled call against an ABI.
///
/// Decoding ambiguity degrades to the coarsest applicable outcome
/// (`RevertedUnknownContract`) rather than erroring. Overloaded custom
/// errors are resolved by selector; the reported name is that of the first
/// matching ABI entry.
pub fn classify(abi: &JsonAbi, settled: Result<CallValue, CallError>) -> CallOutcome {
    let outcome = match settled {
        Ok(value) => CallOutcome::Success(value),
        Err(failure) => classify_failure(abi, failure),
    };
    debug!(outcome = ?outcome, "classified call settlement");
    outcome
}

fn classify_failure(abi: &JsonAbi, failure: CallError) -> CallOutcome {
    let data = match &failure {
        CallError::Reverted { data } => data.clone(),
        CallError::Transport(_) => return CallOutcome::RevertedUnknownLocal(failure),
    };

    if data.is_empty() {
        return CallOutcome::RevertedEmpty;
    }
    if data.len() < 4 {
        return CallOutcome::RevertedUnknownContract;
    }

    if data[..4] == Panic::SELECTOR {
        return match Panic::abi_decode(&data) {
            Ok(panic) => CallOutcome::RevertedPanic {
                code: panic.code,
                description: panic_reason(panic.code),
            },
            Err(_) => CallOutcome::RevertedUnknownContract,
        };
    }

    if data[..4] == Revert::SELECTOR {
        return match Revert::abi_decode(&data) {
            Ok(revert) => CallOutcome::RevertedError {
                reason: revert.reason,
            },
            Err(_) => CallOutcome::RevertedUnknownContract,
        };
    }

    for error in abi.errors() {
        if error.selector()[..] != data[..4] {
            continue;
        }
        if let Ok(args) = error.abi_decode_input(&data[4..]) {
            return CallOutcome::RevertedCustom {
                name: error.name.clone(),
                args,
            };
        }
    }

    CallOutcome::RevertedUnknownContract
}

//! Terminal matchers over a pending call.
//!
//! Each matcher consumes the chain's [`CallHandle`] exactly once, awaits its
//! settlement, classifies the outcome and produces a verdict honoring
//! negation. Usage errors and harness faults bypass negation entirely.

mod reverted;
mod reverted_with;

pub mod custom_error;
pub mod emit_event;

pub use custom_error::CustomErrorExpectation;
pub use emit_event::EventExpectation;
pub use reverted_with::RevertReason;

use crate::{
    call::{CallTransport, ContractHandle},
    error::MatcherError,
    state::AssertionState,
};

/// One assertion chain instance. Created by the `expect(...)` entry points,
/// consumed by exactly one terminal matcher.
pub struct Expectation<'a> {
    pub(crate) contract: ContractHandle,
    pub(crate) transport: &'a dyn CallTransport,
    pub(crate) state: AssertionState,
}

impl std::fmt::Debug for Expectation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expectation")
            .field("contract", &self.contract)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> Expectation<'a> {
    pub(crate) fn new(
        contract: ContractHandle,
        transport: &'a dyn CallTransport,
        state: AssertionState,
    ) -> Self {
        Self {
            contract,
            transport,
            state,
        }
    }

    /// Toggles negation. Inverts which boolean satisfies the assertion and
    /// which message is surfaced; never changes which errors are re-raised.
    pub fn not(mut self) -> Self {
        self.state.negated = !self.state.negated;
        self
    }

    pub fn is_negated(&self) -> bool {
        self.state.negated
    }

    pub(crate) fn verdict(&self) -> Verdict {
        Verdict {
            negated: self.state.negated,
        }
    }
}

/// Turns a condition plus a message pair into a pass/fail result. Only the
/// message relevant to the (possibly negated) failing side is surfaced.
#[derive(Clone, Copy)]
pub(crate) struct Verdict {
    negated: bool,
}

impl Verdict {
    pub(crate) fn require(
        &self,
        condition: bool,
        message_positive: impl Into<String>,
        message_negated: impl Into<String>,
    ) -> Result<(), MatcherError> {
        if condition != self.negated {
            return Ok(());
        }
        if self.negated {
            Err(MatcherError::AssertionFailed(message_negated.into()))
        } else {
            Err(MatcherError::AssertionFailed(message_positive.into()))
        }
    }
}

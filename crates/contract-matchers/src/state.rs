//! Per-assertion state and the chaining guard.
//!
//! One [`AssertionState`] exists per `expect(...)` chain and is exclusively
//! owned by it. The guard enforces that at most one terminal outcome matcher
//! attaches to a pending call; `with_args` re-enters the guard with
//! self-chaining allowed.

use std::fmt;

use tracing::trace;

use crate::{args::ExpectedArg, call::CallHandle, error::MatcherError};

/// Closed set of entry points and terminal matchers, used in chaining and
/// usage error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatcherName {
    Read,
    Write,
    Transaction,
    ToBeReverted,
    ToBeRevertedWithoutReason,
    ToBeRevertedWithString,
    ToBeRevertedWithPanic,
    ToBeRevertedWithCustomError,
    ToEmitEvent,
    ToEmitEventFrom,
    WithArgs,
}

impl MatcherName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Transaction => "transaction",
            Self::ToBeReverted => "to_be_reverted",
            Self::ToBeRevertedWithoutReason => "to_be_reverted_without_reason",
            Self::ToBeRevertedWithString => "to_be_reverted_with_string",
            Self::ToBeRevertedWithPanic => "to_be_reverted_with_panic",
            Self::ToBeRevertedWithCustomError => "to_be_reverted_with_custom_error",
            Self::ToEmitEvent => "to_emit_event",
            Self::ToEmitEventFrom => "to_emit_event_from",
            Self::WithArgs => "with_args",
        }
    }
}

impl fmt::Display for MatcherName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ChainingPolicy {
    pub(crate) allow_self_chain: bool,
    pub(crate) allow_hash_only: bool,
}

/// Mutable record scoped to one assertion chain.
#[derive(Debug, Default)]
pub(crate) struct AssertionState {
    pub(crate) negated: bool,
    pub(crate) hash_only: bool,
    pub(crate) pending_call: Option<CallHandle>,
    pub(crate) expected_args: Option<Vec<ExpectedArg>>,
    pub(crate) previous_matcher: Option<MatcherName>,
}

impl AssertionState {
    /// Check-and-record for terminal matcher attachment. Atomic relative to
    /// the single cooperative thread: no await happens inside.
    pub(crate) fn guard(
        &mut self,
        matcher: MatcherName,
        policy: ChainingPolicy,
    ) -> Result<(), MatcherError> {
        if self.hash_only && !policy.allow_hash_only {
            return Err(MatcherError::HashOnlySubject { matcher });
        }
        match self.previous_matcher {
            None => {
                trace!(matcher = %matcher, "recording terminal matcher");
                self.previous_matcher = Some(matcher);
                Ok(())
            }
            Some(previous) if previous == matcher && policy.allow_self_chain => Ok(()),
            Some(previous) => Err(MatcherError::NotChainable { matcher, previous }),
        }
    }

    /// Attaches the expected-argument list. Allowed at most once per chain,
    /// and only as a self-chain of the matcher that owns the arguments.
    pub(crate) fn attach_args(
        &mut self,
        matcher: MatcherName,
        args: Vec<ExpectedArg>,
    ) -> Result<(), MatcherError> {
        if self.expected_args.is_some() {
            return Err(MatcherError::ArgsAlreadyAttached);
        }
        self.guard(
            matcher,
            ChainingPolicy {
                allow_self_chain: true,
                allow_hash_only: true,
            },
        )?;
        self.expected_args = Some(args);
        Ok(())
    }

    pub(crate) fn take_call(&mut self, matcher: MatcherName) -> Result<CallHandle, MatcherError> {
        self.pending_call
            .take()
            .ok_or(MatcherError::MissingCall { matcher })
    }
}

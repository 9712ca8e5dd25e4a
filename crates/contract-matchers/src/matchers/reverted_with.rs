//! `to_be_reverted_with_string` and `to_be_reverted_with_panic`.

use regex::Regex;

use super::Expectation;
use crate::{
    constants::panic_reason,
    error::MatcherError,
    outcome::{classify, CallOutcome},
    state::{ChainingPolicy, MatcherName},
};
use alloy_primitives::U256;

/// An expected revert reason: either an exact string or a pattern the actual
/// reason must match.
#[derive(Debug, Clone)]
pub enum RevertReason {
    Exact(String),
    Pattern(Regex),
}

impl RevertReason {
    fn matches(&self, actual: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == actual,
            Self::Pattern(pattern) => pattern.is_match(actual),
        }
    }

    /// The form echoed in reports: the exact string, or the pattern source.
    fn as_str(&self) -> &str {
        match self {
            Self::Exact(expected) => expected,
            Self::Pattern(pattern) => pattern.as_str(),
        }
    }
}

impl From<&str> for RevertReason {
    fn from(reason: &str) -> Self {
        Self::Exact(reason.to_string())
    }
}

impl From<String> for RevertReason {
    fn from(reason: String) -> Self {
        Self::Exact(reason)
    }
}

impl From<Regex> for RevertReason {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

impl Expectation<'_> {
    /// Passes iff the call reverted with the standard `Error(string)` error
    /// and the reason matches.
    pub async fn to_be_reverted_with_string(
        &mut self,
        expected: impl Into<RevertReason>,
    ) -> Result<(), MatcherError> {
        const MATCHER: MatcherName = MatcherName::ToBeRevertedWithString;
        let expected = expected.into();
        self.state.guard(MATCHER, ChainingPolicy::default())?;
        let call = self.state.take_call(MATCHER)?;
        let verdict = self.verdict();
        let want = expected.as_str().to_string();

        match classify(&self.contract.abi, call.settle().await) {
            CallOutcome::Success(_) => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with reason '{want}', but it didn't revert"
                ),
                format!("Expected transaction NOT to be reverted with reason '{want}'"),
            ),
            CallOutcome::RevertedUnknownLocal(failure) => Err(failure.into()),
            CallOutcome::RevertedEmpty => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with reason '{want}', but it reverted without a reason"
                ),
                format!("Expected transaction NOT to be reverted with reason '{want}'"),
            ),
            CallOutcome::RevertedUnknownContract => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with reason '{want}', but it reverted with unknown error"
                ),
                format!("Expected transaction NOT to be reverted with reason '{want}'"),
            ),
            CallOutcome::RevertedPanic { code, description } => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with reason '{want}', but it reverted with panic code {code} ({description})"
                ),
                format!("Expected transaction NOT to be reverted with reason '{want}'"),
            ),
            CallOutcome::RevertedCustom { name, .. } => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with reason '{want}', but it reverted with custom error '{name}'"
                ),
                format!("Expected transaction NOT to be reverted with reason '{want}'"),
            ),
            CallOutcome::RevertedError { reason } => verdict.require(
                expected.matches(&reason),
                format!(
                    "Expected transaction to be reverted with reason '{want}', but it reverted with reason '{reason}'"
                ),
                format!(
                    "Expected transaction NOT to be reverted with reason '{want}', but it was"
                ),
            ),
        }
    }

    /// Passes iff the call reverted with `Panic(uint256)`; with an expected
    /// code, the codes must additionally be equal.
    pub async fn to_be_reverted_with_panic(
        &mut self,
        expected_code: impl Into<Option<U256>>,
    ) -> Result<(), MatcherError> {
        const MATCHER: MatcherName = MatcherName::ToBeRevertedWithPanic;
        let expected_code = expected_code.into();
        self.state.guard(MATCHER, ChainingPolicy::default())?;
        let call = self.state.take_call(MATCHER)?;
        let verdict = self.verdict();

        let want = match expected_code {
            Some(code) => format!("panic code {code} ({})", panic_reason(code)),
            None => "some panic code".to_string(),
        };

        match classify(&self.contract.abi, call.settle().await) {
            CallOutcome::Success(_) => verdict.require(
                false,
                format!("Expected transaction to be reverted with {want}, but it didn't revert"),
                format!("Expected transaction NOT to be reverted with {want}"),
            ),
            CallOutcome::RevertedUnknownLocal(failure) => Err(failure.into()),
            CallOutcome::RevertedEmpty => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with {want}, but it reverted without a reason"
                ),
                format!("Expected transaction NOT to be reverted with {want}"),
            ),
            CallOutcome::RevertedUnknownContract => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with {want}, but it reverted with unknown error"
                ),
                format!("Expected transaction NOT to be reverted with {want}"),
            ),
            CallOutcome::RevertedError { reason } => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with {want}, but it reverted with reason '{reason}'"
                ),
                format!("Expected transaction NOT to be reverted with {want}"),
            ),
            CallOutcome::RevertedCustom { name, .. } => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with {want}, but it reverted with custom error '{name}'"
                ),
                format!("Expected transaction NOT to be reverted with {want}"),
            ),
            CallOutcome::RevertedPanic { code, description } => match expected_code {
                Some(expected_code) => verdict.require(
                    code == expected_code,
                    format!(
                        "Expected transaction to be reverted with {want}, but it reverted with panic code {code} ({description})"
                    ),
                    format!("Expected transaction NOT to be reverted with {want}, but it was"),
                ),
                None => verdict.require(
                    true,
                    format!("Expected transaction to be reverted with {want}"),
                    format!(
                        "Expected transaction NOT to be reverted with {want}, but it reverted with panic code {code} ({description})"
                    ),
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        expect::expect,
        test_utils::{revert_with_panic, revert_with_reason, test_contract, uint, MockTransport},
    };

    #[tokio::test]
    async fn exact_reason_matches() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_reason("Not enough Ether")));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        assertion
            .to_be_reverted_with_string("Not enough Ether")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wrong_reason_reports_both_strings() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_reason("actual")));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        let err = assertion
            .to_be_reverted_with_string("expected")
            .await
            .unwrap_err();
        assert_eq!(
            err.assertion_message(),
            Some(
                "Expected transaction to be reverted with reason 'expected', but it reverted with reason 'actual'"
            )
        );
    }

    #[tokio::test]
    async fn pattern_reason_matches() {
        let contract = test_contract();
        let transport =
            MockTransport::new().with_read(Err(revert_with_reason("balance too low: 17")));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        assertion
            .to_be_reverted_with_string(Regex::new(r"balance too low: \d+").unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn panic_code_match_and_mismatch() {
        let contract = test_contract();

        let transport = MockTransport::new().with_read(Err(revert_with_panic(0x01)));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        assertion
            .to_be_reverted_with_panic(U256::from(1))
            .await
            .unwrap();

        let transport = MockTransport::new().with_read(Err(revert_with_panic(0x01)));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        let err = assertion
            .to_be_reverted_with_panic(U256::from(17))
            .await
            .unwrap_err();
        assert_eq!(
            err.assertion_message(),
            Some(
                "Expected transaction to be reverted with panic code 17 (Arithmetic operation resulted in underflow or overflow), but it reverted with panic code 1 (An `assert` condition failed)"
            )
        );
    }

    #[tokio::test]
    async fn any_panic_code_accepted_without_expectation() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_panic(0x32)));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        assertion.to_be_reverted_with_panic(None).await.unwrap();
    }

    #[tokio::test]
    async fn success_fails_with_some_panic_code_phrasing() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Ok(uint(3)));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        let err = assertion.to_be_reverted_with_panic(None).await.unwrap_err();
        assert_eq!(
            err.assertion_message(),
            Some("Expected transaction to be reverted with some panic code, but it didn't revert")
        );
    }
}

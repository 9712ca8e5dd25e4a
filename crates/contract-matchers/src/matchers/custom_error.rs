//! `to_be_reverted_with_custom_error`, with optional argument attachment.

use std::future::IntoFuture;

use futures::future::BoxFuture;

use super::Expectation;
use crate::{
    args::{fill_wildcards, format_match_error, ExpectedArg},
    error::MatcherError,
    outcome::{classify, CallOutcome},
    state::{ChainingPolicy, MatcherName},
};

impl<'a> Expectation<'a> {
    /// Passes iff the call reverted with the named user-defined error.
    ///
    /// The name must be declared in the contract ABI; overloaded errors
    /// resolve to the first entry with that name. The returned builder is
    /// awaitable and accepts an expected-argument list via
    /// [`CustomErrorExpectation::with_args`].
    pub fn to_be_reverted_with_custom_error(
        &mut self,
        name: &str,
    ) -> Result<CustomErrorExpectation<'_, 'a>, MatcherError> {
        if self
            .contract
            .abi
            .error(name)
            .and_then(|overloads| overloads.first())
            .is_none()
        {
            return Err(MatcherError::UnknownError(name.to_string()));
        }
        self.state.guard(
            MatcherName::ToBeRevertedWithCustomError,
            ChainingPolicy::default(),
        )?;
        Ok(CustomErrorExpectation {
            expectation: self,
            name: name.to_string(),
        })
    }
}

/// Pending custom-error assertion. Await it directly, or attach expected
/// arguments first.
#[derive(Debug)]
pub struct CustomErrorExpectation<'e, 'a> {
    expectation: &'e mut Expectation<'a>,
    name: String,
}

impl CustomErrorExpectation<'_, '_> {
    /// Attaches the expected error arguments. Usable at most once per
    /// assertion chain.
    pub fn with_args(self, args: Vec<ExpectedArg>) -> Result<Self, MatcherError> {
        self.expectation
            .state
            .attach_args(MatcherName::ToBeRevertedWithCustomError, args)?;
        Ok(self)
    }

    async fn run(self) -> Result<(), MatcherError> {
        let Self { expectation, name } = self;
        let call = expectation
            .state
            .take_call(MatcherName::ToBeRevertedWithCustomError)?;
        let verdict = expectation.verdict();

        match classify(&expectation.contract.abi, call.settle().await) {
            CallOutcome::Success(_) => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with custom error '{name}', but it didn't revert"
                ),
                format!("Expected transaction NOT to be reverted with custom error '{name}'"),
            ),
            CallOutcome::RevertedUnknownLocal(failure) => Err(failure.into()),
            CallOutcome::RevertedEmpty => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with custom error '{name}', but it reverted without a reason"
                ),
                format!("Expected transaction NOT to be reverted with custom error '{name}'"),
            ),
            CallOutcome::RevertedUnknownContract => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with custom error '{name}', but it reverted with unknown error"
                ),
                format!("Expected transaction NOT to be reverted with custom error '{name}'"),
            ),
            CallOutcome::RevertedPanic { code, description } => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with custom error '{name}', but it reverted with panic code {code} ({description})"
                ),
                format!("Expected transaction NOT to be reverted with custom error '{name}'"),
            ),
            CallOutcome::RevertedError { reason } => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted with custom error '{name}', but it reverted with reason '{reason}'"
                ),
                format!("Expected transaction NOT to be reverted with custom error '{name}'"),
            ),
            CallOutcome::RevertedCustom {
                name: actual_name,
                args: actual_args,
            } => {
                if actual_name != name {
                    return verdict.require(
                        false,
                        format!(
                            "Expected transaction to be reverted with custom error '{name}', but it reverted with custom error '{actual_name}'"
                        ),
                        format!(
                            "Expected transaction NOT to be reverted with custom error '{name}'"
                        ),
                    );
                }
                let Some(expected_args) = expectation.state.expected_args.as_deref() else {
                    return verdict.require(
                        true,
                        format!("Expected transaction to be reverted with custom error '{name}'"),
                        format!(
                            "Expected transaction NOT to be reverted with custom error '{name}', but it was"
                        ),
                    );
                };
                // A decoded error is a single candidate, so wildcard
                // positions echo the actual values in the report.
                let shown = fill_wildcards(expected_args, &actual_args);
                verdict.require(
                    crate::args::match_args(expected_args, Some(&actual_args)),
                    format_match_error(
                        &format!(
                            "Expected transaction to be reverted with custom error '{name}' and matching arguments, but it was"
                        ),
                        &shown,
                        Some(&actual_args),
                    ),
                    format!(
                        "Expected transaction NOT to be reverted with custom error '{name}' and matching arguments, but it was"
                    ),
                )
            }
        }
    }
}

impl<'e, 'a> IntoFuture for CustomErrorExpectation<'e, 'a> {
    type Output = Result<(), MatcherError>;
    type IntoFuture = BoxFuture<'e, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.run())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        args::any_value,
        error::MatcherError,
        expect::expect,
        test_utils::{
            revert_with_custom_error, revert_with_reason, test_contract, uint, MockTransport,
        },
    };

    #[tokio::test]
    async fn matching_name_passes() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_custom_error(
            &contract.abi,
            "AnotherCustomError",
            &[uint(7)],
        )));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        assertion
            .to_be_reverted_with_custom_error("AnotherCustomError")
            .unwrap()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wrong_name_reports_actual_error() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_custom_error(
            &contract.abi,
            "AnotherCustomError",
            &[uint(7)],
        )));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        let err = assertion
            .to_be_reverted_with_custom_error("SomeCustomError")
            .unwrap()
            .await
            .unwrap_err();
        assert_eq!(
            err.assertion_message(),
            Some(
                "Expected transaction to be reverted with custom error 'SomeCustomError', but it reverted with custom error 'AnotherCustomError'"
            )
        );
    }

    #[tokio::test]
    async fn wildcard_args_match_and_backfill() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_custom_error(
            &contract.abi,
            "SomeCustomError",
            &[uint(42), uint(5)],
        )));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        assertion
            .to_be_reverted_with_custom_error("SomeCustomError")
            .unwrap()
            .with_args(vec![any_value(), uint(5).into()])
            .unwrap()
            .await
            .unwrap();

        // On mismatch the wildcard position echoes the actual value (42).
        let transport = MockTransport::new().with_read(Err(revert_with_custom_error(
            &contract.abi,
            "SomeCustomError",
            &[uint(42), uint(5)],
        )));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        let err = assertion
            .to_be_reverted_with_custom_error("SomeCustomError")
            .unwrap()
            .with_args(vec![any_value(), uint(6).into()])
            .unwrap()
            .await
            .unwrap_err();
        let message = err.assertion_message().unwrap();
        assert!(message.contains("+ expected: [42, 6]"), "{message}");
        assert!(message.contains("- actual:   [42, 5]"), "{message}");
    }

    #[tokio::test]
    async fn with_args_twice_is_a_usage_error() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_custom_error(
            &contract.abi,
            "SomeCustomError",
            &[uint(1), uint(2)],
        )));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        let err = assertion
            .to_be_reverted_with_custom_error("SomeCustomError")
            .unwrap()
            .with_args(vec![uint(1).into(), uint(2).into()])
            .unwrap()
            .with_args(vec![uint(1).into(), uint(2).into()])
            .unwrap_err();
        assert!(matches!(err, MatcherError::ArgsAlreadyAttached));
    }

    #[tokio::test]
    async fn unknown_error_name_is_rejected_synchronously() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_reason("x")));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        let err = assertion
            .to_be_reverted_with_custom_error("NoSuchError")
            .unwrap_err();
        assert!(matches!(err, MatcherError::UnknownError(name) if name == "NoSuchError"));
    }

    #[tokio::test]
    async fn cannot_follow_another_outcome_matcher() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_reason("x")));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        assertion.to_be_reverted().await.unwrap();
        let err = assertion
            .to_be_reverted_with_custom_error("SomeCustomError")
            .unwrap_err();
        assert!(matches!(err, MatcherError::NotChainable { .. }));
    }

    #[tokio::test]
    async fn negated_custom_error_match_fails() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_custom_error(
            &contract.abi,
            "AnotherCustomError",
            &[uint(7)],
        )));
        let mut assertion = expect(&contract, &transport)
            .read("readNumber", vec![])
            .unwrap()
            .not();
        let err = assertion
            .to_be_reverted_with_custom_error("AnotherCustomError")
            .unwrap()
            .await
            .unwrap_err();
        assert_eq!(
            err.assertion_message(),
            Some(
                "Expected transaction NOT to be reverted with custom error 'AnotherCustomError', but it was"
            )
        );
    }
}

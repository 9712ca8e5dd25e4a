//! `to_be_reverted` and `to_be_reverted_without_reason`.

use super::Expectation;
use crate::{
    call::{CallValue, ReceiptStatus},
    error::MatcherError,
    outcome::{classify, CallOutcome},
    state::{ChainingPolicy, MatcherName},
};

impl Expectation<'_> {
    /// Passes iff the call reverted, for any reason.
    ///
    /// A write call that settles successfully with a hash still consults the
    /// receipt: a transport may report a mined-but-reverted transaction as a
    /// success.
    pub async fn to_be_reverted(&mut self) -> Result<(), MatcherError> {
        const MATCHER: MatcherName = MatcherName::ToBeReverted;
        self.state.guard(MATCHER, ChainingPolicy::default())?;
        let call = self.state.take_call(MATCHER)?;
        let verdict = self.verdict();

        match classify(&self.contract.abi, call.settle().await) {
            CallOutcome::Success(CallValue::Return(_)) => verdict.require(
                false,
                "Expected transaction to be reverted",
                "Expected transaction NOT to be reverted",
            ),
            CallOutcome::Success(CallValue::Hash(hash)) => {
                let receipt = self
                    .transport
                    .receipt(hash)
                    .await?
                    .ok_or(MatcherError::MissingReceipt(hash))?;
                verdict.require(
                    receipt.status == ReceiptStatus::Reverted,
                    "Expected transaction to be reverted",
                    "Expected transaction NOT to be reverted",
                )
            }
            CallOutcome::RevertedUnknownLocal(failure) => Err(failure.into()),
            CallOutcome::RevertedEmpty => verdict.require(
                true,
                "Expected transaction to be reverted",
                "Expected transaction NOT to be reverted",
            ),
            CallOutcome::RevertedUnknownContract => verdict.require(
                true,
                "Expected transaction to be reverted",
                "Expected transaction NOT to be reverted, but it reverted with unknown error",
            ),
            CallOutcome::RevertedPanic { code, description } => verdict.require(
                true,
                "Expected transaction to be reverted",
                format!(
                    "Expected transaction NOT to be reverted, but it reverted with panic code {code} ({description})"
                ),
            ),
            CallOutcome::RevertedError { reason } => verdict.require(
                true,
                "Expected transaction to be reverted",
                format!(
                    "Expected transaction NOT to be reverted, but it reverted with reason '{reason}'"
                ),
            ),
            CallOutcome::RevertedCustom { name, .. } => verdict.require(
                true,
                "Expected transaction to be reverted",
                format!(
                    "Expected transaction NOT to be reverted, but it reverted with custom error '{name}'"
                ),
            ),
        }
    }

    /// Passes iff the call reverted with zero-length return data.
    pub async fn to_be_reverted_without_reason(&mut self) -> Result<(), MatcherError> {
        const MATCHER: MatcherName = MatcherName::ToBeRevertedWithoutReason;
        self.state.guard(MATCHER, ChainingPolicy::default())?;
        let call = self.state.take_call(MATCHER)?;
        let verdict = self.verdict();

        match classify(&self.contract.abi, call.settle().await) {
            CallOutcome::Success(_) => verdict.require(
                false,
                "Expected transaction to be reverted without a reason, but it didn't revert",
                "Expected transaction NOT to be reverted without a reason",
            ),
            CallOutcome::RevertedUnknownLocal(failure) => Err(failure.into()),
            CallOutcome::RevertedEmpty => verdict.require(
                true,
                "Expected transaction to be reverted without a reason",
                "Expected transaction NOT to be reverted without a reason, but it was",
            ),
            CallOutcome::RevertedUnknownContract => verdict.require(
                false,
                "Expected transaction to be reverted without a reason, but it reverted with unknown error",
                "Expected transaction NOT to be reverted without a reason",
            ),
            CallOutcome::RevertedPanic { code, description } => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted without a reason, but it reverted with panic code {code} ({description})"
                ),
                "Expected transaction NOT to be reverted without a reason",
            ),
            CallOutcome::RevertedError { reason } => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted without a reason, but it reverted with error '{reason}'"
                ),
                "Expected transaction NOT to be reverted without a reason",
            ),
            CallOutcome::RevertedCustom { name, .. } => verdict.require(
                false,
                format!(
                    "Expected transaction to be reverted without a reason, but it reverted with custom error '{name}'"
                ),
                "Expected transaction NOT to be reverted without a reason",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        call::ReceiptStatus,
        error::MatcherError,
        expect::expect,
        test_utils::{
            receipt, revert_with_data, revert_with_panic, revert_with_reason, test_contract,
            uint, MockTransport,
        },
    };
    use alloy_primitives::{Bytes, TxHash};

    #[tokio::test]
    async fn revert_with_reason_satisfies_to_be_reverted() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_reason("nope")));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        assertion.to_be_reverted().await.unwrap();
    }

    #[tokio::test]
    async fn successful_read_fails_to_be_reverted() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Ok(uint(7)));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        let err = assertion.to_be_reverted().await.unwrap_err();
        assert_eq!(
            err.assertion_message(),
            Some("Expected transaction to be reverted")
        );
    }

    #[tokio::test]
    async fn negation_inverts_both_sides() {
        let contract = test_contract();

        let transport = MockTransport::new().with_read(Ok(uint(7)));
        let mut assertion = expect(&contract, &transport)
            .read("readNumber", vec![])
            .unwrap()
            .not();
        assertion.to_be_reverted().await.unwrap();

        let transport = MockTransport::new().with_read(Err(revert_with_reason("boom")));
        let mut assertion = expect(&contract, &transport)
            .read("readNumber", vec![])
            .unwrap()
            .not();
        let err = assertion.to_be_reverted().await.unwrap_err();
        assert_eq!(
            err.assertion_message(),
            Some("Expected transaction NOT to be reverted, but it reverted with reason 'boom'")
        );
    }

    #[tokio::test]
    async fn transport_failures_are_reraised_even_when_negated() {
        let contract = test_contract();
        let transport = MockTransport::new()
            .with_read(Err(crate::call::CallError::Transport("rpc down".to_string())));
        let mut assertion = expect(&contract, &transport)
            .read("readNumber", vec![])
            .unwrap()
            .not();
        let err = assertion.to_be_reverted().await.unwrap_err();
        assert!(err.is_harness_fault());
    }

    #[tokio::test]
    async fn write_success_consults_the_receipt() {
        let contract = test_contract();
        let hash = TxHash::with_last_byte(1);

        let transport = MockTransport::new()
            .with_write(Ok(hash))
            .with_receipt(receipt(hash, ReceiptStatus::Reverted, vec![]));
        let mut assertion = expect(&contract, &transport).write("doTransfer", vec![]).unwrap();
        assertion.to_be_reverted().await.unwrap();

        let transport = MockTransport::new()
            .with_write(Ok(hash))
            .with_receipt(receipt(hash, ReceiptStatus::Success, vec![]));
        let mut assertion = expect(&contract, &transport).write("doTransfer", vec![]).unwrap();
        let err = assertion.to_be_reverted().await.unwrap_err();
        assert!(err.is_assertion_failure());
    }

    #[tokio::test]
    async fn write_success_without_receipt_is_a_harness_fault() {
        let contract = test_contract();
        let transport = MockTransport::new().with_write(Ok(TxHash::with_last_byte(2)));
        let mut assertion = expect(&contract, &transport).write("doTransfer", vec![]).unwrap();
        let err = assertion.to_be_reverted().await.unwrap_err();
        assert!(matches!(err, MatcherError::MissingReceipt(_)));
    }

    #[tokio::test]
    async fn empty_revert_satisfies_without_reason() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_data(Bytes::new())));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        assertion.to_be_reverted_without_reason().await.unwrap();
    }

    #[tokio::test]
    async fn reasoned_revert_fails_without_reason() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_panic(0x01)));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        let err = assertion.to_be_reverted_without_reason().await.unwrap_err();
        assert_eq!(
            err.assertion_message(),
            Some(
                "Expected transaction to be reverted without a reason, but it reverted with panic code 1 (An `assert` condition failed)"
            )
        );
    }

    #[tokio::test]
    async fn two_outcome_matchers_cannot_share_a_call() {
        let contract = test_contract();
        let transport = MockTransport::new().with_read(Err(revert_with_reason("nope")));
        let mut assertion = expect(&contract, &transport).read("readNumber", vec![]).unwrap();
        assertion.to_be_reverted().await.unwrap();
        let err = assertion.to_be_reverted_without_reason().await.unwrap_err();
        assert!(matches!(err, MatcherError::NotChainable { .. }));
    }
}

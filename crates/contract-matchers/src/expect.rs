//! Assertion chain entry points: `read`, `write` and `transaction`.

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::StateMutability;
use alloy_primitives::TxHash;
use futures::future::BoxFuture;

use crate::{
    call::{CallError, CallHandle, CallTransport, CallValue, ContractHandle},
    error::MatcherError,
    matchers::Expectation,
    state::AssertionState,
};

/// Starts an assertion chain over a contract.
pub fn expect<'a>(contract: &'a ContractHandle, transport: &'a dyn CallTransport) -> Expect<'a> {
    Expect {
        contract,
        transport,
    }
}

/// Factory for pending assertions on one contract. Each `read`/`write`/
/// `transaction` invocation produces an independent [`Expectation`] with its
/// own assertion state.
#[derive(Clone, Copy)]
pub struct Expect<'a> {
    contract: &'a ContractHandle,
    transport: &'a dyn CallTransport,
}

impl<'a> Expect<'a> {
    /// Registers a read (`view`/`pure`) invocation. The function must exist
    /// in the ABI and be readable; both are checked here, once, before
    /// anything is awaited.
    pub fn read(
        &self,
        function: &str,
        args: Vec<DynSolValue>,
    ) -> Result<Expectation<'a>, MatcherError> {
        let item = self
            .contract
            .abi
            .function(function)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| MatcherError::UnknownFunction(function.to_string()))?;
        if !matches!(
            item.state_mutability,
            StateMutability::View | StateMutability::Pure
        ) {
            return Err(MatcherError::NotAReadFunction {
                function: function.to_string(),
            });
        }

        let call = self.transport.read(self.contract, function, &args);
        let result: BoxFuture<'static, Result<CallValue, CallError>> =
            Box::pin(async move { call.await.map(CallValue::Return) });
        Ok(self.expectation(CallHandle::read(result), false))
    }

    /// Registers a state-mutating invocation.
    pub fn write(
        &self,
        function: &str,
        args: Vec<DynSolValue>,
    ) -> Result<Expectation<'a>, MatcherError> {
        let item = self
            .contract
            .abi
            .function(function)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| MatcherError::UnknownFunction(function.to_string()))?;
        if !matches!(
            item.state_mutability,
            StateMutability::NonPayable | StateMutability::Payable
        ) {
            return Err(MatcherError::NotAWriteFunction {
                function: function.to_string(),
            });
        }

        let call = self.transport.write(self.contract, function, &args);
        let result: BoxFuture<'static, Result<CallValue, CallError>> =
            Box::pin(async move { call.await.map(CallValue::Hash) });
        Ok(self.expectation(CallHandle::write(result), false))
    }

    /// Seeds the chain from an already-known transaction hash. A raw hash
    /// carries no information about whether the originating call reverted,
    /// so only event matchers may follow.
    pub fn transaction(&self, hash: TxHash) -> Expectation<'a> {
        self.expectation(CallHandle::from_hash(hash), true)
    }

    /// Seeds the chain from a pending transaction future; behaves like a
    /// `write` call.
    pub fn transaction_future(
        &self,
        pending: BoxFuture<'static, Result<TxHash, CallError>>,
    ) -> Expectation<'a> {
        let result: BoxFuture<'static, Result<CallValue, CallError>> =
            Box::pin(async move { pending.await.map(CallValue::Hash) });
        self.expectation(CallHandle::write(result), false)
    }

    fn expectation(&self, call: CallHandle, hash_only: bool) -> Expectation<'a> {
        Expectation::new(
            self.contract.clone(),
            self.transport,
            AssertionState {
                hash_only,
                pending_call: Some(call),
                ..Default::default()
            },
        )
    }
}

//! Pending contract invocations and the transport capability they settle
//! through.
//!
//! The engine never talks to a chain itself: reads, writes and receipt
//! lookups are injected through [`CallTransport`], and a pending invocation
//! is just a boxed future tagged with its [`CallKind`].

use std::fmt;

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes, Log, TxHash};
use futures::future::BoxFuture;

/// A resolved contract: its ABI and deployed address.
#[derive(Debug, Clone)]
pub struct ContractHandle {
    pub abi: JsonAbi,
    pub address: Address,
}

impl ContractHandle {
    pub fn new(abi: JsonAbi, address: Address) -> Self {
        Self { abi, address }
    }
}

/// Whether a call is a state read or a state-mutating transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Read,
    Write,
}

/// The success value of a settled call: a decoded return value for reads,
/// a transaction hash for writes.
#[derive(Debug, Clone)]
pub enum CallValue {
    Return(DynSolValue),
    Hash(TxHash),
}

/// A failed call as surfaced by the transport.
///
/// `Reverted` carries the raw revert return data (possibly empty).
/// `Transport` is any failure that exposes no revert data; it classifies as
/// an unknown local error and is always re-raised, never asserted on.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CallError {
    #[error("call reverted")]
    Reverted { data: Bytes },
    #[error("transport error: {0}")]
    Transport(String),
}

/// One pending contract invocation, consumed exactly once by a terminal
/// matcher.
pub struct CallHandle {
    kind: CallKind,
    result: BoxFuture<'static, Result<CallValue, CallError>>,
}

impl CallHandle {
    pub fn read(result: BoxFuture<'static, Result<CallValue, CallError>>) -> Self {
        Self {
            kind: CallKind::Read,
            result,
        }
    }

    pub fn write(result: BoxFuture<'static, Result<CallValue, CallError>>) -> Self {
        Self {
            kind: CallKind::Write,
            result,
        }
    }

    /// A handle seeded directly from an already-known transaction hash.
    pub fn from_hash(hash: TxHash) -> Self {
        Self {
            kind: CallKind::Write,
            result: Box::pin(std::future::ready(Ok(CallValue::Hash(hash)))),
        }
    }

    pub fn kind(&self) -> CallKind {
        self.kind
    }

    /// Awaits the underlying invocation. Suspends at most once.
    pub(crate) async fn settle(self) -> Result<CallValue, CallError> {
        self.result.await
    }
}

impl fmt::Debug for CallHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallHandle")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Post-execution status of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// The slice of a transaction receipt the engine needs.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    pub status: ReceiptStatus,
    pub logs: Vec<Log>,
}

/// The capabilities the engine consumes from its environment: opaque call
/// invokers and a receipt lookup. ABI decoding is not part of this trait;
/// it comes from the alloy crates.
pub trait CallTransport: Send + Sync {
    fn read(
        &self,
        contract: &ContractHandle,
        function: &str,
        args: &[DynSolValue],
    ) -> BoxFuture<'static, Result<DynSolValue, CallError>>;

    fn write(
        &self,
        contract: &ContractHandle,
        function: &str,
        args: &[DynSolValue],
    ) -> BoxFuture<'static, Result<TxHash, CallError>>;

    fn receipt(&self, hash: TxHash) -> BoxFuture<'static, Result<Option<TxReceipt>, CallError>>;
}

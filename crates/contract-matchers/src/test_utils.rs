//! Fixtures for exercising the engine without a live chain: a canned
//! transport, an ABI with the errors/events the tests revert with and emit,
//! and encoders for revert payloads and logs.

use std::collections::HashMap;

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::JsonAbi;
use alloy_primitives::{keccak256, Address, Bytes, Log, LogData, TxHash, B256, U256};
use alloy_sol_types::{Panic, Revert, SolError};
use futures::future::BoxFuture;

use crate::call::{
    CallError, CallTransport, ContractHandle, ReceiptStatus, TxReceipt,
};

pub fn uint(value: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 256)
}

pub fn test_abi() -> JsonAbi {
    serde_json::from_str(
        r#"[
        {
            "type": "function",
            "name": "readNumber",
            "inputs": [],
            "outputs": [{ "name": "", "type": "uint256", "internalType": "uint256" }],
            "stateMutability": "view"
        },
        {
            "type": "function",
            "name": "doTransfer",
            "inputs": [],
            "outputs": [],
            "stateMutability": "nonpayable"
        },
        {
            "type": "error",
            "name": "SomeCustomError",
            "inputs": [
                { "name": "code", "type": "uint256", "internalType": "uint256" },
                { "name": "value", "type": "uint256", "internalType": "uint256" }
            ]
        },
        {
            "type": "error",
            "name": "AnotherCustomError",
            "inputs": [{ "name": "code", "type": "uint256", "internalType": "uint256" }]
        },
        {
            "type": "event",
            "name": "WithUintArg",
            "inputs": [
                { "name": "u", "type": "uint256", "indexed": false, "internalType": "uint256" }
            ],
            "anonymous": false
        },
        {
            "type": "event",
            "name": "WithTwoUintArgs",
            "inputs": [
                { "name": "u", "type": "uint256", "indexed": false, "internalType": "uint256" },
                { "name": "v", "type": "uint256", "indexed": false, "internalType": "uint256" }
            ],
            "anonymous": false
        },
        {
            "type": "event",
            "name": "WithIndexedAddress",
            "inputs": [
                { "name": "addr", "type": "address", "indexed": true, "internalType": "address" },
                { "name": "amount", "type": "uint256", "indexed": false, "internalType": "uint256" }
            ],
            "anonymous": false
        }
    ]"#,
    )
    .expect("fixture ABI parses")
}

pub fn test_contract() -> ContractHandle {
    ContractHandle::new(test_abi(), Address::with_last_byte(0x42))
}

pub fn revert_with_data(data: Bytes) -> CallError {
    CallError::Reverted { data }
}

/// `Error(string)` revert payload.
pub fn revert_with_reason(reason: &str) -> CallError {
    CallError::Reverted {
        data: Revert::from(reason).abi_encode().into(),
    }
}

/// `Panic(uint256)` revert payload.
pub fn revert_with_panic(code: u64) -> CallError {
    CallError::Reverted {
        data: Panic {
            code: U256::from(code),
        }
        .abi_encode()
        .into(),
    }
}

/// Selector-prefixed payload for a user-defined error from the ABI.
pub fn revert_with_custom_error(abi: &JsonAbi, name: &str, args: &[DynSolValue]) -> CallError {
    let error = abi
        .error(name)
        .and_then(|overloads| overloads.first())
        .expect("error declared in fixture ABI");
    let mut data = error.selector().to_vec();
    data.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
    CallError::Reverted { data: data.into() }
}

pub fn receipt(hash: TxHash, status: ReceiptStatus, logs: Vec<Log>) -> TxReceipt {
    TxReceipt {
        transaction_hash: hash,
        status,
        logs,
    }
}

/// Encodes a log entry for the named event, splitting args into topics and
/// body data according to the ABI's `indexed` flags.
pub fn event_log(contract: &ContractHandle, event: &str, args: &[DynSolValue]) -> Log {
    let event = contract
        .abi
        .event(event)
        .and_then(|overloads| overloads.first())
        .expect("event declared in fixture ABI");
    let mut topics = vec![event.selector()];
    let mut body = Vec::new();
    for (param, value) in event.inputs.iter().zip(args) {
        if param.indexed {
            topics.push(topic_for(value));
        } else {
            body.push(value.clone());
        }
    }
    let data = DynSolValue::Tuple(body).abi_encode_params();
    Log {
        address: contract.address,
        data: LogData::new_unchecked(topics, data.into()),
    }
}

fn topic_for(value: &DynSolValue) -> B256 {
    match value {
        DynSolValue::Uint(u, _) => B256::from(*u),
        DynSolValue::Address(address) => address.into_word(),
        DynSolValue::Bool(b) => B256::with_last_byte(*b as u8),
        DynSolValue::FixedBytes(word, _) => *word,
        other => keccak256(other.abi_encode()),
    }
}

/// A transport with canned outcomes: one read result, one write result and a
/// set of receipts keyed by hash.
#[derive(Default)]
pub struct MockTransport {
    read_outcome: Option<Result<DynSolValue, CallError>>,
    write_outcome: Option<Result<TxHash, CallError>>,
    receipts: HashMap<TxHash, TxReceipt>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read(mut self, outcome: Result<DynSolValue, CallError>) -> Self {
        self.read_outcome = Some(outcome);
        self
    }

    pub fn with_write(mut self, outcome: Result<TxHash, CallError>) -> Self {
        self.write_outcome = Some(outcome);
        self
    }

    pub fn with_receipt(mut self, receipt: TxReceipt) -> Self {
        self.receipts.insert(receipt.transaction_hash, receipt);
        self
    }
}

impl CallTransport for MockTransport {
    fn read(
        &self,
        _contract: &ContractHandle,
        _function: &str,
        _args: &[DynSolValue],
    ) -> BoxFuture<'static, Result<DynSolValue, CallError>> {
        let outcome = self
            .read_outcome
            .clone()
            .unwrap_or_else(|| Err(CallError::Transport("no read outcome configured".into())));
        Box::pin(std::future::ready(outcome))
    }

    fn write(
        &self,
        _contract: &ContractHandle,
        _function: &str,
        _args: &[DynSolValue],
    ) -> BoxFuture<'static, Result<TxHash, CallError>> {
        let outcome = self
            .write_outcome
            .clone()
            .unwrap_or_else(|| Err(CallError::Transport("no write outcome configured".into())));
        Box::pin(std::future::ready(outcome))
    }

    fn receipt(&self, hash: TxHash) -> BoxFuture<'static, Result<Option<TxReceipt>, CallError>> {
        let receipt = self.receipts.get(&hash).cloned();
        Box::pin(std::future::ready(Ok(receipt)))
    }
}

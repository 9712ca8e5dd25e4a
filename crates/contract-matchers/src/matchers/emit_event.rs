//! `to_emit_event` and `to_emit_event_from`: receipt log inspection.

use std::future::IntoFuture;

use alloy_dyn_abi::{DynSolValue, EventExt};
use alloy_json_abi::Event;
use alloy_primitives::{Address, Log};
use futures::future::BoxFuture;

use super::Expectation;
use crate::{
    args::{fill_wildcards, format_expected, format_match_error, match_args, ExpectedArg},
    call::{CallValue, ContractHandle},
    error::MatcherError,
    state::{ChainingPolicy, MatcherName},
};

impl<'a> Expectation<'a> {
    /// Passes iff the governing transaction emitted the named event from the
    /// subject contract. Allowed on hash-seeded chains.
    pub fn to_emit_event(
        &mut self,
        event: &str,
    ) -> Result<EventExpectation<'_, 'a>, MatcherError> {
        let event = find_event(&self.contract, event)?;
        let emitter = self.contract.address;
        self.event_expectation(MatcherName::ToEmitEvent, emitter, event)
    }

    /// Like [`Self::to_emit_event`], but inspects logs emitted by a different
    /// contract than the one being called.
    pub fn to_emit_event_from(
        &mut self,
        contract: &ContractHandle,
        event: &str,
    ) -> Result<EventExpectation<'_, 'a>, MatcherError> {
        let event = find_event(contract, event)?;
        self.event_expectation(MatcherName::ToEmitEventFrom, contract.address, event)
    }

    fn event_expectation(
        &mut self,
        matcher: MatcherName,
        emitter: Address,
        event: Event,
    ) -> Result<EventExpectation<'_, 'a>, MatcherError> {
        self.state.guard(
            matcher,
            ChainingPolicy {
                allow_self_chain: false,
                allow_hash_only: true,
            },
        )?;
        Ok(EventExpectation {
            expectation: self,
            matcher,
            emitter,
            event,
        })
    }
}

/// Pending event-emission assertion. Await it directly, or attach expected
/// arguments first.
#[derive(Debug)]
pub struct EventExpectation<'e, 'a> {
    expectation: &'e mut Expectation<'a>,
    matcher: MatcherName,
    emitter: Address,
    event: Event,
}

impl EventExpectation<'_, '_> {
    /// Attaches the expected event arguments, in declaration order. Usable
    /// at most once per assertion chain.
    pub fn with_args(self, args: Vec<ExpectedArg>) -> Result<Self, MatcherError> {
        self.expectation.state.attach_args(self.matcher, args)?;
        Ok(self)
    }

    async fn run(self) -> Result<(), MatcherError> {
        let Self {
            expectation,
            matcher,
            emitter,
            event,
        } = self;
        let call = expectation.state.take_call(matcher)?;
        let verdict = expectation.verdict();
        let name = event.name.clone();

        // A reverted call cannot have emitted anything; no outcome
        // classification here.
        let value = match call.settle().await {
            Ok(value) => value,
            Err(_) => {
                return verdict.require(
                    false,
                    format!(
                        "Expected event \"{name}\" to be emitted, but the transaction reverted"
                    ),
                    format!("Expected event \"{name}\" NOT to be emitted"),
                );
            }
        };
        let hash = match value {
            CallValue::Hash(hash) => hash,
            CallValue::Return(_) => return Err(MatcherError::NoTransactionHash { matcher }),
        };

        let receipt = expectation
            .transport
            .receipt(hash)
            .await?
            .ok_or(MatcherError::MissingReceipt(hash))?;

        let selector = event.selector();
        let matching: Vec<&Log> = receipt
            .logs
            .iter()
            .filter(|log| {
                log.address == emitter && log.data.topics().first() == Some(&selector)
            })
            .collect();

        let expected_args = expectation.state.expected_args.as_deref();
        let (Some(expected_args), false) = (expected_args, matching.is_empty()) else {
            return verdict.require(
                !matching.is_empty(),
                format!("Expected event \"{name}\" to be emitted, but it wasn't"),
                format!("Expected event \"{name}\" NOT to be emitted, but it was"),
            );
        };

        let decoded = matching
            .iter()
            .map(|log| decode_event_args(&event, log))
            .collect::<Result<Vec<_>, _>>()?;
        let matched = decoded
            .iter()
            .any(|args| match_args(expected_args, Some(args)));

        if let [only] = decoded.as_slice() {
            let shown = fill_wildcards(expected_args, only);
            verdict.require(
                matched,
                format_match_error(
                    &format!("Expected event '{name}' to have args matching"),
                    &shown,
                    Some(only),
                ),
                format!(
                    "Expected event '{name}' NOT to have args matching [{}]",
                    format_expected(&shown)
                ),
            )
        } else {
            verdict.require(
                matched,
                format!(
                    "Expected event '{name}' to have args matching [{}]. {} \"{name}\" events were emitted, but none of them matched the specified arguments",
                    format_expected(expected_args),
                    decoded.len()
                ),
                format!(
                    "Expected event '{name}' NOT to have args matching [{}]",
                    format_expected(expected_args)
                ),
            )
        }
    }
}

impl<'e, 'a> IntoFuture for EventExpectation<'e, 'a> {
    type Output = Result<(), MatcherError>;
    type IntoFuture = BoxFuture<'e, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.run())
    }
}

fn find_event(contract: &ContractHandle, name: &str) -> Result<Event, MatcherError> {
    contract
        .abi
        .event(name)
        .and_then(|overloads| overloads.first())
        .cloned()
        .ok_or_else(|| MatcherError::UnknownEvent(name.to_string()))
}

/// Decodes a log against its event and reassembles the arguments in
/// declaration order (indexed and non-indexed params interleaved).
fn decode_event_args(event: &Event, log: &Log) -> Result<Vec<DynSolValue>, MatcherError> {
    let decoded = event.decode_log(&log.data)?;
    let mut indexed = decoded.indexed.into_iter();
    let mut body = decoded.body.into_iter();
    Ok(event
        .inputs
        .iter()
        .filter_map(|param| {
            if param.indexed {
                indexed.next()
            } else {
                body.next()
            }
        })
        .collect())
}

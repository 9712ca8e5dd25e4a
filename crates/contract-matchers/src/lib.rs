//! Assertion engine for smart-contract call outcomes.
//!
//! Normalizes low-level call failures into a canonical outcome taxonomy,
//! matches decoded arguments structurally with wildcard placeholders, and
//! drives a single-use, chainable assertion protocol: one terminal
//! expectation per pending call, with negation.
//!
//! ```no_run
//! # async fn example(
//! #     contract: contract_matchers::ContractHandle,
//! #     transport: &dyn contract_matchers::CallTransport,
//! # ) -> Result<(), contract_matchers::MatcherError> {
//! use contract_matchers::{any_value, expect};
//!
//! let mut assertion = expect(&contract, transport).write("transfer", vec![])?;
//! assertion
//!     .to_be_reverted_with_custom_error("InsufficientBalance")?
//!     .with_args(vec![any_value()])?
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub use error::MatcherError;

pub mod constants;
pub use constants::panic_reason;

pub mod call;
pub use call::{
    CallError, CallHandle, CallKind, CallTransport, CallValue, ContractHandle, ReceiptStatus,
    TxReceipt,
};

pub mod outcome;
pub use outcome::{classify, CallOutcome};

pub mod args;
pub use args::{any_value, match_args, ExpectedArg};

mod state;
pub use state::MatcherName;

mod expect;
pub use expect::{expect, Expect};

pub mod matchers;
pub use matchers::{CustomErrorExpectation, EventExpectation, Expectation, RevertReason};

#[cfg(any(test, feature = "test"))]
pub mod test_utils;

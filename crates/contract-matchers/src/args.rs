//! Structural argument matching with wildcard placeholders.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::hex;

/// An expected argument: either a concrete value compared by deep structural
/// equality, or a wildcard that matches anything at its position.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedArg {
    Value(DynSolValue),
    Any,
}

/// The wildcard marker.
pub fn any_value() -> ExpectedArg {
    ExpectedArg::Any
}

impl ExpectedArg {
    pub fn matches(&self, actual: &DynSolValue) -> bool {
        match self {
            Self::Any => true,
            // DynSolValue equality is structural: big integers by value,
            // tuples and arrays recursively.
            Self::Value(expected) => expected == actual,
        }
    }
}

impl From<DynSolValue> for ExpectedArg {
    fn from(value: DynSolValue) -> Self {
        Self::Value(value)
    }
}

/// Positional comparison of an expected argument list against actual decoded
/// arguments. Absent actuals or a length mismatch never match.
pub fn match_args(expected: &[ExpectedArg], actual: Option<&[DynSolValue]>) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual)
            .all(|(expected, actual)| expected.matches(actual))
}

/// Substitutes wildcard positions with the actual values observed at those
/// positions, so diagnostics echo concrete values instead of the sentinel.
pub fn fill_wildcards(expected: &[ExpectedArg], actual: &[DynSolValue]) -> Vec<ExpectedArg> {
    expected
        .iter()
        .enumerate()
        .map(|(i, arg)| match arg {
            ExpectedArg::Any => actual
                .get(i)
                .cloned()
                .map_or(ExpectedArg::Any, ExpectedArg::Value),
            concrete => concrete.clone(),
        })
        .collect()
}

pub(crate) fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => format!("0x{}", hex::encode(&word[..*size])),
        DynSolValue::Address(address) => address.to_string(),
        DynSolValue::Function(function) => function.to_string(),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => format!("\"{s}\""),
        DynSolValue::Array(values) | DynSolValue::FixedArray(values) => {
            format!("[{}]", format_values(values))
        }
        DynSolValue::Tuple(values) => format!("({})", format_values(values)),
    }
}

pub(crate) fn format_values(values: &[DynSolValue]) -> String {
    values
        .iter()
        .map(format_value)
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn format_expected(expected: &[ExpectedArg]) -> String {
    expected
        .iter()
        .map(|arg| match arg {
            ExpectedArg::Any => "any".to_string(),
            ExpectedArg::Value(value) => format_value(value),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Expected-vs-actual diff appended to argument-mismatch reports.
pub(crate) fn format_match_error(
    msg: &str,
    expected: &[ExpectedArg],
    actual: Option<&[DynSolValue]>,
) -> String {
    let actual = actual.map_or_else(|| "<none>".to_string(), format_values);
    format!(
        "{msg}\n  - actual:   [{actual}]\n  + expected: [{}]",
        format_expected(expected)
    )
}

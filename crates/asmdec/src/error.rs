//! Error type for operand parsing, size resolution and dispatch.

use alloc::string::String;
use core::fmt;

/// Evaluation error.
///
/// Every variant is reported synchronously to the caller; the evaluator never
/// returns a partial result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AsmDecError {
    /// An operand string is not a valid integer literal.
    Parse {
        /// The literal as supplied by the caller.
        literal: String,
        /// Why the literal was rejected.
        reason: &'static str,
    },

    /// A size designator is not made of the letters `l`, `h`, `w`, `d`, `q`.
    InvalidSize {
        /// The designator as supplied by the caller.
        designator: String,
        /// Why the designator was rejected.
        reason: &'static str,
    },

    /// The mnemonic is not one the evaluator implements.
    UnsupportedOperation {
        /// The mnemonic that was not recognized.
        mnemonic: String,
    },

    /// A binary mnemonic was dispatched without its second operand.
    MissingOperand {
        /// The binary mnemonic.
        mnemonic: String,
    },
}

impl fmt::Display for AsmDecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmDecError::Parse { literal, reason } => {
                write!(f, "invalid integer literal '{}': {}", literal, reason)
            }
            AsmDecError::InvalidSize { designator, reason } => {
                write!(f, "invalid size designator '{}': {}", designator, reason)
            }
            AsmDecError::UnsupportedOperation { mnemonic } => {
                write!(f, "unsupported operation '{}'", mnemonic)
            }
            AsmDecError::MissingOperand { mnemonic } => {
                write!(f, "'{}' takes two operands, only one was given", mnemonic)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AsmDecError {}

//! Error types.
//!
//! Conversion itself never fails: [`crate::Converter::convert`] always returns
//! a best-effort string. Errors surface only where a caller needs to tell
//! "nothing to extract" apart from a result.

use crate::convert::Format;

/// Why an extraction produced no result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// The picker walked to the root without finding a qualifying element
    #[error("no element qualifies for extraction")]
    NoCandidateElement,

    /// Conversion ran but produced only whitespace
    #[error("no text content found ({format})")]
    EmptyExtraction { format: Format },

    /// A node path that does not resolve inside the given tree
    #[error("node path does not resolve: {0:?}")]
    InvalidPath(Vec<usize>),
}

/// Style information on a node could not be read.
///
/// The walkers swallow this and treat the node as visible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    #[error("computed style property `{0}` has no value")]
    UnpairedProperty(String),
}

pub type Result<T> = std::result::Result<T, ExtractError>;

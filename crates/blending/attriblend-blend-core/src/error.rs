//! Preparation-phase errors. The hot path never returns errors; numeric edge
//! cases (zero divisors, zero total weight) recover locally instead.

use attriblend_api_core::AttrKind;
use thiserror::Error;

use crate::modes::BlendMode;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepareError {
    #[error("could not infer an output type for the operation")]
    TypeInferenceFailed,

    #[error("blend mode {mode:?} is not supported for kind {kind:?}")]
    UnsupportedModeForKind { mode: BlendMode, kind: AttrKind },

    #[error("#Previous used on the first operation of the stack")]
    NoPreviousOperation,

    #[error("operation {index} references itself")]
    SelfReferenceNotAllowed { index: usize },

    #[error("sibling index {index} is out of range for a stack of {len} (only backward references are allowed)")]
    InvalidSiblingIndex { index: usize, len: usize },

    #[error("only attributes and point properties can be blended")]
    OnlyAttributesAndPropertiesSupported,

    #[error("attribute {name:?} does not exist on the source data")]
    MissingAttribute { name: String },

    #[error("operand and output streams resolved to different working kinds")]
    WorkingKindMismatch,

    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}

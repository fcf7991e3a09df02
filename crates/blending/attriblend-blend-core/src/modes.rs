//! Blend-mode enums and the predicates driving the multi-source protocol.

use serde::{Deserialize, Serialize};

/// The full blend-mode surface. `None` keeps the target value untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    None,
    Average,
    Weight,
    Multiply,
    Divide,
    Min,
    Max,
    /// Output B (the value already on the target)
    CopyTarget,
    /// Output A (the incoming source value)
    CopySource,
    Add,
    Subtract,
    /// A + B * w
    WeightedAdd,
    /// A - B * w
    WeightedSubtract,
    Lerp,
    /// Smaller magnitude wins, winner keeps its sign
    UnsignedMin,
    /// Greater magnitude wins, winner keeps its sign
    UnsignedMax,
    /// Smaller magnitude wins, output is the magnitude
    AbsoluteMin,
    /// Greater magnitude wins, output is the magnitude
    AbsoluteMax,
    Hash,
    /// Order-independent hash (operands sorted first)
    UnsignedHash,
    /// fmod(A, B flattened to a scalar)
    Mod,
    /// Component-wise fmod(A, B)
    ModCW,
    WeightNormalize,
    GeometricMean,
    HarmonicMean,
    Rms,
    /// Threshold select: w < 0.5 keeps A, else B
    Step,
}

impl BlendMode {
    /// Modes whose pairwise result depends on the weight argument.
    #[inline]
    pub fn requires_weight(self) -> bool {
        matches!(
            self,
            BlendMode::Lerp
                | BlendMode::Weight
                | BlendMode::WeightedAdd
                | BlendMode::WeightedSubtract
                | BlendMode::WeightNormalize
                | BlendMode::Step
        )
    }

    /// Modes where multi-source accumulation starts by copying the first
    /// contributor raw instead of folding into the pre-existing target value.
    #[inline]
    pub fn init_with_source(self) -> bool {
        matches!(
            self,
            BlendMode::Min
                | BlendMode::Max
                | BlendMode::UnsignedMin
                | BlendMode::UnsignedMax
                | BlendMode::AbsoluteMin
                | BlendMode::AbsoluteMax
                | BlendMode::Hash
                | BlendMode::UnsignedHash
        )
    }

    /// Modes where the pre-existing target value may count as a contribution
    /// (weight 1) unless the accumulator is reset first.
    #[inline]
    pub fn consider_original(self) -> bool {
        matches!(
            self,
            BlendMode::Average
                | BlendMode::Add
                | BlendMode::Subtract
                | BlendMode::Weight
                | BlendMode::WeightedAdd
                | BlendMode::WeightedSubtract
                | BlendMode::GeometricMean
                | BlendMode::HarmonicMean
                | BlendMode::Rms
        )
    }
}

/// The serialized legacy mode set. Kept 1:1 convertible so older
/// configurations keep loading; `Unset` exists only as a sentinel and is the
/// default for configs that never picked a mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegacyBlendMode {
    None,
    Average,
    Weight,
    Min,
    Max,
    Copy,
    Sum,
    WeightedSum,
    Lerp,
    Subtract,
    UnsignedMin,
    UnsignedMax,
    AbsoluteMin,
    AbsoluteMax,
    WeightedSubtract,
    CopyOther,
    Hash,
    UnsignedHash,
    WeightNormalize,
    #[default]
    Unset,
}

impl From<LegacyBlendMode> for BlendMode {
    fn from(legacy: LegacyBlendMode) -> BlendMode {
        match legacy {
            LegacyBlendMode::None | LegacyBlendMode::Unset => BlendMode::None,
            LegacyBlendMode::Average => BlendMode::Average,
            LegacyBlendMode::Weight => BlendMode::Weight,
            LegacyBlendMode::Min => BlendMode::Min,
            LegacyBlendMode::Max => BlendMode::Max,
            LegacyBlendMode::Copy => BlendMode::CopyTarget,
            LegacyBlendMode::Sum => BlendMode::Add,
            LegacyBlendMode::WeightedSum => BlendMode::WeightedAdd,
            LegacyBlendMode::Lerp => BlendMode::Lerp,
            LegacyBlendMode::Subtract => BlendMode::Subtract,
            LegacyBlendMode::UnsignedMin => BlendMode::UnsignedMin,
            LegacyBlendMode::UnsignedMax => BlendMode::UnsignedMax,
            LegacyBlendMode::AbsoluteMin => BlendMode::AbsoluteMin,
            LegacyBlendMode::AbsoluteMax => BlendMode::AbsoluteMax,
            LegacyBlendMode::WeightedSubtract => BlendMode::WeightedSubtract,
            LegacyBlendMode::CopyOther => BlendMode::CopySource,
            LegacyBlendMode::Hash => BlendMode::Hash,
            LegacyBlendMode::UnsignedHash => BlendMode::UnsignedHash,
            LegacyBlendMode::WeightNormalize => BlendMode::WeightNormalize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_table_is_exhaustive() {
        let table = [
            (LegacyBlendMode::None, BlendMode::None),
            (LegacyBlendMode::Average, BlendMode::Average),
            (LegacyBlendMode::Weight, BlendMode::Weight),
            (LegacyBlendMode::Min, BlendMode::Min),
            (LegacyBlendMode::Max, BlendMode::Max),
            (LegacyBlendMode::Copy, BlendMode::CopyTarget),
            (LegacyBlendMode::Sum, BlendMode::Add),
            (LegacyBlendMode::WeightedSum, BlendMode::WeightedAdd),
            (LegacyBlendMode::Lerp, BlendMode::Lerp),
            (LegacyBlendMode::Subtract, BlendMode::Subtract),
            (LegacyBlendMode::UnsignedMin, BlendMode::UnsignedMin),
            (LegacyBlendMode::UnsignedMax, BlendMode::UnsignedMax),
            (LegacyBlendMode::AbsoluteMin, BlendMode::AbsoluteMin),
            (LegacyBlendMode::AbsoluteMax, BlendMode::AbsoluteMax),
            (LegacyBlendMode::WeightedSubtract, BlendMode::WeightedSubtract),
            (LegacyBlendMode::CopyOther, BlendMode::CopySource),
            (LegacyBlendMode::Hash, BlendMode::Hash),
            (LegacyBlendMode::UnsignedHash, BlendMode::UnsignedHash),
            (LegacyBlendMode::WeightNormalize, BlendMode::WeightNormalize),
            (LegacyBlendMode::Unset, BlendMode::None),
        ];
        for (legacy, expected) in table {
            assert_eq!(BlendMode::from(legacy), expected, "{legacy:?}");
        }
    }

    #[test]
    fn unset_is_the_default_legacy_mode() {
        assert_eq!(LegacyBlendMode::default(), LegacyBlendMode::Unset);
        assert_eq!(BlendMode::from(LegacyBlendMode::default()), BlendMode::None);
    }

    #[test]
    fn protocol_flags() {
        assert!(BlendMode::Min.init_with_source());
        assert!(BlendMode::UnsignedHash.init_with_source());
        assert!(!BlendMode::Average.init_with_source());
        assert!(BlendMode::Average.consider_original());
        assert!(BlendMode::WeightedSubtract.consider_original());
        assert!(!BlendMode::Lerp.consider_original());
        assert!(BlendMode::Lerp.requires_weight());
        assert!(!BlendMode::Add.requires_weight());
    }
}

/*!
The individual validation stages a [`Pipeline`][crate::Pipeline] composes.

Every stage is pure, deterministic, and idempotent on its own output, with
one deliberate exception: [`DecodingStage`] decodes exactly once, so that a
pipeline performs a single, well-defined decoding round and can name
anything that survives it as double encoding.
*/

use crate::SecurityError;

mod length;
pub use length::LengthStage;

mod decoding;
pub use decoding::DecodingStage;

mod character;
pub use character::CharacterStage;

mod normalization;
pub use normalization::NormalizationStage;

mod pattern;
pub use pattern::PatternStage;

mod cookie_prefix;
pub use cookie_prefix::CookiePrefixStage;

/// One step of a validation pipeline.
///
/// Absent input propagates as absent; present input either passes through
/// (possibly rewritten into a canonical form) or stops the pipeline with a
/// [`SecurityError`].
pub trait Stage: Send + Sync {
    /// validate `input`, producing the text the next stage will see
    fn apply(&self, input: Option<&str>) -> Result<Option<String>, SecurityError>;
}

//! Text masking policies.
//!
//! Policies are pure string transformations over Unicode scalar values. They
//! know nothing about attributes, gates or storage.

use std::borrow::Cow;

use super::{MaskContext, Masker};
use crate::masked::MaskedValue;

/// Default token produced by full masking.
pub const REDACTED: &str = "(redacted)";

/// Default symbol used by partial policies.
pub const MASK_CHAR: char = '*';

/// Keeps leading and/or trailing characters visible and masks the rest.
///
/// If the visible spans cover the whole value, it is returned unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeepConfig {
    visible_prefix: usize,
    visible_suffix: usize,
    mask_char: char,
}

impl KeepConfig {
    #[must_use]
    pub fn first(visible_prefix: usize) -> Self {
        Self::both(visible_prefix, 0)
    }

    #[must_use]
    pub fn last(visible_suffix: usize) -> Self {
        Self::both(0, visible_suffix)
    }

    #[must_use]
    pub fn both(visible_prefix: usize, visible_suffix: usize) -> Self {
        Self {
            visible_prefix,
            visible_suffix,
            mask_char: MASK_CHAR,
        }
    }

    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    fn apply_to(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let total = chars.len();
        if self.visible_prefix.saturating_add(self.visible_suffix) < total {
            chars[self.visible_prefix..total - self.visible_suffix].fill(self.mask_char);
        }
        chars.into_iter().collect()
    }
}

/// Masks leading and/or trailing characters and keeps the middle visible.
///
/// If the masked spans cover the whole value, every character is masked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskConfig {
    masked_prefix: usize,
    masked_suffix: usize,
    mask_char: char,
}

impl MaskConfig {
    #[must_use]
    pub fn first(masked_prefix: usize) -> Self {
        Self::both(masked_prefix, 0)
    }

    #[must_use]
    pub fn last(masked_suffix: usize) -> Self {
        Self::both(0, masked_suffix)
    }

    #[must_use]
    pub fn both(masked_prefix: usize, masked_suffix: usize) -> Self {
        Self {
            masked_prefix,
            masked_suffix,
            mask_char: MASK_CHAR,
        }
    }

    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    fn apply_to(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let total = chars.len();
        if self.masked_prefix.saturating_add(self.masked_suffix) >= total {
            chars.fill(self.mask_char);
        } else {
            chars[..self.masked_prefix].fill(self.mask_char);
            chars[total - self.masked_suffix..].fill(self.mask_char);
        }
        chars.into_iter().collect()
    }
}

/// A masking strategy for text values.
///
/// Marshaled (binary) input is read as lossy UTF-8 before the policy applies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextMaskPolicy {
    /// Replace the whole value with a placeholder.
    Full { placeholder: Cow<'static, str> },
    Keep(KeepConfig),
    Mask(MaskConfig),
}

impl TextMaskPolicy {
    /// Full masking with [`REDACTED`].
    #[must_use]
    pub fn redacted() -> Self {
        Self::Full {
            placeholder: Cow::Borrowed(REDACTED),
        }
    }

    #[must_use]
    pub fn full_with(placeholder: impl Into<Cow<'static, str>>) -> Self {
        Self::Full {
            placeholder: placeholder.into(),
        }
    }

    #[must_use]
    pub fn keep_first(visible_prefix: usize) -> Self {
        Self::Keep(KeepConfig::first(visible_prefix))
    }

    #[must_use]
    pub fn keep_last(visible_suffix: usize) -> Self {
        Self::Keep(KeepConfig::last(visible_suffix))
    }

    #[must_use]
    pub fn mask_first(masked_prefix: usize) -> Self {
        Self::Mask(MaskConfig::first(masked_prefix))
    }

    #[must_use]
    pub fn mask_last(masked_suffix: usize) -> Self {
        Self::Mask(MaskConfig::last(masked_suffix))
    }

    /// Overrides the mask character. Has no effect on [`TextMaskPolicy::Full`].
    #[must_use]
    pub fn with_mask_char(self, mask_char: char) -> Self {
        match self {
            Self::Full { .. } => self,
            Self::Keep(config) => Self::Keep(config.with_mask_char(mask_char)),
            Self::Mask(config) => Self::Mask(config.with_mask_char(mask_char)),
        }
    }

    #[must_use]
    pub fn apply_to(&self, value: &str) -> String {
        match self {
            Self::Full { placeholder } => placeholder.clone().into_owned(),
            Self::Keep(config) => config.apply_to(value),
            Self::Mask(config) => config.apply_to(value),
        }
    }
}

impl Default for TextMaskPolicy {
    fn default() -> Self {
        Self::redacted()
    }
}

impl Masker for TextMaskPolicy {
    fn name(&self) -> &str {
        "TextMaskPolicy"
    }

    fn mask(&self, _operation: &str, context: &MaskContext<'_>) -> MaskedValue {
        let text = String::from_utf8_lossy(context.value().as_bytes());
        MaskedValue::Text(self.apply_to(&text))
    }
}

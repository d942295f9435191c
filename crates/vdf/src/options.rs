//! Decoder policies.

use serde::{Deserialize, Serialize};

/// What to do when a key appears more than once in the same block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeys {
    /// The later value replaces the earlier one, keeping the earlier entry's
    /// position in the block.
    #[default]
    LastWins,
    /// The later value is ignored.
    FirstWins,
    /// Decoding fails with `ParseErrorKind::DuplicateKey`.
    Reject,
}

/// How keys are compared for lookups and duplicate detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMatch {
    #[default]
    Exact,
    /// ASCII case-insensitive, e.g. `AppID` matches `appid`.
    IgnoreAsciiCase,
}

impl KeyMatch {
    /// Returns true if the two keys are the same under this mode.
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            KeyMatch::Exact => a == b,
            KeyMatch::IgnoreAsciiCase => a.eq_ignore_ascii_case(b),
        }
    }
}

/// Options for `decode_with` and `parse_with`.
///
/// The default is `DuplicateKeys::LastWins` with `KeyMatch::Exact`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub duplicate_keys: DuplicateKeys,
    pub key_match: KeyMatch,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }

    pub fn key_match(mut self, mode: KeyMatch) -> Self {
        self.key_match = mode;
        self
    }
}

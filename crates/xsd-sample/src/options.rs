//! Generation options.
//!
//! Occurrence caps and the optional-presence probability are fixed policy
//! constants in [`crate::occurrence`]; only the knobs below vary per run.

use chrono::{DateTime, Utc};

/// Default maximum element nesting depth before content is truncated.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// How a `xs:choice` selects the alternative to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChoicePolicy {
    /// Always generate the first element alternative.
    #[default]
    FirstAlternative,
    /// Generate one alternative chosen uniformly at random.
    RandomAlternative,
}

/// Options for one generation run.
///
/// # Example
///
/// ```
/// use xsd_sample::{ChoicePolicy, GenerationOptions};
///
/// let options = GenerationOptions::new()
///     .with_root("Document")
///     .with_seed(42)
///     .with_choice_policy(ChoicePolicy::RandomAlternative);
///
/// assert_eq!(options.root(), Some("Document"));
/// assert_eq!(options.seed(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    root: Option<String>,
    seed: Option<u64>,
    choice_policy: ChoicePolicy,
    max_depth: usize,
    reference_time: DateTime<Utc>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            root: None,
            seed: None,
            choice_policy: ChoicePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            reference_time: Utc::now(),
        }
    }
}

impl GenerationOptions {
    /// Creates options with defaults: first global element as root, a random
    /// seed, first-alternative choices, and the current time as reference.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the global element to generate.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Fixes the random seed, making the run reproducible.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the choice selection policy.
    #[must_use]
    pub const fn with_choice_policy(mut self, policy: ChoicePolicy) -> Self {
        self.choice_policy = policy;
        self
    }

    /// Sets the maximum element nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the instant date and time values are derived from.
    #[must_use]
    pub const fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = reference_time;
        self
    }

    /// Returns the requested root element name.
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Returns the fixed seed, if any.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the choice selection policy.
    #[must_use]
    pub const fn choice_policy(&self) -> ChoicePolicy {
        self.choice_policy
    }

    /// Returns the maximum element nesting depth.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the reference instant for temporal values.
    #[must_use]
    pub const fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_documented_policy() {
        let options = GenerationOptions::new();

        assert_eq!(options.root(), None);
        assert_eq!(options.seed(), None);
        assert_eq!(options.choice_policy(), ChoicePolicy::FirstAlternative);
        assert_eq!(options.max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn builder_overrides_each_knob() {
        let options = GenerationOptions::new()
            .with_root("Invoice")
            .with_seed(9)
            .with_max_depth(4)
            .with_choice_policy(ChoicePolicy::RandomAlternative);

        assert_eq!(options.root(), Some("Invoice"));
        assert_eq!(options.seed(), Some(9));
        assert_eq!(options.max_depth(), 4);
        assert_eq!(options.choice_policy(), ChoicePolicy::RandomAlternative);
    }
}

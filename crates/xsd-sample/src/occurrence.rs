//! Occurrence bounds and the sampling policy that picks instance counts.
//!
//! Unbounded particles produce at most [`UNBOUNDED_OCCURRENCE_CAP`] instances.
//! Optional particles appear with probability
//! [`OPTIONAL_PRESENCE_PROBABILITY`].

use rand::Rng;

use crate::error::SchemaError;
use crate::schema::SchemaNode;

/// Upper bound on instances generated for a `maxOccurs="unbounded"` particle.
pub const UNBOUNDED_OCCURRENCE_CAP: u32 = 2;

/// Probability that an optional (`minOccurs="0" maxOccurs="1"`) particle is
/// generated.
pub const OPTIONAL_PRESENCE_PROBABILITY: f64 = 0.5;

/// The declared maximum number of occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    /// A finite maximum.
    Bounded(u32),
    /// `maxOccurs="unbounded"`.
    Unbounded,
}

/// Declared `minOccurs`/`maxOccurs` of a particle.
///
/// The minimum never exceeds a finite maximum.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use xsd_sample::{MaxOccurs, OccurrenceBounds};
///
/// let bounds = OccurrenceBounds::new(1, MaxOccurs::Unbounded).expect("valid bounds");
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let count = bounds.sample(&mut rng);
///
/// assert!((1..=2).contains(&count));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceBounds {
    min: u32,
    max: MaxOccurs,
}

impl Default for OccurrenceBounds {
    fn default() -> Self {
        Self::EXACTLY_ONE
    }
}

impl OccurrenceBounds {
    /// The XSD default of `minOccurs="1" maxOccurs="1"`.
    pub const EXACTLY_ONE: Self = Self {
        min: 1,
        max: MaxOccurs::Bounded(1),
    };

    /// Creates bounds, returning `None` when `min` exceeds a finite `max`.
    #[must_use]
    pub const fn new(min: u32, max: MaxOccurs) -> Option<Self> {
        match max {
            MaxOccurs::Bounded(limit) if min > limit => None,
            _ => Some(Self { min, max }),
        }
    }

    /// Reads `minOccurs` and `maxOccurs` from a particle, defaulting each
    /// to 1.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidOccurrence`] when an attribute is not a
    /// non-negative integer (or `unbounded` for `maxOccurs`), and
    /// [`SchemaError::InvertedOccurrence`] when the minimum exceeds the
    /// maximum.
    pub fn from_declaration(declaration: &SchemaNode) -> Result<Self, SchemaError> {
        let label = || {
            declaration
                .name()
                .map(str::to_owned)
                .or_else(|| declaration.reference().map(ToString::to_string))
                .unwrap_or_else(|| declaration.tag().as_str().to_owned())
        };
        let invalid = |attribute: &'static str, value: &str| SchemaError::InvalidOccurrence {
            element: label(),
            attribute,
            value: value.to_owned(),
        };

        let min = match declaration.attribute("minOccurs") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| invalid("minOccurs", raw))?,
            None => 1,
        };
        let max = match declaration.attribute("maxOccurs").map(str::trim) {
            Some("unbounded") => MaxOccurs::Unbounded,
            Some(raw) => MaxOccurs::Bounded(
                raw.parse::<u32>()
                    .map_err(|_| invalid("maxOccurs", raw))?,
            ),
            None => MaxOccurs::Bounded(1),
        };

        Self::new(min, max).ok_or_else(|| SchemaError::InvertedOccurrence {
            element: label(),
            min,
            max: match max {
                MaxOccurs::Bounded(limit) => limit,
                MaxOccurs::Unbounded => u32::MAX,
            },
        })
    }

    /// Returns the declared minimum.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Returns the declared maximum.
    #[must_use]
    pub const fn max(&self) -> MaxOccurs {
        self.max
    }

    /// Returns `true` for `minOccurs="0" maxOccurs="0"`.
    #[must_use]
    pub const fn is_prohibited(&self) -> bool {
        self.min == 0 && matches!(self.max, MaxOccurs::Bounded(0))
    }

    /// Chooses how many instances to generate.
    ///
    /// - `0..0` yields 0.
    /// - Unbounded draws from `min..=max(min + 1, UNBOUNDED_OCCURRENCE_CAP)`.
    /// - A finite maximum above 1 draws from `min..=max`.
    /// - `0..1` is a coin flip.
    /// - Anything else yields exactly 1.
    ///
    /// A zero draw from a repeatable range is raised to 1.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.is_prohibited() {
            return 0;
        }
        let upper = match self.max {
            MaxOccurs::Unbounded => self
                .min
                .saturating_add(1)
                .max(UNBOUNDED_OCCURRENCE_CAP),
            MaxOccurs::Bounded(limit) if limit > 1 => limit,
            MaxOccurs::Bounded(_) if self.min == 0 => {
                return u32::from(rng.random_bool(OPTIONAL_PRESENCE_PROBABILITY));
            }
            MaxOccurs::Bounded(_) => return 1,
        };

        match rng.random_range(self.min..=upper) {
            0 => 1,
            count => count,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use super::*;
    use crate::schema::{SchemaDocument, XsdTag};

    fn particle(attributes: &str) -> SchemaNode {
        let text = format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="Ntry" {attributes}/>
            </xs:schema>"#
        );
        let schema = SchemaDocument::parse(&text).expect("schema should parse");
        schema
            .root()
            .child(&XsdTag::Element)
            .expect("element declared")
            .clone()
    }

    fn counts(bounds: OccurrenceBounds) -> Vec<u32> {
        (0..200)
            .map(|seed| bounds.sample(&mut ChaCha8Rng::seed_from_u64(seed)))
            .collect()
    }

    #[rstest]
    #[case("", 1, MaxOccurs::Bounded(1))]
    #[case(r#"minOccurs="0""#, 0, MaxOccurs::Bounded(1))]
    #[case(r#"minOccurs="2" maxOccurs="5""#, 2, MaxOccurs::Bounded(5))]
    #[case(r#"maxOccurs="unbounded""#, 1, MaxOccurs::Unbounded)]
    #[case(r#"minOccurs=" 0 " maxOccurs=" unbounded ""#, 0, MaxOccurs::Unbounded)]
    fn reads_bounds_from_attributes(
        #[case] attributes: &str,
        #[case] min: u32,
        #[case] max: MaxOccurs,
    ) {
        let bounds = OccurrenceBounds::from_declaration(&particle(attributes))
            .expect("bounds should parse");
        assert_eq!(bounds.min(), min);
        assert_eq!(bounds.max(), max);
    }

    #[rstest]
    #[case(r#"minOccurs="-1""#, "minOccurs")]
    #[case(r#"maxOccurs="many""#, "maxOccurs")]
    fn rejects_malformed_attributes(#[case] attributes: &str, #[case] expected: &str) {
        match OccurrenceBounds::from_declaration(&particle(attributes)) {
            Err(SchemaError::InvalidOccurrence {
                element, attribute, ..
            }) => {
                assert_eq!(element, "Ntry");
                assert_eq!(attribute, expected);
            }
            other => panic!("expected InvalidOccurrence, got {other:?}"),
        }
    }

    #[test]
    fn rejects_inverted_bounds() {
        let result = OccurrenceBounds::from_declaration(&particle(r#"minOccurs="3" maxOccurs="1""#));
        assert_eq!(
            result,
            Err(SchemaError::InvertedOccurrence {
                element: "Ntry".to_owned(),
                min: 3,
                max: 1,
            })
        );
    }

    #[test]
    fn prohibited_particles_yield_zero() {
        let bounds = OccurrenceBounds::new(0, MaxOccurs::Bounded(0)).expect("valid");
        assert!(counts(bounds).iter().all(|count| *count == 0));
    }

    #[test]
    fn exactly_one_yields_one() {
        assert!(
            counts(OccurrenceBounds::EXACTLY_ONE)
                .iter()
                .all(|count| *count == 1)
        );
    }

    #[test]
    fn optional_particles_flip_a_coin() {
        let bounds = OccurrenceBounds::new(0, MaxOccurs::Bounded(1)).expect("valid");
        let samples = counts(bounds);

        assert!(samples.iter().all(|count| *count <= 1));
        assert!(samples.contains(&0));
        assert!(samples.contains(&1));
    }

    #[rstest]
    #[case(0, 1, 2)]
    #[case(1, 1, 2)]
    #[case(2, 2, 3)]
    #[case(5, 5, 6)]
    fn unbounded_is_capped(#[case] min: u32, #[case] low: u32, #[case] high: u32) {
        let bounds = OccurrenceBounds::new(min, MaxOccurs::Unbounded).expect("valid");
        let samples = counts(bounds);

        assert!(samples.iter().all(|count| (low..=high).contains(count)));
        assert!(samples.contains(&high));
    }

    #[test]
    fn finite_ranges_never_draw_zero() {
        let bounds = OccurrenceBounds::new(0, MaxOccurs::Bounded(4)).expect("valid");
        let samples = counts(bounds);

        assert!(samples.iter().all(|count| (1..=4).contains(count)));
        assert!(samples.contains(&4));
    }

    #[test]
    fn sampling_is_reproducible_for_a_seed() {
        let bounds = OccurrenceBounds::new(0, MaxOccurs::Bounded(9)).expect("valid");
        assert_eq!(counts(bounds), counts(bounds));
    }
}

//! Sample values for XML Schema built-in types.
//!
//! Lookups are case-insensitive on the unqualified type name. Date and time
//! values are derived from the synthesizer's reference instant.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Prefix of the placeholder emitted for type names with no known sample.
pub const UNKNOWN_TYPE_PREFIX: &str = "UNKNOWN_TYPE_";

/// Lower bound of sampled `decimal`, `double` and `float` values.
const REAL_MIN: f64 = 1.0;

/// Upper bound of sampled `decimal`, `double` and `float` values.
const REAL_MAX: f64 = 1000.0;

/// Range used for the numeric suffix of `ID` and `IDREF` values.
const IDENTIFIER_SUFFIX_RANGE: std::ops::RangeInclusive<u32> = 1000..=9999;

/// XML Schema built-in simple types with a known sample value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(missing_docs, reason = "variants mirror the XML Schema type names")]
pub enum BuiltinType {
    String,
    NormalizedString,
    Token,
    Boolean,
    Decimal,
    Integer,
    Long,
    Int,
    Short,
    Byte,
    NonNegativeInteger,
    PositiveInteger,
    NonPositiveInteger,
    NegativeInteger,
    UnsignedLong,
    UnsignedInt,
    UnsignedShort,
    UnsignedByte,
    Double,
    Float,
    Duration,
    DateTime,
    Time,
    Date,
    GYearMonth,
    GYear,
    GMonthDay,
    GDay,
    GMonth,
    HexBinary,
    Base64Binary,
    AnyUri,
    QName,
    Notation,
    Id,
    IdRef,
    IdRefs,
    NmToken,
    NmTokens,
    Name,
    NcName,
    Language,
    Entity,
    Entities,
    Notations,
    AnySimpleType,
    AnyType,
}

impl BuiltinType {
    /// Looks up a built-in type by unqualified name, ignoring ASCII case.
    ///
    /// # Example
    ///
    /// ```
    /// use xsd_sample::BuiltinType;
    ///
    /// assert_eq!(BuiltinType::from_name("dateTime"), Some(BuiltinType::DateTime));
    /// assert_eq!(BuiltinType::from_name("DECIMAL"), Some(BuiltinType::Decimal));
    /// assert_eq!(BuiltinType::from_name("Max35Text"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name.to_ascii_lowercase().as_str() {
            "string" => Self::String,
            "normalizedstring" => Self::NormalizedString,
            "token" => Self::Token,
            "boolean" => Self::Boolean,
            "decimal" => Self::Decimal,
            "integer" => Self::Integer,
            "long" => Self::Long,
            "int" => Self::Int,
            "short" => Self::Short,
            "byte" => Self::Byte,
            "nonnegativeinteger" => Self::NonNegativeInteger,
            "positiveinteger" => Self::PositiveInteger,
            "nonpositiveinteger" => Self::NonPositiveInteger,
            "negativeinteger" => Self::NegativeInteger,
            "unsignedlong" => Self::UnsignedLong,
            "unsignedint" => Self::UnsignedInt,
            "unsignedshort" => Self::UnsignedShort,
            "unsignedbyte" => Self::UnsignedByte,
            "double" => Self::Double,
            "float" => Self::Float,
            "duration" => Self::Duration,
            "datetime" => Self::DateTime,
            "time" => Self::Time,
            "date" => Self::Date,
            "gyearmonth" => Self::GYearMonth,
            "gyear" => Self::GYear,
            "gmonthday" => Self::GMonthDay,
            "gday" => Self::GDay,
            "gmonth" => Self::GMonth,
            "hexbinary" => Self::HexBinary,
            "base64binary" => Self::Base64Binary,
            "anyuri" => Self::AnyUri,
            "qname" => Self::QName,
            "notation" => Self::Notation,
            "id" => Self::Id,
            "idref" => Self::IdRef,
            "idrefs" => Self::IdRefs,
            "nmtoken" => Self::NmToken,
            "nmtokens" => Self::NmTokens,
            "name" => Self::Name,
            "ncname" => Self::NcName,
            "language" => Self::Language,
            "entity" => Self::Entity,
            "entities" => Self::Entities,
            "notations" => Self::Notations,
            "anysimpletype" => Self::AnySimpleType,
            "anytype" => Self::AnyType,
            _ => return None,
        };
        Some(builtin)
    }
}

/// Produces one concrete sample value per primitive type name or enumeration.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use xsd_sample::ValueSynthesizer;
///
/// let reference = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).single().expect("valid instant");
/// let synthesizer = ValueSynthesizer::new(reference);
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
///
/// assert_eq!(synthesizer.synthesize("date", &mut rng), "2024-03-09");
/// assert_eq!(synthesizer.synthesize("Max35Text", &mut rng), "UNKNOWN_TYPE_Max35Text");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSynthesizer {
    reference_time: DateTime<Utc>,
}

impl ValueSynthesizer {
    /// Creates a synthesizer that derives temporal values from
    /// `reference_time`.
    #[must_use]
    pub const fn new(reference_time: DateTime<Utc>) -> Self {
        Self { reference_time }
    }

    /// Returns the instant temporal values are derived from.
    #[must_use]
    pub const fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    /// Synthesizes a value for a primitive type name.
    ///
    /// Unknown names yield `UNKNOWN_TYPE_<name>`.
    pub fn synthesize<R: Rng + ?Sized>(&self, type_name: &str, rng: &mut R) -> String {
        BuiltinType::from_name(type_name).map_or_else(
            || Self::placeholder(type_name),
            |builtin| self.synthesize_builtin(builtin, rng),
        )
    }

    /// Returns the placeholder used for a type with no known sample value.
    #[must_use]
    pub fn placeholder(type_name: &str) -> String {
        format!("{UNKNOWN_TYPE_PREFIX}{type_name}")
    }

    /// Synthesizes a value for a known built-in type.
    pub fn synthesize_builtin<R: Rng + ?Sized>(&self, builtin: BuiltinType, rng: &mut R) -> String {
        let now = self.reference_time;
        match builtin {
            BuiltinType::String => "sample_string".to_owned(),
            BuiltinType::NormalizedString => "sample_normalized_string".to_owned(),
            BuiltinType::Token => "sample_token".to_owned(),
            BuiltinType::Boolean => rng.random_bool(0.5).to_string(),
            BuiltinType::Decimal => format!("{:.2}", rng.random_range(REAL_MIN..=REAL_MAX)),
            BuiltinType::Double | BuiltinType::Float => {
                format!("{:.4}", rng.random_range(REAL_MIN..=REAL_MAX))
            }
            BuiltinType::Integer
            | BuiltinType::Int
            | BuiltinType::PositiveInteger
            | BuiltinType::UnsignedInt => rng.random_range(1..=1000_i64).to_string(),
            BuiltinType::Long | BuiltinType::UnsignedLong => {
                rng.random_range(1000..=100_000_i64).to_string()
            }
            BuiltinType::Short | BuiltinType::UnsignedShort => {
                rng.random_range(1..=100_i64).to_string()
            }
            BuiltinType::Byte => rng.random_range(0..=127_i64).to_string(),
            BuiltinType::UnsignedByte => rng.random_range(0..=255_i64).to_string(),
            BuiltinType::NonNegativeInteger => rng.random_range(0..=1000_i64).to_string(),
            BuiltinType::NonPositiveInteger => rng.random_range(-1000..=0_i64).to_string(),
            BuiltinType::NegativeInteger => rng.random_range(-1000..=-1_i64).to_string(),
            BuiltinType::Duration => "P1Y2M3DT4H5M6S".to_owned(),
            BuiltinType::DateTime => now.to_rfc3339_opts(SecondsFormat::Secs, false),
            BuiltinType::Time => now.format("%H:%M:%S").to_string(),
            BuiltinType::Date => now.format("%Y-%m-%d").to_string(),
            BuiltinType::GYearMonth => now.format("%Y-%m").to_string(),
            BuiltinType::GYear => now.format("%Y").to_string(),
            BuiltinType::GMonthDay => now.format("--%m-%d").to_string(),
            BuiltinType::GDay => now.format("---%d").to_string(),
            BuiltinType::GMonth => now.format("--%m").to_string(),
            BuiltinType::HexBinary => "0FB7".to_owned(),
            BuiltinType::Base64Binary => "AQIDBA==".to_owned(),
            BuiltinType::AnyUri => "http://example.com/resource".to_owned(),
            BuiltinType::QName => "tns:sampleQName".to_owned(),
            BuiltinType::Notation => "sample_notation".to_owned(),
            BuiltinType::Id => format!("id{}", rng.random_range(IDENTIFIER_SUFFIX_RANGE)),
            BuiltinType::IdRef => format!("idref{}", rng.random_range(IDENTIFIER_SUFFIX_RANGE)),
            BuiltinType::IdRefs => "idrefs_1 idrefs_2".to_owned(),
            BuiltinType::NmToken => "sample_NMTOKEN".to_owned(),
            BuiltinType::NmTokens => "sample_NMTOKEN_1 sample_NMTOKEN_2".to_owned(),
            BuiltinType::Name => "sample_Name".to_owned(),
            BuiltinType::NcName => "sampleNCName".to_owned(),
            BuiltinType::Language => "en-US".to_owned(),
            BuiltinType::Entity => "entity_name".to_owned(),
            BuiltinType::Entities => "entity_name_1 entity_name_2".to_owned(),
            BuiltinType::Notations => "notation_1 notation_2".to_owned(),
            BuiltinType::AnySimpleType | BuiltinType::AnyType => {
                "any_simple_type_value".to_owned()
            }
        }
    }

    /// Picks one enumerated value uniformly at random.
    ///
    /// Returns `None` when `values` is empty.
    pub fn pick_enumeration<R: Rng + ?Sized>(values: &[&str], rng: &mut R) -> Option<String> {
        values.choose(rng).map(|value| (*value).to_owned())
    }
}

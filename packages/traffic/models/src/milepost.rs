//! Milepost values and the department's reference-post notation.
//!
//! Exports write mileposts as `"002+0.619"` (zero-padded reference post,
//! `+`, decimal offset in miles); crash records use the same notation for
//! `REF_POINT`. Internally a milepost is a single mile value, and identity
//! is *exact*: keys built from mileposts must never merge under rounding.

use serde::{Deserialize, Serialize};

/// A distance along a corridor, in miles.
///
/// Wraps `f64` with bit-level equality/hashing and total ordering so the
/// value can participate in hash and tree keys. No arithmetic is exposed;
/// mileposts are identities and interval bounds, not quantities.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milepost(f64);

impl Milepost {
    /// Creates a milepost from a mile value.
    #[must_use]
    pub const fn new(miles: f64) -> Self {
        Self(miles)
    }

    /// Returns the mile value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Parses either reference-post notation (`"002+0.619"` -> 2.619) or a
    /// plain decimal (`"12.4"`).
    ///
    /// # Errors
    ///
    /// Returns [`MilepostParseError`] if the input is empty, has more than
    /// one `+`, or either part is not a number.
    pub fn parse(input: &str) -> Result<Self, MilepostParseError> {
        let trimmed = input.trim();
        let err = || MilepostParseError {
            input: input.to_string(),
        };

        if trimmed.is_empty() {
            return Err(err());
        }

        match trimmed.split_once('+') {
            Some((post, offset)) => {
                if offset.contains('+') {
                    return Err(err());
                }
                // Reference posts are zero-padded ("002" -> 2).
                let post = post.trim_start_matches('0');
                let post: f64 = if post.is_empty() {
                    0.0
                } else {
                    post.parse().map_err(|_| err())?
                };
                let offset: f64 = offset.parse().map_err(|_| err())?;
                Ok(Self(post + offset))
            }
            None => trimmed.parse().map(Self).map_err(|_| err()),
        }
    }
}

impl PartialEq for Milepost {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Milepost {}

impl std::hash::Hash for Milepost {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for Milepost {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Milepost {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for Milepost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a milepost string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilepostParseError {
    /// The unparseable input.
    pub input: String,
}

impl std::fmt::Display for MilepostParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid milepost {:?}: expected \"MMM+O.OOO\" or a plain number", self.input)
    }
}

impl std::error::Error for MilepostParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reference_post_notation() {
        assert_eq!(Milepost::parse("000+0.0").unwrap(), Milepost::new(0.0));
        assert_eq!(Milepost::parse("002+0.5").unwrap(), Milepost::new(2.5));
        assert_eq!(Milepost::parse("117+0.25").unwrap(), Milepost::new(117.25));
        // The post and offset are summed as floats, so the result is the
        // sum's representation, compared approximately here.
        let parsed = Milepost::parse("002+0.619").unwrap();
        assert!((parsed.value() - 2.619).abs() < 1e-9);
    }

    #[test]
    fn parses_plain_decimal() {
        assert_eq!(Milepost::parse("12.4").unwrap(), Milepost::new(12.4));
        assert_eq!(Milepost::parse(" 0 ").unwrap(), Milepost::new(0.0));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Milepost::parse("").is_err());
        assert!(Milepost::parse("abc").is_err());
        assert!(Milepost::parse("1+2+3").is_err());
        assert!(Milepost::parse("002+").is_err());
    }

    #[test]
    fn identity_is_exact() {
        assert_ne!(Milepost::new(5.0), Milepost::new(5.000_189));
        assert_eq!(Milepost::new(5.0), Milepost::new(5.0));
    }

    #[test]
    fn ordering_is_total() {
        let mut mps = vec![Milepost::new(5.0), Milepost::new(0.0), Milepost::new(2.619)];
        mps.sort();
        assert_eq!(mps, vec![Milepost::new(0.0), Milepost::new(2.619), Milepost::new(5.0)]);
    }
}

//! Breakpoint list parsing.
//!
//! Breakpoints arrive from three places: the stock/`config.toml` defaults, the
//! JSON context maps, and call-site options. All of them may be written either
//! as a comma-separated string (`"400, 800, 1200"`), as a single number, or
//! as an array whose entries are numbers or numeric strings (`[400, "800"]`).
//!
//! Malformed entries are dropped, never reported. The result is sorted and
//! free of duplicates.
//!
//! ```text
//! "1200, 400, abc, -5, 0, 800.5, 400px"  →  [400, 800, 1200]
//! ```

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Ordered, deduplicated set of positive pixel widths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BreakpointSet(Vec<u32>);

impl BreakpointSet {
    /// Parse a comma-separated width list.
    pub fn parse(csv: &str) -> Self {
        Self::from_tokens(csv.split(','))
    }

    /// Build a set from individual width tokens.
    ///
    /// Each token is trimmed and its leading integer taken; zero, negative
    /// and non-numeric tokens are skipped.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_widths(tokens.into_iter().filter_map(|t| parse_token(t.as_ref())))
    }

    /// Build a set from already-numeric widths, dropping zeros.
    pub fn from_widths(widths: impl IntoIterator<Item = u32>) -> Self {
        let mut list: Vec<u32> = widths.into_iter().filter(|&w| w > 0).collect();
        list.sort_unstable();
        list.dedup();
        Self(list)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize back to the compact `400,800,1200` form.
    pub fn to_csv(&self) -> String {
        self.0
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for BreakpointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_csv())
    }
}

/// Leading integer of a token: optional sign, then digits. Anything after
/// the digits is ignored, so `"800.5"` and `"400px"` read as 800 and 400.
fn parse_token(token: &str) -> Option<u32> {
    let token = token.trim();
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    let sign_len = token.len() - unsigned.len();
    let digits = unsigned
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    let value: i64 = token[..sign_len + digits].parse().ok()?;
    positive_width(value)
}

fn positive_width(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|&w| w > 0)
}

impl<'de> Deserialize<'de> for BreakpointSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // `Other` swallows nulls, booleans, objects and nested lists so one
        // bad entry never rejects the surrounding options.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Token {
            Int(i64),
            Float(f64),
            Text(String),
            Other(IgnoredAny),
        }

        impl Token {
            fn width(self) -> Option<u32> {
                match self {
                    Token::Int(n) => positive_width(n),
                    Token::Float(f) if f.is_finite() => positive_width(f.trunc() as i64),
                    Token::Float(_) | Token::Other(_) => None,
                    Token::Text(s) => parse_token(&s),
                }
            }
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Csv(String),
            List(Vec<Token>),
            Single(Token),
        }

        let set = match Raw::deserialize(deserializer)? {
            Raw::Csv(csv) => Self::parse(&csv),
            Raw::List(tokens) => Self::from_widths(tokens.into_iter().filter_map(Token::width)),
            Raw::Single(token) => Self::from_widths(token.width()),
        };
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_and_sorts_csv() {
        let set = BreakpointSet::parse("1600, 400,1200 , 800");
        assert_eq!(set.as_slice(), &[400, 800, 1200, 1600]);
    }

    #[test]
    fn drops_invalid_tokens() {
        let set = BreakpointSet::parse("1200, abc, -5, 0, , px400, -, 800");
        assert_eq!(set.as_slice(), &[800, 1200]);
    }

    #[test]
    fn reads_leading_integer_of_token() {
        let set = BreakpointSet::parse("800.5, 400px, +1200, 1600 w");
        assert_eq!(set.as_slice(), &[400, 800, 1200, 1600]);
    }

    #[test]
    fn decimal_width_reads_the_same_in_every_form() {
        let csv = BreakpointSet::parse("800.5, 400");
        let numbers: BreakpointSet = serde_json::from_str("[800.5, 400]").unwrap();
        let strings: BreakpointSet = serde_json::from_str(r#"["800.5", 400]"#).unwrap();
        assert_eq!(csv.as_slice(), &[400, 800]);
        assert_eq!(numbers, csv);
        assert_eq!(strings, csv);
    }

    #[test]
    fn removes_duplicates() {
        let set = BreakpointSet::parse("800, 400, 800, 400");
        assert_eq!(set.as_slice(), &[400, 800]);
    }

    #[test]
    fn empty_input_yields_empty_set() {
        assert!(BreakpointSet::parse("").is_empty());
        assert!(BreakpointSet::parse(" , ,").is_empty());
    }

    #[test]
    fn rejoined_output_parses_to_same_set() {
        for input in ["400, 800", "9,3,abc,3,0,-1,12", "", "2000"] {
            let once = BreakpointSet::parse(input);
            let twice = BreakpointSet::parse(&once.to_csv());
            assert_eq!(once, twice, "input {input:?}");
        }
    }

    #[test]
    fn output_is_strictly_ascending_and_positive() {
        let set = BreakpointSet::parse("5,4,3,2,1,0,1,2,3,4,5,99999999999");
        let widths = set.as_slice();
        assert!(widths.windows(2).all(|w| w[0] < w[1]));
        assert!(widths.iter().all(|&w| w > 0));
        assert_eq!(widths, &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn from_tokens_accepts_string_array() {
        let set = BreakpointSet::from_tokens(["800", " 400 ", "x"]);
        assert_eq!(set.as_slice(), &[400, 800]);
    }

    #[test]
    fn deserializes_csv_string() {
        let set: BreakpointSet = serde_json::from_str(r#""800, 400""#).unwrap();
        assert_eq!(set.as_slice(), &[400, 800]);
    }

    #[test]
    fn deserializes_mixed_array() {
        let set: BreakpointSet =
            serde_json::from_str(r#"[1200, "400", "nope", -3, 0, 800.9]"#).unwrap();
        assert_eq!(set.as_slice(), &[400, 800, 1200]);
    }

    #[test]
    fn non_numeric_array_entries_are_dropped() {
        let set: BreakpointSet =
            serde_json::from_str(r#"[400, null, true, {"w": 1}, [600], 800]"#).unwrap();
        assert_eq!(set.as_slice(), &[400, 800]);
    }

    #[test]
    fn deserializes_bare_number() {
        let set: BreakpointSet = serde_json::from_str("800").unwrap();
        assert_eq!(set.as_slice(), &[800]);
        let set: BreakpointSet = serde_json::from_str("799.9").unwrap();
        assert_eq!(set.as_slice(), &[799]);
    }

    #[test]
    fn unusable_scalar_yields_empty_set() {
        let set: BreakpointSet = serde_json::from_str("false").unwrap();
        assert!(set.is_empty());
        let set: BreakpointSet = serde_json::from_str(r#"{"a": 400}"#).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn serializes_as_number_array() {
        let set = BreakpointSet::parse("800,400");
        assert_eq!(serde_json::to_string(&set).unwrap(), "[400,800]");
    }

    #[test]
    fn display_matches_csv() {
        assert_eq!(BreakpointSet::parse("400, 800").to_string(), "400,800");
    }

    fn token() -> impl Strategy<Value = String> {
        prop_oneof![
            any::<i64>().prop_map(|n| n.to_string()),
            (0u32..5000).prop_map(|n| n.to_string()),
            "[ a-z0-9.+-]{0,8}",
            any::<String>(),
        ]
    }

    proptest! {
        #[test]
        fn parse_is_positive_ascending_and_stable(tokens in prop::collection::vec(token(), 0..12)) {
            let set = BreakpointSet::parse(&tokens.join(","));
            prop_assert!(set.as_slice().windows(2).all(|w| w[0] < w[1]));
            prop_assert!(set.iter().all(|w| w > 0));
            prop_assert_eq!(BreakpointSet::parse(&set.to_csv()), set);
        }

        #[test]
        fn json_list_never_fails(widths in prop::collection::vec(any::<i64>(), 0..12)) {
            let json = serde_json::to_string(&widths).unwrap();
            let set: BreakpointSet = serde_json::from_str(&json).unwrap();
            let expected = BreakpointSet::from_widths(
                widths.iter().filter_map(|&w| u32::try_from(w).ok()),
            );
            prop_assert_eq!(set, expected);
        }
    }
}

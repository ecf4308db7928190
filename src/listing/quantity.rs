//! Free-text age and weight parsing.
//!
//! Shelter staff write ages and weights by hand ("2 years 6 months",
//! "45 ½ lbs", "10 weeks"). The parsers here turn that text into a number of
//! years or pounds, returned as a decimal string. Text that matches no known
//! form comes back unchanged, so callers that need a number go through
//! [`age_years`] / [`weight_pounds`] and get `None` for it.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Vulgar fraction glyphs shared by age and weight parsing
pub const FRACTIONS: [(char, f64); 9] = [
    ('½', 0.5),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];

const MONTHS_PER_YEAR: f64 = 12.0;
const WEEKS_PER_YEAR: f64 = 52.0;

lazy_static! {
    static ref UNIT_TOKEN: Regex = Regex::new(r"\blbs?\b").unwrap();
    static ref WHOLE_AND_FRACTION: Regex = Regex::new(r"([0-9]+)\s*([½⅓⅔¼¾⅛⅜⅝⅞])").unwrap();
    static ref PLAIN_NUMBER: Regex = Regex::new(r"([0-9]+\.?[0-9]*)").unwrap();

    /// Most specific first. A single-unit pattern tried before a compound one
    /// would match "2 years" out of "2 years 6 months" and drop the months.
    static ref AGE_PATTERNS: Vec<AgePattern> = vec![
        AgePattern::new(
            r"([0-9]+)\s*years?\s*([0-9]+)\s*months?\s*([0-9]+)\s*weeks?",
            |c| number(c, 1) + number(c, 2) / MONTHS_PER_YEAR + number(c, 3) / WEEKS_PER_YEAR,
        ),
        AgePattern::new(
            r"([0-9]+)\s*years?\s*([0-9]+)\s*months?",
            |c| number(c, 1) + number(c, 2) / MONTHS_PER_YEAR,
        ),
        AgePattern::new(
            r"([0-9]+)\s*months?\s*([0-9]+)\s*weeks?",
            |c| number(c, 1) / MONTHS_PER_YEAR + number(c, 2) / WEEKS_PER_YEAR,
        ),
        AgePattern::new(
            r"([0-9]+)\s*years?\s*([0-9]+)\s*weeks?",
            |c| number(c, 1) + number(c, 2) / WEEKS_PER_YEAR,
        ),
        AgePattern::new(
            r"([0-9]+)\s*([½⅓⅔¼¾⅛⅜⅝⅞]?)\s*years?",
            |c| number(c, 1) + c.get(2).and_then(|m| fraction_value(m.as_str())).unwrap_or(0.0),
        ),
        AgePattern::new(r"([0-9]+)\s*months?", |c| number(c, 1) / MONTHS_PER_YEAR),
        AgePattern::new(r"([0-9]+)\s*weeks?", |c| number(c, 1) / WEEKS_PER_YEAR),
    ];
}

struct AgePattern {
    regex: Regex,
    to_years: fn(&Captures) -> f64,
}

impl AgePattern {
    fn new(pattern: &str, to_years: fn(&Captures) -> f64) -> Self {
        Self {
            regex: Regex::new(pattern).unwrap(),
            to_years,
        }
    }
}

fn number(caps: &Captures, group: usize) -> f64 {
    caps.get(group)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Decimal value of a single fraction glyph such as "½"
pub fn fraction_value(glyph: &str) -> Option<f64> {
    let mut chars = glyph.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    FRACTIONS.iter().find(|(g, _)| *g == c).map(|(_, v)| *v)
}

/// Parse a weight such as "45 ½ lbs" or "38.2 lbs" into pounds.
///
/// Returns the cleaned text when no number is present.
pub fn parse_weight(text: &str) -> String {
    let cleaned = UNIT_TOKEN.replace_all(text, "");
    let cleaned = cleaned.trim();

    if let Some(caps) = WHOLE_AND_FRACTION.captures(cleaned) {
        if let Some(fraction) = fraction_value(&caps[2]) {
            return (number(&caps, 1) + fraction).to_string();
        }
    }

    if let Some(caps) = PLAIN_NUMBER.captures(cleaned) {
        return caps[1].to_string();
    }

    cleaned.to_string()
}

/// Parse an age such as "2 years 6 months" into years.
///
/// Returns the lower-cased, trimmed text when no pattern matches.
pub fn parse_age(text: &str) -> String {
    let normalized = text.trim().to_lowercase();

    for pattern in AGE_PATTERNS.iter() {
        if let Some(caps) = pattern.regex.captures(&normalized) {
            return (pattern.to_years)(&caps).to_string();
        }
    }

    normalized
}

/// Weight in pounds, or `None` if the text is not a recognisable weight
pub fn weight_pounds(text: &str) -> Option<f64> {
    parse_weight(text).parse::<f64>().ok()
}

/// Age in years, or `None` if the text is not a recognisable age
pub fn age_years(text: &str) -> Option<f64> {
    parse_age(text).parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_years(text: &str, expected: f64) {
        let years = age_years(text).unwrap_or_else(|| panic!("{:?} did not parse", text));
        assert!(
            (years - expected).abs() < EPSILON,
            "{:?}: expected {}, got {}",
            text,
            expected,
            years
        );
    }

    #[test]
    fn test_weight_with_fraction_glyph() {
        assert_eq!(parse_weight("45 ½ lbs"), "45.5");
        assert_eq!(parse_weight("45½"), "45.5");
        assert_eq!(parse_weight("12 ¼ lb"), "12.25");
    }

    #[test]
    fn test_weight_every_glyph_adds_its_value() {
        for whole in [0u32, 1, 7, 45, 120] {
            for (glyph, value) in FRACTIONS {
                let text = format!("{} {} lbs", whole, glyph);
                let parsed = weight_pounds(&text).unwrap();
                assert!(
                    (parsed - (whole as f64 + value)).abs() < EPSILON,
                    "{:?} parsed to {}",
                    text,
                    parsed
                );
            }
        }
    }

    #[test]
    fn test_weight_plain_numbers_returned_verbatim() {
        assert_eq!(parse_weight("38 lbs"), "38");
        assert_eq!(parse_weight("38.25 lbs"), "38.25");
        assert_eq!(parse_weight("approx. 60"), "60");
    }

    #[test]
    fn test_weight_unparseable_text_echoed() {
        assert_eq!(parse_weight(""), "");
        assert_eq!(parse_weight("unknown"), "unknown");
        assert_eq!(parse_weight("  tbd lbs "), "tbd");
        assert_eq!(weight_pounds("unknown"), None);
    }

    #[test]
    fn test_age_compound_years_months_weeks() {
        for n in 0..4 {
            for m in 0..12 {
                for k in [0, 1, 3] {
                    let text = format!("{} years {} months {} weeks", n, m, k);
                    assert_years(
                        &text,
                        n as f64 + m as f64 / 12.0 + k as f64 / 52.0,
                    );
                }
            }
        }
    }

    #[test]
    fn test_age_two_unit_forms() {
        assert_years("2 years 6 months", 2.5);
        assert_years("1 Year 3 Months", 1.25);
        assert_years("6 months 2 weeks", 0.5 + 2.0 / 52.0);
        assert_years("2 years 3 weeks", 2.0 + 3.0 / 52.0);
    }

    #[test]
    fn test_age_compound_not_truncated_to_first_unit() {
        let years = age_years("3 years 6 months").unwrap();
        assert!(years > 3.0);
    }

    #[test]
    fn test_age_single_unit_forms() {
        assert_years("5 years", 5.0);
        assert_years("1 year", 1.0);
        assert_years("5 ½ years", 5.5);
        assert_years("5½ years", 5.5);
        assert_years("18 months", 1.5);
        assert_years("10 weeks", 10.0 / 52.0);
        assert_years("  4 MONTHS  ", 4.0 / 12.0);
    }

    #[test]
    fn test_age_unrecognised_text_echoed() {
        assert_eq!(parse_age("senior"), "senior");
        assert_eq!(parse_age("  Young Adult "), "young adult");
        assert_eq!(parse_age(""), "");
        assert_eq!(age_years("puppy"), None);
    }

    #[test]
    fn test_fraction_value_rejects_non_glyphs() {
        assert_eq!(fraction_value("¾"), Some(0.75));
        assert_eq!(fraction_value("x"), None);
        assert_eq!(fraction_value("½½"), None);
        assert_eq!(fraction_value(""), None);
    }
}

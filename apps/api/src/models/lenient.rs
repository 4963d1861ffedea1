//! Lenient numeric fields for model output.
//!
//! Models routinely emit scores as `"85"` or `"85%"` instead of `85`. Those are coerced.
//! Anything else that is not a number (objects, words, booleans) is rejected, which sends
//! the call down the fallback path.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn to_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => {
            let cleaned = s.trim().trim_end_matches('%').trim();
            cleaned
                .parse::<f64>()
                .map_err(|_| de::Error::custom(format!("expected a number, got {s:?}")))
        }
    }
}

/// A 0–100 score. Out-of-range values are clamped.
pub fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let n = to_f64(deserializer)?;
    if !n.is_finite() {
        return Err(de::Error::custom("score must be finite"));
    }
    Ok(n.round().clamp(0.0, 100.0) as u8)
}

/// A non-negative count such as months or years.
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let n = to_f64(deserializer)?;
    if !n.is_finite() || n < 0.0 {
        return Err(de::Error::custom("count must be a non-negative number"));
    }
    Ok(n.round() as u32)
}

/// A signed percentage, e.g. a growth rate of `12.5` or `"-3%"`.
pub fn percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let n = to_f64(deserializer)?;
    if !n.is_finite() {
        return Err(de::Error::custom("percentage must be finite"));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "super::score")]
        score: u8,
        #[serde(deserialize_with = "super::count")]
        months: u32,
        #[serde(deserialize_with = "super::percent")]
        growth: f64,
    }

    fn parse(json: &str) -> Result<Sample, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_plain_numbers_pass_through() {
        let s = parse(r#"{"score": 85, "months": 6, "growth": 12.5}"#).unwrap();
        assert_eq!(s.score, 85);
        assert_eq!(s.months, 6);
        assert!((s.growth - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let s = parse(r#"{"score": "85%", "months": " 6 ", "growth": "-3%"}"#).unwrap();
        assert_eq!(s.score, 85);
        assert_eq!(s.months, 6);
        assert!((s.growth + 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scores_are_clamped() {
        let s = parse(r#"{"score": 140, "months": 1, "growth": 0}"#).unwrap();
        assert_eq!(s.score, 100);
    }

    #[test]
    fn test_words_are_rejected() {
        assert!(parse(r#"{"score": "high", "months": 1, "growth": 0}"#).is_err());
    }

    #[test]
    fn test_negative_count_is_rejected() {
        assert!(parse(r#"{"score": 1, "months": -2, "growth": 0}"#).is_err());
    }
}

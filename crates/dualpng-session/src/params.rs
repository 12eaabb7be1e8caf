//! Merge parameters and their parsing from form-style key/value fields.
//!
//! Each field is parsed on its own into a `Result`. Failures are gathered
//! by the caller and reported together, so a request with a bad `gamma`
//! and a bad `width` gets both errors back and never reaches the merge.

use crate::{SessionError, SessionResult};
use dualpng_ops::{LevelRange, MaskMatrix, MAX_DIMENSION};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

/// Form field names accepted by [`MergeParams::from_fields`].
pub mod fields {
    /// Low bound of the first image's level range.
    pub const R1_START: &str = "r1start";
    /// High bound of the first image's level range.
    pub const R1_END: &str = "r1end";
    /// Low bound of the second image's level range.
    pub const R2_START: &str = "r2start";
    /// High bound of the second image's level range.
    pub const R2_END: &str = "r2end";
    /// gAMA value, file gamma scaled by 100000.
    pub const GAMMA: &str = "gamma";
    /// Target width, 0 keeps aspect from height.
    pub const WIDTH: &str = "width";
    /// Target height, 0 keeps aspect from width.
    pub const HEIGHT: &str = "height";
    /// Brightness factor for the first image.
    pub const BRIGHTNESS1: &str = "brightness1";
    /// Brightness factor for the second image.
    pub const BRIGHTNESS2: &str = "brightness2";
    /// Mask matrix as JSON, e.g. `[[1,1],[1,0]]`.
    pub const MASK: &str = "mask";
}

use fields::*;

/// gAMA value used when none is given: file gamma 0.023.
pub const DEFAULT_GAMMA: u32 = 2300;

/// A single field that failed to parse or validate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason} (got {value:?})")]
pub struct FieldError {
    /// Field name.
    pub field: String,
    /// Raw value as received.
    pub value: String,
    /// What was wrong with it.
    pub reason: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Everything a merge needs besides the two sources.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeParams {
    /// Level range for the first image.
    pub range1: LevelRange,
    /// Level range for the second image.
    pub range2: LevelRange,
    /// gAMA value stored with the result.
    pub gamma: u32,
    /// Resize width; 0 with a non-zero height keeps aspect ratio.
    pub width: u32,
    /// Resize height; 0 with a non-zero width keeps aspect ratio.
    pub height: u32,
    /// Brightness factor for the first image.
    pub brightness1: f64,
    /// Brightness factor for the second image.
    pub brightness2: f64,
    /// Mask for a weighted merge; `None` selects the checkerboard.
    pub mask: Option<MaskMatrix>,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            range1: LevelRange::new(0, 230).unwrap_or(LevelRange::FULL),
            range2: LevelRange::new(230, 255).unwrap_or(LevelRange::FULL),
            gamma: DEFAULT_GAMMA,
            width: 0,
            height: 0,
            brightness1: 1.0,
            brightness2: 1.0,
            mask: None,
        }
    }
}

impl MergeParams {
    /// True when the sources are resampled before merging.
    pub fn resizes(&self) -> bool {
        self.width > 0 || self.height > 0
    }

    /// Builds parameters from form fields.
    ///
    /// Missing or blank fields take their [`Default`] value; unknown keys
    /// are ignored.
    ///
    /// # Errors
    ///
    /// [`SessionError::MalformedInput`] listing every field that failed,
    /// including inverted ranges and negative brightness.
    pub fn from_fields<I, K, V>(input: I) -> SessionResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let raw: HashMap<String, String> = input
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().trim().to_owned()))
            .collect();
        let get = |key: &str| raw.get(key).map(String::as_str).filter(|v| !v.is_empty());
        trace!(fields = raw.len(), "parsing merge fields");

        let d = Self::default();
        let mut errors = Errors::default();

        let range1 = errors.range((R1_START, get(R1_START)), (R1_END, get(R1_END)), d.range1);
        let range2 = errors.range((R2_START, get(R2_START)), (R2_END, get(R2_END)), d.range2);
        let gamma = errors.take(parse_field(GAMMA, get(GAMMA)), d.gamma);
        let width = errors.take(parse_dimension(WIDTH, get(WIDTH)), d.width);
        let height = errors.take(parse_dimension(HEIGHT, get(HEIGHT)), d.height);
        let brightness1 = errors.take(parse_brightness(BRIGHTNESS1, get(BRIGHTNESS1)), d.brightness1);
        let brightness2 = errors.take(parse_brightness(BRIGHTNESS2, get(BRIGHTNESS2)), d.brightness2);
        let mask = match get(MASK).map(parse_mask).transpose() {
            Ok(mask) => mask,
            Err(e) => {
                errors.0.push(e);
                None
            }
        };

        if !errors.0.is_empty() {
            return Err(SessionError::MalformedInput(errors.0));
        }
        Ok(Self {
            range1,
            range2,
            gamma,
            width,
            height,
            brightness1,
            brightness2,
            mask,
        })
    }
}

#[derive(Default)]
struct Errors(Vec<FieldError>);

impl Errors {
    fn take<T>(&mut self, parsed: Result<Option<T>, FieldError>, default: T) -> T {
        match parsed {
            Ok(v) => v.unwrap_or(default),
            Err(e) => {
                self.0.push(e);
                default
            }
        }
    }

    fn range(
        &mut self,
        (low_key, low): (&str, Option<&str>),
        (high_key, high): (&str, Option<&str>),
        default: LevelRange,
    ) -> LevelRange {
        match (parse_field::<u8>(low_key, low), parse_field::<u8>(high_key, high)) {
            (Ok(lo), Ok(hi)) => {
                let lo = lo.unwrap_or(default.low());
                let hi = hi.unwrap_or(default.high());
                LevelRange::new(lo, hi).unwrap_or_else(|e| {
                    self.0.push(FieldError::new(low_key, format!("{lo}-{hi}"), e.to_string()));
                    default
                })
            }
            (lo, hi) => {
                self.0.extend(lo.err());
                self.0.extend(hi.err());
                default
            }
        }
    }
}

fn parse_field<T>(name: &str, raw: Option<&str>) -> Result<Option<T>, FieldError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.map(|v| v.parse::<T>().map_err(|e| FieldError::new(name, v, e.to_string())))
        .transpose()
}

fn parse_dimension(name: &str, raw: Option<&str>) -> Result<Option<u32>, FieldError> {
    match parse_field::<u32>(name, raw)? {
        Some(v) if v > MAX_DIMENSION => Err(FieldError::new(
            name,
            raw.unwrap_or_default(),
            format!("must be at most {MAX_DIMENSION}"),
        )),
        other => Ok(other),
    }
}

fn parse_brightness(name: &str, raw: Option<&str>) -> Result<Option<f64>, FieldError> {
    match parse_field::<f64>(name, raw)? {
        Some(v) if !v.is_finite() || v < 0.0 => Err(FieldError::new(
            name,
            raw.unwrap_or_default(),
            "must be a non-negative number",
        )),
        other => Ok(other),
    }
}

/// Parses a `low-high` range such as `"0-230"`.
pub fn parse_range(s: &str) -> Result<LevelRange, FieldError> {
    let (low, high) = s
        .split_once('-')
        .ok_or_else(|| FieldError::new("range", s, "expected LOW-HIGH"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u8>()
            .map_err(|e| FieldError::new("range", s, e.to_string()))
    };
    LevelRange::new(parse(low)?, parse(high)?).map_err(|e| FieldError::new("range", s, e.to_string()))
}

/// Parses a JSON mask matrix such as `"[[1,1],[1,0]]"`.
pub fn parse_mask(s: &str) -> Result<MaskMatrix, FieldError> {
    let rows: Vec<Vec<f64>> =
        serde_json::from_str(s).map_err(|e| FieldError::new(MASK, s, e.to_string()))?;
    MaskMatrix::new(rows).map_err(|e| FieldError::new(MASK, s, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn malformed(result: SessionResult<MergeParams>) -> Vec<FieldError> {
        match result {
            Err(SessionError::MalformedInput(errors)) => errors,
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_fields_give_defaults() {
        let params = MergeParams::from_fields(Vec::<(&str, &str)>::new()).unwrap();
        assert_eq!(params, MergeParams::default());
        assert_eq!(params.range1, LevelRange::new(0, 230).unwrap());
        assert_eq!(params.range2, LevelRange::new(230, 255).unwrap());
        assert_eq!(params.gamma, 2300);
        assert!(!params.resizes());

        let blank = MergeParams::from_fields([(GAMMA, ""), (WIDTH, "  ")]).unwrap();
        assert_eq!(blank, MergeParams::default());
    }

    #[test]
    fn test_all_fields() {
        let params = MergeParams::from_fields([
            ("r1start", "10"),
            ("r1end", "200"),
            ("r2start", "210"),
            ("r2end", "255"),
            ("gamma", "4500"),
            ("width", "640"),
            ("height", "0"),
            ("brightness1", "0.75"),
            ("brightness2", "1.25"),
            ("mask", "[[1, 0.5], [0, 1]]"),
            ("unrelated", "whatever"),
        ])
        .unwrap();
        assert_eq!(params.range1, LevelRange::new(10, 200).unwrap());
        assert_eq!(params.range2, LevelRange::new(210, 255).unwrap());
        assert_eq!(params.gamma, 4500);
        assert_eq!((params.width, params.height), (640, 0));
        assert!(params.resizes());
        assert_relative_eq!(params.brightness1, 0.75);
        assert_relative_eq!(params.brightness2, 1.25);
        let mask = params.mask.unwrap();
        assert_eq!((mask.cols(), mask.rows()), (2, 2));
        assert_eq!(mask.alpha(1, 0), 128);
    }

    #[test]
    fn test_errors_are_aggregated() {
        let errors = malformed(MergeParams::from_fields([
            ("gamma", "lots"),
            ("width", "-5"),
            ("r2end", "256"),
            ("brightness1", "-1"),
            ("mask", "[[1],[1,0]]"),
        ]));
        let names: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(names, vec!["r2end", "gamma", "width", "brightness1", "mask"]);
        assert_eq!(errors[1].value, "lots");
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let errors = malformed(MergeParams::from_fields([
            ("width", "4000000000"),
            ("height", "16385"),
        ]));
        let names: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(names, vec!["width", "height"]);
        assert_eq!(errors[0].value, "4000000000");
        assert!(errors[0].reason.contains("16384"), "{}", errors[0].reason);

        let max = MAX_DIMENSION.to_string();
        let params = MergeParams::from_fields([("width", max.as_str())]).unwrap();
        assert_eq!(params.width, MAX_DIMENSION);
    }

    #[test]
    fn test_inverted_range_is_field_error() {
        let errors = malformed(MergeParams::from_fields([("r1start", "200"), ("r1end", "100")]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "r1start");
        assert_eq!(errors[0].value, "200-100");
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("0-230").unwrap(), LevelRange::new(0, 230).unwrap());
        assert_eq!(parse_range(" 10 - 20 ").unwrap(), LevelRange::new(10, 20).unwrap());
        assert!(parse_range("5").is_err());
        assert!(parse_range("20-10").is_err());
        assert!(parse_range("0-300").is_err());
    }

    #[test]
    fn test_parse_mask() {
        assert_eq!(parse_mask("[[1,1],[1,0]]").unwrap(), MaskMatrix::checkerboard());
        assert!(parse_mask("[]").is_err());
        assert!(parse_mask("not json").is_err());
    }
}

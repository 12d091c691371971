//! crates/recipe_catalog_core/src/scaler.rs
//!
//! Rewrites the quantity embedded in a free-text ingredient line for a
//! different number of servings.

use std::ops::Range;

const INTEGER_TOLERANCE: f64 = 1e-9;

/// Scales ingredient quantities by a fixed factor.
///
/// Recipes are saved for one serving, so the factor for `n` servings is `n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantityScaler {
    factor: f64,
}

impl QuantityScaler {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    pub fn for_servings(servings: u32) -> Self {
        Self::new(f64::from(servings))
    }

    /// Scales the first quantity found in `text`.
    ///
    /// A factor of exactly one, a non-finite factor, or a line without a
    /// quantity returns the text unchanged.
    pub fn scale(&self, text: &str) -> String {
        if self.factor == 1.0 || !self.factor.is_finite() {
            return text.to_string();
        }
        match find_quantity(text) {
            Some(quantity) => {
                let scaled = format_quantity(quantity.value * self.factor);
                let mut out = String::with_capacity(text.len() + 4);
                out.push_str(&text[..quantity.span.start]);
                out.push_str(&scaled);
                out.push_str(&text[quantity.span.end..]);
                out
            }
            None => text.to_string(),
        }
    }

    pub fn scale_all(&self, lines: &[String]) -> Vec<String> {
        lines.iter().map(|line| self.scale(line)).collect()
    }
}

/// A quantity token located in an ingredient line.
#[derive(Debug, Clone, PartialEq)]
struct Quantity {
    span: Range<usize>,
    value: f64,
}

/// Finds the first fraction (`a/b`) or decimal (`1.5`, `1,5`, `200`) token.
fn find_quantity(text: &str) -> Option<Quantity> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let whole_end = digit_run_end(bytes, start);

    if let Some(&b'/') = bytes.get(whole_end) {
        let denominator_end = digit_run_end(bytes, whole_end + 1);
        if denominator_end > whole_end + 1 {
            let numerator: f64 = text[start..whole_end].parse().ok()?;
            let denominator: f64 = text[whole_end + 1..denominator_end].parse().ok()?;
            if denominator == 0.0 {
                return None;
            }
            return Some(Quantity {
                span: start..denominator_end,
                value: numerator / denominator,
            });
        }
    }

    let mut end = whole_end;
    if let Some(b'.' | b',') = bytes.get(whole_end) {
        let fraction_end = digit_run_end(bytes, whole_end + 1);
        if fraction_end > whole_end + 1 {
            end = fraction_end;
        }
    }

    let value: f64 = text[start..end].replace(',', ".").parse().ok()?;
    Some(Quantity { span: start..end, value })
}

fn digit_run_end(bytes: &[u8], from: usize) -> usize {
    bytes[from.min(bytes.len())..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |offset| from + offset)
}

/// Integers print bare; anything else gets one decimal, and a rounded `X.0`
/// collapses to `X`.
fn format_quantity(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < INTEGER_TOLERANCE {
        return format_integer(rounded);
    }
    let one_decimal = format!("{:.1}", value);
    match one_decimal.strip_suffix(".0") {
        Some(whole) if whole == "-0" => "0".to_string(),
        Some(whole) => whole.to_string(),
        None => one_decimal,
    }
}

fn format_integer(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{:.0}", value)
    }
}

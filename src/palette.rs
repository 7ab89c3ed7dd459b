//! Band colors: hex parsing and resampling to any band count.

use std::fmt;

use crate::bands::Polarity;

/// Default positive palette, lightest to darkest.
pub const DEFAULT_POSITIVE: [&str; 3] = ["#cfe8ff", "#7fb6ff", "#2b7bff"];
/// Default negative palette, lightest to darkest.
pub const DEFAULT_NEGATIVE: [&str; 3] = ["#ffcfcf", "#ff7f7f", "#ff2b2b"];

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Linear interpolation between two colors, `t` in `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self(
            mix(self.0, other.0),
            mix(self.1, other.1),
            mix(self.2, other.2),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Color stops for both polarities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    positive: Vec<Rgb>,
    negative: Vec<Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        let parse = |stops: &[&str]| stops.iter().filter_map(|s| Rgb::from_hex(s)).collect();
        Self {
            positive: parse(&DEFAULT_POSITIVE),
            negative: parse(&DEFAULT_NEGATIVE),
        }
    }
}

impl Palette {
    /// Builds a palette from hex strings.
    ///
    /// # Errors
    ///
    /// Returns the first offending entry if a list is empty or a color is not
    /// `#rrggbb`.
    pub fn from_hex<S: AsRef<str>>(positive: &[S], negative: &[S]) -> Result<Self, String> {
        Ok(Self {
            positive: parse_stops(positive, "positive")?,
            negative: parse_stops(negative, "negative")?,
        })
    }

    /// Colors for `bands` slices of one polarity, lightest first.
    ///
    /// With no more bands than stops the first `bands` stops are used as-is;
    /// otherwise the stops are interpolated piecewise-linearly.
    pub fn colors(&self, polarity: Polarity, bands: usize) -> Vec<Rgb> {
        let stops = match polarity {
            Polarity::Positive => &self.positive,
            Polarity::Negative => &self.negative,
        };
        resample(stops, bands)
    }
}

fn parse_stops<S: AsRef<str>>(raw: &[S], which: &str) -> Result<Vec<Rgb>, String> {
    if raw.is_empty() {
        return Err(format!("{which} palette needs at least one color"));
    }
    raw.iter()
        .map(|s| {
            Rgb::from_hex(s.as_ref())
                .ok_or_else(|| format!("{which} palette: \"{}\" is not #rrggbb", s.as_ref()))
        })
        .collect()
}

fn resample(stops: &[Rgb], n: usize) -> Vec<Rgb> {
    if n <= stops.len() {
        return stops[..n].to_vec();
    }
    if stops.len() == 1 {
        return vec![stops[0]; n];
    }
    let last_seg = stops.len() - 2;
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64 * (stops.len() - 1) as f64;
            let seg = (t.floor() as usize).min(last_seg);
            stops[seg].lerp(stops[seg + 1], t - seg as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_display() {
        let c = Rgb::from_hex("#2b7bff").expect("valid hex");
        assert_eq!(c, Rgb(0x2b, 0x7b, 0xff));
        assert_eq!(c.to_string(), "#2b7bff");
    }

    #[test]
    fn hex_rejects_garbage() {
        assert!(Rgb::from_hex("#12345").is_none());
        assert!(Rgb::from_hex("#gg0000").is_none());
        assert!(Rgb::from_hex("").is_none());
    }

    #[test]
    fn default_three_bands_match_stops() {
        let p = Palette::default();
        let pos = p.colors(Polarity::Positive, 3);
        assert_eq!(pos[0].to_string(), "#cfe8ff");
        assert_eq!(pos[2].to_string(), "#2b7bff");
        let neg = p.colors(Polarity::Negative, 3);
        assert_eq!(neg[1].to_string(), "#ff7f7f");
    }

    #[test]
    fn fewer_bands_take_lightest_stops() {
        let p = Palette::default();
        let pos = p.colors(Polarity::Positive, 1);
        assert_eq!(pos, vec![Rgb(0xcf, 0xe8, 0xff)]);
    }

    #[test]
    fn more_bands_interpolate_between_ends() {
        let p = Palette::default();
        let pos = p.colors(Polarity::Positive, 5);
        assert_eq!(pos.len(), 5);
        assert_eq!(pos[0].to_string(), "#cfe8ff");
        assert_eq!(pos[2].to_string(), "#7fb6ff");
        assert_eq!(pos[4].to_string(), "#2b7bff");
    }

    #[test]
    fn from_hex_reports_bad_entry() {
        let err = Palette::from_hex(&["#ffffff"], &["red"]).unwrap_err();
        assert!(err.contains("negative"));
        assert!(Palette::from_hex::<&str>(&[], &["#ffffff"]).is_err());
    }
}

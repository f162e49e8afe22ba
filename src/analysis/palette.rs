use crate::error::{HeatmapError, HmResult};
use serde::{Serialize, Serializer};
use strum_macros::{Display, EnumIter, EnumString};

/// Lookup-table resolution of a gradient.
const LEVELS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    fn lerp(a: Self, b: Self, t: f64) -> Self {
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
        Self::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PaletteKind {
    Whatpulse,
    Hot,
}

impl PaletteKind {
    pub fn stops(&self) -> &'static [&'static str] {
        match self {
            Self::Whatpulse => &["#000435", "#1F77B4", "#2CA02C", "#D62728"],
            Self::Hot => &["#000000", "#E60000", "#FFD200", "#FFFFFF"],
        }
    }
}

/// Evenly spaced color stops, sampled like a 256-entry colormap.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    stops: Vec<Rgb>,
}

impl Palette {
    pub fn from_hex_stops<S: AsRef<str>>(stops: &[S]) -> HmResult<Self> {
        let stops = stops
            .iter()
            .map(|s| {
                Rgb::from_hex(s.as_ref()).ok_or_else(|| {
                    HeatmapError::Config(format!("invalid color stop '{}'", s.as_ref()))
                })
            })
            .collect::<HmResult<Vec<_>>>()?;

        if stops.is_empty() {
            return Err(HeatmapError::Config(
                "a palette needs at least one color stop".to_string(),
            ));
        }
        Ok(Self { stops })
    }

    pub fn preset(kind: PaletteKind) -> Self {
        let stops = kind
            .stops()
            .iter()
            .filter_map(|s| Rgb::from_hex(s))
            .collect();
        Self { stops }
    }

    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    /// Color for an intensity in `[0, 1]`.
    pub fn sample(&self, t: f64) -> Rgb {
        if self.stops.len() == 1 {
            return self.stops[0];
        }

        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let level = ((t * LEVELS as f64) as usize).min(LEVELS - 1);
        let u = level as f64 / (LEVELS - 1) as f64;

        let segments = self.stops.len() - 1;
        let pos = u * segments as f64;
        let idx = (pos.floor() as usize).min(segments - 1);
        Rgb::lerp(self.stops[idx], self.stops[idx + 1], pos - idx as f64)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::preset(PaletteKind::Whatpulse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_endpoints_hit_first_and_last_stop() {
        for kind in PaletteKind::iter() {
            let palette = Palette::preset(kind);
            let stops = palette.stops().to_vec();
            assert_eq!(palette.sample(0.0), stops[0]);
            assert_eq!(palette.sample(1.0), *stops.last().unwrap());
        }
    }

    #[test]
    fn test_hex_round_trip_and_rejects_garbage() {
        assert_eq!(Rgb::from_hex("#1F77B4"), Some(Rgb::new(0x1F, 0x77, 0xB4)));
        assert_eq!(Rgb::new(0, 4, 53).to_hex(), "#000435");
        assert!(Rgb::from_hex("#12345").is_none());
        assert!(Rgb::from_hex("zzzzzz").is_none());
        assert!(Rgb::from_hex("#+F+F+F").is_none());
    }

    #[test]
    fn test_custom_stops_validate() {
        assert!(Palette::from_hex_stops(&["#000000", "oops"]).is_err());
        assert!(Palette::from_hex_stops::<&str>(&[]).is_err());
        let p = Palette::from_hex_stops(&["#000000", "#FFFFFF"]).unwrap();
        let mid = p.sample(0.5);
        assert!(mid.r > 120 && mid.r < 135);
    }
}

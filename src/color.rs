//! RGB value type and the load→color mapping.
//!
//! The mapping splits load into two weighted regimes: the first 50 percentage
//! points ("processor" regime) carry almost the whole color range, anything
//! above 50 ("overhang", hyperthread saturation) barely moves it further.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, bail};

/// An RGB color with three independent 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    /// Parses the `#RRGGBB` encoding the lamp reports its current color in.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let Some(hex) = hex.strip_prefix('#') else {
            bail!("color '{hex}' is missing the leading '#'");
        };

        if hex.len() != 6 || !hex.is_ascii() {
            bail!("color '#{hex}' is not a 6-digit hex triplet");
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).with_context(|| format!("invalid hex in '#{hex}'"))
        };

        Ok(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// Processor regime weight: the first 50 points of load cover 95% of the range.
const PROCESSOR_WEIGHT: f64 = 95.0 / 50.0;

/// Overhang regime weight: load above 50 contributes the remaining 5%.
const OVERHANG_WEIGHT: f64 = 5.0 / 50.0;

/// Maps a load percentage to a color between pure blue (idle) and pure red
/// (saturated). Load above 100 is accepted but clamps at pure red.
pub fn color_from_load(load: u64) -> Rgb {
    let base = load.min(50) as f64;
    let overhang = load.saturating_sub(50) as f64;

    let multiplier = (base * PROCESSOR_WEIGHT + overhang * OVERHANG_WEIGHT) / 100.0;
    let multiplier = multiplier.clamp(0.0, 1.0);

    Rgb {
        r: (255.0 * multiplier).round() as u8,
        g: 0,
        b: (255.0 * (1.0 - multiplier)).round() as u8,
    }
}

//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Color references found in SGR sequences and their resolution to RGB.

use crate::consts::{
    BASE_PALETTE, BRIGHT_BOOST, CUBE_BASE, CUBE_START, CUBE_STEP, GRAYSCALE_BASE,
    GRAYSCALE_START, GRAYSCALE_STEP,
};

/// A color reference as written in an SGR sequence.
///
/// Colors stay symbolic until the renderer asks for a concrete value with
/// [`Color::resolve`]. This keeps a [`Style`](crate::Style) cheap to compare
/// and lets hosts map the sixteen named colors onto their own theme if they
/// prefer.
///
/// | Variant      | Produced by                                  |
/// |--------------|----------------------------------------------|
/// | `Named(n)`   | `30-37`, `40-47` (n = 0-7), `90-97`, `100-107` (n = 8-15) |
/// | `Indexed(n)` | `38;5;n`, `48;5;n`                           |
/// | `Rgb(r,g,b)` | `38;2;r;g;b`, `48;2;r;g;b`                   |
///
/// # Examples
///
/// ```rust
/// use ansilog_sgrcodec::{Color, Rgb};
///
/// assert_eq!(Color::Named(1).resolve(), Rgb::new(128, 0, 0));
/// assert_eq!(Color::Indexed(232).resolve(), Rgb::new(8, 8, 8));
/// assert_eq!(Color::Rgb(10, 20, 30).resolve(), Rgb::new(10, 20, 30));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    /// One of the sixteen named terminal colors (0-7 base, 8-15 bright).
    Named(u8),
    /// An entry of the 256-color palette.
    Indexed(u8),
    /// A 24-bit color.
    Rgb(u8, u8, u8),
}

/// A concrete 24-bit color value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Creates a new color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    /// Creates a gray with the same value on every channel.
    pub const fn gray(level: u8) -> Rgb {
        Rgb::new(level, level, level)
    }

    /// Formats the color as a lowercase `#rrggbb` string.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl Color {
    /// Builds a named color, clamping the index into `0..=15`.
    pub fn named(index: u8) -> Color {
        Color::Named(index.min(15))
    }

    /// Builds a palette color from an SGR parameter, clamping into `0..=255`.
    pub fn indexed(value: u64) -> Color {
        Color::Indexed(clamp_channel(value))
    }

    /// Builds a 24-bit color from SGR parameters, clamping every channel.
    pub fn rgb(r: u64, g: u64, b: u64) -> Color {
        Color::Rgb(clamp_channel(r), clamp_channel(g), clamp_channel(b))
    }

    /// Resolves this reference to a concrete color.
    ///
    /// - Named and palette entries 0-7 use the base palette.
    /// - Entries 8-15 brighten base entry `n - 8` by 80 on each channel,
    ///   saturating at 255.
    /// - Entries 16-231 form the 6x6x6 cube where a component `c` maps to `0`
    ///   when `c == 0` and to `55 + (c - 1) * 40` otherwise.
    /// - Entries 232-255 are the gray ramp `8 + (i - 232) * 10`.
    /// - Rgb values are returned unchanged.
    ///
    /// This never fails; it is a pure table lookup plus arithmetic.
    pub fn resolve(self) -> Rgb {
        match self {
            Color::Named(index) => resolve_system(index.min(15)),
            Color::Indexed(index) if index < CUBE_START => resolve_system(index),
            Color::Indexed(index) if index < GRAYSCALE_START => resolve_cube(index),
            Color::Indexed(index) => {
                Rgb::gray(GRAYSCALE_BASE + (index - GRAYSCALE_START) * GRAYSCALE_STEP)
            }
            Color::Rgb(r, g, b) => Rgb::new(r, g, b),
        }
    }

    /// Human readable name of a named (or low palette) color.
    ///
    /// Returns `None` for cube, grayscale and 24-bit colors.
    pub fn name(&self) -> Option<&'static str> {
        const NAMES: [&str; 16] = [
            "Black",
            "Red",
            "Green",
            "Yellow",
            "Blue",
            "Magenta",
            "Cyan",
            "White",
            "Bright Black",
            "Bright Red",
            "Bright Green",
            "Bright Yellow",
            "Bright Blue",
            "Bright Magenta",
            "Bright Cyan",
            "Bright White",
        ];
        match self {
            Color::Named(index) => Some(NAMES[usize::from((*index).min(15))]),
            Color::Indexed(index) if *index < CUBE_START => Some(NAMES[usize::from(*index)]),
            _ => None,
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

fn clamp_channel(value: u64) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

fn resolve_system(index: u8) -> Rgb {
    let (r, g, b) = BASE_PALETTE[usize::from(index % 8)];
    if index < 8 {
        Rgb::new(r, g, b)
    } else {
        Rgb::new(
            r.saturating_add(BRIGHT_BOOST),
            g.saturating_add(BRIGHT_BOOST),
            b.saturating_add(BRIGHT_BOOST),
        )
    }
}

fn resolve_cube(index: u8) -> Rgb {
    let cube = index - CUBE_START;
    let component = |c: u8| {
        if c == 0 {
            0
        } else {
            CUBE_BASE + (c - 1) * CUBE_STEP
        }
    };
    Rgb::new(
        component((cube / 36) % 6),
        component((cube / 6) % 6),
        component(cube % 6),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_base_palette() {
        assert_eq!(Color::Named(0).resolve(), Rgb::new(0, 0, 0));
        assert_eq!(Color::Named(1).resolve(), Rgb::new(128, 0, 0));
        assert_eq!(Color::Named(2).resolve(), Rgb::new(0, 128, 0));
        assert_eq!(Color::Named(3).resolve(), Rgb::new(128, 128, 0));
        assert_eq!(Color::Named(4).resolve(), Rgb::new(0, 0, 128));
        assert_eq!(Color::Named(5).resolve(), Rgb::new(128, 0, 128));
        assert_eq!(Color::Named(6).resolve(), Rgb::new(0, 128, 128));
        assert_eq!(Color::Named(7).resolve(), Rgb::new(192, 192, 192));
    }

    #[test]
    fn test_named_bright_palette_saturates() {
        assert_eq!(Color::Named(8).resolve(), Rgb::new(80, 80, 80));
        assert_eq!(Color::Named(9).resolve(), Rgb::new(208, 80, 80));
        assert_eq!(Color::Named(11).resolve(), Rgb::new(208, 208, 80));
        assert_eq!(Color::Named(15).resolve(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_named_out_of_range_is_clamped() {
        assert_eq!(Color::Named(200).resolve(), Color::Named(15).resolve());
        assert_eq!(Color::named(42), Color::Named(15));
    }

    #[test]
    fn test_indexed_low_entries_match_named() {
        for index in 0..16u8 {
            assert_eq!(
                Color::Indexed(index).resolve(),
                Color::Named(index).resolve(),
                "palette entry {index}"
            );
        }
    }

    #[test]
    fn test_indexed_cube() {
        assert_eq!(Color::Indexed(16).resolve(), Rgb::new(0, 0, 0));
        assert_eq!(Color::Indexed(17).resolve(), Rgb::new(0, 0, 55));
        assert_eq!(Color::Indexed(21).resolve(), Rgb::new(0, 0, 215));
        assert_eq!(Color::Indexed(22).resolve(), Rgb::new(0, 55, 0));
        assert_eq!(Color::Indexed(52).resolve(), Rgb::new(55, 0, 0));
        assert_eq!(Color::Indexed(196).resolve(), Rgb::new(215, 0, 0));
        assert_eq!(Color::Indexed(208).resolve(), Rgb::new(215, 95, 0));
        assert_eq!(Color::Indexed(231).resolve(), Rgb::new(215, 215, 215));
    }

    #[test]
    fn test_indexed_grayscale() {
        assert_eq!(Color::Indexed(232).resolve(), Rgb::gray(8));
        assert_eq!(Color::Indexed(233).resolve(), Rgb::gray(18));
        assert_eq!(Color::Indexed(255).resolve(), Rgb::gray(238));
    }

    #[test]
    fn test_rgb_identity() {
        assert_eq!(Color::Rgb(10, 20, 30).resolve(), Rgb::new(10, 20, 30));
        assert_eq!(Color::Rgb(255, 255, 255).resolve(), Rgb::gray(255));
    }

    #[test]
    fn test_constructors_clamp() {
        assert_eq!(Color::indexed(300), Color::Indexed(255));
        assert_eq!(Color::indexed(7), Color::Indexed(7));
        assert_eq!(Color::rgb(256, 12, 99_999), Color::Rgb(255, 12, 255));
    }

    #[test]
    fn test_color_names() {
        assert_eq!(Color::Named(1).name(), Some("Red"));
        assert_eq!(Color::Named(12).name(), Some("Bright Blue"));
        assert_eq!(Color::Indexed(6).name(), Some("Cyan"));
        assert_eq!(Color::Indexed(100).name(), None);
        assert_eq!(Color::Rgb(1, 2, 3).name(), None);
    }

    #[test]
    fn test_rgb_formatting() {
        assert_eq!(Rgb::new(255, 0, 16).to_hex(), "#ff0010");
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "rgb(1, 2, 3)");
        assert_eq!(Color::from(Rgb::new(1, 2, 3)), Color::Rgb(1, 2, 3));
    }
}

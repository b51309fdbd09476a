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

use crate::Color;

/// The text attributes in effect after a sequence of SGR codes.
///
/// `Style` is a small `Copy` value. Interpretation never mutates a style in
/// place: [`Style::apply`] consumes one and returns the next, which makes the
/// whole span computation a fold over the token stream.
///
/// # ANSI Codes
///
/// | Code          | Effect                                     |
/// |---------------|--------------------------------------------|
/// | empty, `0`    | Reset every attribute                      |
/// | `1`           | Bold                                       |
/// | `3`           | Italic                                     |
/// | `4`           | Underline                                  |
/// | `30-37`       | Foreground `Named(0-7)`                    |
/// | `90-97`       | Foreground `Named(8-15)`                   |
/// | `40-47`       | Background `Named(0-7)`                    |
/// | `100-107`     | Background `Named(8-15)`                   |
/// | `38;5;n`      | Foreground `Indexed(n)`                    |
/// | `38;2;r;g;b`  | Foreground `Rgb(r, g, b)`                  |
/// | `48;5;n`      | Background `Indexed(n)`                    |
/// | `48;2;r;g;b`  | Background `Rgb(r, g, b)`                  |
///
/// Every other code is ignored.
///
/// # Examples
///
/// ```rust
/// use ansilog_sgrcodec::{Color, Style};
///
/// let style = Style::default().apply(&["1", "38", "2", "10", "20", "30"]);
/// assert!(style.bold);
/// assert_eq!(style.foreground, Some(Color::Rgb(10, 20, 30)));
///
/// assert_eq!(style.apply(&["0"]), Style::default());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Style {
    /// Foreground color, `None` for the host's default
    pub foreground: Option<Color>,
    /// Background color, `None` for the host's default
    pub background: Option<Color>,
    /// Bold (increased intensity)
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Single underline
    pub underline: bool,
}

/// Which color slot an extended color sequence (`38`/`48`) targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layer {
    Foreground,
    Background,
}

impl Style {
    /// Returns `true` when no attribute is set.
    pub fn is_plain(&self) -> bool {
        *self == Style::default()
    }

    /// Returns a copy with the given foreground.
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    /// Returns a copy with the given background.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Returns a copy with bold set.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Returns a copy with italic set.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Returns a copy with underline set.
    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    /// Applies the codes of one SGR sequence and returns the resulting style.
    ///
    /// Codes are processed left to right. `38` and `48` consume their
    /// parameters (`5;n` or `2;r;g;b`) so those are never reinterpreted as
    /// standalone codes. The walk is total:
    ///
    /// - an empty code is a reset, like `0`, also in the middle or at the end,
    /// - a code that is not a decimal integer is skipped,
    /// - `38`/`48` without enough parameters is skipped on its own and the
    ///   following codes are interpreted normally,
    /// - palette indices and channels above 255 are clamped.
    pub fn apply<S: AsRef<str>>(self, codes: &[S]) -> Style {
        let mut style = self;
        let mut i = 0;

        while i < codes.len() {
            let code = codes[i].as_ref();
            // Empty codes reset wherever they appear, so `1;` and `1;;3` drop
            // the bold.
            if code.is_empty() {
                style = Style::default();
                i += 1;
                continue;
            }

            let Some(value) = parse_code(code) else {
                i += 1;
                continue;
            };

            match value {
                0 => style = Style::default(),
                1 => style.bold = true,
                3 => style.italic = true,
                4 => style.underline = true,
                30..=37 => style.foreground = Some(Color::named(to_index(value - 30))),
                90..=97 => style.foreground = Some(Color::named(to_index(value - 90 + 8))),
                40..=47 => style.background = Some(Color::named(to_index(value - 40))),
                100..=107 => style.background = Some(Color::named(to_index(value - 100 + 8))),
                38 => i += style.apply_extended(Layer::Foreground, &codes[i + 1..]),
                48 => i += style.apply_extended(Layer::Background, &codes[i + 1..]),
                _ => {}
            }

            i += 1;
        }

        style
    }

    /// Applies an extended color whose parameters start at `params[0]`.
    ///
    /// Returns the number of parameters consumed beyond the `38`/`48` itself.
    fn apply_extended<S: AsRef<str>>(&mut self, layer: Layer, params: &[S]) -> usize {
        // The selector must be exactly `5` or `2`; `05` is not a selector.
        let selector = params.first().map(|p| p.as_ref());
        let (color, consumed) = match selector {
            Some("5") if params.len() >= 2 => {
                let color = parse_code(params[1].as_ref()).map(Color::indexed);
                (color, 2)
            }
            Some("2") if params.len() >= 4 => {
                let channel = |n: usize| parse_code(params[n].as_ref());
                let color = match (channel(1), channel(2), channel(3)) {
                    (Some(r), Some(g), Some(b)) => Some(Color::rgb(r, g, b)),
                    _ => None,
                };
                (color, 4)
            }
            _ => (None, 0),
        };

        if let Some(color) = color {
            match layer {
                Layer::Foreground => self.foreground = Some(color),
                Layer::Background => self.background = Some(color),
            }
        }
        consumed
    }
}

/// Parses one SGR parameter; anything but a run of ASCII digits is rejected.
pub(crate) fn parse_code(code: &str) -> Option<u64> {
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Overlong parameters saturate, they still select the clamped extreme.
    Some(code.parse::<u64>().unwrap_or(u64::MAX))
}

fn to_index(value: u64) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

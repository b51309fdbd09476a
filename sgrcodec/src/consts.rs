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

/// The ESC control byte that opens every raw escape sequence.
pub const ESC: u8 = 0x1B;

/// Control Sequence Introducer byte following the escape marker.
pub const CSI: u8 = b'[';

/// Final byte of a Select Graphic Rendition sequence.
pub const SGR_FINAL: u8 = b'm';

/// SGR parameter separator.
pub const PARAM_SEPARATOR: char = ';';

/// Length of the textual escape literal `\u001B` as it appears in log files
/// written by producers that escape control characters.
pub const LITERAL_ESCAPE_LEN: usize = 6;

/// The eight base colors, indexed by SGR color number (`30 + n` / `40 + n`).
///
/// Note: these are the log viewer's own palette values, not xterm's.
pub const BASE_PALETTE: [(u8, u8, u8); 8] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
];

/// Amount added to each base channel to form the bright variants (8-15).
pub const BRIGHT_BOOST: u8 = 80;

/// First index of the 6x6x6 color cube in the 256-color palette.
pub const CUBE_START: u8 = 16;

/// First index of the grayscale ramp in the 256-color palette.
pub const GRAYSCALE_START: u8 = 232;

/// Channel value of cube component 1; later components step by [`CUBE_STEP`].
pub const CUBE_BASE: u8 = 55;

/// Step between cube components 1 through 5.
pub const CUBE_STEP: u8 = 40;

/// Gray level of palette index 232.
pub const GRAYSCALE_BASE: u8 = 8;

/// Step between consecutive grayscale ramp entries.
pub const GRAYSCALE_STEP: u8 = 10;

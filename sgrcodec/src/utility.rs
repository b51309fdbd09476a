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

mod category;
mod rewrite;
mod spanned;
mod stats;
mod strip;

pub use self::category::{CodeGroups, SgrCategory, code_groups};
pub use self::rewrite::{normalize_indexed_colors, replace_code, rewrite_tokens};
pub use self::spanned::{Highlights, StyledSpan, build_spans};
pub use self::stats::AnsiStatistics;
pub use self::strip::strip_ansi_codes;

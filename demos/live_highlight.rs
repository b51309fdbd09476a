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

//! Live Log Highlighting Example
//!
//! Simulates a log file being tailed: lines arrive in quick bursts, each one
//! notifying the scheduler. Only the quiet period after a burst triggers a
//! recomputation, which is rendered back to the terminal with the resolved
//! colors.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example live_highlight
//! ```

use ansilog_service::{
    DocumentHighlights, DocumentId, HighlightHandler, HighlightScheduler, HighlightSettings,
    SharedDocument, SpanCache,
};
use ansilog_sgrcodec::{AnsiStatistics, Style};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

const BURSTS: &[&[&str]] = &[
    &[
        "2024-05-01 12:00:00 \x1b[32mINFO\x1b[0m  service starting\n",
        "2024-05-01 12:00:00 \x1b[32mINFO\x1b[0m  listening on :8080\n",
    ],
    &[
        "2024-05-01 12:00:03 \x1b[1;33mWARN\x1b[0m  slow request \x1b[38;5;244m(812ms)\x1b[0m\n",
        "2024-05-01 12:00:04 \\u001B[1;31mERROR\\u001B[0m upstream reset\n",
        "2024-05-01 12:00:04 \x1b[38;2;255;128;0mTRACE\x1b[0m retrying \x1b[4mGET /health\x1b[24m\n",
    ],
];

/// Renders every published result to stdout
struct TerminalPainter;

impl TerminalPainter {
    fn paint(style: &Style, text: &str) -> String {
        let mut codes = Vec::new();
        if style.bold {
            codes.push("1".to_string());
        }
        if style.italic {
            codes.push("3".to_string());
        }
        if style.underline {
            codes.push("4".to_string());
        }
        if let Some(color) = style.foreground {
            let rgb = color.resolve();
            codes.push(format!("38;2;{};{};{}", rgb.r, rgb.g, rgb.b));
        }
        if let Some(color) = style.background {
            let rgb = color.resolve();
            codes.push(format!("48;2;{};{};{}", rgb.r, rgb.g, rgb.b));
        }
        if codes.is_empty() {
            text.to_string()
        } else {
            format!("\x1b[{}m{}\x1b[0m", codes.join(";"), text)
        }
    }
}

#[async_trait]
impl HighlightHandler for TerminalPainter {
    async fn on_highlights(&self, id: DocumentId, published: DocumentHighlights) {
        println!(
            "---- {id} (edit {}): {} ----",
            published.generation,
            AnsiStatistics::collect(&published.text)
        );
        let rendered: String = published
            .spans()
            .iter()
            .map(|span| Self::paint(&span.style, published.span_text(span)))
            .collect();
        print!("{rendered}");
    }

    async fn on_bypass(&self, id: DocumentId, chars: usize) {
        println!("---- {id}: {chars} characters, too large to highlight ----");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .init();

    let document = Arc::new(SharedDocument::default());
    let handler = Arc::new(TerminalPainter);
    let settings = HighlightSettings::default().with_debounce(Duration::from_millis(100));
    let scheduler =
        HighlightScheduler::new(settings, handler)?.with_cache(Arc::new(SpanCache::new()));

    let id = scheduler.register(&document);

    for burst in BURSTS {
        for line in *burst {
            document.append(line);
            scheduler.notify_edit(id)?;
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    scheduler.unregister(id).await?;
    println!("{:#?}", scheduler.metrics().snapshot());
    Ok(())
}

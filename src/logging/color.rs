// SPDX-License-Identifier: Apache-2.0 OR MIT
// ANSI color wrapping for terminal output

use std::ops::Range;

/// ANSI escape pair wrapped around a colorized line.
///
/// Colors are applied by the dispatch path as a prefix and suffix around the
/// already formatted line, so no intermediate string is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    prefix: &'static str,
    suffix: &'static str,
}

const RESET_FG: &str = "\x1b[39m";

impl Color {
    /// No escape sequences at all
    pub const COLORLESS: Color = Color::new("", "");
    pub const RED: Color = Color::new("\x1b[31m", RESET_FG);
    pub const GREEN: Color = Color::new("\x1b[32m", RESET_FG);
    pub const ORANGE: Color = Color::new("\x1b[33m", RESET_FG);
    pub const PURPLE: Color = Color::new("\x1b[34m", RESET_FG);
    pub const CYAN: Color = Color::new("\x1b[36m", RESET_FG);
    pub const YELLOW: Color = Color::new("\x1b[93m", RESET_FG);
    pub const BROWN: Color = Color::new("\x1b[96m", RESET_FG);
    pub const GRAY: Color = Color::new("\x1b[90m", RESET_FG);
    pub const BLACK: Color = Color::new("\x1b[30m", RESET_FG);
    pub const WHITE: Color = Color::new("\x1b[97m", RESET_FG);

    /// Custom escape pair
    pub const fn new(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }

    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub const fn suffix(&self) -> &'static str {
        self.suffix
    }

    /// Wrap `text` in this color
    pub fn paint(&self, text: &str) -> String {
        let mut out = String::with_capacity(self.prefix.len() + text.len() + self.suffix.len());
        out.push_str(self.prefix);
        out.push_str(text);
        out.push_str(self.suffix);
        out
    }

    /// Append a painted copy of `buf[line]` to the end of `buf`
    pub(crate) fn paint_within(&self, buf: &mut Vec<u8>, line: Range<usize>) {
        buf.extend_from_slice(self.prefix.as_bytes());
        buf.extend_from_within(line);
        buf.extend_from_slice(self.suffix.as_bytes());
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::COLORLESS
    }
}

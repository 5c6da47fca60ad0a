// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Local};
use crate::nes::nes::RuntimeOptions;

/// Logs a message to stdout with a given prefix if the emulator was started
/// with the verbose flag set.
pub fn log<P, T>(prefix: P, text: T, runtime_options: &RuntimeOptions) where P: Into<String>, T: Into<String> {
    if runtime_options.verbose {
        println!("{}", format_line(Local::now(), prefix, text));
    }
}

/// Builds a single log line. Kept apart from `log` so the layout can be
/// checked without touching stdout.
fn format_line<P, T>(time: DateTime<Local>, prefix: P, text: T) -> String where P: Into<String>, T: Into<String> {
    format!("[{}] -- [{}] {}", time, prefix.into(), text.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_carries_prefix_and_text() {
        let line = format_line(Local::now(), "cpu", "LDA #$10");
        assert!(line.ends_with("-- [cpu] LDA #$10"));
        assert!(line.starts_with('['));
    }
}

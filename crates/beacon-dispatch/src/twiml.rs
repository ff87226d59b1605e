// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice markup for spoken scripts.

use beacon_core::VOICE_PAUSE;

/// Seconds of silence rendered for each pause marker.
const PAUSE_SECS: u32 = 2;

/// Render `script` as provider voice markup.
///
/// Each segment between pause markers becomes one `<Say>`; markers become
/// `<Pause>`. Segment text is XML-escaped.
pub fn render(script: &str, voice: &str) -> String {
    let voice = escape(voice);
    let segments: Vec<String> = script
        .split(VOICE_PAUSE)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("<Say voice=\"{voice}\">{}</Say>", escape(s)))
        .collect();
    let pause = format!("<Pause length=\"{PAUSE_SECS}\"/>");
    format!("<Response>{}</Response>", segments.join(&pause))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_marker_splits_says() {
        let markup = render(&format!("first part {VOICE_PAUSE} second part"), "alice");
        assert_eq!(
            markup,
            "<Response><Say voice=\"alice\">first part</Say><Pause length=\"2\"/>\
             <Say voice=\"alice\">second part</Say></Response>"
        );
    }

    #[test]
    fn script_without_marker_is_one_say() {
        assert_eq!(
            render("hello", "man"),
            "<Response><Say voice=\"man\">hello</Say></Response>"
        );
    }

    #[test]
    fn markup_characters_are_escaped() {
        let markup = render("Tom & Jerry <b>\"hi\"</b>", "alice");
        assert!(markup.contains("Tom &amp; Jerry &lt;b&gt;&quot;hi&quot;&lt;/b&gt;"));
        assert!(!markup.contains("<b>"));
    }
}

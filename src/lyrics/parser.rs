//! LRC format handling
//!
//! Synced lyrics arrive as LRC:
//! [ti:Title]
//! [00:12.34] Lyrics line here
//! [00:15.00][01:02.50] Repeated chorus
//!
//! The player shows plain text, so synced lyrics are flattened into lines in
//! playback order.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LrcLine {
    pub time_ms: u64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ParsedLyrics {
    pub lines: Vec<LrcLine>,
}

impl ParsedLyrics {
    pub fn parse(content: &str) -> Self {
        let mut lines = Vec::new();

        for raw in content.lines() {
            let line = raw.trim();
            if line.is_empty() || is_metadata_tag(line) {
                continue;
            }

            match split_timestamps(line) {
                Some((stamps, text)) => {
                    lines.extend(stamps.into_iter().map(|time_ms| LrcLine {
                        time_ms,
                        text: text.to_string(),
                    }));
                }
                None => lines.push(LrcLine {
                    time_ms: 0,
                    text: line.to_string(),
                }),
            }
        }

        // Stable: untimed lines keep their relative order.
        lines.sort_by_key(|l| l.time_ms);
        Self { lines }
    }

    /// Text only, one line per entry; instrumental gaps (empty text) dropped.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `[ti:Title]`, `[ar:Artist]`, `[length:03:20]`... but not `[00:12.34]`.
fn is_metadata_tag(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('[') else {
        return false;
    };
    let Some(end) = rest.find(']') else {
        return false;
    };
    let Some((tag, _)) = rest[..end].split_once(':') else {
        return false;
    };
    !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphabetic())
}

fn split_timestamps(line: &str) -> Option<(Vec<u64>, &str)> {
    let mut stamps = Vec::new();
    let mut rest = line;
    while let Some(inner) = rest.strip_prefix('[') {
        let end = inner.find(']')?;
        let Some(ms) = parse_timestamp(&inner[..end]) else {
            break;
        };
        stamps.push(ms);
        rest = &inner[end + 1..];
    }
    if stamps.is_empty() {
        None
    } else {
        Some((stamps, rest.trim()))
    }
}

/// `mm:ss`, `mm:ss.xx`, `mm:ss.xxx` or `mm:ss:xx` to milliseconds.
fn parse_timestamp(s: &str) -> Option<u64> {
    let parts: Vec<&str> = s.split([':', '.']).collect();
    let (min, sec) = (parts.first()?, parts.get(1)?);
    let min: u64 = min.parse().ok()?;
    let sec: u64 = sec.parse().ok()?;
    let frac = match parts.get(2) {
        None => 0,
        Some(f) => match f.len() {
            1 => f.parse::<u64>().ok()? * 100,
            2 => f.parse::<u64>().ok()? * 10,
            3 => f.parse().ok()?,
            _ => return None,
        },
    };
    if parts.len() > 3 {
        return None;
    }
    Some(min * 60_000 + sec * 1_000 + frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:12"), Some(12_000));
        assert_eq!(parse_timestamp("01:30"), Some(90_000));
        assert_eq!(parse_timestamp("00:12.34"), Some(12_340));
        assert_eq!(parse_timestamp("00:12.340"), Some(12_340));
        assert_eq!(parse_timestamp("00:12:34"), Some(12_340));
        assert_eq!(parse_timestamp("ti"), None);
    }

    #[test]
    fn test_flatten_synced() {
        let lrc = r#"
[ti:Test Song]
[ar:Test Artist]
[00:15.00]Second line
[00:12.34]First line
[00:20.00]
[00:18.00][00:25.00]Chorus
"#;
        let parsed = ParsedLyrics::parse(lrc);
        assert_eq!(parsed.lines[0].text, "First line");
        assert_eq!(parsed.lines[0].time_ms, 12_340);
        assert_eq!(
            parsed.plain_text(),
            "First line\nSecond line\nChorus\nChorus"
        );
    }

    #[test]
    fn test_plain_lines_pass_through() {
        let parsed = ParsedLyrics::parse("Hello\n\n[Chorus]\nWorld");
        assert_eq!(parsed.plain_text(), "Hello\n[Chorus]\nWorld");
    }
}

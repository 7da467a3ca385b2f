use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Render an elapsed seconds count as `H:MM:SS`.
///
/// Hours are unpadded and unbounded; minutes and seconds are zero-padded
/// to two digits. Negative durations are unrepresentable by type.
pub fn elapsed_time(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn elapsed_time_known_values() {
        assert_eq!(elapsed_time(0), "0:00:00");
        assert_eq!(elapsed_time(59), "0:00:59");
        assert_eq!(elapsed_time(3600), "1:00:00");
        assert_eq!(elapsed_time(3661), "1:01:01");
        assert_eq!(elapsed_time(86399), "23:59:59");
        assert_eq!(elapsed_time(90061), "25:01:01");
    }

    proptest! {
        #[test]
        fn elapsed_time_round_trips(secs in 0u64..10_000_000) {
            let rendered = elapsed_time(secs);
            let mut parts = rendered.split(':');
            let h: u64 = parts.next().unwrap().parse().unwrap();
            let m: u64 = parts.next().unwrap().parse().unwrap();
            let s: u64 = parts.next().unwrap().parse().unwrap();
            prop_assert!(parts.next().is_none());
            prop_assert!(m < 60 && s < 60);
            prop_assert_eq!(h * 3600 + m * 60 + s, secs);
        }
    }

    #[test]
    fn truncate_short_string_unchanged() {
        assert_eq!(truncate_unicode("sshd", 10), "sshd");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        let out = truncate_unicode("/usr/bin/some-long-daemon --flag", 12);
        assert!(out.ends_with('\u{2026}'));
        assert!(out.width() <= 12);
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.0 GB");
    }
}

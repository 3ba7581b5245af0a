use std::panic;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_MARKERS: [&str; 6] = [
    "cookie", "session=", "remember_token", "password", "secret", "token",
];

/// Replaces whitespace-separated fragments that look like credentials.
pub fn redact_text(input: &str) -> String {
    input
        .split_whitespace()
        .map(redact_chunk)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn install_panic_redaction_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload omitted".to_owned());

        let scrubbed = redact_text(&payload);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "quack panic: {} at {}:{}:{}",
                scrubbed,
                location.file(),
                location.line(),
                location.column()
            );
        } else {
            eprintln!("quack panic: {}", scrubbed);
        }
    }));
}

fn redact_chunk(chunk: &str) -> String {
    let lowered = chunk.to_ascii_lowercase();
    if SENSITIVE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
        || looks_like_signed_value(chunk)
    {
        REDACTED.to_owned()
    } else {
        chunk.to_owned()
    }
}

/// Signed session cookies are dot-separated base64 segments.
fn looks_like_signed_value(value: &str) -> bool {
    let cleaned = value.trim_matches(|ch: char| !ch.is_ascii_alphanumeric());
    let segments = cleaned.split('.').count();

    segments >= 3
        && cleaned.len() >= 24
        && cleaned
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_text_scrubs_cookie_fragments() {
        let input = "request failed Cookie: session=eyJfZnJlc2giOmZhbHNlfQ.Zx1a2b.abcdefDEF123";
        let output = redact_text(input);

        assert!(!output.contains("session="));
        assert!(!output.contains("Zx1a2b"));
        assert!(output.contains("request failed"));
    }

    #[test]
    fn redact_text_scrubs_bare_signed_values() {
        let output = redact_text("value eyJfZnJlc2giOmZhbHNlfQ.Zx1a2b.abcdefDEF123 end");

        assert_eq!(output, "value [REDACTED] end");
    }

    #[test]
    fn redact_text_keeps_ordinary_words_and_urls() {
        let output = redact_text("GET http://127.0.0.1:5000/api/conversations returned 502");

        assert_eq!(
            output,
            "GET http://127.0.0.1:5000/api/conversations returned 502"
        );
    }
}

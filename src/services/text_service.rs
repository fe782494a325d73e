/// Reduces one line of OCR output to lowercase ASCII letters, digits and
/// spaces, trimmed at both ends.
pub fn normalize(line: &str) -> String {
    let kept: String = line
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    kept.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "Hello World",
        "  Hello, World!  ",
        "ÉCOLE café 42",
        "tab\tseparated\r",
        "$ cargo build --release",
        "https://example.com/path?q=1",
        "   !!!   ",
        "MiXeD 123 CaSe",
    ];

    #[test]
    fn strips_punctuation_and_lowercases() {
        assert_eq!(normalize("  Hello, World!  "), "hello world");
        assert_eq!(normalize("$ cargo build --release"), "cargo build release");
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(normalize("ÉCOLE café 42"), "cole caf 42");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn inner_spaces_are_kept() {
        assert_eq!(normalize("a  b"), "a  b");
        assert_eq!(normalize("tab\tseparated"), "tabseparated");
    }

    #[test]
    fn output_alphabet_is_restricted() {
        for sample in SAMPLES {
            let out = normalize(sample);
            assert!(
                out.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '),
                "unexpected char in {out:?}"
            );
            assert!(!out.starts_with(' ') && !out.ends_with(' '), "untrimmed: {out:?}");
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        for sample in SAMPLES {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once);
        }
    }
}

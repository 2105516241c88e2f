//! Page text post-processing.

/// Collapse every run of two or more blank lines into a single empty line.
///
/// Lines holding only whitespace count as blank.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut blank_run = 0usize;
    let mut first = true;

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let blank = line.trim().is_empty();
        if blank {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }

        if !first {
            output.push('\n');
        }
        first = false;
        if !blank {
            output.push_str(line);
        }
    }
    output
}

/// Final form of a page: blank runs collapsed, trimmed, one trailing
/// newline. A page with no text left becomes the empty string.
pub fn finish_page(text: &str) -> String {
    let collapsed = collapse_blank_lines(text);
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n  \n\t\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\r\nb"), "a\nb");
    }

    #[test]
    fn test_finish_page() {
        assert_eq!(finish_page("\n\nHello\n\n\nWorld  \n\n"), "Hello\n\nWorld\n");
        assert_eq!(finish_page(" \n \n"), "");
        assert_eq!(finish_page(""), "");
    }

    #[test]
    fn test_finish_page_is_idempotent() {
        let once = finish_page("\n| a | b |\n|---|---|\n\n\n\nText\n");
        assert_eq!(finish_page(&once), once);
    }
}

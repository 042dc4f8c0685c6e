//! Header banner for the list screen.

/// Render `text` as a header block fitting `width` columns: the
/// uppercased name over a rule of matching length. Zero width yields an
/// empty string.
pub fn render(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let title: String = text.to_uppercase().chars().take(width).collect();
    let rule: String = "─".repeat(title.chars().count());
    format!("{title}\n{rule}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_uppercases_and_underlines() {
        let banner = render("gitdeck", 80);
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines[0], "GITDECK");
        assert_eq!(lines[1].chars().count(), "GITDECK".len());
        assert!(lines[1].chars().all(|c| c == '─'));
    }

    #[test]
    fn test_render_truncates_to_width() {
        let banner = render("gitdeck", 4);
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines[0], "GITD");
        assert_eq!(lines[1].chars().count(), 4);
    }

    #[test]
    fn test_render_zero_width() {
        assert_eq!(render("gitdeck", 0), "");
    }
}

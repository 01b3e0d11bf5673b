//! Output format templates
//!
//! Templates use `$field` or `${field}` substitution. `$$` escapes a
//! literal dollar sign. Unknown or unset fields render as empty text.

/// Render a template, resolving each field through `lookup`
pub fn render<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        match chars.peek() {
            // `$$` -> literal dollar
            Some('$') => {
                chars.next();
                out.push('$');
            }
            // `${field}`
            Some('{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if closed {
                    if let Some(value) = lookup(&name) {
                        out.push_str(&value);
                    }
                } else {
                    // Unterminated brace: emit as written
                    out.push_str("${");
                    out.push_str(&name);
                }
            }
            // `$field`
            Some(c) if c.is_ascii_alphanumeric() || *c == '_' => {
                let mut name = String::new();
                while let Some(c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || *c == '_' {
                        name.push(*c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Some(value) = lookup(&name) {
                    out.push_str(&value);
                }
            }
            // Lone dollar
            _ => out.push('$'),
        }
    }

    out
}

/// Format a track length in seconds as M:SS (H:MM:SS above an hour)
pub fn format_length(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as i64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "artist" => Some("Pink Floyd".to_string()),
            "album" => Some("Animals".to_string()),
            "title" => Some("Dogs".to_string()),
            "missing" => Some("3".to_string()),
            "empty" => None,
            _ => None,
        }
    }

    #[test]
    fn test_plain_fields() {
        assert_eq!(
            render("$artist - $album - $title", lookup),
            "Pink Floyd - Animals - Dogs"
        );
    }

    #[test]
    fn test_braced_field_mid_word() {
        assert_eq!(render("${album}s", lookup), "Animalss");
    }

    #[test]
    fn test_unknown_field_renders_empty() {
        assert_eq!(render("[$empty|$nope]", lookup), "[|]");
    }

    #[test]
    fn test_dollar_escape() {
        assert_eq!(render("$$5 for $album", lookup), "$5 for Animals");
    }

    #[test]
    fn test_lone_and_trailing_dollar() {
        assert_eq!(render("a $ b", lookup), "a $ b");
        assert_eq!(render("cost: $", lookup), "cost: $");
    }

    #[test]
    fn test_count_suffix_template() {
        assert_eq!(render("$album: $missing", lookup), "Animals: 3");
    }

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(0.0), "0:00");
        assert_eq!(format_length(59.6), "1:00");
        assert_eq!(format_length(125.0), "2:05");
        assert_eq!(format_length(3661.0), "1:01:01");
    }
}

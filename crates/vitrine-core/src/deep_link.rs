//! `?open=a,b&focus=c` deep links.

use url::form_urlencoded;

/// Windows a URL asks to open and focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeepLink {
    pub open: Vec<String>,
    pub focus: Option<String>,
}

impl DeepLink {
    /// Parse a URL query string. A leading `?` is accepted, values are
    /// form-decoded, and only the first occurrence of each key counts.
    pub fn parse(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut open = None;
        let mut focus = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "open" if open.is_none() => open = Some(value.into_owned()),
                "focus" if focus.is_none() => focus = Some(value.into_owned()),
                _ => {},
            }
        }

        Self {
            open: open
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
            focus: focus
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty() && self.focus.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open_and_focus() {
        let link = DeepLink::parse("?open=about, projects,,terminal&focus=projects");
        assert_eq!(link.open, ["about", "projects", "terminal"]);
        assert_eq!(link.focus.as_deref(), Some("projects"));
    }

    #[test]
    fn test_parse_ignores_unknown_and_bare_keys() {
        let link = DeepLink::parse("theme=dark&debug&focus=");
        assert!(link.is_empty());
    }

    #[test]
    fn test_parse_decodes_percent_and_plus() {
        let link = DeepLink::parse("?open=about%2Cprojects&focus=+resume+");
        assert_eq!(link.open, ["about", "projects"]);
        assert_eq!(link.focus.as_deref(), Some("resume"));
    }

    #[test]
    fn test_first_value_of_repeated_key_wins() {
        let link = DeepLink::parse("open=about&open=resume&focus=about&focus=resume");
        assert_eq!(link.open, ["about"]);
        assert_eq!(link.focus.as_deref(), Some("about"));
    }
}

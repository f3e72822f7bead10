use std::sync::OnceLock;

use regex::Regex;

/// Case-insensitive substring test
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// True when `url` contains any of `patterns`
pub fn url_matches_any(url: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| url.contains(p))
}

/// Map a configured layer name to the name the attributes API knows it by.
/// The GGMN well layer shares the schema of the main well layer.
pub fn canonical_layer_name(name: &str) -> String {
    name.replace(
        "groundwater:Groundwater_Well_GGMN",
        "groundwater:Groundwater_Well",
    )
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<\s*(/?)\s*([a-z0-9]+)[^>]*>").expect("tag pattern is valid"))
}

/// Flatten an HTML fragment into display lines.
/// Block tags and `<br>`/`<hr>` break lines, other tags are dropped.
pub fn fragment_lines(html: &str) -> Vec<String> {
    let broken = tag_regex().replace_all(html, |caps: &regex::Captures| {
        match caps[2].to_lowercase().as_str() {
            "br" | "hr" | "p" | "div" | "h1" | "h2" | "h3" => "\n".to_string(),
            _ => String::new(),
        }
    });

    broken
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("igrac:Groundwater_Well_12", "groundwater_well"));
        assert!(!contains_ignore_case("igrac:rivers", "groundwater_well"));
    }

    #[test]
    fn test_url_matches_any() {
        let patterns = ["groundwater-well", "view/ggmn"];
        assert!(url_matches_any("https://x.org/catalogue/groundwater-well/#/", &patterns));
        assert!(url_matches_any("https://x.org/view/ggmn", &patterns));
        assert!(!url_matches_any("https://x.org/maps/12", &patterns));
    }

    #[test]
    fn test_canonical_layer_name() {
        assert_eq!(
            canonical_layer_name("groundwater:Groundwater_Well_GGMN"),
            "groundwater:Groundwater_Well"
        );
        assert_eq!(
            canonical_layer_name("groundwater:Groundwater_Well"),
            "groundwater:Groundwater_Well"
        );
    }

    #[test]
    fn test_fragment_lines() {
        let html = "<div><h1>Download Error</h1> <hr> <p> Please sign in first</p></div>";
        assert_eq!(
            fragment_lines(html),
            vec!["Download Error".to_string(), "Please sign in first".to_string()]
        );
    }

    #[test]
    fn test_fragment_lines_keeps_link_text() {
        let html = r#"<p>See : <br/><a target="_blank" href="/s?task_id=t1">https://x.org/s?task_id=t1</a></p>"#;
        assert_eq!(
            fragment_lines(html),
            vec!["See :".to_string(), "https://x.org/s?task_id=t1".to_string()]
        );
    }
}

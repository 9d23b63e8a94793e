use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::config::LabelConfig;

static REPEATED_SLASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("/+").expect("static pattern"));

/// Which items the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Parse a route fragment such as `#/active`, `completed/` or `/#/`.
    /// Anything unrecognized falls back to `All`.
    pub fn from_route(route: &str) -> Filter {
        match normalize_route(route).as_str() {
            "#/active" => Filter::Active,
            "#/completed" => Filter::Completed,
            _ => Filter::All,
        }
    }

    /// Canonical route fragment for this filter
    pub fn route(self) -> &'static str {
        match self {
            Filter::All => "#/",
            Filter::Active => "#/active",
            Filter::Completed => "#/completed",
        }
    }

    /// Visibility predicate over the completion flag
    pub fn matches(self, done: bool) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !done,
            Filter::Completed => done,
        }
    }

    pub fn label(self, labels: &LabelConfig) -> &str {
        match self {
            Filter::All => &labels.all,
            Filter::Active => &labels.active,
            Filter::Completed => &labels.completed,
        }
    }
}

/// Normalize a route fragment to one of `#/`, `#/active`, `#/completed`.
pub fn normalize_route(route: &str) -> String {
    let lowered = route.trim().to_lowercase();
    let mut h = lowered.strip_prefix('#').unwrap_or(&lowered);
    if let Some(cut) = h.find(['?', '#']) {
        h = &h[..cut];
    }
    let mut h = REPEATED_SLASHES.replace_all(h, "/").into_owned();
    if !h.is_empty() && !h.starts_with('/') {
        h.insert(0, '/');
    }
    if h != "/" && h.ends_with('/') {
        h.pop();
    }

    match h.as_str() {
        "/active" => "#/active".to_string(),
        "/completed" => "#/completed".to_string(),
        _ => "#/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_table() {
        let cases = [
            ("", "#/"),
            ("#", "#/"),
            ("#/", "#/"),
            ("/", "#/"),
            ("#/active", "#/active"),
            ("active", "#/active"),
            ("  #/ACTIVE  ", "#/active"),
            ("#//active//", "#/active"),
            ("#/completed?x=1", "#/completed"),
            ("#/completed#frag", "#/completed"),
            ("completed/", "#/completed"),
            ("#/done", "#/"),
            ("#/active/extra", "#/"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_route(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn from_route_maps_filters() {
        assert_eq!(Filter::from_route("#/active"), Filter::Active);
        assert_eq!(Filter::from_route("#/completed"), Filter::Completed);
        assert_eq!(Filter::from_route("garbage"), Filter::All);
    }

    #[test]
    fn route_round_trips() {
        for filter in Filter::ALL {
            assert_eq!(Filter::from_route(filter.route()), filter);
        }
    }

    #[test]
    fn predicates() {
        assert!(Filter::All.matches(true));
        assert!(Filter::All.matches(false));
        assert!(Filter::Active.matches(false));
        assert!(!Filter::Active.matches(true));
        assert!(Filter::Completed.matches(true));
        assert!(!Filter::Completed.matches(false));
    }

    #[test]
    fn labels_come_from_config() {
        let labels = LabelConfig::default();
        assert_eq!(Filter::All.label(&labels), "All");
        assert_eq!(Filter::Active.label(&labels), "Active");
        assert_eq!(Filter::Completed.label(&labels), "Completed");
    }
}

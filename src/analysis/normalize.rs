//! Canonical class keys for joining the design-smell and scanner reports.
//!
//! Both tools identify a class differently: the design-smell detector emits
//! dotted qualified names (`org.apache.catalina.connector.Request`, or
//! `...Outer.Inner` for nested classes) while the scanner emits file paths
//! (`java/org/apache/catalina/connector/Request.java`). Both are reduced to
//! the last package segment plus the top-level class name, e.g.
//! `connector.Request`.

/// Which report a raw identifier comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    DesignSmellTool,
    SecurityScanner,
}

/// Reduce a raw identifier from `source` to its canonical key.
pub fn canonical_key(raw: &str, source: NameSource) -> String {
    match source {
        NameSource::DesignSmellTool => normalize_smell_name(raw),
        NameSource::SecurityScanner => normalize_scanner_path(Some(raw)),
    }
}

/// Heuristic for "this segment names a class rather than a package".
///
/// Java packages are lowercase by convention, so a capitalized segment in
/// front of the last one means the last one is a nested class. Names that
/// break the convention are misclassified.
pub fn is_class_segment(segment: &str) -> bool {
    segment.chars().next().is_some_and(char::is_uppercase)
}

/// Normalize a dotted name produced by the design-smell tool.
///
/// Empty segments are dropped. Names with at most two segments are already
/// in key form and are returned as is, which keeps the normalization
/// idempotent.
pub fn normalize_smell_name(raw: &str) -> String {
    let segments: Vec<&str> = raw
        .split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();
    let n = segments.len();

    if n <= 2 {
        return segments.join(".");
    }

    if is_class_segment(segments[n - 2]) {
        segments[n - 3..n - 1].join(".")
    } else {
        segments[n - 2..].join(".")
    }
}

/// Normalize a file path reported by the security scanner.
///
/// The extension is dropped, then the parent directory and file stem are
/// joined with a dot. A path without an extension has no usable stem and
/// yields an empty key, as does a missing value.
pub fn normalize_scanner_path(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return String::new();
    };

    let dot_segments: Vec<&str> = raw.split('.').collect();
    if dot_segments.len() < 2 {
        return String::new();
    }
    let stem = dot_segments[dot_segments.len() - 2];

    let components: Vec<&str> = stem
        .split(['/', '\\'])
        .filter(|component| !component.is_empty())
        .collect();

    match components.len() {
        0 => String::new(),
        1 => components[0].to_string(),
        n => components[n - 2..].join("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_top_level_class_keeps_package_and_class() {
        assert_eq!(
            normalize_smell_name("org.apache.catalina.connector.Request"),
            "connector.Request"
        );
    }

    #[test]
    fn test_nested_class_collapses_to_outer() {
        assert_eq!(
            normalize_smell_name("org.apache.catalina.connector.Request.Builder"),
            "connector.Request"
        );
    }

    #[test]
    fn test_short_names_pass_through() {
        assert_eq!(normalize_smell_name("Request"), "Request");
        assert_eq!(normalize_smell_name("connector.Request"), "connector.Request");
        assert_eq!(normalize_smell_name(""), "");
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        assert_eq!(normalize_smell_name(".."), "");
        assert_eq!(normalize_smell_name("a..B"), "a.B");
        assert_eq!(normalize_smell_name(".org.app.web.Login."), "web.Login");
        assert_eq!(normalize_smell_name(" web . Login "), "web.Login");
    }

    #[test]
    fn test_scanner_path_to_key() {
        assert_eq!(
            normalize_scanner_path(Some("java/org/apache/catalina/connector/Request.java")),
            "connector.Request"
        );
    }

    #[test]
    fn test_scanner_path_with_windows_separators() {
        assert_eq!(
            normalize_scanner_path(Some("src\\main\\java\\web\\Login.java")),
            "web.Login"
        );
    }

    #[test]
    fn test_scanner_path_degrades_gracefully() {
        assert_eq!(normalize_scanner_path(None), "");
        assert_eq!(normalize_scanner_path(Some("")), "");
        assert_eq!(normalize_scanner_path(Some("Makefile")), "");
        assert_eq!(normalize_scanner_path(Some("Login.java")), "Login");
    }

    #[test]
    fn test_both_sources_agree_on_key() {
        let from_smells = canonical_key(
            "org.apache.kafka.clients.NetworkClient.DefaultMetadataUpdater",
            NameSource::DesignSmellTool,
        );
        let from_scanner = canonical_key(
            "clients/src/main/java/org/apache/kafka/clients/NetworkClient.java",
            NameSource::SecurityScanner,
        );
        assert_eq!(from_smells, from_scanner);
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(
            segments in prop::collection::vec("[A-Za-z][a-z0-9]{0,6}", 1..7)
        ) {
            let raw = segments.join(".");
            let once = normalize_smell_name(&raw);
            let twice = normalize_smell_name(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn keys_never_contain_empty_segments(raw in "[a-zA-Z. ]{0,16}") {
            let key = normalize_smell_name(&raw);
            prop_assert!(key.is_empty() || key.split('.').all(|segment| !segment.is_empty()));
            prop_assert_eq!(normalize_smell_name(&key), key.clone());
        }

        #[test]
        fn keys_have_at_most_two_segments(
            segments in prop::collection::vec("[A-Za-z][a-z0-9]{0,6}", 1..7)
        ) {
            let key = normalize_smell_name(&segments.join("."));
            prop_assert!(key.split('.').count() <= 2);
        }
    }
}

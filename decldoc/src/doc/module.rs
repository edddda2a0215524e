//! Module naming, output locations and the exclusion filter.

use crate::doc::unit::PAGE_EXTENSION;

/// The dotted name of the module being documented, split into segments.
///
/// `pkg.sub` is `["pkg", "sub"]`. The segment count is the traversal's
/// `base length`: everything the scope stack pushes beyond it is
/// class/struct/function nesting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleInfo {
    pub module_prefixes: Vec<String>,
}

impl ModuleInfo {
    pub fn new(module_prefixes: Vec<String>) -> Self {
        Self { module_prefixes }
    }

    /// The root package name, i.e. the first segment.
    pub fn project_name(&self) -> &str {
        self.module_prefixes
            .first()
            .expect("module name has at least one segment")
    }

    /// The name of the innermost module, used as the page location label.
    pub fn location(&self) -> &str {
        self.module_prefixes
            .last()
            .expect("module name has at least one segment")
    }

    pub fn dotted_name(&self) -> String {
        self.module_prefixes.join(".")
    }

    /// File name of the module's own page: `sub.html` for `pkg.sub`.
    pub fn page_file_name(&self) -> String {
        format!("{}.{PAGE_EXTENSION}", self.location())
    }

    /// Directory prefixes the module page is written under: `["pkg"]` for
    /// `pkg.sub`. Symbol pages live one level deeper, under `pkg/sub/`.
    pub fn parent_prefixes(&self) -> &[String] {
        &self.module_prefixes[..self.module_prefixes.len() - 1]
    }
}

/// An ordered set of dotted name prefixes to leave out of the build.
///
/// A module is excluded when its full dotted name or any proper prefix of it
/// exactly matches an entry; prefixes are checked shortest first. Matching is
/// segment-wise, so excluding `pkg.sub` does not touch `pkg.subway`.
#[derive(Clone, Debug, Default)]
pub struct ExclusionFilter {
    entries: Vec<String>,
}

impl ExclusionFilter {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn is_excluded(&self, segments: &[String]) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let mut prefix = String::new();
        for segment in segments {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);
            if self.entries.iter().any(|entry| *entry == prefix) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(dotted: &str) -> Vec<String> {
        dotted.split('.').map(str::to_owned).collect()
    }

    #[test]
    fn excludes_exact_name() {
        let filter = ExclusionFilter::new(vec!["pkg.sub".into()]);
        assert!(filter.is_excluded(&segments("pkg.sub")));
    }

    #[test]
    fn excludes_by_proper_prefix() {
        let filter = ExclusionFilter::new(vec!["pkg.sub".into()]);
        assert!(filter.is_excluded(&segments("pkg.sub.deep")));
        assert!(filter.is_excluded(&segments("pkg.sub.deep.er")));
    }

    #[test]
    fn prefix_match_is_segment_wise() {
        let filter = ExclusionFilter::new(vec!["pkg.sub".into()]);
        assert!(!filter.is_excluded(&segments("pkg.subway")));
        assert!(!filter.is_excluded(&segments("pkg")));
    }

    #[test]
    fn empty_filter_excludes_nothing() {
        let filter = ExclusionFilter::default();
        assert!(!filter.is_excluded(&segments("pkg.sub")));
    }
}

//! Restricting reports to a process or a group.

use std::collections::HashSet;

use domain::ProcessGroup;

/// Which processes a report covers.
///
/// A process filter wins over a group filter when both are given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReportFilter {
    #[default]
    All,
    Process(String),
    Group(String),
}

impl ReportFilter {
    /// Builds a filter from optional `process` and `group` parameters.
    pub fn from_params(process: Option<String>, group: Option<String>) -> Self {
        match (non_blank(process), non_blank(group)) {
            (Some(process_id), _) => ReportFilter::Process(process_id),
            (None, Some(group_id)) => ReportFilter::Group(group_id),
            (None, None) => ReportFilter::All,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && v != "all")
}

/// A filter with its group resolved to member ids.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    process_ids: Option<HashSet<String>>,
}

impl Scope {
    /// Covers every process.
    pub fn all() -> Self {
        Self::default()
    }

    /// Covers a single process.
    pub fn process(process_id: impl Into<String>) -> Self {
        Self {
            process_ids: Some(HashSet::from([process_id.into()])),
        }
    }

    /// Covers the members of a group.
    pub fn group(group: &ProcessGroup) -> Self {
        Self {
            process_ids: Some(group.process_ids.iter().cloned().collect()),
        }
    }

    pub fn includes(&self, process_id: &str) -> bool {
        self.process_ids
            .as_ref()
            .is_none_or(|ids| ids.contains(process_id))
    }

    /// Keeps the items whose process is in scope.
    pub fn retain<T>(&self, items: Vec<T>, process_id: impl Fn(&T) -> &str) -> Vec<T> {
        items
            .into_iter()
            .filter(|item| self.includes(process_id(item)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_parameter_takes_precedence() {
        let filter = ReportFilter::from_params(Some("p1".into()), Some("g1".into()));
        assert_eq!(filter, ReportFilter::Process("p1".into()));

        let filter = ReportFilter::from_params(None, Some("g1".into()));
        assert_eq!(filter, ReportFilter::Group("g1".into()));

        let filter = ReportFilter::from_params(Some("all".into()), Some(" ".into()));
        assert_eq!(filter, ReportFilter::All);
    }

    #[test]
    fn group_scope_covers_members_only() {
        let group = ProcessGroup::new("Week", vec!["a".into(), "b".into()]).unwrap();
        let scope = Scope::group(&group);

        assert!(scope.includes("a"));
        assert!(!scope.includes("c"));
        assert!(Scope::all().includes("c"));

        let kept = scope.retain(vec!["a", "c", "b"], |s| *s);
        assert_eq!(kept, vec!["a", "b"]);
    }
}

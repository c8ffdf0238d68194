use crate::policy::AuditPolicy;
use lockaudit_graph::{DependencyGraph, PackageId};
use std::collections::BTreeSet;

/// Materialized skip-tree exclusions for one audit run.
///
/// A `SkipTree{name}` rule excludes every resolved version of `name` and
/// everything transitively reachable from them. Membership is consulted by
/// both ban checks, so the union is computed once up front from the graph's
/// memoized subtree sets.
#[derive(Clone, Debug, Default)]
pub struct Exclusions {
    excluded: BTreeSet<PackageId>,
    matched_roots: BTreeSet<String>,
}

impl Exclusions {
    pub fn build(graph: &DependencyGraph, policy: &AuditPolicy) -> Self {
        let mut excluded = BTreeSet::new();
        let mut matched_roots = BTreeSet::new();

        for name in policy.skip_trees() {
            let roots = graph.by_name(name);
            if !roots.is_empty() {
                let _ = matched_roots.insert(name.to_string());
            }
            for &root in roots {
                excluded.extend(graph.subtree(root).iter().copied());
            }
        }

        Self {
            excluded,
            matched_roots,
        }
    }

    pub fn contains(&self, id: PackageId) -> bool {
        self.excluded.contains(&id)
    }

    /// Whether a `SkipTree` rule for `name` matched at least one package.
    pub fn root_matched(&self, name: &str) -> bool {
        self.matched_roots.contains(name)
    }
}

use crate::resolution::{EdgeMode, Package, Resolution};
use semver::Version;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// Stable arena index for a package within one audit run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageId(pub u32);

impl PackageId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A dependency edge and the features it enables on its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub target: PackageId,
    pub enabled_features: Vec<String>,
}

/// Structural input errors. The graph must be a DAG with fully-resolved
/// edges; anything else is a fatal input error, not a policy violation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedGraphError {
    #[error("package {from} depends on unknown package {name} {version}")]
    UnknownDependency {
        from: String,
        name: String,
        version: Version,
    },

    #[error("package {name} {version} appears more than once in the resolution")]
    DuplicatePackage { name: String, version: Version },

    #[error("dependency cycle detected: {}", path.join(" -> "))]
    CycleDetected { path: Vec<String> },
}

/// Arena-backed DAG over resolved packages.
///
/// Construction validates edges and acyclicity once; afterwards the graph is
/// immutable and safe to share across parallel policy passes.
#[derive(Debug)]
pub struct DependencyGraph {
    packages: Vec<Package>,
    edges: Vec<Vec<Edge>>,
    by_name: BTreeMap<String, Vec<PackageId>>,
    subtree_cache: RwLock<BTreeMap<PackageId, Arc<BTreeSet<PackageId>>>>,
}

impl DependencyGraph {
    pub fn build(resolution: Resolution, mode: EdgeMode) -> Result<Self, MalformedGraphError> {
        let mut index: BTreeMap<(String, Version), PackageId> = BTreeMap::new();
        let mut packages = Vec::with_capacity(resolution.packages.len());

        for (i, pkg) in resolution.packages.iter().enumerate() {
            let key = (pkg.name.clone(), pkg.version.clone());
            if index.contains_key(&key) {
                return Err(MalformedGraphError::DuplicatePackage {
                    name: pkg.name.clone(),
                    version: pkg.version.clone(),
                });
            }
            let _ = index.insert(key, PackageId(i as u32));
            packages.push(Package {
                name: pkg.name.clone(),
                version: pkg.version.clone(),
                source: pkg.source.clone(),
                declared_license: pkg.declared_license.clone(),
                license_files: pkg.license_files.clone(),
                features: pkg.features.clone(),
            });
        }

        let mut edges: Vec<Vec<Edge>> = vec![Vec::new(); packages.len()];
        for (i, pkg) in resolution.packages.iter().enumerate() {
            for dep in &pkg.dependencies {
                if dep.optional && mode == EdgeMode::DefaultFeatures {
                    continue;
                }
                let Some(&target) = index.get(&(dep.name.clone(), dep.version.clone())) else {
                    return Err(MalformedGraphError::UnknownDependency {
                        from: packages[i].id_str(),
                        name: dep.name.clone(),
                        version: dep.version.clone(),
                    });
                };
                edges[i].push(Edge {
                    target,
                    enabled_features: dep.enabled_features.clone(),
                });
            }
        }

        let mut by_name: BTreeMap<String, Vec<PackageId>> = BTreeMap::new();
        for (i, pkg) in packages.iter().enumerate() {
            by_name
                .entry(pkg.name.clone())
                .or_default()
                .push(PackageId(i as u32));
        }

        let graph = Self {
            packages,
            edges,
            by_name,
            subtree_cache: RwLock::new(BTreeMap::new()),
        };
        graph.check_acyclic()?;
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    pub fn edges(&self, id: PackageId) -> &[Edge] {
        &self.edges[id.index()]
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// All package ids, in arena order.
    pub fn packages(&self) -> impl Iterator<Item = PackageId> + '_ {
        (0..self.packages.len() as u32).map(PackageId)
    }

    /// Ids of every resolved version of `name`, in insertion order.
    pub fn by_name(&self, name: &str) -> &[PackageId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `id` plus every package reachable over outgoing edges.
    ///
    /// Memoized per run: skip-tree materialization queries the same roots
    /// repeatedly from the ban engine.
    pub fn subtree(&self, id: PackageId) -> Arc<BTreeSet<PackageId>> {
        {
            let cache = self
                .subtree_cache
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(found) = cache.get(&id) {
                return Arc::clone(found);
            }
        }

        let mut reachable = BTreeSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !reachable.insert(current) {
                continue;
            }
            for edge in self.edges(current) {
                stack.push(edge.target);
            }
        }

        let reachable = Arc::new(reachable);
        let mut cache = self
            .subtree_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(id).or_insert(reachable))
    }

    fn check_acyclic(&self) -> Result<(), MalformedGraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.packages.len()];
        // Explicit stack: (node, next edge offset), so deep graphs cannot
        // overflow the call stack.
        for root in self.packages() {
            if marks[root.index()] != Mark::Unvisited {
                continue;
            }
            let mut stack: Vec<(PackageId, usize)> = vec![(root, 0)];
            marks[root.index()] = Mark::OnStack;

            while let Some(&(node, next)) = stack.last() {
                if let Some(edge) = self.edges(node).get(next).cloned() {
                    if let Some(frame) = stack.last_mut() {
                        frame.1 += 1;
                    }
                    match marks[edge.target.index()] {
                        Mark::Unvisited => {
                            marks[edge.target.index()] = Mark::OnStack;
                            stack.push((edge.target, 0));
                        }
                        Mark::OnStack => {
                            let mut path: Vec<String> = stack
                                .iter()
                                .skip_while(|(n, _)| *n != edge.target)
                                .map(|(n, _)| self.package(*n).id_str())
                                .collect();
                            path.push(self.package(edge.target).id_str());
                            return Err(MalformedGraphError::CycleDetected { path });
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[node.index()] = Mark::Done;
                    let _ = stack.pop();
                }
            }
        }
        Ok(())
    }
}

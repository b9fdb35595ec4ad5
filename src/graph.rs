// src/graph.rs
//! Capability graph construction
//!
//! Builds the three maps the resolver works from: which capabilities a
//! package requires, which packages provide a capability, and the derived
//! package-to-package dependency edges.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::primary::PackageRecord;

/// The capability graph derived from one loaded index.
///
/// Immutable after construction; a refresh builds a new graph rather
/// than mutating this one.
#[derive(Debug, Default)]
pub struct CapabilityGraph {
    /// Package name -> capabilities it requires. Every known package
    /// name appears as a key, even with an empty requirement set.
    pub requires: HashMap<String, HashSet<String>>,
    /// Capability -> packages providing it
    pub provides: HashMap<String, HashSet<String>>,
    /// Package name -> packages satisfying at least one of its
    /// required capabilities. Derived from the two maps above.
    pub deps: HashMap<String, HashSet<String>>,
}

impl CapabilityGraph {
    /// Build the graph from parsed package records.
    ///
    /// Two passes: the first fills `provides` and collects the
    /// requirement-bearing records, the second fills `requires` and
    /// derives `deps` against the complete `provides` map. Deriving
    /// during the first pass would drop edges whose provider appears
    /// later in the index.
    ///
    /// `with_weak` folds weak requirements into the requirement set;
    /// it is read once here, never mid-build.
    pub fn build(records: &[PackageRecord], with_weak: bool) -> Self {
        let mut graph = Self::default();

        // Pass 1: providers and requirement-bearing records.
        let mut with_format: Vec<&PackageRecord> = Vec::new();
        for record in records {
            if !record.has_format {
                // Known package with no metadata block: empty
                // requirement set, nothing provided.
                graph.requires.entry(record.name.clone()).or_default();
                continue;
            }
            for capability in &record.provides {
                graph
                    .provides
                    .entry(capability.clone())
                    .or_default()
                    .insert(record.name.clone());
            }
            with_format.push(record);
        }

        // Pass 2: requirements, against the now-complete provider map.
        // When several records share a name the last one in index order
        // wins the requirement set; provides accumulated across all.
        for record in &with_format {
            let mut required: HashSet<String> = record.requires.clone();
            if with_weak {
                required.extend(record.weak_requires.iter().cloned());
            }
            graph.requires.insert(record.name.clone(), required);
        }

        // Derived edges: a capability with no provider contributes
        // nothing, which is not an error.
        for (package, required) in &graph.requires {
            let targets: HashSet<String> = required
                .iter()
                .filter_map(|capability| graph.provides.get(capability))
                .flatten()
                .cloned()
                .collect();
            graph.deps.insert(package.clone(), targets);
        }

        debug!(
            "Built capability graph: {} packages, {} capabilities",
            graph.requires.len(),
            graph.provides.len()
        );
        graph
    }

    /// Sorted unique package names known to the graph
    pub fn package_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.requires.keys().cloned().collect();
        names.sort();
        names
    }
}

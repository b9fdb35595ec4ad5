// src/resolver.rs
//! Transitive dependency closure over the capability graph

use std::collections::{HashMap, HashSet, VecDeque};

/// Compute the transitive dependency closure of `seed`.
///
/// Returns `None` when the seed is not a key of `deps` — an unknown
/// package is a normal outcome the caller branches on, distinct from a
/// known package with zero dependencies.
///
/// Breadth-first traversal with a visited set: cycles terminate,
/// revisiting is a no-op, and the result always contains the seed.
/// Pure and reproducible for a fixed graph.
pub fn resolve(seed: &str, deps: &HashMap<String, HashSet<String>>) -> Option<HashSet<String>> {
    if !deps.contains_key(seed) {
        return None;
    }

    let mut closure: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(seed);

    while let Some(current) = queue.pop_front() {
        if !closure.insert(current.to_string()) {
            continue;
        }
        if let Some(targets) = deps.get(current) {
            for target in targets {
                if !closure.contains(target.as_str()) {
                    queue.push_back(target);
                }
            }
        }
    }

    Some(closure)
}

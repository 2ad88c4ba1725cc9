//! Combination generation for multi-index scenarios.
//!
//! Produces k-subsets of criteria indices, Cartesian products of candidate
//! value lists, and per-alternative combination assignments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validator;

/// Where the combinations for each entity come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombinationSource {
    /// Every k-subset with `2 <= k <= size - reserve`
    All { reserve: usize },
    /// The same explicit combinations for every entity
    Uniform(Vec<Vec<usize>>),
    /// Explicit combinations for listed entities only
    PerEntity(BTreeMap<usize, Vec<Vec<usize>>>),
}

/// All k-subsets of `0..size` for `k = 2..=size - reserve`.
///
/// Grouped by k ascending, lexicographic within each k.
#[must_use]
pub fn k_subsets(size: usize, reserve: usize) -> Vec<Vec<usize>> {
    let max_k = size.saturating_sub(reserve);
    (2..=max_k).flat_map(|k| subsets_of_size(size, k)).collect()
}

fn subsets_of_size(size: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 || k > size {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        out.push(current.clone());

        // Find rightmost position that can still advance
        let Some(pos) = (0..k).rev().find(|&i| current[i] < size - k + i) else {
            break;
        };
        current[pos] += 1;
        for i in pos + 1..k {
            current[i] = current[i - 1] + 1;
        }
    }
    out
}

/// Cartesian product of value lists, last list varying fastest.
///
/// An empty input list anywhere yields no tuples.
#[must_use]
pub fn cartesian_product(lists: &[&[f64]]) -> Vec<Vec<f64>> {
    if lists.is_empty() || lists.iter().any(|l| l.is_empty()) {
        return Vec::new();
    }

    let total: usize = lists.iter().map(|l| l.len()).product();
    let mut out = Vec::with_capacity(total);
    let mut counters = vec![0usize; lists.len()];

    for _ in 0..total {
        out.push(
            counters
                .iter()
                .zip(lists)
                .map(|(&i, list)| list[i])
                .collect(),
        );

        for dim in (0..lists.len()).rev() {
            counters[dim] += 1;
            if counters[dim] < lists[dim].len() {
                break;
            }
            counters[dim] = 0;
        }
    }
    out
}

/// Resolve combinations for `entities` entities over an axis of `size` indices.
///
/// Returns `(entity, combinations)` pairs in entity order. Per-entity sources
/// only yield the entities they list.
pub fn per_entity(
    entities: usize,
    size: usize,
    source: &CombinationSource,
) -> Result<Vec<(usize, Vec<Vec<usize>>)>> {
    match source {
        CombinationSource::All { reserve } => {
            let combos = k_subsets(size, *reserve);
            Ok((0..entities).map(|e| (e, combos.clone())).collect())
        }
        CombinationSource::Uniform(combos) => {
            for combo in combos {
                validator::check_combination("combinations", combo, size)?;
            }
            Ok((0..entities).map(|e| (e, combos.clone())).collect())
        }
        CombinationSource::PerEntity(map) => {
            let mut out = Vec::with_capacity(map.len());
            for (&entity, combos) in map {
                validator::check_index("combinations", entity, entities)?;
                for combo in combos {
                    validator::check_combination("combinations", combo, size)?;
                }
                out.push((entity, combos.clone()));
            }
            Ok(out)
        }
    }
}

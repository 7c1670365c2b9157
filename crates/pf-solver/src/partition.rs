//! Partitioning of the bipartite variable/equation graph.
//!
//! Two unknowns belong to the same partition when some equation mentions
//! both; the relation's transitive closure comes from a union-find over
//! the folded equations. Partitions solve independently and in parallel.

use crate::substitute::Folded;
use petgraph::unionfind::UnionFind;
use pf_core::VarId;
use std::collections::BTreeMap;

/// One connected component of the unknown/equation graph.
#[derive(Debug, Default)]
pub(crate) struct Partition {
    /// Unknowns of this component, ascending by id.
    pub unknowns: Vec<VarId>,
    /// Indices into the folded-equation slice, in insertion order.
    pub equations: Vec<usize>,
}

/// Group folded equations and their unknowns into connected components.
pub(crate) fn partition(folded: &[Folded]) -> Vec<Partition> {
    let mut index: BTreeMap<VarId, usize> = BTreeMap::new();
    for eq in folded {
        for &v in &eq.unknowns {
            let next = index.len();
            index.entry(v).or_insert(next);
        }
    }

    let mut uf = UnionFind::<usize>::new(index.len());
    for eq in folded {
        let mut vars = eq.unknowns.iter();
        if let Some(first) = vars.next() {
            let a = index[first];
            for v in vars {
                uf.union(a, index[v]);
            }
        }
    }

    let mut groups: BTreeMap<usize, Partition> = BTreeMap::new();
    for (&v, &i) in &index {
        groups.entry(uf.find(i)).or_default().unknowns.push(v);
    }
    for (ei, eq) in folded.iter().enumerate() {
        if let Some(first) = eq.unknowns.iter().next() {
            groups
                .entry(uf.find(index[first]))
                .or_default()
                .equations
                .push(ei);
        }
    }

    let mut parts: Vec<Partition> = groups.into_values().collect();
    parts.sort_by_key(|p| p.unknowns[0]);
    parts
}

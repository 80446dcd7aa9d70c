//! docqa-vector
//!
//! Exact nearest-neighbour search over one document's chunk embeddings.
//! Vectors live in a single flat buffer; a query scans every row and ranks by
//! squared Euclidean distance. Rebuilt from scratch on every document load.

use std::cmp::Ordering;

use docqa_core::types::{ChunkId, SearchHit};
use docqa_core::{Error, Result};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dim: usize,
    ids: Vec<ChunkId>,
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Build an index from `(id, vector)` rows. Row order defines positions.
    pub fn build(rows: Vec<(ChunkId, Vec<f32>)>) -> Result<Self> {
        let dim = match rows.first() {
            Some((_, v)) => v.len(),
            None => return Err(Error::Index("cannot build an index from zero vectors".into())),
        };
        if dim == 0 {
            return Err(Error::Index("vectors must have at least one dimension".into()));
        }

        let mut ids = Vec::with_capacity(rows.len());
        let mut data = Vec::with_capacity(rows.len() * dim);
        for (pos, (id, v)) in rows.into_iter().enumerate() {
            if v.len() != dim {
                return Err(Error::Index(format!("vector {pos} ({id}) has dimension {}, expected {dim}", v.len())));
            }
            if v.iter().any(|x| !x.is_finite()) {
                return Err(Error::Index(format!("vector {pos} ({id}) contains a non-finite value")));
            }
            ids.push(id);
            data.extend_from_slice(&v);
        }
        debug!(rows = ids.len(), dim, "built flat L2 index");
        Ok(Self { dim, ids, data })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[ChunkId] {
        &self.ids
    }

    fn row(&self, pos: usize) -> &[f32] {
        &self.data[pos * self.dim..(pos + 1) * self.dim]
    }

    /// The `min(k, len)` nearest rows, closest first. Equal distances keep
    /// insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dim {
            return Err(Error::Index(format!("query has dimension {}, index expects {}", query.len(), self.dim)));
        }
        if query.iter().any(|x| !x.is_finite()) {
            return Err(Error::Index("query contains a non-finite value".into()));
        }

        let mut scored: Vec<(usize, f32)> = (0..self.len()).map(|pos| (pos, squared_l2(self.row(pos), query))).collect();
        scored.sort_by(|a, b| match a.1.total_cmp(&b.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        scored.truncate(k.min(self.len()));

        Ok(scored
            .into_iter()
            .map(|(position, distance)| SearchHit { position, id: self.ids[position].clone(), distance })
            .collect())
    }
}

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

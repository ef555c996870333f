/**
 * PlaceReco
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::time::Instant;

use fnv::FnvHashMap;
use scoped_pool::Pool;
use tracing::debug;

use crate::matrix::InteractionMatrix;
use crate::types;
use crate::types::DenseVector;

/// Square, symmetric matrix of cosine similarities between places. Rows and columns follow the
/// column order of the `InteractionMatrix` it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    item_names: Vec<String>,
    item_dict: FnvHashMap<String, usize>,
    scores: DenseVector,
}

impl SimilarityMatrix {

    pub fn num_items(&self) -> usize {
        self.item_names.len()
    }

    pub fn item_names(&self) -> &[String] {
        &self.item_names
    }

    pub fn item_name(&self, item_index: usize) -> &str {
        &self.item_names[item_index]
    }

    /// Exact, case-sensitive lookup of a place name.
    pub fn item_index(&self, name: &str) -> Option<usize> {
        self.item_dict.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.item_dict.contains_key(name)
    }

    pub fn get(&self, item_a: usize, item_b: usize) -> f64 {
        self.scores[item_a * self.num_items() + item_b]
    }

    pub fn row(&self, item_index: usize) -> &[f64] {
        let num_items = self.num_items();
        &self.scores[item_index * num_items..(item_index + 1) * num_items]
    }

    pub fn similarity(&self, name_a: &str, name_b: &str) -> Option<f64> {
        let item_a = self.item_index(name_a)?;
        let item_b = self.item_index(name_b)?;
        Some(self.get(item_a, item_b))
    }
}

/// Cosine similarity of two vectors, defined as zero if either of them has no magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    cosine(dot(a, b), dot(a, a).sqrt(), dot(b, b).sqrt())
}

/// Computes the pairwise cosine similarities of all place vectors of the interaction matrix. With
/// a `pool_size` larger than one, rows are computed in parallel; the result does not depend on
/// the pool size.
pub fn compute_similarity(interactions: &InteractionMatrix, pool_size: usize) -> SimilarityMatrix {

    let start = Instant::now();

    let item_vectors = interactions.item_vectors();
    let norms: Vec<f64> = item_vectors.iter()
        .map(|item_vector| dot(item_vector, item_vector).sqrt())
        .collect();

    let num_items = item_vectors.len();
    let mut scores = types::new_dense_vector(num_items * num_items);

    if num_items > 0 {

        let rows: Vec<&mut [f64]> = scores.chunks_mut(num_items).collect();
        let reference_to_item_vectors = &item_vectors;
        let reference_to_norms = &norms;

        if pool_size > 1 {
            let pool = Pool::new(pool_size);

            pool.scoped(|scope| {
                for (item, row) in rows.into_iter().enumerate() {
                    scope.execute(move || {
                        similarity_row(item, reference_to_item_vectors, reference_to_norms, row)
                    });
                }
            });

            pool.shutdown();
        } else {
            for (item, row) in rows.into_iter().enumerate() {
                similarity_row(item, reference_to_item_vectors, reference_to_norms, row);
            }
        }
    }

    let item_names = interactions.item_names().to_vec();
    let item_dict: FnvHashMap<String, usize> = item_names.iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), index))
        .collect();

    debug!(
        "computed {}x{} similarity matrix with {} threads in {}ms",
        num_items,
        num_items,
        pool_size.max(1),
        start.elapsed().as_millis()
    );

    SimilarityMatrix { item_names, item_dict, scores }
}

fn similarity_row(item: usize, item_vectors: &[DenseVector], norms: &[f64], row: &mut [f64]) {

    let item_vector = &item_vectors[item];

    for (other_item, score) in row.iter_mut().enumerate() {
        *score = cosine(
            dot(item_vector, &item_vectors[other_item]),
            norms[item],
            norms[other_item],
        );
    }

    // Self-similarity is exactly one, rounding must not leak into the diagonal
    if norms[item] > 0.0 {
        row[item] = 1.0;
    }
}

#[inline(always)]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline(always)]
fn cosine(dot_product: f64, norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot_product / (norm_a * norm_b)).max(-1.0).min(1.0)
    }
}

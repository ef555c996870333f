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

use serde_derive::Serialize;
use tracing::info;

use crate::error::Result;
use crate::matrix::{build_interaction_matrix, InteractionMatrix};
use crate::recommend;
use crate::recommend::Recommendation;
use crate::similarity::{compute_similarity, SimilarityMatrix};
use crate::stats::{JoinCoverage, LoadReport};
use crate::types::Dataset;

/// Owns a dataset snapshot and the matrices derived from it. The matrices are computed when the
/// recommender is created and again only on an explicit `reload` with different data; queries
/// never recompute anything.
pub struct Recommender {
    dataset: Dataset,
    fingerprint: u64,
    interactions: InteractionMatrix,
    similarities: SimilarityMatrix,
    pool_size: usize,
}

/// The neighbours computed for a single place. Field names will be used in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarPlaces {
    pub for_place: String,
    pub similar_places: Vec<Recommendation>,
}

impl Recommender {

    pub fn new(dataset: Dataset, pool_size: usize) -> Self {
        let fingerprint = dataset.fingerprint();
        let (interactions, similarities) = derive(&dataset, pool_size);

        Recommender { dataset, fingerprint, interactions, similarities, pool_size }
    }

    /// Swaps in a new dataset. Returns whether the derived matrices had to be recomputed, which
    /// is only the case if the content of the dataset changed.
    pub fn reload(&mut self, dataset: Dataset) -> bool {
        let fingerprint = dataset.fingerprint();

        if fingerprint == self.fingerprint {
            info!("dataset unchanged (fingerprint {:016x}), keeping similarities", fingerprint);
            self.dataset = dataset;
            return false;
        }

        let (interactions, similarities) = derive(&dataset, self.pool_size);

        self.dataset = dataset;
        self.fingerprint = fingerprint;
        self.interactions = interactions;
        self.similarities = similarities;

        true
    }

    pub fn recommend(&self, place: &str, num_items_to_recommend: usize) -> Result<Vec<Recommendation>> {
        recommend::recommend(&self.similarities, place, num_items_to_recommend)
    }

    /// Neighbours for every place, in the order of the similarity index.
    pub fn recommend_all(&self, num_items_to_recommend: usize) -> Vec<SimilarPlaces> {
        (0..self.similarities.num_items())
            .map(|item_index| SimilarPlaces {
                for_place: self.similarities.item_name(item_index).to_owned(),
                similar_places: recommend::recommend_for_index(
                    &self.similarities,
                    item_index,
                    num_items_to_recommend,
                ),
            })
            .collect()
    }

    /// All place names that can be queried, sorted.
    pub fn places(&self) -> &[String] {
        self.similarities.item_names()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn interactions(&self) -> &InteractionMatrix {
        &self.interactions
    }

    pub fn similarities(&self) -> &SimilarityMatrix {
        &self.similarities
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.dataset.report
    }

    pub fn coverage(&self) -> &JoinCoverage {
        self.interactions.coverage()
    }
}

fn derive(dataset: &Dataset, pool_size: usize) -> (InteractionMatrix, SimilarityMatrix) {

    info!(
        "Deriving similarities from {} users, {} places and {} ratings",
        dataset.users.len(),
        dataset.places.len(),
        dataset.ratings.len()
    );

    let interactions = build_interaction_matrix(&dataset.users, &dataset.ratings, &dataset.places);
    interactions.coverage().log();

    let similarities = compute_similarity(&interactions, pool_size);

    info!("{} places in the similarity index", similarities.num_items());

    (interactions, similarities)
}

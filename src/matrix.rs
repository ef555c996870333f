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

use fnv::{FnvHashMap, FnvHashSet};
use tracing::debug;

use crate::stats::{DataDictionary, JoinCoverage};
use crate::types;
use crate::types::{DenseVector, Place, Rating, User};

/// Dense user × place matrix of ratings. Rows are user ids, columns are place names, both in
/// ascending order. Cells without an observed rating hold zero.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionMatrix {
    dictionary: DataDictionary,
    values: DenseVector,
    coverage: JoinCoverage,
}

impl InteractionMatrix {

    pub fn num_users(&self) -> usize {
        self.dictionary.num_users()
    }

    pub fn num_items(&self) -> usize {
        self.dictionary.num_items()
    }

    pub fn dictionary(&self) -> &DataDictionary {
        &self.dictionary
    }

    pub fn coverage(&self) -> &JoinCoverage {
        &self.coverage
    }

    pub fn user_ids(&self) -> &[u32] {
        self.dictionary.user_ids()
    }

    pub fn item_names(&self) -> &[String] {
        self.dictionary.item_names()
    }

    pub fn get(&self, user_index: usize, item_index: usize) -> f64 {
        self.values[user_index * self.num_items() + item_index]
    }

    /// Rating of a user for a place, zero if unobserved, `None` if either is not in the matrix.
    fn rating(&self, user_id: u32, item_name: &str) -> Option<f64> {
        let user_index = self.dictionary.user_index(user_id)?;
        let item_index = self.dictionary.item_index(item_name)?;
        Some(self.get(user_index, item_index))
    }

    pub fn user_row(&self, user_index: usize) -> &[f64] {
        let num_items = self.num_items();
        &self.values[user_index * num_items..(user_index + 1) * num_items]
    }

    /// Transposed view: one vector per place, holding the ratings of all users.
    pub fn item_vectors(&self) -> Vec<DenseVector> {
        let num_users = self.num_users();
        let mut item_vectors = vec![types::new_dense_vector(num_users); self.num_items()];

        for user_index in 0..num_users {
            for (item_index, value) in self.user_row(user_index).iter().enumerate() {
                item_vectors[item_index][user_index] = *value;
            }
        }

        item_vectors
    }
}

/// Joins the ratings to users and places (inner join on both) and pivots the result into an
/// `InteractionMatrix`. Ratings without a matching user or place are left out and counted in the
/// matrix's `JoinCoverage`. If a user rated the same place name twice, the later rating wins.
pub fn build_interaction_matrix(
    users: &[User],
    ratings: &[Rating],
    places: &[Place],
) -> InteractionMatrix {

    let known_users: FnvHashSet<u32> = users.iter().map(|user| user.id).collect();
    let place_names: FnvHashMap<u32, &str> = places.iter()
        .map(|place| (place.id, place.name.as_str()))
        .collect();

    let mut coverage = JoinCoverage { num_ratings: ratings.len(), ..JoinCoverage::default() };

    let mut joined: Vec<(u32, &str, u32)> = Vec::with_capacity(ratings.len());
    let mut joined_places: FnvHashSet<u32> = FnvHashSet::default();

    for rating in ratings {

        if !known_users.contains(&rating.user_id) {
            coverage.ratings_without_user += 1;
            continue;
        }

        match place_names.get(&rating.place_id) {
            Some(name) => {
                joined.push((rating.user_id, *name, rating.rating));
                joined_places.insert(rating.place_id);
            },
            None => coverage.ratings_without_place += 1,
        }
    }

    coverage.num_joined = joined.len();

    let dictionary = DataDictionary::from_interactions(
        joined.iter().map(|&(user, item, _)| (user, item)));

    coverage.users_without_ratings = known_users.len() - dictionary.num_users();
    coverage.places_without_ratings = place_names.len() - joined_places.len();

    let num_items = dictionary.num_items();
    let mut values = types::new_dense_vector(dictionary.num_users() * num_items);
    let mut observed = vec![false; values.len()];

    for &(user, item, rating) in joined.iter() {
        if let (Some(user_index), Some(item_index)) =
            (dictionary.user_index(user), dictionary.item_index(item)) {

            let cell = user_index * num_items + item_index;

            if observed[cell] {
                coverage.duplicate_pairs += 1;
            }

            observed[cell] = true;
            values[cell] = rating as f64;
        }
    }

    debug!(
        "built {}x{} interaction matrix from {} joined ratings",
        dictionary.num_users(),
        num_items,
        coverage.num_joined
    );

    InteractionMatrix { dictionary, values, coverage }
}

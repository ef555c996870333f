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

use proptest::prelude::*;

use crate::matrix::{build_interaction_matrix, InteractionMatrix};
use crate::recommend::recommend;
use crate::similarity::{compute_similarity, SimilarityMatrix};
use crate::types::{Place, Rating, User};

const NUM_USERS: u32 = 5;
const NUM_PLACES: u32 = 6;

fn arbitrary_ratings() -> impl Strategy<Value = Vec<(u32, u32, u32)>> {
    prop::collection::vec((1..=NUM_USERS, 1..=NUM_PLACES, 0u32..=5), 0..40)
}

fn interactions_for(ratings: &[(u32, u32, u32)]) -> InteractionMatrix {
    let users: Vec<User> = (1..=NUM_USERS)
        .map(|id| User { id, location: String::from("Malang, Jawa Timur"), age: Some(40) })
        .collect();

    let places: Vec<Place> = (1..=NUM_PLACES)
        .map(|id| Place {
            id,
            name: format!("Place {}", id),
            category: String::from("Taman Hiburan"),
            city: String::from("Malang"),
        })
        .collect();

    let ratings: Vec<Rating> = ratings.iter()
        .map(|&(user_id, place_id, rating)| Rating { user_id, place_id, rating })
        .collect();

    build_interaction_matrix(&users, &ratings, &places)
}

fn similarities_for(ratings: &[(u32, u32, u32)]) -> (InteractionMatrix, SimilarityMatrix) {
    let interactions = interactions_for(ratings);
    let similarities = compute_similarity(&interactions, 1);
    (interactions, similarities)
}

proptest! {

    #[test]
    fn similarities_are_symmetric_and_bounded(ratings in arbitrary_ratings()) {
        let (_, similarities) = similarities_for(&ratings);
        let num_items = similarities.num_items();

        for item_a in 0..num_items {
            for item_b in 0..num_items {
                let score = similarities.get(item_a, item_b);
                prop_assert_eq!(score, similarities.get(item_b, item_a));
                prop_assert!(score >= -1.0 && score <= 1.0);
            }
        }
    }

    #[test]
    fn self_similarity_depends_on_ratings(ratings in arbitrary_ratings()) {
        let (interactions, similarities) = similarities_for(&ratings);

        for (item, item_vector) in interactions.item_vectors().iter().enumerate() {
            let rated = item_vector.iter().any(|rating| *rating != 0.0);
            let expected = if rated { 1.0 } else { 0.0 };
            prop_assert_eq!(similarities.get(item, item), expected);
        }
    }

    #[test]
    fn similarities_are_deterministic(ratings in arbitrary_ratings(), pool_size in 1usize..4) {
        let interactions = interactions_for(&ratings);

        let first = compute_similarity(&interactions, 1);
        let second = compute_similarity(&interactions, pool_size);

        prop_assert_eq!(first.item_names(), interactions.item_names());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn recommendations_exclude_the_query(ratings in arbitrary_ratings(), k in 0usize..8) {
        let (_, similarities) = similarities_for(&ratings);
        let num_items = similarities.num_items();

        for place in similarities.item_names() {
            let recommendations = recommend(&similarities, place, k).unwrap();

            prop_assert_eq!(recommendations.len(), k.min(num_items - 1));
            prop_assert!(recommendations.iter().all(|recommendation| &recommendation.place != place));

            for pair in recommendations.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    prop_assert!(pair[0].place < pair[1].place);
                }
            }
        }
    }
}

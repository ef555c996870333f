//! Item-to-item recommendations for places, computed from the ratings tourists gave them.
//!
//! Ratings are joined to users and places and pivoted into a user × place matrix. The cosine
//! similarity of the place columns of that matrix tells us which places are rated alike by the
//! same people, and the most similar places to a given one are what we recommend.

pub mod engine;
pub mod error;
pub mod io;
pub mod matrix;
pub mod recommend;
mod scored;
pub mod similarity;
pub mod stats;
pub mod types;

#[cfg(test)]
mod property_tests;

pub use engine::{Recommender, SimilarPlaces};
pub use error::{Error, Result};
pub use matrix::{build_interaction_matrix, InteractionMatrix};
pub use recommend::{recommend, Recommendation, DEFAULT_NUM_RECOMMENDATIONS};
pub use similarity::{compute_similarity, SimilarityMatrix};
pub use types::{Dataset, Place, Rating, User};

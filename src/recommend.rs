use std::collections::BinaryHeap;
use std::fmt;

use serde_derive::Serialize;

use crate::error::{Error, Result};
use crate::scored::ScoredItem;
use crate::similarity::SimilarityMatrix;

pub const DEFAULT_NUM_RECOMMENDATIONS: usize = 5;

/// A place similar to the queried one. Field names will be used in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub place: String,
    pub score: f64,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (match score: {:.2})", self.place, self.score)
    }
}

/// Returns the `num_items_to_recommend` places most similar to `place`, best first. The place
/// itself is never part of the result, ties in similarity are broken by place name. Fails with
/// `Error::NotFound` if the place is unknown.
pub fn recommend(
    similarities: &SimilarityMatrix,
    place: &str,
    num_items_to_recommend: usize,
) -> Result<Vec<Recommendation>> {

    let item_index = similarities.item_index(place)
        .ok_or_else(|| Error::NotFound(place.to_owned()))?;

    Ok(recommend_for_index(similarities, item_index, num_items_to_recommend))
}

pub(crate) fn recommend_for_index(
    similarities: &SimilarityMatrix,
    item_index: usize,
    num_items_to_recommend: usize,
) -> Vec<Recommendation> {

    if num_items_to_recommend == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<ScoredItem> = BinaryHeap::with_capacity(num_items_to_recommend);

    for (other_item, score) in similarities.row(item_index).iter().enumerate() {

        if other_item == item_index {
            continue;
        }

        let scored_item = ScoredItem { item: other_item, score: *score };

        if heap.len() < num_items_to_recommend {
            heap.push(scored_item);
        } else if let Some(mut top) = heap.peek_mut() {
            if scored_item < *top {
                *top = scored_item;
            }
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|scored_item| Recommendation {
            place: similarities.item_name(scored_item.item).to_owned(),
            score: scored_item.score,
        })
        .collect()
}

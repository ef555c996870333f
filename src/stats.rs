use fnv::FnvHashMap;
use tracing::{info, warn};

/// Maps user identifiers and place names to consecutive matrix indices. Both sides are ordered
/// ascending, which fixes the row and column order of every derived matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataDictionary {
    user_ids: Vec<u32>,
    user_dict: FnvHashMap<u32, usize>,
    item_names: Vec<String>,
    item_dict: FnvHashMap<String, usize>,
    num_interactions: u64,
}

impl DataDictionary {

    pub fn num_users(&self) -> usize {
        self.user_ids.len()
    }

    pub fn num_items(&self) -> usize {
        self.item_names.len()
    }

    pub fn num_interactions(&self) -> u64 {
        self.num_interactions
    }

    pub fn user_index(&self, user_id: u32) -> Option<usize> {
        self.user_dict.get(&user_id).cloned()
    }

    pub fn item_index(&self, name: &str) -> Option<usize> {
        self.item_dict.get(name).cloned()
    }

    pub fn user_id(&self, user_index: usize) -> u32 {
        self.user_ids[user_index]
    }

    pub fn item_name(&self, item_index: usize) -> &str {
        &self.item_names[item_index]
    }

    pub fn user_ids(&self) -> &[u32] {
        &self.user_ids
    }

    pub fn item_names(&self) -> &[String] {
        &self.item_names
    }
}

impl DataDictionary {

    /// Builds the dictionary from joined `(user, place name)` pairs.
    pub fn from_interactions<'a, I>(interactions: I) -> Self
        where I: IntoIterator<Item=(u32, &'a str)> {

        let mut user_ids: Vec<u32> = Vec::new();
        let mut item_names: Vec<String> = Vec::new();
        let mut num_interactions: u64 = 0;

        for (user, item) in interactions {
            user_ids.push(user);
            item_names.push(item.to_owned());
            num_interactions += 1;
        }

        user_ids.sort_unstable();
        user_ids.dedup();
        item_names.sort_unstable();
        item_names.dedup();

        let user_dict: FnvHashMap<u32, usize> = user_ids.iter()
            .enumerate()
            .map(|(index, user)| (*user, index))
            .collect();

        let item_dict: FnvHashMap<String, usize> = item_names.iter()
            .enumerate()
            .map(|(index, item)| (item.clone(), index))
            .collect();

        DataDictionary { user_ids, user_dict, item_names, item_dict, num_interactions }
    }
}

/// Rows the loader dropped because they could not be coerced into records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub malformed_users: usize,
    pub malformed_ratings: usize,
    /// Rating rows whose place identifier is not a plain non-negative integer
    pub malformed_place_ids: usize,
    pub malformed_places: usize,
}

impl LoadReport {

    pub fn num_dropped(&self) -> usize {
        self.malformed_users + self.malformed_ratings + self.malformed_place_ids +
            self.malformed_places
    }

    pub fn log(&self) {
        if self.num_dropped() == 0 {
            return;
        }

        warn!(
            malformed_users = self.malformed_users,
            malformed_ratings = self.malformed_ratings,
            malformed_place_ids = self.malformed_place_ids,
            malformed_places = self.malformed_places,
            "dropped {} malformed rows while loading",
            self.num_dropped()
        );
    }
}

/// Outcome of joining ratings against users and places. Nothing here is an error, but all of it
/// shrinks the data the recommendations are based on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinCoverage {
    pub num_ratings: usize,
    pub num_joined: usize,
    pub ratings_without_user: usize,
    /// Counts ratings that matched a user but no place
    pub ratings_without_place: usize,
    pub users_without_ratings: usize,
    pub places_without_ratings: usize,
    /// Joined ratings that overwrote an earlier rating for the same user and place name
    pub duplicate_pairs: usize,
}

impl JoinCoverage {

    pub fn num_excluded(&self) -> usize {
        self.ratings_without_user + self.ratings_without_place
    }

    /// Fraction of the ratings that made it into the matrix.
    pub fn rating_coverage(&self) -> f64 {
        if self.num_ratings == 0 {
            1.0
        } else {
            self.num_joined as f64 / self.num_ratings as f64
        }
    }

    pub fn log(&self) {
        info!(
            "{} of {} ratings joined ({:.1}% coverage)",
            self.num_joined,
            self.num_ratings,
            self.rating_coverage() * 100.0
        );

        if self.num_excluded() > 0 {
            warn!(
                ratings_without_user = self.ratings_without_user,
                ratings_without_place = self.ratings_without_place,
                "excluded {} ratings without a matching user or place",
                self.num_excluded()
            );
        }

        if self.duplicate_pairs > 0 {
            warn!("{} ratings overwrote an earlier rating of the same place", self.duplicate_pairs);
        }

        if self.users_without_ratings > 0 || self.places_without_ratings > 0 {
            info!(
                "{} users and {} places have no joined ratings",
                self.users_without_ratings,
                self.places_without_ratings
            );
        }
    }
}

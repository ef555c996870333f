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

use std::hash::{Hash, Hasher};

use fnv::FnvHasher;
use serde_derive::Deserialize;

use crate::stats::LoadReport;

pub type DenseVector = Vec<f64>;

pub fn new_dense_vector(dimensions: usize) -> DenseVector {
    vec![0.0; dimensions]
}

/// A visitor, as found in the user file. Field names follow the column headers of the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct User {
    #[serde(rename = "User_Id")]
    pub id: u32,
    #[serde(rename = "Location")]
    pub location: String,
    /// Missing or unreadable ages do not disqualify a user
    #[serde(rename = "Age", default, deserialize_with = "csv::invalid_option")]
    pub age: Option<u32>,
}

impl User {

    /// The home city of a user, which is the first comma-separated part of the location.
    pub fn city(&self) -> &str {
        self.location.split(',').next().unwrap_or("").trim()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Place {
    #[serde(rename = "Place_Id")]
    pub id: u32,
    #[serde(rename = "Place_Name")]
    pub name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "City")]
    pub city: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rating {
    pub user_id: u32,
    pub place_id: u32,
    pub rating: u32,
}

/// An immutable snapshot of all loaded records, together with what the loader had to drop.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub users: Vec<User>,
    pub ratings: Vec<Rating>,
    pub places: Vec<Place>,
    pub report: LoadReport,
}

impl Dataset {

    pub fn new(users: Vec<User>, ratings: Vec<Rating>, places: Vec<Place>) -> Self {
        Dataset { users, ratings, places, report: LoadReport::default() }
    }

    /// Content hash over all records, used to decide whether derived matrices are stale.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FnvHasher::default();
        self.users.hash(&mut hasher);
        self.ratings.hash(&mut hasher);
        self.places.hash(&mut hasher);
        hasher.finish()
    }
}

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

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The queried place is not part of the similarity index. Distinct from an empty result.
    #[error("place '{0}' not found")]
    NotFound(String),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::Error;

    #[test]
    fn not_found_names_the_place() {
        let error = Error::NotFound(String::from("Pantai Parangtritis"));

        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "place 'Pantai Parangtritis' not found");
    }

    #[test]
    fn io_errors_convert() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let error: Error = io_error.into();

        assert!(!error.is_not_found());
        assert!(error.to_string().starts_with("I/O error"));
    }
}

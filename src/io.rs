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

use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::io::{stdout, BufWriter};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use tracing::{debug, info};

use crate::engine::SimilarPlaces;
use crate::error::Result;
use crate::stats::LoadReport;
use crate::types::{Dataset, Place, Rating, User};

/// Reads a CSV input file. We expect a header line and comma separation, the columns are matched
/// by their header names.
pub fn csv_reader<P: AsRef<Path>>(file: P) -> Result<csv::Reader<File>> {
    let reader = reader_builder().from_path(file)?;
    Ok(reader)
}

pub fn csv_reader_from<R: io::Read>(input: R) -> csv::Reader<R> {
    reader_builder().from_reader(input)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(b',')
        .trim(csv::Trim::Headers);
    builder
}

/// A rating as found in the file, before its place identifier has been checked.
#[derive(Deserialize)]
struct RatingRow {
    #[serde(rename = "User_Id")]
    user_id: u32,
    #[serde(rename = "Place_Id")]
    place_id: String,
    #[serde(rename = "Place_Ratings")]
    rating: u32,
}

/// Place identifiers must consist of ASCII digits only.
pub fn parse_place_id(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    raw.parse().ok()
}

/// Deserializes all rows of a reader, skipping and counting rows that do not fit the record
/// type. Failures of the underlying reader abort the read.
fn records_from_csv<R, T>(reader: &mut csv::Reader<R>, num_malformed: &mut usize) -> Result<Vec<T>>
    where R: io::Read, T: DeserializeOwned {

    let mut records = Vec::new();

    for result in reader.deserialize() {
        match result {
            Ok(record) => records.push(record),
            Err(error) => {
                if error.is_io_error() {
                    return Err(error.into());
                }
                debug!("Skipping malformed row: {}", error);
                *num_malformed += 1;
            }
        }
    }

    Ok(records)
}

pub fn users_from_csv<R: io::Read>(
    reader: &mut csv::Reader<R>,
    report: &mut LoadReport,
) -> Result<Vec<User>> {
    records_from_csv(reader, &mut report.malformed_users)
}

pub fn places_from_csv<R: io::Read>(
    reader: &mut csv::Reader<R>,
    report: &mut LoadReport,
) -> Result<Vec<Place>> {
    records_from_csv(reader, &mut report.malformed_places)
}

pub fn ratings_from_csv<R: io::Read>(
    reader: &mut csv::Reader<R>,
    report: &mut LoadReport,
) -> Result<Vec<Rating>> {

    let rows: Vec<RatingRow> = records_from_csv(reader, &mut report.malformed_ratings)?;

    let mut ratings = Vec::with_capacity(rows.len());

    for row in rows {
        match parse_place_id(&row.place_id) {
            Some(place_id) => {
                ratings.push(Rating { user_id: row.user_id, place_id, rating: row.rating })
            },
            None => report.malformed_place_ids += 1,
        }
    }

    Ok(ratings)
}

/// Reads users, ratings and places from already opened CSV readers.
pub fn dataset_from_csv<U, R, P>(
    users: &mut csv::Reader<U>,
    ratings: &mut csv::Reader<R>,
    places: &mut csv::Reader<P>,
) -> Result<Dataset>
    where U: io::Read, R: io::Read, P: io::Read {

    let mut report = LoadReport::default();

    let users = users_from_csv(users, &mut report)?;
    let ratings = ratings_from_csv(ratings, &mut report)?;
    let places = places_from_csv(places, &mut report)?;

    report.log();

    Ok(Dataset { users, ratings, places, report })
}

pub fn load_dataset<P: AsRef<Path>>(users_path: P, ratings_path: P, places_path: P) -> Result<Dataset> {

    let dataset = dataset_from_csv(
        &mut csv_reader(users_path)?,
        &mut csv_reader(ratings_path)?,
        &mut csv_reader(places_path)?,
    )?;

    info!(
        "Loaded {} users, {} ratings and {} places",
        dataset.users.len(),
        dataset.ratings.len(),
        dataset.places.len()
    );

    Ok(dataset)
}

/// Output the computed neighbours in JSON format, one place per line. If a `path` is supplied,
/// we write to a file at the specified path, otherwise, we output to stdout.
pub fn write_recommendations(similar_places: &[SimilarPlaces], path: Option<String>) -> Result<()> {

    let out: Box<dyn Write> = match path {
        Some(path) => Box::new(File::create(&Path::new(&path))?),
        _ => Box::new(stdout())
    };

    write_recommendations_to(similar_places, out)
}

pub fn write_recommendations_to<W: Write>(similar_places: &[SimilarPlaces], out: W) -> Result<()> {

    let mut out = BufWriter::new(out);

    for similar_places_for_place in similar_places {
        serde_json::to_writer(&mut out, similar_places_for_place)?;
        writeln!(out)?;
    }

    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {

    use super::{csv_reader_from, dataset_from_csv, parse_place_id, ratings_from_csv,
        users_from_csv, write_recommendations_to};
    use crate::engine::{Recommender, SimilarPlaces};
    use crate::recommend::Recommendation;
    use crate::stats::LoadReport;

    #[test]
    fn place_ids_must_be_digits() {
        assert_eq!(parse_place_id("42"), Some(42));
        assert_eq!(parse_place_id("007"), Some(7));
        assert_eq!(parse_place_id(""), None);
        assert_eq!(parse_place_id("-3"), None);
        assert_eq!(parse_place_id("+3"), None);
        assert_eq!(parse_place_id("4.0"), None);
        assert_eq!(parse_place_id(" 4"), None);
        assert_eq!(parse_place_id("abc"), None);
        assert_eq!(parse_place_id("99999999999"), None);
    }

    #[test]
    fn drops_ratings_with_malformed_place_ids() {
        let data = "User_Id,Place_Id,Place_Ratings\n\
                    1,179,3\n\
                    1,x12,4\n\
                    2,,5\n\
                    two,3,5\n\
                    2,3,5\n";

        let mut report = LoadReport::default();
        let ratings = ratings_from_csv(&mut csv_reader_from(data.as_bytes()), &mut report)
            .unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0].place_id, 179);
        assert_eq!(ratings[1].user_id, 2);
        assert_eq!(report.malformed_place_ids, 2);
        assert_eq!(report.malformed_ratings, 1);
    }

    #[test]
    fn reads_users_by_column_name() {
        let data = "User_Id,Location,Age\n\
                    1,\"Semarang, Jawa Tengah\",20\n\
                    2,\"Bekasi, Jawa Barat\",twenty\n\
                    3,\"Cirebon, Jawa Barat\",23\n";

        let mut report = LoadReport::default();
        let users = users_from_csv(&mut csv_reader_from(data.as_bytes()), &mut report).unwrap();

        assert_eq!(users.len(), 3);
        assert_eq!(users[0].city(), "Semarang");
        assert_eq!(users[1].age, None);
        assert_eq!(users[2].id, 3);
        assert_eq!(users[2].age, Some(23));
        assert_eq!(report.malformed_users, 0);
    }

    #[test]
    fn only_unusable_user_ids_drop_users() {
        let data = "User_Id,Location,Age\n\
                    1,\"Semarang, Jawa Tengah\",\n\
                    x,\"Bekasi, Jawa Barat\",21\n\
                    3,,30\n";

        let mut report = LoadReport::default();
        let users = users_from_csv(&mut csv_reader_from(data.as_bytes()), &mut report).unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, 1);
        assert_eq!(users[0].age, None);
        assert_eq!(users[1].city(), "");
        assert_eq!(users[1].age, Some(30));
        assert_eq!(report.malformed_users, 1);
    }

    #[test]
    fn users_without_age_keep_their_ratings() {
        let users = "User_Id,Location,Age\n\
                     1,\"Semarang, Jawa Tengah\",\n\
                     2,\"Bekasi, Jawa Barat\",21\n";
        let ratings = "User_Id,Place_Id,Place_Ratings\n1,1,5\n1,2,5\n2,3,4\n";
        let places = "Place_Id,Place_Name,Category,City\n\
                      1,Lawang Sewu,Budaya,Semarang\n\
                      2,Kota Lama,Budaya,Semarang\n\
                      3,Pantai Marina,Bahari,Semarang\n";

        let dataset = dataset_from_csv(
            &mut csv_reader_from(users.as_bytes()),
            &mut csv_reader_from(ratings.as_bytes()),
            &mut csv_reader_from(places.as_bytes()),
        ).unwrap();

        assert_eq!(dataset.users.len(), 2);
        assert_eq!(dataset.report.num_dropped(), 0);

        let recommender = Recommender::new(dataset, 1);
        assert_eq!(recommender.coverage().ratings_without_user, 0);

        let recommendations = recommender.recommend("Lawang Sewu", 1).unwrap();
        assert_eq!(recommendations[0].place, "Kota Lama");
    }

    #[test]
    fn ignores_extra_place_columns() {
        let users = "User_Id,Location,Age\n1,\"Jakarta Utara, DKI Jakarta\",30\n";
        let ratings = "User_Id,Place_Id,Place_Ratings\n1,1,4\n";
        let places = "Place_Id,Place_Name,Description,Category,City,Price\n\
                      1,Monumen Nasional,\"Tugu, di tengah lapangan\",Budaya,Jakarta,20000\n";

        let dataset = dataset_from_csv(
            &mut csv_reader_from(users.as_bytes()),
            &mut csv_reader_from(ratings.as_bytes()),
            &mut csv_reader_from(places.as_bytes()),
        ).unwrap();

        assert_eq!(dataset.places.len(), 1);
        assert_eq!(dataset.places[0].name, "Monumen Nasional");
        assert_eq!(dataset.places[0].category, "Budaya");
        assert_eq!(dataset.report.num_dropped(), 0);
    }

    #[test]
    fn writes_json_lines() {
        let similar_places = vec![
            SimilarPlaces {
                for_place: String::from("Ancol"),
                similar_places: vec![
                    Recommendation { place: String::from("Dunia Fantasi"), score: 0.5 },
                ],
            },
            SimilarPlaces { for_place: String::from("Dunia Fantasi"), similar_places: vec![] },
        ];

        let mut out: Vec<u8> = Vec::new();
        write_recommendations_to(&similar_places, &mut out).unwrap();

        let written = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = written.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"for_place":"Ancol","similar_places":[{"place":"Dunia Fantasi","score":0.5}]}"#
        );
        assert_eq!(lines[1], r#"{"for_place":"Dunia Fantasi","similar_places":[]}"#);
    }
}

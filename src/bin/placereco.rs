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

use std::env;
use std::process;

use getopts::{Matches, Options};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use placereco::io;
use placereco::{Error, Recommender, DEFAULT_NUM_RECOMMENDATIONS};

fn main() {

    install_tracing_subscriber();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("u", "users", "User file name (required). A CSV file with the columns User_Id, \
        Location and Age.", "PATH");
    opts.optopt("r", "ratings", "Rating file name (required). A CSV file with the columns \
        User_Id, Place_Id and Place_Ratings.", "PATH");
    opts.optopt("p", "places", "Place file name (required). A CSV file with (at least) the \
        columns Place_Id, Place_Name, Category and City.", "PATH");
    opts.optopt("q", "place", "Name of the place to recommend similar places for (optional, \
        recommendations for all places are written as JSON by default).", "NAME");
    opts.optopt("n", "num-recommendations", "Number of similar places to compute per place \
        (optional, defaults to 5).", "NUMBER");
    opts.optopt("o", "outputfile", "Output file name (optional, output will be written to stdout \
        by default).", "PATH");
    opts.optopt("t", "threads", "Number of threads used to compute similarities (optional, \
        defaults to the number of CPUs).", "NUMBER");
    opts.optflag("l", "list", "List the names of all places that have been rated");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage_and_exit(&program, opts, None);
    }

    for (option, name) in &[("u", "users"), ("r", "ratings"), ("p", "places")] {
        if !matches.opt_present(option) {
            let hint = format!("Please specify a {} file via --{}.", &name[..name.len() - 1], name);
            return print_usage_and_exit(&program, opts, Some(&hint));
        }
    }

    let num_recommendations: usize = match matches.opt_get_default("n", DEFAULT_NUM_RECOMMENDATIONS) {
        Ok(num_recommendations) => num_recommendations,
        Err(failure) => {
            let hint = format!("Problem with option 'n': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    let num_threads: usize = match matches.opt_get_default("t", num_cpus::get()) {
        Ok(num_threads) => num_threads,
        Err(failure) => {
            let hint = format!("Problem with option 't': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if let Err(failure) = run(&matches, num_recommendations, num_threads) {
        match failure {
            Error::NotFound(place) => {
                eprintln!("Unknown place '{}', use --list to see all places.", place);
            },
            other => error!("{}", other),
        }
        process::exit(1);
    }
}

fn install_tracing_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage_and_exit(
    program: &str,
    opts: Options,
    hint: Option<&str>
) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));
    process::exit(exit_code(hint));
}

/// Asking for help is not a failure, every other reason to print the usage is.
fn exit_code(hint: Option<&str>) -> i32 {
    match hint {
        Some(_) => 2,
        None => 0,
    }
}

fn run(matches: &Matches, num_recommendations: usize, num_threads: usize) -> Result<(), Error> {

    // Presence of the three files has been checked before
    let users_path = matches.opt_str("u").unwrap_or_default();
    let ratings_path = matches.opt_str("r").unwrap_or_default();
    let places_path = matches.opt_str("p").unwrap_or_default();

    info!("Reading {}, {} and {}", users_path, ratings_path, places_path);
    let dataset = io::load_dataset(&users_path, &ratings_path, &places_path)?;

    let recommender = Recommender::new(dataset, num_threads);

    if matches.opt_present("l") {
        for place in recommender.places() {
            println!("{}", place);
        }
        return Ok(());
    }

    match matches.opt_str("q") {
        Some(place) => {
            let recommendations = recommender.recommend(&place, num_recommendations)?;

            if recommendations.is_empty() {
                println!("There are no other places to compare {} with.", place);
            } else {
                println!("If you liked {}, you might also enjoy:", place);
                for recommendation in recommendations.iter() {
                    println!("\u{2022} {}", recommendation);
                }
            }
        },
        None => {
            info!("Writing {} similar places per place...", num_recommendations);
            let all = recommender.recommend_all(num_recommendations);
            io::write_recommendations(&all, matches.opt_str("o"))?;
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {

    use super::exit_code;

    #[test]
    fn help_exits_successfully() {
        assert_eq!(exit_code(None), 0);
        assert_eq!(exit_code(Some("Please specify a user file via --users.")), 2);
    }
}

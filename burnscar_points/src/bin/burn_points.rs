/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! generate random burn sample points with burn dates from a classified (flag,date) raster

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use anyhow::Result;

use burnscar_common::{define_cli, check_cli, init_tracing, config::load_config_or_default, process::set_ctrlc_handler};
use burnscar_points::{
    BurnPointConfig, N_STAGES, process_algorithm,
    feedback::LogFeedback, params::{BurnPointParams, PARAM_OUTPUT}
};

define_cli! { ARGS [about="burn_points - place random sample points inside the burned regions of a raster and attach burn dates"] =
    config: Option<String> [help="path to RON BurnPointConfig file", short, long],
    min_distance: Option<f64> [help="minimum distance between points in raster SRS units (distancia_minima)", short='d', long],
    num_points: Option<usize> [help="number of points to place (numero_de_puntos)", short='n', long],
    seed: Option<u64> [help="random seed for reproducible point sets", long],
    raster: String [help="classified raster (band 1 = burn flag, band 2 = day offset)"],
    output: String [help="output vector file (Quema)"]
}

fn main ()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let mut config: BurnPointConfig = load_config_or_default( ARGS.config.as_deref())?;
    if ARGS.seed.is_some() { config.seed = ARGS.seed }

    let params = BurnPointParams {
        min_distance: ARGS.min_distance.unwrap_or( config.min_distance),
        num_points: ARGS.num_points.unwrap_or( config.num_points),
        raster: PathBuf::from( &ARGS.raster),
        output: PathBuf::from( &ARGS.output),
    };

    let feedback = LogFeedback::new( N_STAGES);
    let cancel_flag = feedback.cancel_flag();
    set_ctrlc_handler( move || cancel_flag.store( true, Ordering::Relaxed))?;

    let results = process_algorithm( &params.to_parameters(), &config, &feedback)?;
    match results.get( PARAM_OUTPUT) {
        Some(path) => println!("burn points written to {:?}", path),
        None => println!("canceled, nothing written")
    }

    Ok(())
}

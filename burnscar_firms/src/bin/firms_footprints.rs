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

//! turn a FIRMS detection CSV into AOI filtered points and AOI clipped sensor footprints

use std::path::PathBuf;
use anyhow::Result;

use burnscar_common::{define_cli, check_cli, init_tracing, config::load_config_or_default};
use burnscar_firms::{FirmsConfig, run_firms};

define_cli! { ARGS [about="firms_footprints - filter FIRMS fire detections by AOI and create clipped footprint squares"] =
    config: Option<String> [help="path to RON FirmsConfig file", short, long],
    min_confidence: Option<i32> [help="drop detections below this numeric confidence", long],
    csv: Option<String> [help="FIRMS CSV file (overrides config)", long],
    aoi: Option<String> [help="AOI polygon file (overrides config)", long]
}

fn main ()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let mut config: FirmsConfig = load_config_or_default( ARGS.config.as_deref())?;
    if let Some(csv) = &ARGS.csv { config.input_csv = PathBuf::from( csv) }
    if let Some(aoi) = &ARGS.aoi { config.aoi = PathBuf::from( aoi) }
    if ARGS.min_confidence.is_some() { config.min_confidence = ARGS.min_confidence }

    let report = run_firms( &config)?;

    println!("detections:  {}", report.n_records);
    println!("inside AOI:  {} -> {:?}", report.n_points, config.output_points);
    println!("footprints:  {} -> {:?}", report.n_footprints, config.output_squares);

    Ok(())
}

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

//! classify burned pixels by dNBR threshold inside confident FIRMS footprints, using the scenes around each detection

use std::path::PathBuf;
use anyhow::{Result,anyhow};

use burnscar_common::{define_cli, check_cli, init_tracing, config::load_config_or_default};
use burnscar_dnbr::{DnbrConfig, run_dnbr};

define_cli! { ARGS [about="dnbr_classify - create a two-band (flag,date) burn raster from dated scenes around FIRMS detections"] =
    config: Option<String> [help="path to RON DnbrConfig file", short, long],
    footprints: Option<String> [help="footprint polygons (overrides config)", short, long],
    threshold: Option<f64> [help="dNBR threshold (overrides config)", short, long],
    output: Option<String> [help="output GeoTIFF path (overrides config)", short, long]
}

fn main ()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let mut config: DnbrConfig = load_config_or_default( ARGS.config.as_deref())?;
    if let Some(footprints) = &ARGS.footprints { config.footprints = PathBuf::from( footprints) }
    if let Some(threshold) = ARGS.threshold { config.threshold = threshold }
    if let Some(output) = &ARGS.output { config.output = PathBuf::from( output) }
    if config.scenes.is_empty() {
        return Err( anyhow!("config needs dated scenes"))
    }

    let report = run_dnbr( &config)?;

    println!("burn raster:   {:?} ({} x {})", report.output, report.width, report.height);
    println!("footprints:    {} ({} skipped)", report.n_footprints, report.n_skipped);
    println!("burned pixels: {}", report.burned.pixels);
    println!("burned area:   {:.4} ha", report.burned.area_ha);

    Ok(())
}

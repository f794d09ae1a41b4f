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

//! merge yearly burn rasters of different tiles into one aligned mosaic with overviews

use std::path::PathBuf;
use anyhow::{Result,anyhow};

use burnscar_common::{define_cli, check_cli, init_tracing, config::load_config_or_default};
use burnscar_mosaic::{MosaicConfig, build_mosaic};

define_cli! { ARGS [about="burn_mosaic - merge two-band (flag,date) burn rasters into a single latest-burn mosaic"] =
    config: Option<String> [help="path to RON MosaicConfig file", short, long],
    output: Option<String> [help="output GeoTIFF path (overrides config)", short, long],
    inputs: Vec<String> [help="input rasters, the first one is the alignment reference (overrides config)"]
}

fn main ()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let mut config: MosaicConfig = load_config_or_default( ARGS.config.as_deref())?;
    if !ARGS.inputs.is_empty() { config.inputs = ARGS.inputs.iter().map( PathBuf::from).collect() }
    if let Some(output) = &ARGS.output { config.output = PathBuf::from( output) }
    if config.inputs.is_empty() { return Err( anyhow!("no input rasters (use --config or positional args)")) }

    let report = build_mosaic( &config)?;

    println!("mosaic:        {:?} ({} x {})", report.output, report.width, report.height);
    println!("burned pixels: {}", report.burned.pixels);
    println!("burned area:   {:.4} ha", report.burned.area_ha);

    Ok(())
}

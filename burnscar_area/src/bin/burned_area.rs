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

//! compute burned pixel count and area of a classified burn raster

use std::path::PathBuf;
use anyhow::Result;

use burnscar_common::{define_cli, check_cli, init_tracing, config::load_config_or_default};
use burnscar_area::{AreaConfig, burned_area_of_file};

define_cli! { ARGS [about="burned_area - count burned pixels of a raster band and convert them into m2 and hectares"] =
    config: Option<String> [help="path to RON AreaConfig file", short, long],
    band: Option<usize> [help="1-based band index (overrides config)", short, long],
    raster: Option<String> [help="path of raster to analyze (overrides config)"]
}

fn main ()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let mut config: AreaConfig = load_config_or_default( ARGS.config.as_deref())?;
    if let Some(raster) = &ARGS.raster { config.raster = PathBuf::from( raster) }
    if let Some(band) = ARGS.band { config.band = band }

    let area = burned_area_of_file( &config)?;

    println!("burned pixels: {}", area.pixels);
    println!("pixel area:    {} m2", area.pixel_area_m2);
    println!("burned area:   {:.2} m2", area.area_m2);
    println!("burned area:   {:.4} ha", area.area_ha);

    Ok(())
}

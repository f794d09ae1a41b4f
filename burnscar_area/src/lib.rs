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

#![allow(unused)]

//! burned area statistics for classified burn rasters

pub mod errors;

use std::path::{Path,PathBuf};
use ndarray::Array2;
use num::ToPrimitive;
use serde::{Deserialize,Serialize};
use tracing::info;

use burnscar_common::m2_to_ha;
use burnscar_gdal::{Dataset, RasterStack, read_raster_bands};
use crate::errors::{Result, BurnscarAreaError};

pub use burnscar_common::config::load_config;

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct AreaConfig {
    pub raster: PathBuf,
    /// 1-based band index
    pub band: usize,
    pub burn_code: f64,
}

impl Default for AreaConfig {
    fn default () -> Self {
        AreaConfig { raster: PathBuf::from("burned.tif"), band: 1, burn_code: 1.0 }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
pub struct BurnedArea {
    pub pixels: u64,
    pub pixel_area_m2: f64,
    pub area_m2: f64,
    pub area_ha: f64,
}

impl BurnedArea {
    pub fn new (pixels: u64, pixel_area_m2: f64) -> Self {
        let area_m2 = pixels as f64 * pixel_area_m2;
        BurnedArea { pixels, pixel_area_m2, area_m2, area_ha: m2_to_ha( area_m2) }
    }
}

/// number of cells equal to `burn_code`. Cells equal to the no-data value never count, even if it
/// happens to be the burn code
pub fn count_burned<T> (band: &Array2<T>, burn_code: f64, no_data: Option<f64>) -> u64 where T: Copy + ToPrimitive {
    band.iter()
        .filter_map( |v| v.to_f64())
        .filter( |v| *v == burn_code && no_data.map_or( true, |nd| *v != nd))
        .count() as u64
}

/// burned area of the 0-based band `band_idx` of an in-memory raster
pub fn burned_area<T> (stack: &RasterStack<T>, band_idx: usize, burn_code: f64) -> Result<BurnedArea> where T: Copy + ToPrimitive {
    let band = stack.bands.get( band_idx).ok_or( BurnscarAreaError::NoSuchBand( band_idx+1))?;
    let pixels = count_burned( band, burn_code, stack.no_data);
    Ok( BurnedArea::new( pixels, stack.pixel_area()) )
}

/// read the configured raster band and compute its burned area. This does not modify the raster
pub fn burned_area_of_file (config: &AreaConfig) -> Result<BurnedArea> {
    let ds = Dataset::open( &config.raster).map_err( |e| BurnscarAreaError::GdalError( e.into()))?;
    if config.band == 0 || config.band > ds.raster_count() {
        return Err( BurnscarAreaError::NoSuchBand( config.band))
    }

    let stack: RasterStack<f64> = read_raster_bands( &ds, &[config.band])?;
    let area = burned_area( &stack, 0, config.burn_code)?;
    info!("{:?} band {}: {} burned pixels, {:.2} m2, {:.4} ha", config.raster, config.band, area.pixels, area.area_m2, area.area_ha);
    Ok(area)
}

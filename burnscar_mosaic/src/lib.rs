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

//! merge yearly two-band burn rasters (flag, burn date as days since 1970-01-01) that cover different tiles
//! into one aligned mosaic. Each output cell carries the maximum observation of all inputs and the date band
//! is only kept where the flag band holds the burn code

pub mod errors;
pub mod grid;
pub mod resample;

use std::path::{Path,PathBuf};
use ndarray::Array2;
use serde::{Deserialize,Serialize};
use tracing::{debug, info, warn};

use burnscar_common::{BoundingBox, fs::check_input_files};
use burnscar_gdal::{
    RasterStack, TiffOptions, SrsTransform, DEFAULT_DENSIFY_PTS,
    build_overviews, is_same_srs_wkt, mapper_for_wkt, open_raster_stack, srs_from_wkt, write_raster_stack
};
use burnscar_area::{BurnedArea, burned_area};

use crate::grid::{MosaicGrid, compute_grid};
use crate::resample::{resample_nearest, mask_dates, combine_max};
use crate::errors::{Result, empty_mosaic, unsupported_input};

pub use burnscar_common::config::load_config;

pub const FLAG_BAND: usize = 0;
pub const DATE_BAND: usize = 1;

/// cell value of input rasters that never contributes to the mosaic, whatever no-data the inputs declare
pub const SOURCE_NO_DATA: f64 = 0.0;

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct MosaicConfig {
    /// input rasters, the first one defines SRS, resolution and pixel phase of the mosaic
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub burn_code: u16,

    pub tile_size: usize,
    pub compression: String,
    pub predictor: u32,
    pub bigtiff: String,

    pub overview_factors: Vec<i32>,
    pub overview_resampling: String,

    /// number of points per edge used to reproject input bounds
    pub densify_pts: i32,
}

impl Default for MosaicConfig {
    fn default () -> Self {
        let tiff = TiffOptions::default();
        MosaicConfig {
            inputs: Vec::new(),
            output: PathBuf::from("union_mosaic.tif"),
            burn_code: 1,
            tile_size: tiff.tile_size,
            compression: tiff.compression,
            predictor: tiff.predictor,
            bigtiff: tiff.bigtiff,
            overview_factors: vec![2, 4, 8, 16, 32],
            overview_resampling: "nearest".to_string(),
            densify_pts: DEFAULT_DENSIFY_PTS,
        }
    }
}

impl MosaicConfig {
    pub fn tiff_options (&self) -> TiffOptions {
        TiffOptions {
            tile_size: self.tile_size,
            compression: self.compression.clone(),
            predictor: self.predictor,
            bigtiff: self.bigtiff.clone()
        }
    }
}

#[derive(Debug,Clone)]
pub struct MosaicReport {
    pub output: PathBuf,
    pub width: usize,
    pub height: usize,
    pub burned: BurnedArea,
}

/// bounds of `tile` in the reference SRS
fn bounds_in_reference (tile: &RasterStack<u16>, ref_srs_wkt: Option<&str>, densify_pts: i32) -> Result<BoundingBox<f64>> {
    let bounds = tile.bounds();
    if is_same_srs_wkt( tile.srs_wkt.as_deref(), ref_srs_wkt)? {
        Ok( bounds )
    } else {
        match (tile.srs_wkt.as_deref(), ref_srs_wkt) {
            (Some(s),Some(t)) => Ok( SrsTransform::new( &srs_from_wkt(s)?, &srs_from_wkt(t)?)?.transform_bounds( &bounds, densify_pts)? ),
            _ => Err( unsupported_input("cannot mix georeferenced and non-georeferenced inputs"))
        }
    }
}

/// compute the mosaic grid for the given inputs, the first one being the alignment reference
pub fn mosaic_grid (tiles: &[RasterStack<u16>], densify_pts: i32) -> Result<MosaicGrid> {
    let reference = tiles.first().ok_or_else( || empty_mosaic("no input rasters"))?;
    let ref_srs = reference.srs_wkt.as_deref();

    let bounds = tiles.iter()
        .map( |tile| bounds_in_reference( tile, ref_srs, densify_pts))
        .collect::<Result<Vec<BoundingBox<f64>>>>()?;
    let union = BoundingBox::union_all( &bounds).ok_or_else( || empty_mosaic("no input bounds"))?;
    debug!("union of input bounds: {:?}", union);

    compute_grid( &union, &reference.geo_transform, reference.srs_wkt.clone())
}

/// merge all tiles into a (flag,date) mosaic on the grid of the first tile. The result does not depend on
/// the order of the remaining tiles
pub fn merge_tiles (tiles: &[RasterStack<u16>], burn_code: u16, densify_pts: i32) -> Result<RasterStack<u16>> {
    let grid = mosaic_grid( tiles, densify_pts)?;
    info!("mosaic grid: {}x{} pixels, bounds {:?}", grid.width, grid.height, grid.bounds());

    let mut flag = Array2::<u16>::zeros( (grid.height, grid.width));
    let mut date = Array2::<u16>::zeros( (grid.height, grid.width));

    for (i,tile) in tiles.iter().enumerate() {
        if tile.n_bands() < 2 {
            return Err( unsupported_input( format!("input {} has {} band(s), need flag and date", i, tile.n_bands())))
        }

        let mapper = mapper_for_wkt( grid.srs_wkt.as_deref(), tile.srs_wkt.as_deref())?;
        let mut bands = resample_nearest( tile, &grid, mapper.as_ref(), Some(SOURCE_NO_DATA), 0)?;
        let mut tile_date = bands.swap_remove( DATE_BAND);
        let tile_flag = bands.swap_remove( FLAG_BAND);

        mask_dates( &tile_flag, &mut tile_date, burn_code);
        combine_max( &mut flag, &tile_flag);
        combine_max( &mut date, &tile_date);
        debug!("merged input {}", i);
    }

    mask_dates( &flag, &mut date, burn_code);

    Ok( RasterStack::from_bands( grid.geo_transform, grid.srs_wkt, Some(0.0), vec![flag, date])? )
}

/// read all configured inputs, merge them and write the mosaic with overviews
pub fn build_mosaic (config: &MosaicConfig) -> Result<MosaicReport> {
    if config.inputs.is_empty() { return Err( empty_mosaic("no input rasters configured")) }
    check_input_files( &config.inputs)?;

    let mut tiles: Vec<RasterStack<u16>> = Vec::with_capacity( config.inputs.len());
    for path in &config.inputs {
        let tile = open_raster_stack::<u16,_>( path)?;
        info!("input {:?}: {}x{} pixels, {} bands", path, tile.width(), tile.height(), tile.n_bands());
        tiles.push( tile);
    }

    let mosaic = merge_tiles( &tiles, config.burn_code, config.densify_pts)?;

    let mut ds = write_raster_stack( &mosaic, &config.output, &config.tiff_options())?;
    build_overviews( &mut ds, &config.overview_factors, &config.overview_resampling)?;
    drop(ds);

    let burned = burned_area( &mosaic, FLAG_BAND, config.burn_code as f64)?;
    info!("{:?}: {} burned pixels, {:.2} ha", config.output, burned.pixels, burned.area_ha);

    Ok( MosaicReport { output: config.output.clone(), width: mosaic.width(), height: mosaic.height(), burned } )
}

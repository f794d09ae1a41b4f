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

//! classify burned pixels from the difference of pre- and post-fire normalized burn ratios (dNBR), restricted
//! to confident fire footprints. Each footprint is classified with median composites of the scenes acquired
//! within day windows before and after its detection date. The result is a two-band (flag, burn date) raster
//! as consumed by the mosaic builder

pub mod errors;
pub mod composite;
pub mod footprints;

use std::collections::BTreeMap;
use std::path::PathBuf;
use chrono::NaiveDate;
use ndarray::Array2;
use geo::MultiPolygon;
use serde::{Deserialize,Serialize};
use tracing::{debug, info, warn};

use burnscar_common::{datetime::unix_epoch_date, fs::check_input_files};
use burnscar_gdal::{
    RasterStack, TiffOptions, VectorFeature,
    build_overviews, map_geo_multi_polygon, mapper_for_wkt, open_raster_stack, read_polygon_layer, write_raster_stack
};
use burnscar_area::{BurnedArea, burned_area};

use crate::composite::{DayWindow, Scene, SceneBands, dnbr, median_composite, scenes_in_window};
use crate::footprints::{BurnBands, DatedFootprint, date_value, footprint_cells, select_footprints};
use crate::errors::{Result, no_scenes};

pub use burnscar_common::config::load_config;

pub const FLAG_BAND: usize = 0;
pub const DATE_BAND: usize = 1;

/// a scene file and its acquisition date
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct SceneFile {
    pub path: PathBuf,
    pub date: NaiveDate,
}

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct DnbrConfig {
    /// dated scenes of one tile. The first one defines the output grid
    pub scenes: Vec<SceneFile>,
    /// clipped FIRMS footprint polygons
    pub footprints: PathBuf,
    pub output: PathBuf,

    /// scene days relative to the footprint date that make up the pre-fire composite
    pub pre_window: DayWindow,
    /// scene days relative to the footprint date that make up the post-fire composite
    pub post_window: DayWindow,

    pub bands: SceneBands,
    /// divisor that turns stored values into reflectance
    pub reflectance_scale: f64,
    pub threshold: f64,

    pub confidence_field: String,
    pub min_confidence: f64,
    pub date_field: String,
    pub epoch: NaiveDate,

    pub tiff: TiffOptions,
    pub overview_factors: Vec<i32>,
    pub overview_resampling: String,
}

impl Default for DnbrConfig {
    fn default () -> Self {
        DnbrConfig {
            scenes: Vec::new(),
            footprints: PathBuf::from("cuadrados_FIRMS.shp"),
            output: PathBuf::from("burn_dnbr.tif"),
            pre_window: DayWindow::new( -60, -1),
            post_window: DayWindow::new( 1, 60),
            bands: SceneBands::default(),
            reflectance_scale: 10_000.0,
            threshold: 0.27,
            confidence_field: "confidence".to_string(),
            min_confidence: 55.0,
            date_field: "acq_date".to_string(),
            epoch: unix_epoch_date(),
            tiff: TiffOptions::default(),
            overview_factors: vec![2, 4, 8, 16, 32],
            overview_resampling: "nearest".to_string(),
        }
    }
}

#[derive(Debug,Clone)]
pub struct DnbrReport {
    pub output: PathBuf,
    pub width: usize,
    pub height: usize,
    pub n_footprints: usize,
    /// footprints without scenes in one of their windows or with a date outside of the date band range
    pub n_skipped: usize,
    pub burned: BurnedArea,
}

/// dNBR between the pre- and post-fire composites of a detection date. `None` if one of the windows has no scenes
fn window_dnbr (scenes: &[Scene], reference: &RasterStack<f64>, acq_date: NaiveDate, config: &DnbrConfig) -> Result<Option<Array2<f64>>> {
    let pre = scenes_in_window( scenes, acq_date, &config.pre_window);
    let post = scenes_in_window( scenes, acq_date, &config.post_window);
    if pre.is_empty() || post.is_empty() {
        warn!("no scenes for footprints of {}: {} pre-fire, {} post-fire", acq_date, pre.len(), post.len());
        return Ok(None)
    }
    debug!("{}: {} pre-fire and {} post-fire scenes", acq_date, pre.len(), post.len());

    let nbr_pre = median_composite( &pre, reference, &config.bands, config.reflectance_scale)?.nbr();
    let nbr_post = median_composite( &post, reference, &config.bands, config.reflectance_scale)?.nbr();
    Ok( Some( dnbr( &nbr_pre, &nbr_post)) )
}

/// classify in-memory scenes, returning the (flag,date) raster and the number of skipped footprints.
/// Footprints have to be in the SRS of the scenes
pub fn classify_footprints (scenes: &[Scene], footprints: &[DatedFootprint], config: &DnbrConfig) -> Result<(RasterStack<u16>,usize)> {
    let reference = &scenes.first().ok_or_else( || no_scenes("no scenes"))?.raster;
    for scene in scenes {
        reference.check_same_grid( &scene.raster)?;
    }
    let (width, height) = (reference.width(), reference.height());

    // footprints of the same day share their composites
    let mut by_date: BTreeMap<NaiveDate, Vec<&DatedFootprint>> = BTreeMap::new();
    for fp in footprints {
        by_date.entry( fp.date).or_default().push( fp);
    }

    let mut burn = BurnBands::new( width, height);
    let mut n_skipped = 0;
    for (acq_date, fps) in &by_date {
        let Some(day) = date_value( *acq_date, config.epoch) else {
            warn!("footprint date {} outside of date band range", acq_date);
            n_skipped += fps.len();
            continue
        };
        let Some(delta) = window_dnbr( scenes, reference, *acq_date, config)? else {
            n_skipped += fps.len();
            continue
        };

        for fp in fps {
            let cells = footprint_cells( &fp.geometry, &reference.geo_transform, width, height)?;
            let n_new = burn.mark_burned( &cells, &delta, config.threshold, day);
            debug!("footprint of {}: {} cells, {} newly burned", acq_date, cells.len(), n_new);
        }
    }

    let stack = RasterStack::from_bands( reference.geo_transform, reference.srs_wkt.clone(), Some(0.0), vec![burn.flag, burn.date])?;
    Ok( (stack, n_skipped) )
}

/// classify in-memory scenes. Footprints have to be in the SRS of the scenes
pub fn classify_scenes (scenes: &[Scene], footprints: &[DatedFootprint], config: &DnbrConfig) -> Result<RasterStack<u16>> {
    Ok( classify_footprints( scenes, footprints, config)?.0 )
}

fn read_scenes (files: &[SceneFile]) -> Result<Vec<Scene>> {
    let mut scenes = Vec::with_capacity( files.len());
    for file in files {
        let raster = open_raster_stack::<f64,_>( &file.path)?;
        debug!("scene {:?} of {}: {}x{} pixels, {} bands", file.path, file.date, raster.width(), raster.height(), raster.n_bands());
        scenes.push( Scene { date: file.date, raster });
    }
    Ok(scenes)
}

/// read footprints and map them into the SRS of the scenes. Footprints without SRS are assumed to match
fn read_footprints (config: &DnbrConfig, scene_srs_wkt: Option<&str>) -> Result<Vec<DatedFootprint>> {
    let layer = read_polygon_layer( &config.footprints)?;

    let s_wkt = match layer.srs_wkt.as_deref() {
        Some(wkt) => Some(wkt),
        None => { warn!("footprints have no SRS, assuming scene SRS"); scene_srs_wkt }
    };
    let mapper = mapper_for_wkt( s_wkt, scene_srs_wkt)?;

    let mut mapped: Vec<VectorFeature<MultiPolygon<f64>>> = Vec::with_capacity( layer.features.len());
    for f in &layer.features {
        mapped.push( VectorFeature::with_attributes( map_geo_multi_polygon( mapper.as_ref(), &f.geometry)?, f.attributes.clone()));
    }

    Ok( select_footprints( &mapped, &config.confidence_field, config.min_confidence, &config.date_field) )
}

/// run the classification for the configured files and write the (flag,date) raster with overviews
pub fn run_dnbr (config: &DnbrConfig) -> Result<DnbrReport> {
    if config.scenes.is_empty() { return Err( no_scenes("no scenes configured")) }
    let paths: Vec<&PathBuf> = config.scenes.iter().map( |s| &s.path).collect();
    check_input_files( &paths)?;
    check_input_files( &[&config.footprints])?;

    let scenes = read_scenes( &config.scenes)?;
    let srs_wkt = scenes.first().and_then( |s| s.raster.srs_wkt.clone());

    let footprints = read_footprints( config, srs_wkt.as_deref())?;
    info!("{} scenes, {} footprints", scenes.len(), footprints.len());

    let (burn, n_skipped) = classify_footprints( &scenes, &footprints, config)?;
    if n_skipped > 0 { warn!("{} of {} footprints could not be classified", n_skipped, footprints.len()) }

    let mut ds = write_raster_stack( &burn, &config.output, &config.tiff)?;
    build_overviews( &mut ds, &config.overview_factors, &config.overview_resampling)?;
    drop(ds);

    let burned = burned_area( &burn, FLAG_BAND, 1.0)?;
    info!("{:?}: {} burned pixels, {:.2} ha", config.output, burned.pixels, burned.area_ha);

    Ok( DnbrReport {
        output: config.output.clone(),
        width: burn.width(),
        height: burn.height(),
        n_footprints: footprints.len(),
        n_skipped,
        burned
    })
}

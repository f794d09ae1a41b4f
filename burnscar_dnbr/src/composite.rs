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

//! cloud masking, per-pixel median composites and normalized burn ratios of reflectance scenes

use chrono::NaiveDate;
use ndarray::{Array2, Zip};
use serde::{Deserialize,Serialize};
use tracing::debug;

use burnscar_gdal::RasterStack;
use crate::errors::{Result, band_error, no_scenes};

/// QA bit for opaque clouds
pub const OPAQUE_CLOUD_BIT: u32 = 10;
/// QA bit for cirrus
pub const CIRRUS_BIT: u32 = 11;

const CLOUD_MASK: u32 = (1 << OPAQUE_CLOUD_BIT) | (1 << CIRRUS_BIT);

/// 1-based band numbers of the scene rasters
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct SceneBands {
    pub nir: usize,
    pub swir: usize,
    pub qa: usize,
}

impl Default for SceneBands {
    fn default () -> Self { SceneBands { nir: 1, swir: 2, qa: 3 } }
}

/// a reflectance scene and its acquisition date
#[derive(Debug,Clone)]
pub struct Scene {
    pub date: NaiveDate,
    pub raster: RasterStack<f64>,
}

/// day offsets `[start,end)` relative to a fire detection date
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct DayWindow {
    pub start: i64,
    pub end: i64,
}

impl DayWindow {
    pub fn new (start: i64, end: i64) -> Self { DayWindow { start, end } }

    pub fn contains (&self, acq_date: NaiveDate, date: NaiveDate) -> bool {
        let offset = (date - acq_date).num_days();
        offset >= self.start && offset < self.end
    }
}

/// the scene rasters acquired within `window` around `acq_date`
pub fn scenes_in_window<'a> (scenes: &'a [Scene], acq_date: NaiveDate, window: &DayWindow) -> Vec<&'a RasterStack<f64>> {
    scenes.iter().filter( |s| window.contains( acq_date, s.date)).map( |s| &s.raster).collect()
}

/// 0-based index and array of a 1-based scene band
fn scene_band<'a> (scene: &'a RasterStack<f64>, band: usize, what: &str) -> Result<(usize, &'a Array2<f64>)> {
    let idx = band.checked_sub(1).ok_or_else( || band_error( format!("{what} band numbers start at 1")))?;
    let arr = scene.bands.get(idx).ok_or_else( || band_error( format!("no {what} band {band} in scene with {} bands", scene.n_bands())))?;
    Ok( (idx, arr) )
}

/// true if the QA value flags opaque clouds or cirrus. Missing QA values count as clouded
pub fn is_cloudy (qa: f64) -> bool {
    if !qa.is_finite() || qa < 0.0 { return true }
    (qa as u32) & CLOUD_MASK != 0
}

/// scaled (nir,swir) reflectance arrays of one scene. Clouded and no-data pixels are NaN. NIR and SWIR are
/// checked against their own no-data values, QA values of 0 are clear sky whatever the QA band declares
pub fn masked_reflectance (scene: &RasterStack<f64>, bands: &SceneBands, scale: f64) -> Result<(Array2<f64>,Array2<f64>)> {
    let (nir_idx, nir) = scene_band( scene, bands.nir, "NIR")?;
    let (swir_idx, swir) = scene_band( scene, bands.swir, "SWIR")?;
    let (_, qa) = scene_band( scene, bands.qa, "QA")?;

    let mut out_nir = Array2::from_elem( nir.dim(), f64::NAN);
    let mut out_swir = Array2::from_elem( nir.dim(), f64::NAN);

    Zip::from( &mut out_nir).and( &mut out_swir).and( nir).and( swir).and( qa).for_each( |on, os, &n, &s, &q| {
        let valid = n.is_finite() && s.is_finite() && !scene.is_band_no_data( nir_idx, n) && !scene.is_band_no_data( swir_idx, s);
        if valid && !is_cloudy(q) {
            *on = n / scale;
            *os = s / scale;
        }
    });

    Ok( (out_nir, out_swir) )
}

/// median of the finite values, NaN if there are none. Even counts use the mean of the two middle values
pub fn median (values: &mut Vec<f64>) -> f64 {
    values.retain( |v| v.is_finite());
    if values.is_empty() { return f64::NAN }

    values.sort_by( |a,b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 { (values[mid-1] + values[mid]) / 2.0 } else { values[mid] }
}

/// per-pixel median over all layers, ignoring NaN
pub fn median_of (layers: &[Array2<f64>]) -> Option<Array2<f64>> {
    let dim = layers.first()?.dim();
    let mut values = Vec::with_capacity( layers.len());

    Some( Array2::from_shape_fn( dim, |idx| {
        values.clear();
        values.extend( layers.iter().map( |l| l[idx]));
        median( &mut values)
    }))
}

/// median NIR and SWIR reflectance of a set of scenes
#[derive(Debug,Clone)]
pub struct Composite {
    pub nir: Array2<f64>,
    pub swir: Array2<f64>,
}

impl Composite {
    pub fn nbr (&self) -> Array2<f64> { nbr( &self.nir, &self.swir) }
}

/// cloud masked median composite of `scenes`, which all have to be on the grid of `reference`
pub fn median_composite (scenes: &[&RasterStack<f64>], reference: &RasterStack<f64>, bands: &SceneBands, scale: f64) -> Result<Composite> {
    if scenes.is_empty() { return Err( no_scenes("empty scene set")) }

    let mut nirs = Vec::with_capacity( scenes.len());
    let mut swirs = Vec::with_capacity( scenes.len());
    for &scene in scenes {
        reference.check_same_grid( scene)?;
        let (nir,swir) = masked_reflectance( scene, bands, scale)?;
        nirs.push( nir);
        swirs.push( swir);
    }
    debug!("compositing {} scenes", scenes.len());

    match (median_of( &nirs), median_of( &swirs)) {
        (Some(nir), Some(swir)) => Ok( Composite { nir, swir } ),
        _ => Err( no_scenes("empty scene set"))
    }
}

/// normalized burn ratio (NIR - SWIR) / (NIR + SWIR). NaN where undefined
pub fn nbr (nir: &Array2<f64>, swir: &Array2<f64>) -> Array2<f64> {
    Zip::from( nir).and( swir).map_collect( |&n, &s| {
        let sum = n + s;
        if sum == 0.0 { f64::NAN } else { (n - s) / sum }
    })
}

/// difference between pre- and post-fire NBR
pub fn dnbr (nbr_pre: &Array2<f64>, nbr_post: &Array2<f64>) -> Array2<f64> {
    nbr_pre - nbr_post
}

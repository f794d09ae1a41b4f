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

//! selection of confident, dated fire footprints and their rasterization into burn flag and date bands

use chrono::NaiveDate;
use ndarray::Array2;
use geo::{BoundingRect, Contains, MultiPolygon, Point};
use tracing::{debug, warn};

use burnscar_common::datetime::epoch_days;
use burnscar_gdal::{GeoTransform, GeoTransformEx, VectorFeature, errors::BurnscarGdalError};
use crate::errors::Result;

#[derive(Debug,Clone)]
pub struct DatedFootprint {
    pub geometry: MultiPolygon<f64>,
    pub date: NaiveDate,
}

/// keep footprints with a numeric `confidence_field` >= `min_confidence` and a valid `date_field`
pub fn select_footprints (features: &[VectorFeature<MultiPolygon<f64>>], confidence_field: &str, min_confidence: f64, date_field: &str) -> Vec<DatedFootprint> {
    let mut undated = 0;
    let selected: Vec<DatedFootprint> = features.iter().filter_map( |f| {
        let confidence = f.attr( confidence_field).and_then( |v| v.as_f64())?;
        if confidence < min_confidence { return None }

        match f.attr( date_field).and_then( |v| v.as_date()) {
            Some(date) => Some( DatedFootprint { geometry: f.geometry.clone(), date }),
            None => { undated += 1; None }
        }
    }).collect();

    if undated > 0 { warn!("ignored {} confident footprints without valid '{}'", undated, date_field) }
    debug!("{} of {} footprints selected", selected.len(), features.len());
    selected
}

/// day offset of `date` that fits into a u16 date band. Day 0 is reserved for no-data
pub fn date_value (date: NaiveDate, epoch: NaiveDate) -> Option<u16> {
    let days = epoch_days( epoch, date);
    if days > 0 && days <= u16::MAX as i64 { Some(days as u16) } else { None }
}

/// pixel range (c0..c1, r0..r1) that covers the given SRS rectangle
fn pixel_window (inv: &GeoTransform, x0: f64, y0: f64, x1: f64, y1: f64, width: usize, height: usize) -> (usize,usize,usize,usize) {
    let (px0,py0) = inv.apply( x0, y0);
    let (px1,py1) = inv.apply( x1, y1);
    let clamp = |v: f64, max: usize| v.max(0.0).min( max as f64) as usize;

    (clamp( px0.min(px1).floor(), width), clamp( px0.max(px1).ceil(), width),
     clamp( py0.min(py1).floor(), height), clamp( py0.max(py1).ceil(), height))
}

/// (row,col) of all cells of the `width` x `height` grid whose center lies inside `geometry`
pub fn footprint_cells (geometry: &MultiPolygon<f64>, gt: &GeoTransform, width: usize, height: usize) -> Result<Vec<(usize,usize)>> {
    let inv = gt.invert().map_err( BurnscarGdalError::from)?;
    let Some(bb) = geometry.bounding_rect() else { return Ok( Vec::new()) };

    let (c0,c1,r0,r1) = pixel_window( &inv, bb.min().x, bb.min().y, bb.max().x, bb.max().y, width, height);
    let mut cells = Vec::new();
    for row in r0..r1 {
        for col in c0..c1 {
            let (x,y) = gt.apply( col as f64 + 0.5, row as f64 + 0.5);
            if geometry.contains( &Point::new( x, y)) {
                cells.push( (row,col));
            }
        }
    }
    Ok(cells)
}

/// flag (1 = burned) and burn date bands that collect the classification of all footprints
#[derive(Debug,Clone)]
pub struct BurnBands {
    pub flag: Array2<u16>,
    pub date: Array2<u16>,
}

impl BurnBands {
    pub fn new (width: usize, height: usize) -> Self {
        BurnBands { flag: Array2::zeros( (height,width)), date: Array2::zeros( (height,width)) }
    }

    /// mark the footprint cells whose dNBR reaches `threshold` as burned on `day`. Cells that are burned by
    /// several footprints keep the latest day. Returns the number of newly burned cells
    pub fn mark_burned (&mut self, cells: &[(usize,usize)], dnbr: &Array2<f64>, threshold: f64, day: u16) -> usize {
        let mut n_new = 0;
        for &idx in cells {
            if dnbr[idx] >= threshold { // NaN never passes
                if self.flag[idx] == 0 { n_new += 1 }
                self.flag[idx] = 1;
                if self.date[idx] < day { self.date[idx] = day }
            }
        }
        n_new
    }
}

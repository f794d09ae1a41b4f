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

//! mosaic grid computation: union of input extents snapped to the pixel lattice of a reference raster

use burnscar_common::BoundingBox;
use burnscar_gdal::{GeoTransform, geotransform_from_bbox, grid_bounds};
use crate::errors::{Result, empty_mosaic, unsupported_input};

/// relative tolerance below which a lattice coordinate counts as being on a grid line
const LATTICE_EPS: f64 = 1e-9;

/// the target raster descriptor all inputs get resampled onto
#[derive(Debug,Clone,PartialEq)]
pub struct MosaicGrid {
    pub geo_transform: GeoTransform,
    pub width: usize,
    pub height: usize,
    pub srs_wkt: Option<String>,
}

impl MosaicGrid {
    pub fn bounds (&self) -> BoundingBox<f64> {
        grid_bounds( &self.geo_transform, self.width, self.height)
    }

    /// SRS coordinates of the pixel center in the given row for all columns
    pub fn row_centers (&self, row: usize) -> (Vec<f64>,Vec<f64>) {
        let gt = &self.geo_transform;
        let y = gt[3] + gt[5] * (row as f64 + 0.5);
        let xs: Vec<f64> = (0..self.width).map( |col| gt[0] + gt[1] * (col as f64 + 0.5)).collect();
        let ys = vec![y; self.width];
        (xs,ys)
    }
}

fn lattice_floor (v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < LATTICE_EPS { r } else { v.floor() }
}

fn lattice_ceil (v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < LATTICE_EPS { r } else { v.ceil() }
}

/// north-up check for the reference transform, returning the positive (x,y) resolution
pub fn reference_resolution (ref_gt: &GeoTransform) -> Result<(f64,f64)> {
    if ref_gt[2] != 0.0 || ref_gt[4] != 0.0 {
        return Err( unsupported_input( format!("rotated reference transform {:?}", ref_gt)))
    }
    let (rx, ry) = (ref_gt[1].abs(), ref_gt[5].abs());
    if rx == 0.0 || ry == 0.0 {
        return Err( unsupported_input( format!("zero resolution in reference transform {:?}", ref_gt)))
    }
    Ok( (rx,ry) )
}

/// snap the union box outwards onto the lattice defined by the reference origin and resolution.
/// The result contains `union` and its edges are integer multiples of the resolution away from the origin
pub fn snap_bounds (union: &BoundingBox<f64>, ref_gt: &GeoTransform) -> Result<BoundingBox<f64>> {
    let (rx,ry) = reference_resolution( ref_gt)?;
    let (ox,oy) = (ref_gt[0], ref_gt[3]);

    let west  = ox + lattice_floor( (union.west - ox) / rx) * rx;
    let east  = ox + lattice_ceil( (union.east - ox) / rx) * rx;
    let south = oy + lattice_floor( (union.south - oy) / ry) * ry;
    let north = oy + lattice_ceil( (union.north - oy) / ry) * ry;

    Ok( BoundingBox::new( west, south, east, north) )
}

/// compute the mosaic grid for the (reference SRS) union of all inputs
pub fn compute_grid (union: &BoundingBox<f64>, ref_gt: &GeoTransform, srs_wkt: Option<String>) -> Result<MosaicGrid> {
    let (rx,ry) = reference_resolution( ref_gt)?;
    let snapped = snap_bounds( union, ref_gt)?;

    let width = ((snapped.east - snapped.west) / rx).round();
    let height = ((snapped.north - snapped.south) / ry).round();
    if width < 1.0 || height < 1.0 {
        return Err( empty_mosaic( format!("snapped union {:?} yields a {}x{} grid", snapped, width, height)))
    }

    let geo_transform = geotransform_from_bbox( &snapped, rx, ry);
    Ok( MosaicGrid { geo_transform, width: width as usize, height: height as usize, srs_wkt } )
}

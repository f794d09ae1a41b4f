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

//! in-memory multi-band rasters and their GeoTIFF persistence

use std::path::Path;
use ndarray::Array2;
use num::ToPrimitive;
use tracing::{debug, info};
use gdal::{Dataset, GeoTransform, GeoTransformEx, Metadata};
use gdal::raster::{Buffer, GdalType, RasterCreationOptions};
use serde::{Deserialize, Serialize};

use burnscar_common::{BoundingBox, fs::ensure_parent_dir};
use crate::{get_driver_for_path, to_csl_string_list};
use crate::errors::{Result, BurnscarGdalError, misc_error, grid_mismatch};

/// metadata domain rasterio uses to record how overviews were computed
pub const OVERVIEW_METADATA_DOMAIN: &str = "rio_overview";

/* #region RasterStack ********************************************************************************************/

/// a set of equally sized bands that share one geo transform and SRS. `no_data` applies to all bands unless
/// `band_no_data` holds a per-band value (as read from files whose bands declare different no-data values).
/// Band arrays are indexed `[row,col]`, row 0 being the top row of the raster
#[derive(Debug,Clone)]
pub struct RasterStack<T> {
    pub geo_transform: GeoTransform,
    pub srs_wkt: Option<String>,
    pub no_data: Option<f64>,
    pub band_no_data: Vec<Option<f64>>,
    pub bands: Vec<Array2<T>>
}

impl <T> RasterStack<T> where T: Copy + ToPrimitive {

    /// create a stack of `n_bands` bands with `width` x `height` cells that are all set to `fill`
    pub fn new (geo_transform: GeoTransform, srs_wkt: Option<String>, no_data: Option<f64>,
                width: usize, height: usize, n_bands: usize, fill: T) -> Self {
        let bands = (0..n_bands).map( |_| Array2::from_elem( (height,width), fill)).collect();
        RasterStack { geo_transform, srs_wkt, no_data, band_no_data: Vec::new(), bands }
    }

    /// create a stack from existing band arrays, which all have to be of the same dimension
    pub fn from_bands (geo_transform: GeoTransform, srs_wkt: Option<String>, no_data: Option<f64>, bands: Vec<Array2<T>>) -> Result<Self> {
        if let Some(first) = bands.first() {
            let dim = first.dim();
            if bands.iter().any( |b| b.dim() != dim) {
                return Err( grid_mismatch("bands of different dimensions"))
            }
        }
        Ok( RasterStack { geo_transform, srs_wkt, no_data, band_no_data: Vec::new(), bands } )
    }

    /// set per-band no-data values, one for each band
    pub fn with_band_no_data (mut self, band_no_data: Vec<Option<f64>>) -> Result<Self> {
        if band_no_data.len() != self.bands.len() {
            return Err( misc_error( format!("{} no-data values for {} bands", band_no_data.len(), self.bands.len())))
        }
        self.band_no_data = band_no_data;
        Ok(self)
    }

    pub fn n_bands (&self) -> usize { self.bands.len() }

    pub fn width (&self) -> usize { self.bands.first().map( |b| b.ncols()).unwrap_or(0) }

    pub fn height (&self) -> usize { self.bands.first().map( |b| b.nrows()).unwrap_or(0) }

    /// 0-based band access
    pub fn band (&self, idx: usize) -> Result<&Array2<T>> {
        self.bands.get(idx).ok_or_else( || misc_error( format!("no band {} in raster with {} bands", idx+1, self.bands.len())))
    }

    /// (x_resolution, y_resolution) as stored in the transform (y is negative for north-up rasters)
    pub fn resolution (&self) -> (f64,f64) { (self.geo_transform[1], self.geo_transform[5]) }

    /// area of one pixel in SRS units, using both scale factors of the transform
    pub fn pixel_area (&self) -> f64 { pixel_area( &self.geo_transform) }

    pub fn bounds (&self) -> BoundingBox<f64> {
        grid_bounds( &self.geo_transform, self.width(), self.height())
    }

    /// SRS coordinates of the center of the given pixel
    pub fn pixel_center (&self, col: usize, row: usize) -> (f64,f64) {
        self.geo_transform.apply( col as f64 + 0.5, row as f64 + 0.5)
    }

    /// the (col,row) of the pixel that contains the given SRS coordinates, `None` if outside
    pub fn pixel_at (&self, x: f64, y: f64) -> Option<(usize,usize)> {
        let inv = self.inverse_transform().ok()?;
        self.pixel_index( &inv, x, y)
    }

    /// SRS -> pixel transform. Use with [`Self::pixel_index`] to locate many positions
    pub fn inverse_transform (&self) -> Result<GeoTransform> {
        Ok( self.geo_transform.invert()? )
    }

    pub fn pixel_index (&self, inv: &GeoTransform, x: f64, y: f64) -> Option<(usize,usize)> {
        let (px,py) = inv.apply( x, y);
        let (col,row) = (px.floor(), py.floor());

        if col >= 0.0 && row >= 0.0 && (col as usize) < self.width() && (row as usize) < self.height() {
            Some( (col as usize, row as usize) )
        } else {
            None
        }
    }

    /// no-data value of 0-based band `idx`
    pub fn no_data_of (&self, idx: usize) -> Option<f64> {
        self.band_no_data.get(idx).copied().unwrap_or( self.no_data)
    }

    /// check against the stack wide no-data value
    pub fn is_no_data (&self, v: T) -> bool {
        matches_no_data( self.no_data, v)
    }

    pub fn is_band_no_data (&self, idx: usize, v: T) -> bool {
        matches_no_data( self.no_data_of(idx), v)
    }

    /// value of 0-based band `idx` at the given SRS position. `None` for positions outside the raster
    /// or no-data cells
    pub fn value_at (&self, idx: usize, x: f64, y: f64) -> Option<T> {
        let (col,row) = self.pixel_at( x, y)?;
        let v = self.bands.get(idx)?[[row,col]];
        if self.is_band_no_data( idx, v) { None } else { Some(v) }
    }

    /// check that `other` has the same dimensions and transform
    pub fn check_same_grid<U> (&self, other: &RasterStack<U>) -> Result<()> where U: Copy + ToPrimitive {
        if self.width() != other.width() || self.height() != other.height() {
            return Err( grid_mismatch( format!("{}x{} vs {}x{}", self.width(), self.height(), other.width(), other.height())))
        }
        if self.geo_transform != other.geo_transform {
            return Err( grid_mismatch( format!("{:?} vs {:?}", self.geo_transform, other.geo_transform)))
        }
        Ok(())
    }
}

fn matches_no_data<T: ToPrimitive> (no_data: Option<f64>, v: T) -> bool {
    match (no_data, v.to_f64()) {
        (Some(nd), Some(v)) => v == nd,
        _ => false
    }
}

pub fn pixel_area (gt: &GeoTransform) -> f64 {
    (gt[1] * gt[5]).abs()
}

/// bounds of a non-rotated grid with the given transform and size
pub fn grid_bounds (gt: &GeoTransform, width: usize, height: usize) -> BoundingBox<f64> {
    let x0 = gt[0];
    let x1 = gt[0] + gt[1] * width as f64;
    let y0 = gt[3];
    let y1 = gt[3] + gt[5] * height as f64;
    BoundingBox::new( x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}

/* #endregion RasterStack */

/* #region reading ************************************************************************************************/

/// read all bands of the dataset as type T (GDAL converts the band type if required)
pub fn read_raster_stack<T> (ds: &Dataset) -> Result<RasterStack<T>> where T: GdalType + Copy + ToPrimitive {
    let band_indices: Vec<usize> = (1..=ds.raster_count()).collect();
    read_raster_bands( ds, &band_indices)
}

/// read the given 1-based bands of the dataset as type T. Each band keeps its own no-data value, the stack
/// wide one is taken from the first band
pub fn read_raster_bands<T> (ds: &Dataset, band_indices: &[usize]) -> Result<RasterStack<T>> where T: GdalType + Copy + ToPrimitive {
    if band_indices.is_empty() { return Err( misc_error("no bands to read")) }

    let geo_transform = ds.geo_transform()?;
    let srs_wkt = ds.spatial_ref().ok().and_then( |srs| srs.to_wkt().ok());

    let mut bands = Vec::with_capacity( band_indices.len());
    let mut band_no_data = Vec::with_capacity( band_indices.len());
    for idx in band_indices {
        band_no_data.push( ds.rasterband( *idx)?.no_data_value());
        bands.push( read_band::<T>( ds, *idx)?);
    }

    RasterStack::from_bands( geo_transform, srs_wkt, band_no_data[0], bands)?.with_band_no_data( band_no_data)
}

pub fn read_band<T> (ds: &Dataset, band_index: usize) -> Result<Array2<T>> where T: GdalType + Copy {
    let band = ds.rasterband( band_index)?;
    let (w,h) = band.size();
    let buf: Buffer<T> = band.read_as( (0,0), (w,h), (w,h), None)?;
    Ok( Array2::from_shape_vec( (h,w), buf.data().to_vec())? )
}

pub fn open_raster_stack<T,P> (path: P) -> Result<RasterStack<T>> where T: GdalType + Copy + ToPrimitive, P: AsRef<Path> {
    let path = path.as_ref();
    let ds = Dataset::open( path)?;
    let stack = read_raster_stack::<T>( &ds)?;
    debug!("read {:?}: {} bands of {}x{}", path, stack.n_bands(), stack.width(), stack.height());
    Ok(stack)
}

/* #endregion reading */

/* #region writing ************************************************************************************************/

/// GeoTIFF creation settings
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct TiffOptions {
    pub tile_size: usize,
    pub compression: String,
    pub predictor: u32,
    pub bigtiff: String,
}

impl Default for TiffOptions {
    fn default () -> Self {
        TiffOptions {
            tile_size: 512,
            compression: "LZW".to_string(),
            predictor: 2,
            bigtiff: "IF_SAFER".to_string(),
        }
    }
}

impl TiffOptions {
    pub fn to_option_strings (&self) -> Vec<String> {
        let mut opts = vec![
            "TILED=YES".to_string(),
            format!("BLOCKXSIZE={}", self.tile_size),
            format!("BLOCKYSIZE={}", self.tile_size),
            format!("COMPRESS={}", self.compression),
            format!("BIGTIFF={}", self.bigtiff),
        ];
        if self.predictor > 1 { // 1 means no predictor
            opts.push( format!("PREDICTOR={}", self.predictor));
        }
        opts
    }

    pub fn to_creation_options (&self) -> Result<RasterCreationOptions> {
        Ok( to_csl_string_list( &self.to_option_strings())?.unwrap_or_else( RasterCreationOptions::new) )
    }
}

/// write the stack to a new file, using the driver that corresponds to the path extension.
/// Returns the (still open) dataset so that callers can add overviews or metadata
pub fn write_raster_stack<T,P> (stack: &RasterStack<T>, path: P, opts: &TiffOptions) -> Result<Dataset>
    where T: GdalType + Copy + ToPrimitive, P: AsRef<Path>
{
    let path = path.as_ref();
    if stack.n_bands() == 0 { return Err( misc_error("no bands to write")) }
    ensure_parent_dir( path)?;

    let driver = get_driver_for_path( path)?;
    let co = opts.to_creation_options()?;
    let (w,h) = (stack.width(), stack.height());
    let mut ds = driver.create_with_band_type_with_options::<T,_>( path, w, h, stack.n_bands(), &co)?;

    ds.set_geo_transform( &stack.geo_transform)?;
    if let Some(wkt) = &stack.srs_wkt {
        ds.set_projection( wkt)?;
    }

    for (i,arr) in stack.bands.iter().enumerate() {
        let mut band = ds.rasterband( i+1)?;
        let mut buf = Buffer::new( (w,h), arr.iter().copied().collect::<Vec<T>>());
        band.write( (0,0), (w,h), &mut buf)?;
        if let Some(nd) = stack.no_data_of(i) {
            band.set_no_data_value( Some(nd))?;
        }
    }

    info!("wrote {:?} ({} bands of {}x{})", path, stack.n_bands(), w, h);
    Ok(ds)
}

/// build internal overviews for all bands and record the resampling method in the rasterio overview domain
pub fn build_overviews (ds: &mut Dataset, factors: &[i32], resampling: &str) -> Result<()> {
    if factors.is_empty() { return Ok(()) }

    ds.build_overviews( &resampling.to_uppercase(), factors, &[])?;
    ds.set_metadata_item( "resampling", &resampling.to_lowercase(), OVERVIEW_METADATA_DOMAIN)?;
    debug!("built overviews {:?} with {} resampling", factors, resampling);
    Ok(())
}

/* #endregion writing */

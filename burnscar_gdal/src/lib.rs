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

//! thin layer over the `gdal` crate that provides everything the burnscar jobs need to get rasters and vector
//! features in and out of GDAL supported files. The jobs themselves only work on the in-memory types of this
//! crate ([`RasterStack`], [`VectorFeature`]) so that their algorithms can be tested without files

pub mod errors;
pub mod transform;
pub mod raster;
pub mod vector;

use lazy_static::lazy_static;
use std::{collections::HashMap, path::Path, sync::Mutex};

// we re-export these so that other crates don't have to use a direct gdal depedency to import
pub use gdal::{self, Driver, DriverManager, Metadata, MetadataEntry, Dataset, errors::GdalError, GeoTransform, GeoTransformEx, cpl::CslStringList};
pub use gdal::raster::{GdalType,GdalDataType,RasterBand,Buffer,RasterCreationOptions};
pub use gdal::spatial_ref::{CoordTransform, CoordTransformOptions, SpatialRef};

use burnscar_common::{BoundingBox, fs::get_filename_extension};
use crate::errors::{Result, misc_error, BurnscarGdalError};

pub use raster::*;
pub use vector::*;
pub use transform::*;

lazy_static! {
    // note that we can't automatically populate this by iterating over DriverManager since some
    // drivers use the same file extension
    static ref EXT_MAP: HashMap<&'static str, &'static str> = HashMap::from( [ // file extension -> driver short name
        //-- raster drivers
        ("tif", "GTiff"),
        ("tiff", "GTiff"),
        ("vrt", "VRT"),
        ("img", "HFA"),

        //--- vector drivers
        ("json", "GeoJSON"),
        ("geojson", "GeoJSON"),
        ("gpkg", "GPKG"),
        ("csv", "CSV"),
        ("kml", "KML"),
        ("shp", "ESRI Shapefile"),
    ]);
}

/// use this to protect non-threadsafe GDAL error handler manipulation
static GLOB_GDAL_MUTEX: Mutex<usize> = Mutex::new(0);

/// Note that filename extension is lowercased before lookup
pub fn get_driver_name_from_filename (filename: &str) -> Option<&'static str> {
    get_filename_extension(filename)
        .map( |ext| ext.to_lowercase())
        .and_then( |ext| EXT_MAP.get( ext.as_str()).copied())
}

pub fn get_driver_name_for_path (path: &Path) -> Result<&'static str> {
    let fname = path.to_string_lossy();
    get_driver_name_from_filename( &fname)
        .ok_or_else( || BurnscarGdalError::UnsupportedFileType( fname.to_string()))
}

pub fn get_driver_for_path (path: &Path) -> Result<Driver> {
    let driver_name = get_driver_name_for_path( path)?;
    Ok( DriverManager::get_driver_by_name( driver_name)? )
}

/// run the provided closure with the global GDAL error handler disabled. Note this does not
/// change the return value but prevents GDAL from printing errors and warnings to the console
pub fn run_quiet<T,F> (f: F)->Result<T> where F: FnOnce()->Result<T> {
    let lock = GLOB_GDAL_MUTEX.lock().map_err( |_| misc_error("GDAL mutex poisoned"))?;
    unsafe { gdal_sys::CPLPushErrorHandler( Some(gdal_sys::CPLQuietErrorHandler)); }
    let result = f();
    unsafe { gdal_sys::CPLPopErrorHandler(); }
    result
}

pub fn to_csl_string_list (strings: &[String]) -> Result<Option<CslStringList>> {
    if ! strings.is_empty() { // don't allocate if there is nothing to convert
        let mut co_list =  CslStringList::new();
        for s in strings {
            co_list.add_string(s.as_str())?;
        }
        Ok(Some(co_list))
    } else {
        Ok(None)
    }
}

pub fn new_geotransform (x_upper_left: f64, x_resolution: f64, row_rotation: f64,
                         y_upper_left: f64, col_rotation: f64, y_resolution: f64) -> GeoTransform {
    [x_upper_left,x_resolution,row_rotation,y_upper_left,col_rotation,y_resolution]
}

/// north-up transform for a bbox with positive resolutions (y resolution is negated)
pub fn geotransform_from_bbox (bbox: &BoundingBox<f64>, x_resolution: f64, y_resolution: f64) -> GeoTransform {
    new_geotransform(bbox.west, x_resolution, 0.0,
                     bbox.north, 0.0, -y_resolution.abs())
}

#[derive(Debug)]
pub struct RasterInfo {
    pub cols: usize,
    pub left: f64,
    pub right: f64,
    pub dx: f64,

    pub rows: usize,
    pub top: f64,
    pub bottom: f64,
    pub dy: f64,

    pub n_bands: usize,
    pub srs: Option<String>
}

impl RasterInfo {
    pub fn bounds (&self)->BoundingBox<f64> {
        BoundingBox::new( self.left.min(self.right), self.bottom.min(self.top), self.left.max(self.right), self.bottom.max(self.top))
    }
}

pub fn get_raster_info (ds: &Dataset)->Result<RasterInfo> {
    let (cols,rows) = ds.raster_size();
    let a = ds.geo_transform()?;

    let left = a[0];
    let dx = a[1];
    let right = left + (dx * cols as f64);

    let top = a[3];
    let dy = a[5];
    let bottom = top + (dy * rows as f64);

    let n_bands = ds.raster_count();
    let srs = run_quiet( || Ok( ds.spatial_ref().ok().and_then( |srs| srs.to_wkt().ok()) ))?;

    Ok( RasterInfo { cols, left, right, dx, rows, top, bottom, dy, n_bands, srs } )
}

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

//! convert FIRMS active fire detections into AOI filtered points and sensor sized footprint polygons
//! that are clipped to the AOI

pub mod errors;
pub mod record;
pub mod footprint;

use std::path::PathBuf;
use geo::{MultiPolygon, Point};
use serde::{Deserialize,Serialize};
use tracing::{info, warn};

use burnscar_common::fs::check_input_files;
use burnscar_gdal::{
    CoordMapper, IdentityMapper, SrsTransform, VectorFeature,
    map_geo_multi_polygon, map_geo_point, read_polygon_layer, srs_epsg, srs_from_wkt, write_features
};
use crate::errors::Result;
use crate::record::{read_firms_csv, to_point_features};
use crate::footprint::{aoi_union, clip_footprints, filter_within};

pub use burnscar_common::config::load_config;

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct FirmsConfig {
    pub input_csv: PathBuf,
    pub aoi: PathBuf,
    pub output_points: PathBuf,
    pub output_squares: PathBuf,

    /// categorical confidence code -> numeric confidence
    pub confidence_codes: Vec<(String,i32)>,
    /// instrument -> footprint side length in projected SRS units
    pub instrument_sizes: Vec<(String,f64)>,
    /// footprint side length for instruments not in `instrument_sizes`
    pub default_size: f64,

    pub geographic_epsg: u32,
    pub projected_epsg: u32,

    pub min_confidence: Option<i32>,
}

impl Default for FirmsConfig {
    fn default () -> Self {
        FirmsConfig {
            input_csv: PathBuf::from("FIRMS.csv"),
            aoi: PathBuf::from("aoi.shp"),
            output_points: PathBuf::from("puntos_FIRMS.shp"),
            output_squares: PathBuf::from("cuadrados_FIRMS.shp"),
            confidence_codes: vec![ ("h".into(), 80), ("n".into(), 55), ("l".into(), 30) ],
            instrument_sizes: vec![ ("MODIS".into(), 1000.0), ("VIIRS".into(), 375.0) ],
            default_size: 375.0,
            geographic_epsg: 4326,
            projected_epsg: 32718, // UTM 18S
            min_confidence: None,
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct FirmsReport {
    pub n_records: usize,
    pub n_points: usize,
    pub n_footprints: usize,
}

fn map_points (mapper: &dyn CoordMapper, points: &[VectorFeature<Point<f64>>]) -> Result<Vec<VectorFeature<Point<f64>>>> {
    let mut mapped = Vec::with_capacity( points.len());
    for f in points {
        mapped.push( VectorFeature::with_attributes( map_geo_point( mapper, &f.geometry)?, f.attributes.clone()));
    }
    Ok(mapped)
}

fn map_polygons (mapper: &dyn CoordMapper, polys: &[VectorFeature<MultiPolygon<f64>>]) -> Result<Vec<VectorFeature<MultiPolygon<f64>>>> {
    let mut mapped = Vec::with_capacity( polys.len());
    for f in polys {
        mapped.push( VectorFeature::with_attributes( map_geo_multi_polygon( mapper, &f.geometry)?, f.attributes.clone()));
    }
    Ok(mapped)
}

/// mapper from the (optional) AOI SRS into the target SRS. AOIs without SRS are assumed to be in the target SRS
fn aoi_mapper (aoi_srs_wkt: Option<&str>, t_srs: &burnscar_gdal::SpatialRef) -> Result<Box<dyn CoordMapper>> {
    match aoi_srs_wkt {
        Some(wkt) => {
            let s_srs = srs_from_wkt( wkt)?;
            if s_srs == *t_srs { Ok( Box::new( IdentityMapper)) } else { Ok( Box::new( SrsTransform::new( &s_srs, t_srs)?)) }
        }
        None => {
            warn!("AOI has no SRS, assuming it matches target");
            Ok( Box::new( IdentityMapper))
        }
    }
}

/// run the FIRMS conversion: filter detections by AOI, write points, build and clip footprints, write footprints.
/// The first I/O or SRS error aborts the job
pub fn run_firms (config: &FirmsConfig) -> Result<FirmsReport> {
    check_input_files( &[&config.input_csv, &config.aoi])?;

    let geo_srs = srs_epsg( config.geographic_epsg)?;
    let utm_srs = srs_epsg( config.projected_epsg)?;

    //--- part 1: points within AOI
    let records = read_firms_csv( &config.input_csv)?;
    let points = to_point_features( &records, &config.confidence_codes, config.min_confidence)?;

    let aoi = read_polygon_layer( &config.aoi)?;
    let aoi_geo = map_polygons( aoi_mapper( aoi.srs_wkt.as_deref(), &geo_srs)?.as_ref(), &aoi.features)?;
    let region = aoi_union( &aoi_geo);

    let points = filter_within( points, &region);
    info!("{} of {} detections inside AOI", points.len(), records.len());
    write_features( &config.output_points, Some(&geo_srs), &points)?;

    //--- part 2: projected footprints clipped to AOI features
    let to_utm = SrsTransform::new( &geo_srs, &utm_srs)?;
    let points_utm = map_points( &to_utm, &points)?;
    let aoi_utm = map_polygons( aoi_mapper( aoi.srs_wkt.as_deref(), &utm_srs)?.as_ref(), &aoi.features)?;

    let footprints = clip_footprints( &points_utm, &aoi_utm, &config.instrument_sizes, config.default_size);
    info!("{} clipped footprints", footprints.len());
    write_features( &config.output_squares, Some(&utm_srs), &footprints)?;

    Ok( FirmsReport { n_records: records.len(), n_points: points.len(), n_footprints: footprints.len() } )
}

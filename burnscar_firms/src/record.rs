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

//! FIRMS active fire CSV records

use std::path::Path;
use chrono::NaiveDate;
use csv::Reader;
use geo::Point;
use serde::{Deserialize,Serialize};
use tracing::debug;

use burnscar_gdal::{AttrValue, VectorFeature};
use crate::errors::{Result, data_error};

/// one row of a FIRMS MODIS or VIIRS archive/NRT CSV file. Columns we don't use are ignored
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct FirmsRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// categorical (h,n,l) for VIIRS, percentage for MODIS
    pub confidence: String,
    pub instrument: String,

    #[serde(default)] pub acq_date: Option<NaiveDate>,
    #[serde(default)] pub acq_time: Option<String>, // hhmm, keep leading zeros
    #[serde(default)] pub satellite: Option<String>,
    #[serde(default, alias="bright_ti4")] pub brightness: Option<f64>,
    #[serde(default)] pub frp: Option<f64>,
    #[serde(default)] pub daynight: Option<String>,
}

pub fn read_firms_csv<P: AsRef<Path>> (path: P) -> Result<Vec<FirmsRecord>> {
    let path = path.as_ref();
    let mut rdr = Reader::from_path( path)?;
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: FirmsRecord = result?;
        records.push( record);
    }
    debug!("read {} FIRMS records from {:?}", records.len(), path);
    Ok(records)
}

/// map a confidence code to its numeric value. Codes found in `codes` are mapped, numeric codes are kept,
/// anything else is a data error
pub fn parse_confidence (code: &str, codes: &[(String,i32)]) -> Result<i32> {
    let code = code.trim();
    if let Some((_,v)) = codes.iter().find( |(c,_)| c == code) {
        return Ok(*v)
    }
    if let Ok(v) = code.parse::<i32>() {
        return Ok(v)
    }
    match code.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok( v.round() as i32 ),
        _ => Err( data_error( format!("unknown confidence code '{code}'")))
    }
}

fn opt_text (s: &Option<String>) -> AttrValue {
    s.as_ref().map_or( AttrValue::Null, |s| AttrValue::Text(s.clone()))
}

fn opt_real (v: Option<f64>) -> AttrValue {
    v.map_or( AttrValue::Null, AttrValue::Real)
}

impl FirmsRecord {
    /// geographic point feature with the numeric confidence and all known record attributes
    pub fn to_feature (&self, confidence: i32) -> VectorFeature<Point<f64>> {
        let attributes = vec![
            ("latitude".to_string(), AttrValue::Real(self.latitude)),
            ("longitude".to_string(), AttrValue::Real(self.longitude)),
            ("confidence".to_string(), AttrValue::Int(confidence as i64)),
            ("instrument".to_string(), AttrValue::Text(self.instrument.clone())),
            ("acq_date".to_string(), self.acq_date.map_or( AttrValue::Null, AttrValue::Date)),
            ("acq_time".to_string(), opt_text( &self.acq_time)),
            ("satellite".to_string(), opt_text( &self.satellite)),
            ("brightness".to_string(), opt_real( self.brightness)),
            ("frp".to_string(), opt_real( self.frp)),
            ("daynight".to_string(), opt_text( &self.daynight)),
        ];
        VectorFeature::with_attributes( Point::new( self.longitude, self.latitude), attributes)
    }
}

/// convert records into point features, failing on the first unknown confidence code.
/// Records below `min_confidence` (if set) are dropped
pub fn to_point_features (records: &[FirmsRecord], codes: &[(String,i32)], min_confidence: Option<i32>) -> Result<Vec<VectorFeature<Point<f64>>>> {
    let mut features = Vec::with_capacity( records.len());
    for r in records {
        let confidence = parse_confidence( &r.confidence, codes)?;
        if min_confidence.map_or( true, |min| confidence >= min) {
            features.push( r.to_feature( confidence));
        }
    }
    Ok(features)
}

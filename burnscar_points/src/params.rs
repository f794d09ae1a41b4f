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

//! named host parameters of the burn point job

use std::collections::HashMap;
use std::path::PathBuf;
use crate::errors::{Result, parameter_error};

pub const PARAM_MIN_DISTANCE: &str = "distancia_minima";
pub const PARAM_NUM_POINTS: &str = "numero_de_puntos";
pub const PARAM_RASTER: &str = "raster";
pub const PARAM_OUTPUT: &str = "Quema";

#[derive(Debug,Clone,PartialEq)]
pub enum ParamValue {
    Double(f64),
    Integer(i64),
    Path(PathBuf),
}

pub type Parameters = HashMap<String,ParamValue>;

/// typed view of the job parameters
#[derive(Debug,Clone,PartialEq)]
pub struct BurnPointParams {
    pub min_distance: f64,
    pub num_points: usize,
    pub raster: PathBuf,
    pub output: PathBuf,
}

fn get<'a> (params: &'a Parameters, name: &str) -> Result<&'a ParamValue> {
    params.get( name).ok_or_else( || parameter_error( format!("missing parameter '{name}'")))
}

impl BurnPointParams {
    pub fn from_parameters (params: &Parameters) -> Result<Self> {
        let min_distance = match get( params, PARAM_MIN_DISTANCE)? {
            ParamValue::Double(v) => *v,
            ParamValue::Integer(v) => *v as f64,
            other => return Err( parameter_error( format!("'{PARAM_MIN_DISTANCE}' is not a number: {other:?}")))
        };
        if !(min_distance >= 0.0) { return Err( parameter_error( format!("'{PARAM_MIN_DISTANCE}' must be >= 0"))) }

        let num_points = match get( params, PARAM_NUM_POINTS)? {
            ParamValue::Integer(v) if *v >= 0 => *v as usize,
            other => return Err( parameter_error( format!("'{PARAM_NUM_POINTS}' is not a non-negative integer: {other:?}")))
        };

        let raster = match get( params, PARAM_RASTER)? {
            ParamValue::Path(p) => p.clone(),
            other => return Err( parameter_error( format!("'{PARAM_RASTER}' is not a path: {other:?}")))
        };

        let output = match get( params, PARAM_OUTPUT)? {
            ParamValue::Path(p) => p.clone(),
            other => return Err( parameter_error( format!("'{PARAM_OUTPUT}' is not a path: {other:?}")))
        };

        Ok( BurnPointParams { min_distance, num_points, raster, output } )
    }

    pub fn to_parameters (&self) -> Parameters {
        HashMap::from([
            (PARAM_MIN_DISTANCE.to_string(), ParamValue::Double( self.min_distance)),
            (PARAM_NUM_POINTS.to_string(), ParamValue::Integer( self.num_points as i64)),
            (PARAM_RASTER.to_string(), ParamValue::Path( self.raster.clone())),
            (PARAM_OUTPUT.to_string(), ParamValue::Path( self.output.clone())),
        ])
    }
}

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

//! generate random sample points inside the burned regions of a classified raster and attach the raster
//! values (and the burn date derived from them) at each point location.
//!
//! The job runs as a sequence of stages. After each stage the [`ProcessingFeedback`] host gets the current
//! step and can cancel the job, in which case we return an empty result (which is not an error)

pub mod errors;
pub mod feedback;
pub mod params;
pub mod polygonize;
pub mod sampling;

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::path::PathBuf;
use chrono::NaiveDate;
use geo::{MultiPolygon, Point};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize,Serialize};
use tracing::{debug, info, warn};

use burnscar_common::datetime::unix_epoch_date;
use burnscar_gdal::{AttrValue, RasterStack, VectorFeature, open_raster_stack, srs_from_wkt, write_features};

use crate::errors::Result;
use crate::feedback::ProcessingFeedback;
use crate::params::{BurnPointParams, Parameters, PARAM_OUTPUT};
use crate::polygonize::{DN_ATTR, dissolve, extract_by_value, polygonize};
use crate::sampling::{POINT_ID_ATTR, add_date_field, random_points_in_polygon, sample_raster};

pub use burnscar_common::config::load_config;

/// number of reported pipeline stages
pub const N_STAGES: usize = 6;

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct BurnPointConfig {
    /// default for the `distancia_minima` parameter
    pub min_distance: f64,
    /// default for the `numero_de_puntos` parameter
    pub num_points: usize,
    pub max_tries_per_point: usize,
    pub burn_code: f64,
    /// reference date of the day offsets in the date band
    pub epoch: NaiveDate,
    /// 1-based band that holds the day offsets
    pub date_band: usize,
    /// fixed seed for reproducible point sets
    pub seed: Option<u64>,
}

impl Default for BurnPointConfig {
    fn default () -> Self {
        BurnPointConfig {
            min_distance: 0.0,
            num_points: 100,
            max_tries_per_point: 10,
            burn_code: 1.0,
            epoch: unix_epoch_date(),
            date_band: 2,
            seed: None
        }
    }
}

impl BurnPointConfig {
    pub fn rng (&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64( seed),
            None => StdRng::from_rng( &mut rand::rng())
        }
    }
}

/// keeps track of the stage we are in and asks the host after each completed stage if we should go on
struct Stages<'a> {
    feedback: &'a dyn ProcessingFeedback,
    completed: usize
}

impl <'a> Stages<'a> {
    fn new (feedback: &'a dyn ProcessingFeedback) -> Self { Stages { feedback, completed: 0 } }

    fn done (&mut self, stage: &str) -> ControlFlow<()> {
        self.completed += 1;
        self.feedback.set_current_step( self.completed);

        if self.feedback.is_canceled() {
            info!("canceled after stage {} ({})", self.completed, stage);
            ControlFlow::Break(())
        } else {
            debug!("stage {} ({}) done", self.completed, stage);
            ControlFlow::Continue(())
        }
    }
}

/// run all stages on an in-memory raster. Returns `Break` if the host canceled
pub fn generate_burn_points<R: Rng> (raster: &RasterStack<f64>, min_distance: f64, num_points: usize,
                                     config: &BurnPointConfig, feedback: &dyn ProcessingFeedback, rng: &mut R)
                                     -> ControlFlow<(), Vec<VectorFeature<Point<f64>>>>
{
    let mut stages = Stages::new( feedback);

    let Some(band) = raster.bands.first() else {
        warn!("raster has no bands");
        return ControlFlow::Continue( Vec::new())
    };
    let regions = polygonize( band, &raster.geo_transform, raster.no_data);
    stages.done( "polygonize")?;

    let burned = extract_by_value( regions, DN_ATTR, config.burn_code);
    stages.done( "extract")?;

    let merged = dissolve( &burned);
    stages.done( "dissolve")?;

    let mut points: Vec<VectorFeature<Point<f64>>> = match &merged {
        Some(area) => {
            random_points_in_polygon( &area.geometry, num_points, min_distance, config.max_tries_per_point, rng)
                .into_iter()
                .enumerate()
                .map( |(i,p)| {
                    let mut f = VectorFeature::with_attributes( p, area.attributes.clone());
                    f.set_attr( POINT_ID_ATTR, AttrValue::Int(i as i64 + 1));
                    f
                }).collect()
        }
        None => Vec::new()
    };
    info!("placed {} of {} requested points", points.len(), num_points);
    stages.done( "random points")?;

    sample_raster( &mut points, raster);
    stages.done( "raster sampling")?;

    add_date_field( &mut points, config.date_band, config.epoch);
    stages.done( "date field")?;

    ControlFlow::Continue( points)
}

/// host entry point: run the job for the named parameters and write the points to the `Quema` sink.
/// Returns a map from `Quema` to the written file, or an empty map if the job was canceled
pub fn process_algorithm (parameters: &Parameters, config: &BurnPointConfig, feedback: &dyn ProcessingFeedback) -> Result<HashMap<String,PathBuf>> {
    let params = BurnPointParams::from_parameters( parameters)?;
    let raster = open_raster_stack::<f64,_>( &params.raster)?;
    info!("raster {:?}: {} bands of {}x{}", params.raster, raster.n_bands(), raster.width(), raster.height());

    let mut rng = config.rng();
    let mut results = HashMap::new();

    if let ControlFlow::Continue(points) = generate_burn_points( &raster, params.min_distance, params.num_points, config, feedback, &mut rng) {
        let srs = match &raster.srs_wkt {
            Some(wkt) => Some( srs_from_wkt( wkt)?),
            None => None
        };
        write_features( &params.output, srs.as_ref(), &points)?;
        results.insert( PARAM_OUTPUT.to_string(), params.output.clone());
    }

    Ok(results)
}

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

//! random point placement inside polygons and raster value sampling at point locations

use chrono::NaiveDate;
use geo::{Area, Distance, Euclidean, MultiPolygon, Point, Triangle, TriangulateEarcut};
use num::ToPrimitive;
use rand::Rng;
use tracing::debug;

use burnscar_common::datetime::date_from_epoch_days;
use burnscar_gdal::{AttrValue, RasterStack, VectorFeature};

pub const SAMPLE_PREFIX: &str = "SAMPLE_";

/// upper bound for pre-allocated point storage, requested point numbers are not limited
const MAX_RESERVED_POINTS: usize = 1 << 16;
pub const POINT_ID_ATTR: &str = "rand_point_id";
pub const DATE_ATTR: &str = "fecha";

pub fn sample_attr_name (band: usize) -> String {
    format!("{SAMPLE_PREFIX}{band}")
}

/* #region random points ******************************************************************************************/

/// area weighted triangulation of a multi-polygon we can draw uniformly distributed points from
pub struct PointSampler {
    triangles: Vec<Triangle<f64>>,
    cumulative_area: Vec<f64>,
}

impl PointSampler {
    pub fn new (geom: &MultiPolygon<f64>) -> Self {
        let mut triangles = Vec::new();
        let mut cumulative_area = Vec::new();
        let mut total = 0.0;

        for poly in geom {
            for t in poly.earcut_triangles() {
                let a = t.unsigned_area();
                if a > 0.0 {
                    total += a;
                    triangles.push( t);
                    cumulative_area.push( total);
                }
            }
        }
        PointSampler { triangles, cumulative_area }
    }

    pub fn area (&self) -> f64 { self.cumulative_area.last().copied().unwrap_or(0.0) }

    pub fn is_empty (&self) -> bool { self.triangles.is_empty() }

    /// uniformly distributed random point, `None` if the geometry has no area
    pub fn sample<R: Rng> (&self, rng: &mut R) -> Option<Point<f64>> {
        let total = self.area();
        if total <= 0.0 { return None }

        let a = rng.random_range( 0.0..total);
        let idx = self.cumulative_area.partition_point( |ca| *ca <= a).min( self.triangles.len() - 1);
        let t = &self.triangles[idx];

        // reflect into the triangle if we are in the other half of the parallelogram
        let (mut u, mut v): (f64,f64) = (rng.random(), rng.random());
        if u + v > 1.0 { u = 1.0 - u; v = 1.0 - v; }

        let x = t.0.x + u * (t.1.x - t.0.x) + v * (t.2.x - t.0.x);
        let y = t.0.y + u * (t.1.y - t.0.y) + v * (t.2.y - t.0.y);
        Some( Point::new( x, y) )
    }
}

/// place up to `n_points` random points inside `geom` that are at least `min_distance` apart. Each point gets
/// `max_tries` attempts, points that can't be placed are skipped (we might return less than `n_points`)
pub fn random_points_in_polygon<R: Rng> (geom: &MultiPolygon<f64>, n_points: usize, min_distance: f64, max_tries: usize, rng: &mut R) -> Vec<Point<f64>> {
    let sampler = PointSampler::new( geom);
    let mut points: Vec<Point<f64>> = Vec::with_capacity( n_points.min( MAX_RESERVED_POINTS));
    if sampler.is_empty() { return points }

    for _ in 0..n_points {
        for _ in 0..max_tries.max(1) {
            let Some(p) = sampler.sample( rng) else { break };
            if min_distance <= 0.0 || points.iter().all( |q| Euclidean.distance( p, *q) >= min_distance) {
                points.push( p);
                break;
            }
        }
    }

    if points.len() < n_points {
        debug!("placed {} of {} requested points", points.len(), n_points);
    }
    points
}

/* #endregion random points */

/* #region raster sampling ****************************************************************************************/

/// add one `SAMPLE_<n>` attribute per raster band with the value at the point location. Points outside
/// of the raster or on no-data cells get a null value
pub fn sample_raster<T> (features: &mut [VectorFeature<Point<f64>>], raster: &RasterStack<T>) where T: Copy + ToPrimitive {
    for f in features.iter_mut() {
        let (x,y) = (f.geometry.x(), f.geometry.y());
        for band in 0..raster.n_bands() {
            let v = raster.value_at( band, x, y)
                .and_then( |v| v.to_f64())
                .map_or( AttrValue::Null, AttrValue::Real);
            f.set_attr( &sample_attr_name( band+1), v);
        }
    }
}

/// calendar date for a day offset sample. `None` if the sample is null or out of range
pub fn date_from_sample (sample: Option<&AttrValue>, epoch: NaiveDate) -> Option<NaiveDate> {
    let days = sample?.as_f64()?;
    if !days.is_finite() { return None }
    date_from_epoch_days( epoch, days.floor() as i64)
}

/// add the [`DATE_ATTR`] date field derived from the day offset in the given sample band
pub fn add_date_field (features: &mut [VectorFeature<Point<f64>>], date_band: usize, epoch: NaiveDate) {
    let sample_name = sample_attr_name( date_band);
    for f in features.iter_mut() {
        let date = date_from_sample( f.attr( &sample_name), epoch);
        f.set_attr( DATE_ATTR, date.map_or( AttrValue::Null, AttrValue::Date));
    }
}

/* #endregion raster sampling */

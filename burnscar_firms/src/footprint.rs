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

//! AOI filtering and sensor footprint generation for fire detection points

use geo::{Area, BooleanOps, Contains, MultiPolygon, Point, Polygon, Rect, coord, unary_union};
use burnscar_gdal::{AttrValue, VectorFeature};

/// attribute added to clipped footprints that identifies the AOI feature they were clipped with
pub const AOI_PART_ATTR: &str = "aoi_part";

/// side length of the footprint square for the given instrument. Unknown instruments silently get
/// `default_size` (unlike unknown confidence codes, which are errors)
pub fn footprint_size (instrument: &str, sizes: &[(String,f64)], default_size: f64) -> f64 {
    sizes.iter()
        .find( |(name,_)| name == instrument.trim())
        .map_or( default_size, |(_,size)| *size)
}

/// axis aligned square of side `size` centered on `p`
pub fn footprint_square (p: &Point<f64>, size: f64) -> Polygon<f64> {
    let h = size / 2.0;
    Rect::new( coord!{ x: p.x() - h, y: p.y() - h}, coord!{ x: p.x() + h, y: p.y() + h}).to_polygon()
}

/// union of all AOI feature geometries
pub fn aoi_union (aoi: &[VectorFeature<MultiPolygon<f64>>]) -> MultiPolygon<f64> {
    unary_union( aoi.iter().map( |f| &f.geometry))
}

/// keep the features whose point lies strictly inside the region (points on the boundary are excluded)
pub fn filter_within (points: Vec<VectorFeature<Point<f64>>>, region: &MultiPolygon<f64>) -> Vec<VectorFeature<Point<f64>>> {
    points.into_iter().filter( |f| region.contains( &f.geometry)).collect()
}

/// intersect the instrument specific footprint square of each point with each AOI feature. Every non-empty
/// intersection becomes a feature that carries the point attributes, the AOI attributes that don't
/// collide with point attribute names and the index of the AOI feature.
/// Points and AOI have to be in the same projected (metric) SRS
pub fn clip_footprints (points: &[VectorFeature<Point<f64>>], aoi: &[VectorFeature<MultiPolygon<f64>>],
                        sizes: &[(String,f64)], default_size: f64) -> Vec<VectorFeature<MultiPolygon<f64>>> {
    let mut footprints = Vec::new();

    for p in points {
        let instrument = match p.attr("instrument") {
            Some(AttrValue::Text(s)) => s.as_str(),
            _ => ""
        };
        let square = footprint_square( &p.geometry, footprint_size( instrument, sizes, default_size));

        for (i,part) in aoi.iter().enumerate() {
            let clipped = square.intersection( &part.geometry);
            if clipped.0.is_empty() || clipped.unsigned_area() == 0.0 { continue }

            let mut f = VectorFeature::with_attributes( clipped, p.attributes.clone());
            for (name,v) in &part.attributes {
                if f.attr( name).is_none() {
                    f.set_attr( name, v.clone());
                }
            }
            f.set_attr( AOI_PART_ATTR, AttrValue::Int(i as i64));
            footprints.push( f);
        }
    }

    footprints
}

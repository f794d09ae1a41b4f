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

//! raster to polygon conversion and the attribute based polygon operations that follow it

use ndarray::Array2;
use num::ToPrimitive;
use geo::{LineString, MultiPolygon, Polygon, coord, unary_union};
use burnscar_gdal::{AttrValue, GeoTransform, VectorFeature};

/// attribute that holds the source pixel value of polygonized regions
pub const DN_ATTR: &str = "DN";

const NO_LABEL: u32 = 0;

fn cell_value<T: ToPrimitive> (v: &T, no_data: Option<f64>) -> Option<f64> {
    let v = v.to_f64()?;
    if v.is_nan() || no_data.map_or( false, |nd| v == nd) { None } else { Some(v) }
}

/// label 4-connected regions of equal valued cells. Labels start at 1, no-data cells get label 0.
/// Returns the label array and the cell value of each label (index `label-1`)
pub fn label_regions<T> (band: &Array2<T>, no_data: Option<f64>) -> (Array2<u32>, Vec<f64>) where T: Copy + ToPrimitive {
    let (rows,cols) = band.dim();
    let mut labels = Array2::<u32>::from_elem( (rows,cols), NO_LABEL);
    let mut values: Vec<f64> = Vec::new();
    let mut stack: Vec<(usize,usize)> = Vec::new();

    for r0 in 0..rows {
        for c0 in 0..cols {
            if labels[[r0,c0]] != NO_LABEL { continue }
            let Some(v) = cell_value( &band[[r0,c0]], no_data) else { continue };

            values.push(v);
            let label = values.len() as u32;
            labels[[r0,c0]] = label;
            stack.push( (r0,c0));

            while let Some((r,c)) = stack.pop() {
                let mut visit = |rr: usize, cc: usize, stack: &mut Vec<(usize,usize)>| {
                    if labels[[rr,cc]] == NO_LABEL && cell_value( &band[[rr,cc]], no_data) == Some(v) {
                        labels[[rr,cc]] = label;
                        stack.push( (rr,cc));
                    }
                };
                if r > 0 { visit( r-1, c, &mut stack) }
                if r+1 < rows { visit( r+1, c, &mut stack) }
                if c > 0 { visit( r, c-1, &mut stack) }
                if c+1 < cols { visit( r, c+1, &mut stack) }
            }
        }
    }

    (labels, values)
}

fn grid_to_srs (gt: &GeoTransform, col: usize, row: usize) -> (f64,f64) {
    let (c,r) = (col as f64, row as f64);
    (gt[0] + c * gt[1] + r * gt[2], gt[3] + c * gt[4] + r * gt[5])
}

/// polygon covering the pixels `c0..c1` of `row`
fn run_polygon (gt: &GeoTransform, row: usize, c0: usize, c1: usize) -> Polygon<f64> {
    let corners = [ (c0,row), (c1,row), (c1,row+1), (c0,row+1) ];
    let ring: Vec<_> = corners.iter().map( |(c,r)| {
        let (x,y) = grid_to_srs( gt, *c, *r);
        coord!{ x: x, y: y }
    }).collect();
    Polygon::new( LineString::new( ring), vec![])
}

pub fn dn_value (v: f64) -> AttrValue {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 { AttrValue::Int(v as i64) } else { AttrValue::Real(v) }
}

/// convert 4-connected regions of equal valued cells into one polygon feature per region, tagged with
/// the cell value in [`DN_ATTR`]. No-data cells are not polygonized
pub fn polygonize<T> (band: &Array2<T>, gt: &GeoTransform, no_data: Option<f64>) -> Vec<VectorFeature<MultiPolygon<f64>>>
    where T: Copy + ToPrimitive
{
    let (labels, values) = label_regions( band, no_data);
    let mut runs: Vec<Vec<Polygon<f64>>> = vec![ Vec::new(); values.len()];

    for (row, lrow) in labels.rows().into_iter().enumerate() {
        let mut c0 = 0;
        while c0 < lrow.len() {
            let label = lrow[c0];
            let mut c1 = c0 + 1;
            while c1 < lrow.len() && lrow[c1] == label { c1 += 1 }
            if label != NO_LABEL {
                runs[(label-1) as usize].push( run_polygon( gt, row, c0, c1));
            }
            c0 = c1;
        }
    }

    runs.iter().zip( values.iter()).map( |(polys,v)| {
        let geometry = if polys.len() == 1 { MultiPolygon::new( polys.clone()) } else { unary_union( polys.iter()) };
        VectorFeature::with_attributes( geometry, vec![ (DN_ATTR.to_string(), dn_value(*v)) ])
    }).collect()
}

/// keep features whose numeric attribute `name` equals `value`
pub fn extract_by_value (features: Vec<VectorFeature<MultiPolygon<f64>>>, name: &str, value: f64) -> Vec<VectorFeature<MultiPolygon<f64>>> {
    features.into_iter()
        .filter( |f| f.attr( name).and_then( |v| v.as_f64()) == Some(value))
        .collect()
}

/// merge all features into one (disjoint parts stay within the same multi-polygon). The merged feature keeps
/// the attributes of the first input feature. Returns `None` if there are no features
pub fn dissolve (features: &[VectorFeature<MultiPolygon<f64>>]) -> Option<VectorFeature<MultiPolygon<f64>>> {
    let first = features.first()?;
    let geometry = unary_union( features.iter().map( |f| &f.geometry));
    Some( VectorFeature::with_attributes( geometry, first.attributes.clone()) )
}

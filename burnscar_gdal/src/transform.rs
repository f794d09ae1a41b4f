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

//! spatial reference systems and coordinate transformations.
//!
//! All SpatialRefs created here use traditional GIS axis order (x=easting/longitude, y=northing/latitude) so
//! that callers never have to care about the authority-compliant lat,lon order of EPSG:4326

use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, CoordTransformOptions, SpatialRef};
use geo::{Coord, MapCoords, MultiPolygon, Point, Polygon};
use burnscar_common::BoundingBox;

use crate::errors::{Result, misc_error};

/// GDAL OCTTransformBounds recommended number of densification points
pub const DEFAULT_DENSIFY_PTS: i32 = 21;

/* #region well known SpatialRefs *********************************************************************************/

pub fn with_traditional_order (mut srs: SpatialRef) -> SpatialRef {
    srs.set_axis_mapping_strategy( AxisMappingStrategy::TraditionalGisOrder);
    srs
}

pub fn srs_epsg (epsg: u32) -> Result<SpatialRef> {
    Ok( with_traditional_order( SpatialRef::from_epsg(epsg)?) )
}

pub fn srs_lon_lat () -> Result<SpatialRef> { srs_epsg(4326) }

pub fn srs_from_wkt (wkt: &str) -> Result<SpatialRef> {
    Ok( with_traditional_order( SpatialRef::from_wkt(wkt)?) )
}

/// both missing SRS count as the same (we assume pixel coordinates), a missing and a defined one do not
pub fn is_same_srs_wkt (a: Option<&str>, b: Option<&str>) -> Result<bool> {
    match (a,b) {
        (None,None) => Ok(true),
        (Some(a),Some(b)) => {
            if a == b { return Ok(true) }
            Ok( srs_from_wkt(a)? == srs_from_wkt(b)? )
        }
        _ => Ok(false)
    }
}

/* #endregion well known SpatialRefs */

/* #region coordinate mapping *************************************************************************************/

/// something that maps coordinates in place from a source into a target SRS
pub trait CoordMapper {
    fn map_coords (&self, xs: &mut [f64], ys: &mut [f64]) -> Result<()>;

    fn map_point (&self, x: f64, y: f64) -> Result<(f64,f64)> {
        let mut ax = [x];
        let mut ay = [y];
        self.map_coords( &mut ax, &mut ay)?;
        Ok( (ax[0], ay[0]) )
    }
}

/// mapper for source and target in the same SRS
pub struct IdentityMapper;

impl CoordMapper for IdentityMapper {
    fn map_coords (&self, xs: &mut [f64], ys: &mut [f64]) -> Result<()> { Ok(()) }
}

/// GDAL/PROJ backed mapper between two different SpatialRefs
pub struct SrsTransform {
    transform: CoordTransform
}

impl SrsTransform {
    pub fn new (s_srs: &SpatialRef, t_srs: &SpatialRef) -> Result<Self> {
        let mut ct_options = CoordTransformOptions::new()?;
        ct_options.desired_accuracy( 0.0);
        ct_options.set_ballpark_allowed(false);
        let transform = CoordTransform::new_with_options( s_srs, t_srs, &ct_options)?;
        Ok( SrsTransform { transform } )
    }

    pub fn transform_bounds (&self, bbox: &BoundingBox<f64>, densify_pts: i32) -> Result<BoundingBox<f64>> {
        let bounds = [bbox.west, bbox.south, bbox.east, bbox.north];
        let a = self.transform.transform_bounds( &bounds, densify_pts)?;
        Ok( BoundingBox::new( a[0], a[1], a[2], a[3]) )
    }
}

impl CoordMapper for SrsTransform {
    fn map_coords (&self, xs: &mut [f64], ys: &mut [f64]) -> Result<()> {
        let mut zs: [f64;0] = [];
        Ok( self.transform.transform_coords( xs, ys, &mut zs)? )
    }
}

/// get a boxed mapper between two optional WKT SRS definitions, using the identity if they are the same
pub fn mapper_for_wkt (s_wkt: Option<&str>, t_wkt: Option<&str>) -> Result<Box<dyn CoordMapper>> {
    if is_same_srs_wkt( s_wkt, t_wkt)? {
        Ok( Box::new( IdentityMapper))
    } else {
        match (s_wkt, t_wkt) {
            (Some(s),Some(t)) => Ok( Box::new( SrsTransform::new( &srs_from_wkt(s)?, &srs_from_wkt(t)?)?) ),
            _ => Err( misc_error("cannot transform between georeferenced and non-georeferenced data"))
        }
    }
}

//--- geo geometry transformation

fn map_coord (mapper: &dyn CoordMapper, c: Coord<f64>) -> Result<Coord<f64>> {
    let (x,y) = mapper.map_point( c.x, c.y)?;
    Ok( Coord{x,y} )
}

pub fn map_geo_point (mapper: &dyn CoordMapper, p: &Point<f64>) -> Result<Point<f64>> {
    p.try_map_coords( |c| map_coord( mapper, c))
}

pub fn map_geo_polygon (mapper: &dyn CoordMapper, poly: &Polygon<f64>) -> Result<Polygon<f64>> {
    poly.try_map_coords( |c| map_coord( mapper, c))
}

pub fn map_geo_multi_polygon (mapper: &dyn CoordMapper, mp: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
    mp.try_map_coords( |c| map_coord( mapper, c))
}

/* #endregion coordinate mapping */

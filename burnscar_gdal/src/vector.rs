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

//! reading and writing attributed vector features through GDAL/OGR

use std::path::Path;
use chrono::NaiveDate;
use geo::{Geometry, MultiPolygon, Point, Polygon};
use gdal::Dataset;
use gdal::spatial_ref::SpatialRef;
use gdal::vector::{FieldValue, LayerAccess, LayerOptions, OGRFieldType, OGRwkbGeometryType, ToGdal};
use tracing::{debug, info};

use burnscar_common::fs::{ensure_parent_dir, filestem};
use crate::{get_driver_for_path, run_quiet};
use crate::errors::{Result, BurnscarGdalError, misc_error};

/// attribute value of a vector feature. `Null` attributes are not written
#[derive(Debug,Clone,PartialEq)]
pub enum AttrValue {
    Int(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    Null
}

impl AttrValue {
    pub fn is_null (&self) -> bool { matches!( self, AttrValue::Null) }

    pub fn as_f64 (&self) -> Option<f64> {
        match self {
            AttrValue::Int(i) => Some(*i as f64),
            AttrValue::Real(r) => Some(*r),
            AttrValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None
        }
    }

    pub fn as_date (&self) -> Option<NaiveDate> {
        match self {
            AttrValue::Date(d) => Some(*d),
            AttrValue::Text(s) => burnscar_common::datetime::parse_iso_date( s),
            _ => None
        }
    }

    fn field_type (&self) -> Option<OGRFieldType::Type> {
        match self {
            AttrValue::Int(_) => Some(OGRFieldType::OFTInteger64),
            AttrValue::Real(_) => Some(OGRFieldType::OFTReal),
            AttrValue::Text(_) => Some(OGRFieldType::OFTString),
            AttrValue::Date(_) => Some(OGRFieldType::OFTDate),
            AttrValue::Null => None
        }
    }

    fn to_field_value (&self) -> Option<FieldValue> {
        match self {
            AttrValue::Int(i) => Some( FieldValue::Integer64Value(*i)),
            AttrValue::Real(r) => Some( FieldValue::RealValue(*r)),
            AttrValue::Text(s) => Some( FieldValue::StringValue(s.clone())),
            AttrValue::Date(d) => Some( FieldValue::DateValue(*d)),
            AttrValue::Null => None
        }
    }
}

impl From<Option<FieldValue>> for AttrValue {
    fn from (fv: Option<FieldValue>) -> Self {
        match fv {
            Some(FieldValue::IntegerValue(i)) => AttrValue::Int(i as i64),
            Some(FieldValue::Integer64Value(i)) => AttrValue::Int(i),
            Some(FieldValue::RealValue(r)) => AttrValue::Real(r),
            Some(FieldValue::StringValue(s)) => AttrValue::Text(s),
            Some(FieldValue::DateValue(d)) => AttrValue::Date(d),
            Some(FieldValue::DateTimeValue(dt)) => AttrValue::Date(dt.date_naive()),
            _ => AttrValue::Null // we don't use list values
        }
    }
}

/// a geometry with ordered, named attributes
#[derive(Debug,Clone,PartialEq)]
pub struct VectorFeature<G> {
    pub geometry: G,
    pub attributes: Vec<(String,AttrValue)>
}

impl <G> VectorFeature<G> {
    pub fn new (geometry: G) -> Self {
        VectorFeature { geometry, attributes: Vec::new() }
    }

    pub fn with_attributes (geometry: G, attributes: Vec<(String,AttrValue)>) -> Self {
        VectorFeature { geometry, attributes }
    }

    pub fn attr (&self, name: &str) -> Option<&AttrValue> {
        self.attributes.iter().find( |(k,_)| k == name).map( |(_,v)| v)
    }

    /// set or replace attribute, new attributes are appended
    pub fn set_attr (&mut self, name: &str, value: AttrValue) {
        if let Some(e) = self.attributes.iter_mut().find( |(k,_)| k == name) {
            e.1 = value;
        } else {
            self.attributes.push( (name.to_string(), value));
        }
    }
}

/// geometry types we can store in OGR layers
pub trait LayerGeometry: ToGdal {
    fn wkb_type () -> OGRwkbGeometryType::Type;
}

impl LayerGeometry for Point<f64> {
    fn wkb_type () -> OGRwkbGeometryType::Type { OGRwkbGeometryType::wkbPoint }
}

impl LayerGeometry for Polygon<f64> {
    fn wkb_type () -> OGRwkbGeometryType::Type { OGRwkbGeometryType::wkbPolygon }
}

impl LayerGeometry for MultiPolygon<f64> {
    fn wkb_type () -> OGRwkbGeometryType::Type { OGRwkbGeometryType::wkbMultiPolygon }
}

/* #region reading ************************************************************************************************/

/// polygon features of the first layer of a vector dataset together with the layer SRS (as WKT)
#[derive(Debug,Clone)]
pub struct PolygonLayer {
    pub features: Vec<VectorFeature<MultiPolygon<f64>>>,
    pub srs_wkt: Option<String>
}

fn to_multi_polygon (geom: Geometry<f64>) -> Result<MultiPolygon<f64>> {
    match geom {
        Geometry::Polygon(p) => Ok( MultiPolygon::new( vec![p]) ),
        Geometry::MultiPolygon(mp) => Ok( mp ),
        Geometry::GeometryCollection(gc) => {
            let mut polys = Vec::new();
            for g in gc {
                polys.extend( to_multi_polygon(g)?.0);
            }
            Ok( MultiPolygon::new( polys) )
        }
        other => Err( BurnscarGdalError::UnsupportedGeometry( format!("{other:?}")))
    }
}

/// read the first layer of a polygon dataset. Features without geometry are skipped
pub fn read_polygon_layer<P: AsRef<Path>> (path: P) -> Result<PolygonLayer> {
    let path = path.as_ref();
    let ds = Dataset::open( path)?;
    let mut layer = ds.layer(0)?;
    let srs_wkt = layer.spatial_ref().and_then( |srs| srs.to_wkt().ok());

    let mut features = Vec::new();
    for feature in layer.features() {
        if let Some(geom) = feature.geometry() {
            let geometry = to_multi_polygon( geom.to_geo()?)?;
            let attributes = feature.fields().map( |(name,fv)| (name, AttrValue::from(fv))).collect();
            features.push( VectorFeature { geometry, attributes });
        }
    }

    debug!("read {} polygon features from {:?}", features.len(), path);
    Ok( PolygonLayer { features, srs_wkt } )
}

/* #endregion reading */

/* #region writing ************************************************************************************************/

/// field definitions in order of first appearance, typed by the first non-null value
fn field_defs<G> (features: &[VectorFeature<G>]) -> Vec<(String,OGRFieldType::Type)> {
    let mut defs: Vec<(String,OGRFieldType::Type)> = Vec::new();
    for f in features {
        for (name,v) in &f.attributes {
            if let Some(ft) = v.field_type() {
                if !defs.iter().any( |(n,_)| n == name) {
                    defs.push( (name.clone(), ft));
                }
            }
        }
    }
    defs
}

/// write features into a new single layer dataset, replacing any existing file. The driver is
/// determined by the path extension, the layer name by the file stem
pub fn write_features<G,P> (path: P, srs: Option<&SpatialRef>, features: &[VectorFeature<G>]) -> Result<()>
    where G: LayerGeometry, P: AsRef<Path>
{
    let path = path.as_ref();
    ensure_parent_dir( path)?;

    let driver = get_driver_for_path( path)?;
    if path.exists() {
        driver.delete( path)?;
    }

    let layer_name = filestem( &path).unwrap_or("features");
    let mut ds = driver.create_vector_only( path)?;
    let mut layer = ds.create_layer( LayerOptions {
        name: layer_name,
        srs,
        ty: G::wkb_type(),
        options: None
    })?;

    let defs = field_defs( features);
    let field_defs: Vec<(&str,OGRFieldType::Type)> = defs.iter().map( |(n,t)| (n.as_str(), *t)).collect();
    layer.create_defn_fields( &field_defs)?;

    for f in features {
        let mut names: Vec<&str> = Vec::with_capacity( f.attributes.len());
        let mut values: Vec<FieldValue> = Vec::with_capacity( f.attributes.len());
        for (name,v) in &f.attributes {
            if let Some(fv) = v.to_field_value() {
                names.push( name.as_str());
                values.push( fv);
            }
        }
        let mut ft = gdal::vector::Feature::new( layer.defn())?;
        ft.set_geometry( f.geometry.to_gdal()?)?;
        for (name,v) in names.iter().zip( values.iter()) {
            let idx = ft.field_index( name)?;
            ft.set_field( idx, v)?;
        }
        ft.create( &layer)?;
    }

    info!("wrote {} features to {:?}", features.len(), path);
    Ok(())
}

/* #endregion writing */

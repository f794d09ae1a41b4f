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

use ndarray::{Array2, array};
use geo::{polygon, MultiPolygon};
use gdal::{Dataset, Metadata};
use burnscar_common::BoundingBox;
use burnscar_gdal::*;

// run with "cargo test -p burnscar_gdal -- --nocapture"

fn utm_stack () -> RasterStack<u16> {
    let gt = new_geotransform( 300000.0, 30.0, 0.0, 8800120.0, 0.0, -30.0);
    let band: Array2<u16> = array![
        [0, 1, 1, 0],
        [0, 1, 1, 0],
        [0, 0, 0, 0],
    ];
    RasterStack::from_bands( gt, None, Some(0.0), vec![band]).unwrap()
}

#[test]
fn test_stack_geometry() {
    let stack = utm_stack();
    assert_eq!( (stack.width(), stack.height()), (4,3));
    assert_eq!( stack.pixel_area(), 900.0);

    let bounds = stack.bounds();
    println!("bounds: {bounds:?}");
    assert_eq!( bounds, BoundingBox::new( 300000.0, 8800030.0, 300120.0, 8800120.0));

    assert_eq!( stack.pixel_center( 1, 0), (300045.0, 8800105.0));
    assert_eq!( stack.pixel_at( 300045.0, 8800105.0), Some((1,0)));
    assert_eq!( stack.pixel_at( 300119.9, 8800030.1), Some((3,2)));
    assert_eq!( stack.pixel_at( 299999.0, 8800100.0), None);
    assert_eq!( stack.pixel_at( 300010.0, 8800121.0), None);

    assert_eq!( stack.value_at( 0, 300045.0, 8800105.0), Some(1));
    assert_eq!( stack.value_at( 0, 300005.0, 8800105.0), None); // no-data
    assert_eq!( stack.value_at( 1, 300045.0, 8800105.0), None); // no such band
}

#[test]
fn test_grid_mismatch() {
    let a = utm_stack();
    let mut b = utm_stack();
    assert!( a.check_same_grid( &b).is_ok());

    b.geo_transform[0] += 30.0;
    assert!( a.check_same_grid( &b).is_err());

    let c = RasterStack::<u16>::new( a.geo_transform, None, None, 5, 3, 1, 0);
    assert!( a.check_same_grid( &c).is_err());

    let bands = vec![ Array2::<u16>::zeros((3,4)), Array2::<u16>::zeros((4,4)) ];
    assert!( RasterStack::from_bands( a.geo_transform, None, None, bands).is_err());
}

#[test]
fn test_write_tiff_with_overviews() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mosaic.tif");

    let mut stack = RasterStack::<u16>::new( new_geotransform( 0.0, 10.0, 0.0, 640.0, 0.0, -10.0), None, Some(0.0), 64, 64, 2, 0);
    stack.bands[0][[10,10]] = 1;
    stack.bands[1][[10,10]] = 18_500;

    let mut ds = write_raster_stack( &stack, &path, &TiffOptions::default()).unwrap();
    build_overviews( &mut ds, &[2,4], "nearest").unwrap();
    drop(ds);

    let ds = Dataset::open( &path).unwrap();
    let info = get_raster_info( &ds).unwrap();
    println!("info: {info:?}");
    assert_eq!( (info.cols, info.rows, info.n_bands), (64,64,2));
    assert_eq!( ds.metadata_item( "resampling", OVERVIEW_METADATA_DOMAIN), Some("nearest".to_string()));
    assert_eq!( ds.rasterband(1).unwrap().overview_count().unwrap(), 2);
    assert_eq!( ds.rasterband(2).unwrap().no_data_value(), Some(0.0));

    let read_back: RasterStack<u16> = read_raster_stack( &ds).unwrap();
    assert_eq!( read_back.bands, stack.bands);
    assert_eq!( read_back.geo_transform, stack.geo_transform);
}

#[test]
fn test_write_read_features() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aoi.geojson");

    let poly = polygon![(x: -72.0, y: -13.0), (x: -71.0, y: -13.0), (x: -71.0, y: -12.0), (x: -72.0, y: -12.0), (x: -72.0, y: -13.0)];
    let mut f = VectorFeature::new( MultiPolygon::new( vec![poly]));
    f.set_attr( "name", AttrValue::Text("cusco".into()));
    f.set_attr( "confidence", AttrValue::Int(80));

    let srs = srs_lon_lat().unwrap();
    write_features( &path, Some(&srs), &[f.clone()]).unwrap();
    write_features( &path, Some(&srs), &[f.clone()]).unwrap(); // replaces existing

    let layer = read_polygon_layer( &path).unwrap();
    assert_eq!( layer.features.len(), 1);
    assert!( layer.srs_wkt.is_some());

    let g = &layer.features[0];
    assert_eq!( g.geometry, f.geometry);
    assert_eq!( g.attr("name"), Some(&AttrValue::Text("cusco".into())));
    assert_eq!( g.attr("confidence").and_then( |v| v.as_f64()), Some(80.0));
}

#[test]
fn test_per_band_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.tif");

    let mut stack = RasterStack::<u16>::new( new_geotransform( 0.0, 10.0, 0.0, 40.0, 0.0, -10.0), None, Some(0.0), 4, 4, 2, 0)
        .with_band_no_data( vec![ Some(0.0), Some(65535.0) ]).unwrap();
    stack.bands[1].fill( 65535);
    stack.bands[1][[0,0]] = 0;

    write_raster_stack( &stack, &path, &TiffOptions::default()).unwrap();
    let read_back = open_raster_stack::<u16,_>( &path).unwrap();
    println!("band no-data: {:?}", read_back.band_no_data);

    assert_eq!( read_back.band_no_data, vec![ Some(0.0), Some(65535.0) ]);
    assert_eq!( read_back.value_at( 1, 5.0, 35.0), Some(0));   // 0 is valid in band 2
    assert_eq!( read_back.value_at( 1, 15.0, 35.0), None);     // band 2 no-data
    assert_eq!( read_back.value_at( 0, 5.0, 35.0), None);      // band 1 no-data
}

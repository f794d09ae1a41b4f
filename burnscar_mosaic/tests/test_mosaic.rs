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
use burnscar_common::BoundingBox;
use burnscar_gdal::{
    Dataset, IdentityMapper, Metadata, RasterStack, SrsTransform, TiffOptions, OVERVIEW_METADATA_DOMAIN,
    new_geotransform, srs_epsg, write_raster_stack
};
use burnscar_mosaic::{*, errors::BurnscarMosaicError, grid::{snap_bounds, compute_grid}, resample::resample_nearest};

// run with "cargo test -p burnscar_mosaic -- --nocapture"

fn tile (x0: f64, y0: f64, flag: Array2<u16>, date: Array2<u16>) -> RasterStack<u16> {
    let gt = new_geotransform( x0, 30.0, 0.0, y0, 0.0, -30.0);
    RasterStack::from_bands( gt, None, Some(0.0), vec![flag, date]).unwrap()
}

fn half_tile (x0: f64, date: u16) -> RasterStack<u16> {
    tile( x0, 120.0, Array2::from_elem( (4,2), 1), Array2::from_elem( (4,2), date))
}

#[test]
fn test_snap_contains_union() {
    let gt = new_geotransform( 0.0, 10.0, 0.0, 100.0, 0.0, -10.0);

    let snapped = snap_bounds( &BoundingBox::new( 3.0, 52.0, 47.0, 98.0), &gt).unwrap();
    assert_eq!( snapped, BoundingBox::new( 0.0, 50.0, 50.0, 100.0));

    for union in [
        BoundingBox::new( -13.0, 101.5, 22.2, 130.1),
        BoundingBox::new( 0.0, 0.0, 100.0, 100.0),
        BoundingBox::new( 1234.5, -987.6, 2345.6, -10.0),
    ] {
        let s = snap_bounds( &union, &gt).unwrap();
        println!("{union:?} -> {s:?}");
        assert!( s.contains_box( &union));

        for (v,o) in [(s.west,0.0), (s.east,0.0), (s.south,100.0), (s.north,100.0)] {
            let n = (v - o) / 10.0;
            assert!( (n - n.round()).abs() < 1e-9, "{v} not on lattice");
        }
        assert!( s.width() - union.width() < 20.0);
        assert!( s.height() - union.height() < 20.0);
    }
}

#[test]
fn test_grid_size() {
    let gt = new_geotransform( 0.0, 10.0, 0.0, 100.0, 0.0, -10.0);
    let grid = compute_grid( &BoundingBox::new( 3.0, 52.0, 47.0, 98.0), &gt, None).unwrap();
    assert_eq!( (grid.width, grid.height), (5,5));
    assert_eq!( grid.geo_transform, [0.0, 10.0, 0.0, 100.0, 0.0, -10.0]);

    let degenerate = compute_grid( &BoundingBox::new( 10.0, 10.0, 10.0, 10.0), &gt, None);
    assert!( matches!( degenerate, Err(BurnscarMosaicError::EmptyMosaic(_))));
}

#[test]
fn test_west_east_tiles() {
    let west = half_tile( 0.0, 100);
    let east = half_tile( 60.0, 200);

    for tiles in [ vec![west.clone(), east.clone()], vec![east.clone(), west.clone()] ] {
        let mosaic = merge_tiles( &tiles, 1, 21).unwrap();
        println!("flag:\n{:?}\ndate:\n{:?}", mosaic.bands[FLAG_BAND], mosaic.bands[DATE_BAND]);

        assert_eq!( (mosaic.width(), mosaic.height()), (4,4));
        assert_eq!( mosaic.geo_transform, [0.0, 30.0, 0.0, 120.0, 0.0, -30.0]);
        assert!( mosaic.bands[FLAG_BAND].iter().all( |f| *f == 1));

        let expected_dates: Array2<u16> = Array2::from_shape_fn( (4,4), |(_,c)| if c < 2 { 100 } else { 200 });
        assert_eq!( mosaic.bands[DATE_BAND], expected_dates);
    }
}

#[test]
fn test_order_independence() {
    let a = tile( 0.0, 90.0, array![[1,0,1],[1,1,0],[0,0,1]], array![[10,20,30],[40,50,60],[70,80,90]]);
    let b = tile( 30.0, 60.0, array![[1,1,1],[0,1,0],[1,0,0]], array![[45,15,5],[25,35,55],[65,75,85]]);

    let ab = merge_tiles( &[a.clone(), b.clone()], 1, 21).unwrap();
    let ba = merge_tiles( &[b, a], 1, 21).unwrap();

    assert_eq!( ab.geo_transform, ba.geo_transform);
    assert_eq!( ab.bands, ba.bands);
    assert_eq!( (ab.width(), ab.height()), (4,4));
}

#[test]
fn test_dates_masked_by_flag() {
    let t = tile( 0.0, 60.0, array![[1,0],[2,1]], array![[5,7],[9,11]]);
    let mosaic = merge_tiles( &[t], 1, 21).unwrap();

    assert_eq!( mosaic.bands[DATE_BAND], array![[5,0],[0,11]]);
    for (f,d) in mosaic.bands[FLAG_BAND].iter().zip( mosaic.bands[DATE_BAND].iter()) {
        if *f != 1 { assert_eq!( *d, 0) }
    }
}

#[test]
fn test_mixed_srs_inputs() {
    let utm = srs_epsg( 32718).unwrap();
    let geo = srs_epsg( 4326).unwrap();

    // 4x4 UTM reference tile just east of the zone's central meridian
    let gt = new_geotransform( 500000.0, 30.0, 0.0, 8560020.0, 0.0, -30.0);
    let reference = RasterStack::from_bands( gt, Some(utm.to_wkt().unwrap()), Some(0.0),
        vec![ Array2::from_elem( (4,4), 1u16), Array2::from_elem( (4,4), 100u16) ]).unwrap();

    // lon/lat tile that covers the (slightly inset) 4x4 UTM block east of the reference
    let east_utm = BoundingBox::new( 500125.0, 8559905.0, 500235.0, 8560015.0);
    let east_geo = SrsTransform::new( &utm, &geo).unwrap().transform_bounds( &east_utm, 21).unwrap();
    let (dx, dy) = (east_geo.width() / 8.0, east_geo.height() / 8.0);
    let geo_gt = new_geotransform( east_geo.west, dx, 0.0, east_geo.north, 0.0, -dy);
    let east = RasterStack::from_bands( geo_gt, Some(geo.to_wkt().unwrap()), Some(0.0),
        vec![ Array2::from_elem( (8,8), 1u16), Array2::from_elem( (8,8), 200u16) ]).unwrap();
    println!("geographic tile bounds: {:?}", east.bounds());

    let tiles = vec![ reference, east.clone() ];
    let grid = mosaic_grid( &tiles, 21).unwrap();
    let reprojected = SrsTransform::new( &geo, &utm).unwrap().transform_bounds( &east.bounds(), 21).unwrap();
    println!("reprojected: {reprojected:?}, grid: {:?}", grid.bounds());
    assert!( grid.bounds().contains_box( &reprojected));
    assert_eq!( grid.geo_transform, [500000.0, 30.0, 0.0, 8560020.0, 0.0, -30.0]); // reference phase and resolution
    assert_eq!( (grid.width, grid.height), (8,4));

    let mosaic = merge_tiles( &tiles, 1, 21).unwrap();
    println!("date:\n{:?}", mosaic.bands[DATE_BAND]);
    assert!( mosaic.bands[FLAG_BAND].iter().all( |f| *f == 1));
    let expected_dates: Array2<u16> = Array2::from_shape_fn( (4,8), |(_,c)| if c < 4 { 100 } else { 200 });
    assert_eq!( mosaic.bands[DATE_BAND], expected_dates);
}

#[test]
fn test_declared_no_data_ignored() {
    // input declares 65535 as no-data, only 0 cells are skipped
    let t = tile( 0.0, 60.0, array![[65535,0],[1,1]], array![[7,7],[9,11]])
        .with_band_no_data( vec![ Some(65535.0), Some(65535.0) ]).unwrap();
    let grid = mosaic_grid( &[t.clone()], 21).unwrap();

    let bands = resample_nearest( &t, &grid, &IdentityMapper, Some(SOURCE_NO_DATA), 3).unwrap();
    assert_eq!( bands[FLAG_BAND], array![[65535,3],[1,1]]);

    let mosaic = merge_tiles( &[t], 1, 21).unwrap();
    assert_eq!( mosaic.bands[FLAG_BAND], array![[65535,0],[1,1]]);
    assert_eq!( mosaic.bands[DATE_BAND], array![[0,0],[9,11]]); // not a burn code
}

#[test]
fn test_invalid_inputs() {
    assert!( matches!( merge_tiles( &[], 1, 21), Err(BurnscarMosaicError::EmptyMosaic(_))));

    let gt = new_geotransform( 0.0, 30.0, 0.0, 60.0, 0.0, -30.0);
    let single_band = RasterStack::from_bands( gt, None, Some(0.0), vec![Array2::<u16>::ones((2,2))]).unwrap();
    assert!( matches!( merge_tiles( &[single_band], 1, 21), Err(BurnscarMosaicError::UnsupportedInput(_))));

    let config = MosaicConfig::default();
    assert!( build_mosaic( &config).is_err());
}

#[test]
fn test_build_mosaic_file() {
    let dir = tempfile::tempdir().unwrap();
    let west_path = dir.path().join("west.tif");
    let east_path = dir.path().join("east.tif");
    write_raster_stack( &half_tile( 0.0, 100), &west_path, &TiffOptions::default()).unwrap();
    write_raster_stack( &half_tile( 60.0, 200), &east_path, &TiffOptions::default()).unwrap();

    let config = MosaicConfig {
        inputs: vec![east_path, west_path],
        output: dir.path().join("out").join("mosaic.tif"),
        overview_factors: vec![2],
        ..MosaicConfig::default()
    };
    let report = build_mosaic( &config).unwrap();
    println!("{report:?}");

    assert_eq!( (report.width, report.height), (4,4));
    assert_eq!( report.burned.pixels, 16);
    assert_eq!( report.burned.area_m2, 16.0 * 900.0);

    let ds = Dataset::open( &config.output).unwrap();
    assert_eq!( ds.raster_count(), 2);
    assert_eq!( ds.metadata_item( "resampling", OVERVIEW_METADATA_DOMAIN), Some("nearest".to_string()));
    assert_eq!( ds.rasterband(1).unwrap().no_data_value(), Some(0.0));
}

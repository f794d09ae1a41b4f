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

use chrono::NaiveDate;
use ndarray::{Array2, s};
use geo::{MultiPolygon, Rect, coord};

use burnscar_common::datetime::{epoch_days, unix_epoch_date};
use burnscar_gdal::{
    AttrValue, RasterStack, TiffOptions, VectorFeature, errors::BurnscarGdalError,
    new_geotransform, open_raster_stack, srs_epsg, write_features, write_raster_stack
};
use burnscar_dnbr::{*, errors::BurnscarDnbrError, composite::*, footprints::*};

// run with "cargo test -p burnscar_dnbr -- --nocapture"

const X0: f64 = 300000.0;
const Y0: f64 = 8600120.0;

fn rect (x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
    MultiPolygon::new( vec![ Rect::new( coord!{x: X0 + x0, y: Y0 - 120.0 + y0}, coord!{x: X0 + x1, y: Y0 - 120.0 + y1}).to_polygon() ])
}

fn footprint (geometry: MultiPolygon<f64>, confidence: i64, date: Option<NaiveDate>) -> VectorFeature<MultiPolygon<f64>> {
    VectorFeature::with_attributes( geometry, vec![
        ("confidence".to_string(), AttrValue::Int(confidence)),
        ("acq_date".to_string(), date.map_or( AttrValue::Null, AttrValue::Date)),
    ])
}

/// 4x4 scene at 30m with constant (nir,swir) DN values, QA 0
fn scene (nir: f64, swir: f64) -> RasterStack<f64> {
    let gt = new_geotransform( X0, 30.0, 0.0, Y0, 0.0, -30.0);
    let bands = vec![ Array2::from_elem( (4,4), nir), Array2::from_elem( (4,4), swir), Array2::zeros( (4,4)) ];
    RasterStack::from_bands( gt, None, Some(0.0), bands).unwrap()
}

/// scene with low NIR and high SWIR (a burn scar) in columns c0..c1
fn scarred (c0: usize, c1: usize) -> RasterStack<f64> {
    let mut sc = scene( 4000.0, 1000.0);
    sc.bands[0].slice_mut( s![.., c0..c1]).fill( 1000.0);
    sc.bands[1].slice_mut( s![.., c0..c1]).fill( 3000.0);
    sc
}

/// post-fire scene with a burn scar in columns 1..4
fn burned_scene () -> RasterStack<f64> { scarred( 1, 4) }

fn dated (date: NaiveDate, raster: RasterStack<f64>) -> Scene { Scene { date, raster } }

fn d (y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt( y, m, d).unwrap() }

fn day (date: NaiveDate) -> u16 { epoch_days( unix_epoch_date(), date) as u16 }

#[test]
fn test_masked_reflectance() {
    let mut sc = scene( 4000.0, 1000.0);
    sc.bands[2][[0,0]] = 1024.0; // opaque clouds
    sc.bands[2][[0,1]] = 2048.0; // cirrus
    sc.bands[2][[0,2]] = 256.0;  // other QA bits don't mask
    sc.bands[0][[3,3]] = 0.0;    // no-data

    let (nir, swir) = masked_reflectance( &sc, &SceneBands::default(), 10_000.0).unwrap();
    assert!( nir[[0,0]].is_nan() && swir[[0,0]].is_nan());
    assert!( nir[[0,1]].is_nan());
    assert_eq!( (nir[[0,2]], swir[[0,2]]), (0.4, 0.1));
    assert!( nir[[3,3]].is_nan() && swir[[3,3]].is_nan());

    // NIR/SWIR use their own no-data values
    let sc = sc.with_band_no_data( vec![ Some(4000.0), Some(0.0), Some(0.0) ]).unwrap();
    let (nir, swir) = masked_reflectance( &sc, &SceneBands::default(), 10_000.0).unwrap();
    assert!( nir[[1,1]].is_nan() && swir[[1,1]].is_nan());
    assert_eq!( nir[[3,3]], 0.0); // 0 is a valid NIR value now

    let bad_bands = SceneBands { nir: 1, swir: 2, qa: 4 };
    assert!( matches!( masked_reflectance( &sc, &bad_bands, 10_000.0), Err(BurnscarDnbrError::BandError(_))));
}

#[test]
fn test_median_composite() {
    let mut cloudy = scene( 9000.0, 9000.0);
    cloudy.bands[2].fill( 1024.0);
    cloudy.bands[2][[1,1]] = 0.0;
    let (a, b) = (scene( 2000.0, 1000.0), scene( 4000.0, 1000.0));

    let comp = median_composite( &[&a, &b, &cloudy], &a, &SceneBands::default(), 10_000.0).unwrap();
    assert!( (comp.nir[[0,0]] - 0.3).abs() < 1e-12); // cloudy scene is ignored
    assert!( (comp.nir[[1,1]] - 0.4).abs() < 1e-12); // three valid observations

    let mut all_clouds = scene( 1.0, 1.0);
    all_clouds.bands[2].fill( 3072.0);
    let comp = median_composite( &[&all_clouds], &all_clouds, &SceneBands::default(), 10_000.0).unwrap();
    assert!( comp.nir.iter().all( |v| v.is_nan()));
    assert!( comp.nbr().iter().all( |v| v.is_nan()));
}

#[test]
fn test_nbr_and_dnbr() {
    let reference = scene( 0.0, 0.0);
    let pre = median_composite( &[&scene( 4000.0, 1000.0)], &reference, &SceneBands::default(), 10_000.0).unwrap().nbr();
    let post = median_composite( &[&burned_scene()], &reference, &SceneBands::default(), 10_000.0).unwrap().nbr();
    assert!( (pre[[0,0]] - 0.6).abs() < 1e-12);
    assert!( (post[[0,1]] + 0.5).abs() < 1e-12);

    let delta = dnbr( &pre, &post);
    assert!( delta[[0,0]].abs() < 1e-12);
    assert!( (delta[[0,1]] - 1.1).abs() < 1e-12);
}

#[test]
fn test_scene_windows() {
    let acq = d(2020,9,14);
    let scenes = vec![
        dated( d(2020,7,15), scene( 1.0, 1.0)),  // -61
        dated( d(2020,7,16), scene( 2.0, 1.0)),  // -60
        dated( d(2020,9,13), scene( 3.0, 1.0)),  // -1
        dated( d(2020,9,14), scene( 4.0, 1.0)),  // detection day
        dated( d(2020,9,15), scene( 5.0, 1.0)),  // +1
        dated( d(2020,11,13), scene( 6.0, 1.0)), // +60
    ];
    let config = DnbrConfig::default();

    let pre = scenes_in_window( &scenes, acq, &config.pre_window);
    let post = scenes_in_window( &scenes, acq, &config.post_window);
    assert_eq!( pre.len(), 1);
    assert_eq!( pre[0].bands[0][[0,0]], 2.0);
    assert_eq!( post.len(), 1);
    assert_eq!( post[0].bands[0][[0,0]], 5.0);
}

#[test]
fn test_select_footprints() {
    let features = vec![
        footprint( rect( 0.0, 0.0, 10.0, 10.0), 80, Some(d(2020,9,14))),
        footprint( rect( 0.0, 0.0, 10.0, 10.0), 55, Some(d(2020,9,15))),
        footprint( rect( 0.0, 0.0, 10.0, 10.0), 30, Some(d(2020,9,16))), // low confidence
        footprint( rect( 0.0, 0.0, 10.0, 10.0), 80, None),               // no date
        VectorFeature::new( rect( 0.0, 0.0, 10.0, 10.0)),                // no confidence
    ];
    let selected = select_footprints( &features, "confidence", 55.0, "acq_date");
    assert_eq!( selected.len(), 2);
    assert_eq!( selected[1].date, d(2020,9,15));
}

#[test]
fn test_footprint_cells() {
    let gt = new_geotransform( X0, 30.0, 0.0, Y0, 0.0, -30.0);
    let cells = footprint_cells( &rect( -5.0, 60.0, 62.0, 125.0), &gt, 4, 4).unwrap();
    assert_eq!( cells, vec![ (0,0), (0,1), (1,0), (1,1) ]);

    let outside = footprint_cells( &rect( 500.0, 500.0, 600.0, 600.0), &gt, 4, 4).unwrap();
    assert!( outside.is_empty());
}

#[test]
fn test_classify_scenes() {
    let (early, late) = (d(2020,9,14), d(2020,9,20));
    let features = vec![
        footprint( rect( -5.0, -5.0, 62.0, 125.0), 80, Some(early)),  // columns 0,1
        footprint( rect( 40.0, 60.0, 100.0, 125.0), 55, Some(late)),  // columns 1,2 of rows 0,1
        footprint( rect( 90.0, -5.0, 125.0, 125.0), 30, Some(late)),  // column 3, not confident
    ];
    let footprints = select_footprints( &features, "confidence", 55.0, "acq_date");

    let mut cloudy_post = burned_scene();
    cloudy_post.bands[0][[3,1]] = 4000.0; // looks unburned but is masked
    cloudy_post.bands[2][[3,1]] = 1024.0;

    // both detections see the same pre- and post-fire scenes
    let scenes = vec![
        dated( d(2020,8,1), scene( 4000.0, 1000.0)),
        dated( d(2020,10,1), burned_scene()),
        dated( d(2020,10,5), cloudy_post),
    ];
    let burn = classify_scenes( &scenes, &footprints, &DnbrConfig::default()).unwrap();
    println!("flag:\n{}\ndate:\n{}", burn.bands[FLAG_BAND], burn.bands[DATE_BAND]);

    let flag = &burn.bands[FLAG_BAND];
    let date = &burn.bands[DATE_BAND];
    assert_eq!( burn.geo_transform, scenes[0].raster.geo_transform);
    assert_eq!( burn.no_data, Some(0.0));

    assert!( flag.column(0).iter().all( |f| *f == 0)); // in footprint but not burned
    assert!( flag.column(1).iter().all( |f| *f == 1));
    assert_eq!( flag.column(2).to_vec(), vec![1, 1, 0, 0]);
    assert!( flag.column(3).iter().all( |f| *f == 0)); // burned but only low confidence footprint

    assert_eq!( date.column(1).to_vec(), vec![ day(late), day(late), day(early), day(early) ]); // later date wins
    assert_eq!( date.column(2).to_vec(), vec![ day(late), day(late), 0, 0 ]);
    assert!( date.column(0).iter().all( |v| *v == 0));
}

#[test]
fn test_footprints_use_own_windows() {
    let (spring, autumn) = (d(2020,3,1), d(2020,9,1));
    let footprints = vec![
        DatedFootprint { geometry: rect( -5.0, -5.0, 55.0, 125.0), date: spring }, // columns 0,1
        DatedFootprint { geometry: rect( 40.0, -5.0, 125.0, 125.0), date: autumn }, // columns 1..3
    ];

    let scenes = vec![
        dated( d(2020,2,1), scene( 4000.0, 1000.0)), // spring pre-fire
        dated( d(2020,3,15), scarred( 0, 2)),        // spring post-fire
        dated( d(2020,8,1), scarred( 0, 2)),         // autumn pre-fire, spring scar still visible
        dated( d(2020,9,10), scarred( 0, 4)),        // autumn post-fire
    ];

    let (burn, n_skipped) = classify_footprints( &scenes, &footprints, &DnbrConfig::default()).unwrap();
    println!("flag:\n{}\ndate:\n{}", burn.bands[FLAG_BAND], burn.bands[DATE_BAND]);
    assert_eq!( n_skipped, 0);

    let flag = &burn.bands[FLAG_BAND];
    let date = &burn.bands[DATE_BAND];
    assert!( flag.iter().all( |f| *f == 1));

    // column 1 is in both footprints but only the spring composites show a change there, otherwise the
    // later autumn date would win
    for (col, expected) in [(0, spring), (1, spring), (2, autumn), (3, autumn)] {
        assert!( date.column(col).iter().all( |v| *v == day(expected)), "column {col}");
    }

}

#[test]
fn test_skipped_footprints() {
    let footprints = vec![
        DatedFootprint { geometry: rect( -5.0, -5.0, 125.0, 125.0), date: d(2021,6,1) },  // no scenes around
        DatedFootprint { geometry: rect( -5.0, -5.0, 125.0, 125.0), date: d(1960,1,1) },  // before epoch
    ];
    let scenes = vec![ dated( d(2020,8,1), scene( 4000.0, 1000.0)), dated( d(2020,10,1), burned_scene()) ];

    let (burn, n_skipped) = classify_footprints( &scenes, &footprints, &DnbrConfig::default()).unwrap();
    assert_eq!( n_skipped, 2);
    assert!( burn.bands[FLAG_BAND].iter().all( |f| *f == 0));
}

#[test]
fn test_threshold() {
    let footprints = vec![ DatedFootprint { geometry: rect( -5.0, -5.0, 125.0, 125.0), date: d(2020,9,14) } ];
    let scenes = vec![ dated( d(2020,8,1), scene( 4000.0, 1000.0)), dated( d(2020,10,1), burned_scene()) ];

    let config = DnbrConfig { threshold: 1.2, ..DnbrConfig::default() }; // dNBR of burned columns is 1.1
    let burn = classify_scenes( &scenes, &footprints, &config).unwrap();
    assert!( burn.bands[FLAG_BAND].iter().all( |f| *f == 0));
    assert!( burn.bands[DATE_BAND].iter().all( |v| *v == 0));

    let burn = classify_scenes( &scenes, &footprints, &DnbrConfig::default()).unwrap();
    assert_eq!( burn.bands[FLAG_BAND].iter().filter( |f| **f == 1).count(), 12);
}

#[test]
fn test_invalid_scenes() {
    let config = DnbrConfig::default();

    let mut shifted = burned_scene();
    shifted.geo_transform[0] += 30.0;
    let scenes = vec![ dated( d(2020,8,1), scene( 4000.0, 1000.0)), dated( d(2020,10,1), shifted) ];
    let res = classify_scenes( &scenes, &[], &config);
    assert!( matches!( res, Err(BurnscarDnbrError::GdalError(BurnscarGdalError::GridMismatch(_)))));

    assert!( matches!( classify_scenes( &[], &[], &config), Err(BurnscarDnbrError::NoScenes(_))));
    assert!( matches!( run_dnbr( &config), Err(BurnscarDnbrError::NoScenes(_))));
}

#[test]
fn test_run_dnbr() {
    let dir = tempfile::tempdir().unwrap();
    let srs = srs_epsg( 32718).unwrap();
    let wkt = srs.to_wkt().unwrap();

    let write_scene = |name: &str, date: NaiveDate, sc: RasterStack<f64>| {
        let path = dir.path().join( name);
        let bands = sc.bands.iter().map( |b| b.mapv( |v| v as u16)).collect();
        let sc16 = RasterStack::from_bands( sc.geo_transform, Some(wkt.clone()), Some(0.0), bands).unwrap();
        write_raster_stack( &sc16, &path, &TiffOptions::default()).unwrap();
        SceneFile { path, date }
    };

    let footprint_path = dir.path().join("footprints.gpkg");
    let features = vec![ footprint( rect( -5.0, -5.0, 62.0, 125.0), 80, Some(d(2020,9,14))) ];
    write_features( &footprint_path, Some(&srs), &features).unwrap();

    let config = DnbrConfig {
        scenes: vec![
            write_scene( "pre.tif", d(2020,8,1), scene( 4000.0, 1000.0)),
            write_scene( "post.tif", d(2020,10,1), burned_scene()),
        ],
        footprints: footprint_path,
        output: dir.path().join("burn.tif"),
        overview_factors: vec![2],
        ..DnbrConfig::default()
    };

    let report = run_dnbr( &config).unwrap();
    println!("{report:?}");
    assert_eq!( (report.width, report.height, report.n_footprints, report.n_skipped), (4, 4, 1, 0));
    assert_eq!( report.burned.pixels, 4);
    assert!( (report.burned.area_m2 - 3600.0).abs() < 1e-9);

    let burn = open_raster_stack::<u16,_>( &config.output).unwrap();
    assert_eq!( burn.n_bands(), 2);
    assert_eq!( burn.bands[DATE_BAND][[0,1]], day( d(2020,9,14)));
}

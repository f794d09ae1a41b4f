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

use std::io::Write;
use serde::Deserialize;
use burnscar_common::{BoundingBox, config::{load_config, load_config_or_default, config_from_str}};

// run with "cargo test -p burnscar_common -- --nocapture"

#[test]
fn test_bbox_union() {
    let a = BoundingBox::<f64>::new( 0.0, 0.0, 10.0, 10.0);
    let b = BoundingBox::<f64>::new( 5.0, -5.0, 20.0, 8.0);
    let u = a.union(&b);
    println!("union: {u:?}");

    assert_eq!( u, BoundingBox::new( 0.0, -5.0, 20.0, 10.0));
    assert!( u.contains_box(&a));
    assert!( u.contains_box(&b));
    assert!( !a.contains_box(&b));

    let all = BoundingBox::union_all( [a,b].iter()).unwrap();
    assert_eq!( all, u);
    assert!( BoundingBox::<f64>::union_all( [].iter()).is_none());
}

#[derive(Deserialize,Default,Debug,PartialEq)]
struct TestConfig {
    name: String,
    sizes: Vec<(String,f64)>
}

#[test]
fn test_load_config() {
    let input = r#"( name: "modis", sizes: [ ("MODIS", 1000.0), ("VIIRS", 375.0) ] )"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all( input.as_bytes()).unwrap();

    let config: TestConfig = load_config( file.path()).unwrap();
    assert_eq!( config.name, "modis");
    assert_eq!( config.sizes.len(), 2);
    assert_eq!( config, config_from_str::<TestConfig>(input).unwrap());

    let default_config: TestConfig = load_config_or_default( None).unwrap();
    assert_eq!( default_config, TestConfig::default());

    assert!( config_from_str::<TestConfig>("( name: 42 )").is_err());
}

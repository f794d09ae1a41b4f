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

use std::path::Path;
use anyhow::Result;
use gdal::{Dataset, Metadata};

use burnscar_common::{define_cli, check_cli};
use burnscar_gdal::{get_raster_info, srs_from_wkt};

define_cli! { ARGS [about="show_raster - show size, bounds, SRS and metadata of a GDAL raster dataset"] =
    wkt: bool [help="print full SRS WKT instead of its proj4 string", long],
    path: String [help="path to GDAL dataset to analyze"]
}

fn main ()->Result<()> {
    check_cli!(ARGS);

    let ds = Dataset::open( Path::new( &ARGS.path))?;
    let info = get_raster_info( &ds)?;

    println!("raster size: {} x {} ({} bands)", info.cols, info.rows, info.n_bands);
    println!("resolution:  {} , {}", info.dx, info.dy);
    let bbox = info.bounds();
    println!("bounds:      west={} south={} east={} north={}", bbox.west, bbox.south, bbox.east, bbox.north);

    match &info.srs {
        Some(wkt) if ARGS.wkt => println!("srs:\n{}", wkt),
        Some(wkt) => {
            let proj4 = srs_from_wkt( wkt).ok().and_then( |srs| srs.to_proj4().ok());
            println!("srs:         {}", proj4.unwrap_or_else( || "<no proj4 representation>".to_string()));
        }
        None => println!("srs:         none"),
    }
    show_meta( &ds, 0)?;

    for band_id in 1..=ds.raster_count() {
        let band = ds.rasterband( band_id)?;
        println!("--- band {} : {:?}, no-data: {:?}, overviews: {}", band_id, band.band_type(), band.no_data_value(), band.overview_count()?);
        show_meta( &band, 4)?;
    }

    Ok(())
}

fn show_meta<M> (meta: &M, level: usize)->Result<()> where M: Metadata {
    let indent = " ".repeat( level);

    for domain in meta.metadata_domains() {
        if let Some(items) = meta.metadata_domain( &domain) {
            if !items.is_empty() {
                println!("{}domain: {}", indent, if domain.is_empty() { "<default>" } else { domain.as_str() });
                for item in &items {
                    println!("{}    {}", indent, item);
                }
            }
        }
    }

    Ok(())
}

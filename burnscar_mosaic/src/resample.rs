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

//! nearest neighbour resampling of input rasters onto the mosaic grid

use ndarray::Array2;
use num::ToPrimitive;
use burnscar_gdal::{CoordMapper, RasterStack};

use crate::grid::MosaicGrid;
use crate::errors::Result;

/// resample all bands of `src` onto `grid`. The `mapper` converts from grid SRS into source SRS.
/// Grid cells whose center falls outside of the source or onto a `src_no_data` cell get `fill`. The no-data
/// values declared by `src` are not used
pub fn resample_nearest<T> (src: &RasterStack<T>, grid: &MosaicGrid, mapper: &dyn CoordMapper, src_no_data: Option<f64>, fill: T) -> Result<Vec<Array2<T>>>
    where T: Copy + ToPrimitive
{
    let inv = src.inverse_transform()?;
    let mut bands: Vec<Array2<T>> = (0..src.n_bands()).map( |_| Array2::from_elem( (grid.height, grid.width), fill)).collect();

    for row in 0..grid.height {
        let (mut xs, mut ys) = grid.row_centers( row);
        mapper.map_coords( &mut xs, &mut ys)?;

        for col in 0..grid.width {
            if let Some((src_col,src_row)) = src.pixel_index( &inv, xs[col], ys[col]) {
                for (tgt,sb) in bands.iter_mut().zip( src.bands.iter()) {
                    let v = sb[[src_row,src_col]];
                    if src_no_data.is_none() || v.to_f64() != src_no_data {
                        tgt[[row,col]] = v;
                    }
                }
            }
        }
    }

    Ok(bands)
}

/// zero out the date band wherever the flag band is not the burn code
pub fn mask_dates (flag: &Array2<u16>, date: &mut Array2<u16>, burn_code: u16) {
    date.zip_mut_with( flag, |d,f| if *f != burn_code { *d = 0 });
}

/// elementwise maximum of `acc` and `other`, stored in `acc`
pub fn combine_max (acc: &mut Array2<u16>, other: &Array2<u16>) {
    acc.zip_mut_with( other, |a,b| if *b > *a { *a = *b });
}

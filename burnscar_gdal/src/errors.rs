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

use thiserror::Error;
use gdal::errors::GdalError;

pub type Result<T> = std::result::Result<T, BurnscarGdalError>;

#[derive(Error,Debug)]
pub enum BurnscarGdalError {
    #[error("GDAL error {0}")]
    GdalError( #[from] GdalError),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("array shape error {0}")]
    ShapeError( #[from] ndarray::ShapeError),

    #[error("incompatible grids: {0}")]
    GridMismatch(String),

    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("misc error {0}")]
    MiscError(String),
}

pub fn misc_error (msg: impl ToString)->BurnscarGdalError {
    BurnscarGdalError::MiscError(msg.to_string())
}

pub fn grid_mismatch (msg: impl ToString)->BurnscarGdalError {
    BurnscarGdalError::GridMismatch(msg.to_string())
}

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

use std::path::Path;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::define_error;

define_error!{ pub ConfigError =
    IOError( #[from] std::io::Error) : "config IO error {0}",
    RonError( #[from] ron::error::SpannedError) : "config RON error {0}"
}

pub type Result<T> = std::result::Result<T,ConfigError>;

/// load a RON config from the given file
pub fn load_config<C> (path: impl AsRef<Path>) -> Result<C> where C: DeserializeOwned {
    let path = path.as_ref();
    let data = std::fs::read_to_string( path)?;
    let config = ron::from_str::<C>( &data)?;
    info!("loaded config {:?}", path);
    Ok(config)
}

/// load the config from the optional path, falling back to the default config if there is none
pub fn load_config_or_default<C> (path: Option<&str>) -> Result<C> where C: DeserializeOwned + Default {
    match path {
        Some(path) => load_config( path),
        None => Ok( C::default() )
    }
}

/// parse a RON config from a string (mostly used for embedded defaults and tests)
pub fn config_from_str<C> (s: &str) -> Result<C> where C: DeserializeOwned {
    Ok( ron::from_str::<C>( s)? )
}

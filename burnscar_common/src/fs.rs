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

use std::fs::{self,File};
use std::io::{self,ErrorKind};
use std::path::Path;
use io::ErrorKind::*;

use crate::macros::io_error;

type Result<T> = std::result::Result<T,std::io::Error>;

pub fn filestem <'a,T: AsRef<Path>> (path: &'a T)->Option<&'a str> {
    path.as_ref().file_stem().and_then(|ostr| ostr.to_str())
}

/// check if dir pathname exists and is writable, try to create dir otherwise
pub fn ensure_writable_dir (path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        let md = fs::metadata(&path)?;
        if md.permissions().readonly() {
            Err(io_error!(PermissionDenied, "output_dir {:?} not writable", &path))
        } else {
            Ok(())
        }

    } else {
        fs::create_dir_all(path)
    }
}

/// make sure the parent directory of a file we are going to create exists
pub fn ensure_parent_dir (path: impl AsRef<Path>) -> io::Result<()> {
    match path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => ensure_writable_dir( dir),
        _ => Ok(())
    }
}

pub fn existing_non_empty_file_from_path <P: AsRef<Path>> (path: P)-> Result<File> {
    let path = path.as_ref();
    if path.is_file() {
        let file = File::open(path)?;
        if file.metadata()?.len() > 0 {
            Ok(file)
        } else { Err(io_error!(Other, "file empty: {:?}", path)) }
    } else {
        Err(io_error!(NotFound, "file not found: {:?}", path))
    }
}

/// check that all provided paths exist as non-empty files before we start expensive processing
pub fn check_input_files<P: AsRef<Path>> (paths: &[P]) -> Result<()> {
    for p in paths {
        existing_non_empty_file_from_path( p)?;
    }
    Ok(())
}

/// Note that this does not lowercase the extension
pub fn get_filename_extension<'a> (path: &'a str) -> Option<&'a str> {
    if let Some(idx) = path.rfind('.') {
        if idx < path.len()-1 {
            return Some( path[idx+1..].as_ref() )
        }
    }
    None
}

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

use serde::{Serialize,Deserialize};
use num::{Num,ToPrimitive};

pub mod macros;
pub mod fs;
pub mod datetime;
pub mod config;
pub mod process;

/// a generic bounding box without semantics for the coordinate type.
/// For raster data `north` is the top edge, i.e. north > south for north-up transforms
#[repr(C)]
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct BoundingBox <T: Num> {
    pub west: T,
    pub south: T,
    pub east: T,
    pub north: T
}

impl <T: Num + Copy + ToPrimitive + PartialOrd> BoundingBox<T> {
    pub fn new(west: T, south: T, east: T, north: T)->Self {
        BoundingBox{ west, south, east, north}
    }

    pub fn width (&self) -> T { self.east - self.west }
    pub fn height (&self) -> T { self.north - self.south }

    /// coordinate-wise union of two boxes
    pub fn union (&self, other: &BoundingBox<T>) -> BoundingBox<T> {
        BoundingBox {
            west:  if other.west < self.west { other.west } else { self.west },
            south: if other.south < self.south { other.south } else { self.south },
            east:  if other.east > self.east { other.east } else { self.east },
            north: if other.north > self.north { other.north } else { self.north },
        }
    }

    /// answer if `other` is completely inside of self (boundaries included)
    pub fn contains_box (&self, other: &BoundingBox<T>) -> bool {
        other.west >= self.west && other.east <= self.east && other.south >= self.south && other.north <= self.north
    }

    /// union of all provided boxes, `None` if there are none
    pub fn union_all<'a,I> (boxes: I) -> Option<BoundingBox<T>> where I: IntoIterator<Item=&'a BoundingBox<T>>, T: 'a {
        let mut it = boxes.into_iter();
        let first = *it.next()?;
        Some( it.fold( first, |acc,b| acc.union(b)) )
    }
}

/// square meters per hectare
pub const M2_PER_HA: f64 = 10_000.0;

#[inline] pub fn m2_to_ha (m2: f64)->f64 { m2 / M2_PER_HA }

/// initialize the global tracing subscriber for binaries. Filter directives are taken from RUST_LOG and defaults to `info`
pub fn init_tracing () {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter( filter)
        .with_target(false)
        .init();
}

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

use chrono::{DateTime, Utc};
use serde::{Serialize,Deserialize,Serializer,Deserializer};
use std::{fmt, ops, time::Duration};
use parse_duration::parse;

/// milliseconds since the unix epoch. This is what we use for fix and tick timestamps
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Default)]
pub struct EpochMillis(i64);

impl EpochMillis {
    pub fn now ()->Self { EpochMillis( Utc::now().timestamp_millis()) }

    pub fn new (millis:i64)->Self { EpochMillis(millis) }

    pub fn millis (&self)->i64 { self.0 }

    /// signed number of seconds between self and an earlier timestamp (negative if `earlier` is in the future)
    pub fn secs_since (&self, earlier: EpochMillis)->f64 { (self.0 - earlier.0) as f64 / 1000.0 }

    /// self shifted into the past by `secs` (fractional) seconds
    pub fn minus_secs_f64 (&self, secs: f64)->Self { EpochMillis( self.0 - (secs * 1000.0).round() as i64) }
}

impl fmt::Display for EpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "EpochMillis({})", self.0)
        }
    }
}

impl ops::Add<Duration> for EpochMillis {
    type Output = EpochMillis;
    fn add (self, rhs: Duration)->Self::Output { EpochMillis( self.0 + rhs.as_millis() as i64) }
}

impl ops::Sub<Duration> for EpochMillis {
    type Output = EpochMillis;
    fn sub (self, rhs: Duration)->Self::Output { EpochMillis( self.0 - rhs.as_millis() as i64) }
}

// our own wrappers so that we don't depend on experimental Duration ctors
#[inline] pub fn millis (n: u64)->Duration { Duration::from_millis(n) }
#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }

//--- support for serde

/// accepts human readable durations such as "5s", "80ms" or "10min"
pub fn deserialize_duration <'a,D>(deserializer: D) -> Result<Duration,D::Error>
    where D: Deserializer<'a>
{
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str())
            .map_err( |e| serde::de::Error::custom(format!("{:?}",e)))
    })
}

pub fn serialize_duration<S: Serializer> (dur: &Duration, s: S) -> Result<S::Ok, S::Error>  {
    let dfm = format!("{:?}", dur);
    s.serialize_str(&dfm)
}

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

use std::{fs, path::Path, time::Duration};
use serde::{Serialize,Deserialize};
use odin_common::datetime::{deserialize_duration, serialize_duration, millis, minutes, secs};

pub mod errors;
use errors::Result;

pub mod feed;
pub mod store;
pub mod dead_reckoning;
pub mod info;
pub mod selection;
pub mod squawk;
pub mod rings;
pub mod render;
pub mod location;
pub mod session;
pub mod scheduler;

/// the configuration for a live air picture. Defaults match `configs/airpicture.ron`
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
#[serde(default)]
pub struct AirPictureConfig {
    pub source: String, // name of the feed provider, for logging
    pub feed_url: String, // base url of the point query, position and radius get appended
    pub query_radius_nm: f64,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub poll_interval: Duration,
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub tick_interval: Duration,
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub request_timeout: Duration,

    pub max_trail: usize, // max number of trail points per entity

    pub min_extrapolation_speed: f64, // knots, below that we don't dead reckon
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub max_extrapolation_age: Duration, // older fixes are shown frozen

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub hover_grace: Duration, // debounce for hover-out
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub follow_enter_ease: Duration,
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub follow_ease: Duration,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub location_max_age: Duration, // max age of cached user location for feed queries
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub startup_location_max_age: Duration, // max age of cached user location we restore on startup

    pub ring_radii_nm: Vec<f64>,

    pub label_min_zoom: f64, // zoom level from which we show ground traffic
    pub labels_visible: bool,
}

impl Default for AirPictureConfig {
    fn default()->Self {
        AirPictureConfig {
            source: "airplanes.live".to_string(),
            feed_url: "https://api.airplanes.live/v2/point".to_string(),
            query_radius_nm: 250.0,
            poll_interval: secs(5),
            tick_interval: secs(1),
            request_timeout: secs(10),
            max_trail: 100,
            min_extrapolation_speed: 10.0,
            max_extrapolation_age: secs(30),
            hover_grace: millis(80),
            follow_enter_ease: millis(400),
            follow_ease: millis(1100),
            location_max_age: minutes(10),
            startup_location_max_age: minutes(5),
            ring_radii_nm: vec![50.0, 100.0, 150.0, 200.0, 250.0],
            label_min_zoom: 10.0,
            labels_visible: true,
        }
    }
}

/// load a RON config from the given path
pub fn load_config<P: AsRef<Path>> (path: P)->Result<AirPictureConfig> {
    let bytes = fs::read( path.as_ref())?;
    let config: AirPictureConfig = ron::de::from_bytes( &bytes)?;
    Ok(config)
}

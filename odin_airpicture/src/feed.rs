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

//! the JSON point query feed (airplanes.live / readsb "v2" format) and its conversion into raw fixes

use std::{ops::RangeInclusive, sync::Arc, time::Instant};
use async_trait::async_trait;
use lazy_static::lazy_static;
use reqwest::Client;
use serde::{Serialize,Deserialize,Deserializer};
use serde_json::Value as JsonValue;
use tracing::{debug,info};
use odin_common::geo::GeoPoint;

use crate::{AirPictureConfig, store::Attributes, errors::{OdinAirPictureError, Result}};

lazy_static! {
    /// ICAO 24bit address blocks that are allocated to military operators
    static ref MILITARY_ICAO_BLOCKS: [RangeInclusive<u32>;2] = [
        0x43C000..=0x43FFFF, // UK
        0xAE0000..=0xAFFFFF, // US
    ];
}

/// what we get from a point query. We only need `ac`, the rest is kept for diagnostics
#[derive(Deserialize,Serialize,Debug,Default,Clone)]
pub struct FeedResponse {
    #[serde(default, deserialize_with="deserialize_aircraft_records")]
    pub ac: Vec<FeedAircraft>,
    pub msg: Option<String>,
    pub now: Option<f64>,
    pub total: Option<u64>,
}

/// records with unexpected field types are dropped individually, the rest of the batch is kept
fn deserialize_aircraft_records<'a,D> (deserializer: D)->std::result::Result<Vec<FeedAircraft>,D::Error>
    where D: Deserializer<'a>
{
    let values: Option<Vec<JsonValue>> = Option::deserialize( deserializer)?;
    let records = values.unwrap_or_default().into_iter().filter_map( |v| {
        match serde_json::from_value::<FeedAircraft>( v) {
            Ok(ac) => Some(ac),
            Err(e) => { debug!("dropping unreadable aircraft record: {e}"); None }
        }
    }).collect();
    Ok(records)
}

/// barometric altitude is either a number (feet) or the string "ground"
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
#[serde(untagged)]
pub enum AltitudeValue {
    Feet(f64),
    Text(String)
}

impl AltitudeValue {
    /// "ground", empty and unparsable text all map to 0
    pub fn feet (&self)->f64 {
        match self {
            AltitudeValue::Feet(ft) => *ft,
            AltitudeValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0)
        }
    }
}

/// a single aircraft record of the feed. Everything is optional
#[derive(Deserialize,Serialize,Debug,Default,Clone)]
pub struct FeedAircraft {
    pub hex: Option<String>,
    pub flight: Option<String>,
    pub r: Option<String>, // registration
    pub t: Option<String>, // type code
    pub alt_baro: Option<AltitudeValue>,
    pub alt_geom: Option<f64>,
    pub gs: Option<f64>,
    pub ias: Option<f64>,
    pub mach: Option<f64>,
    pub track: Option<f64>,
    pub baro_rate: Option<f64>,
    pub nav_altitude_mcp: Option<f64>,
    pub nav_altitude_fms: Option<f64>,
    pub nav_heading: Option<f64>,
    pub squawk: Option<String>,
    pub emergency: Option<String>,
    pub category: Option<String>,
    pub seen_pos: Option<f64>,
    pub seen: Option<f64>,
    pub rssi: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub military: Option<bool>,
    #[serde(rename="dbFlags")]
    pub db_flags: Option<u32>,
}

/// a validated fix as it comes from the feed, before it gets reconciled with the store
#[derive(Debug,Clone,PartialEq)]
pub struct RawFix {
    pub id: String, // lower case ICAO address
    pub position: GeoPoint,
    pub ground_speed: Option<f64>, // knots
    pub heading: Option<f64>, // degrees true
    pub fix_age: f64, // seconds between position reception and query time
    pub attributes: Attributes,
}

impl FeedAircraft {
    /// records without id or position are malformed and yield `None`
    pub fn to_raw_fix (&self)->Option<RawFix> {
        let id = self.hex.as_ref().map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())?;
        let (lon,lat) = (self.lon?, self.lat?);
        if !lon.is_finite() || !lat.is_finite() { return None }

        let military = self.is_military(&id);
        let attributes = Attributes {
            callsign: non_empty( &self.flight),
            registration: non_empty( &self.r),
            type_code: non_empty( &self.t),
            altitude_baro: self.alt_baro.as_ref().map( |a| a.feet()).unwrap_or(0.0),
            altitude_geom: self.alt_geom,
            ground_speed: self.gs,
            ias: self.ias,
            mach: self.mach,
            track: self.track,
            vertical_rate: self.baro_rate,
            nav_altitude: self.nav_altitude_mcp.or( self.nav_altitude_fms),
            nav_heading: self.nav_heading,
            squawk: non_empty( &self.squawk),
            emergency: non_empty( &self.emergency),
            category: non_empty( &self.category),
            rssi: self.rssi,
            military,
        };

        Some( RawFix {
            id,
            position: GeoPoint::from_lon_lat_degrees( lon, lat),
            ground_speed: self.gs,
            heading: self.track,
            fix_age: self.seen_pos.or( self.seen).unwrap_or(0.0).max(0.0),
            attributes
        })
    }

    fn is_military (&self, id: &str)->bool {
        if self.military == Some(true) { return true }
        if let Some(flags) = self.db_flags { if flags & 1 != 0 { return true } }
        is_military_address(id)
    }
}

/// is the given hex ICAO address in one of the known military allocation blocks
pub fn is_military_address (hex: &str)->bool {
    match u32::from_str_radix( hex, 16) {
        Ok(addr) => MILITARY_ICAO_BLOCKS.iter().any( |r| r.contains(&addr)),
        Err(_) => false
    }
}

fn non_empty (s: &Option<String>)->Option<String> {
    s.as_ref().map( |s| s.trim()).filter( |s| !s.is_empty()).map( |s| s.to_string())
}

impl FeedResponse {
    /// the valid fixes of this response, malformed records are dropped
    pub fn raw_fixes (&self)->Vec<RawFix> {
        let fixes: Vec<RawFix> = self.ac.iter().filter_map( |a| a.to_raw_fix()).collect();
        let n_dropped = self.ac.len() - fixes.len();
        if n_dropped > 0 {
            debug!("dropped {} malformed aircraft records", n_dropped);
        }
        fixes
    }
}

/// the url for a point query around `center`
pub fn point_query_url (base_url: &str, center: &GeoPoint, radius_nm: f64)->String {
    format!("{}/{:.4}/{:.4}/{:.0}", base_url.trim_end_matches('/'), center.lat, center.lon, radius_nm)
}

/// abstraction of where we get aircraft records from. The live implementation is [HttpFeedSource]
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn query (&self, center: GeoPoint, radius_nm: f64)->Result<FeedResponse>;
}

/// a [FeedSource] that performs http point queries
pub struct HttpFeedSource {
    client: Client,
    base_url: String,
}

impl HttpFeedSource {
    pub fn new (config: &AirPictureConfig)->Result<Self> {
        let client = Client::builder().timeout( config.request_timeout).build()?;
        Ok( HttpFeedSource { client, base_url: config.feed_url.clone() } )
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn query (&self, center: GeoPoint, radius_nm: f64)->Result<FeedResponse> {
        let url = point_query_url( &self.base_url, &center, radius_nm);
        let t0 = Instant::now();

        let response = self.client.get( &url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err( OdinAirPictureError::HttpStatusError( status.as_u16()))
        }

        let data: FeedResponse = response.json().await?;
        info!("retrieved {} aircraft records in {:?}", data.ac.len(), t0.elapsed());
        Ok(data)
    }
}

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

use std::{collections::HashMap, fs, path::{Path,PathBuf}, time::Duration};
use serde::{Serialize,Deserialize};
use tracing::{debug,warn};
use odin_common::{datetime::EpochMillis, geo::GeoPoint};

use crate::errors::Result;

/// the key under which we persist the last known user location
pub const USER_LOCATION_KEY: &str = "userLocation";

/// minimal persistent string store (what a browser would call local storage)
pub trait KeyValueStore: Send {
    fn get (&self, key: &str)->Option<String>;
    fn set (&mut self, key: &str, value: String);
    fn remove (&mut self, key: &str);
}

#[derive(Debug,Default)]
pub struct MemoryStore {
    map: HashMap<String,String>
}

impl MemoryStore {
    pub fn new ()->Self { MemoryStore::default() }
}

impl KeyValueStore for MemoryStore {
    fn get (&self, key: &str)->Option<String> { self.map.get(key).cloned() }
    fn set (&mut self, key: &str, value: String) { self.map.insert( key.to_string(), value); }
    fn remove (&mut self, key: &str) { self.map.remove(key); }
}

/// a [KeyValueStore] that keeps its entries in a JSON file, which is re-written on each change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    map: HashMap<String,String>,
}

impl FileStore {
    /// opens `path`, a missing file results in an empty store
    pub fn open<P: AsRef<Path>> (path: P)->Result<Self> {
        let path = path.as_ref().to_path_buf();
        let map = if path.is_file() {
            let bytes = fs::read( &path)?;
            serde_json::from_slice( &bytes)?
        } else {
            HashMap::new()
        };
        Ok( FileStore { path, map } )
    }

    fn save (&self) {
        match serde_json::to_vec_pretty( &self.map) {
            Ok(bytes) => if let Err(e) = fs::write( &self.path, bytes) {
                warn!("failed to write store {:?}: {}", self.path, e)
            }
            Err(e) => warn!("failed to serialize store {:?}: {}", self.path, e)
        }
    }
}

impl KeyValueStore for FileStore {
    fn get (&self, key: &str)->Option<String> { self.map.get(key).cloned() }
    fn set (&mut self, key: &str, value: String) { self.map.insert( key.to_string(), value); self.save() }
    fn remove (&mut self, key: &str) { if self.map.remove(key).is_some() { self.save() } }
}

/// persisted user location with the (epoch millis) time it was obtained
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct CachedLocation {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub ts: i64,
}

impl CachedLocation {
    pub fn position (&self)->GeoPoint { GeoPoint::from_lon_lat_degrees( self.longitude, self.latitude) }

    /// strictly younger than `max_age` at `now`
    pub fn is_fresh (&self, now: EpochMillis, max_age: Duration)->bool {
        now.millis() - self.ts < max_age.as_millis() as i64
    }
}

/// user location persistence on top of a [KeyValueStore]
pub struct LocationCache {
    store: Box<dyn KeyValueStore>,
}

impl LocationCache {
    pub fn new (store: Box<dyn KeyValueStore>)->Self { LocationCache { store } }

    pub fn store_location (&mut self, pos: &GeoPoint, now: EpochMillis) {
        let loc = CachedLocation { longitude: pos.lon, latitude: pos.lat, ts: now.millis() };
        match serde_json::to_string( &loc) {
            Ok(s) => self.store.set( USER_LOCATION_KEY, s),
            Err(e) => warn!("failed to serialize user location: {e}")
        }
    }

    pub fn cached (&self)->Option<CachedLocation> {
        let s = self.store.get( USER_LOCATION_KEY)?;
        match serde_json::from_str::<CachedLocation>( &s) {
            Ok(loc) => Some(loc),
            Err(e) => { debug!("ignoring invalid cached location: {e}"); None }
        }
    }

    /// the cached location if it is younger than `max_age`
    pub fn recent_location (&self, now: EpochMillis, max_age: Duration)->Option<GeoPoint> {
        self.cached().filter( |loc| loc.is_fresh( now, max_age)).map( |loc| loc.position())
    }

    /// startup variant of [Self::recent_location] that also purges stale or invalid entries
    pub fn restore (&mut self, now: EpochMillis, max_age: Duration)->Option<GeoPoint> {
        let pos = self.recent_location( now, max_age);
        if pos.is_none() {
            self.store.remove( USER_LOCATION_KEY);
        }
        pos
    }
}

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

use std::{collections::{HashMap,HashSet,VecDeque}, fmt, sync::Arc};
use serde::{Serialize,Deserialize};
use odin_common::{collections::RingDeque, datetime::EpochMillis, geo::GeoPoint};

use crate::feed::RawFix;

/// the descriptive (non positional) data of a tracked entity. Numeric fields are `None` if the
/// feed did not report them, except of barometric altitude which is 0 for ground traffic
#[derive(Serialize,Deserialize,Debug,Clone,Default,PartialEq)]
pub struct Attributes {
    pub callsign: Option<String>,
    pub registration: Option<String>,
    pub type_code: Option<String>,
    pub altitude_baro: f64, // feet
    pub altitude_geom: Option<f64>, // feet
    pub ground_speed: Option<f64>, // knots
    pub ias: Option<f64>, // knots
    pub mach: Option<f64>,
    pub track: Option<f64>, // degrees
    pub vertical_rate: Option<f64>, // feet per minute
    pub nav_altitude: Option<f64>, // selected altitude, feet
    pub nav_heading: Option<f64>, // selected heading, degrees
    pub squawk: Option<String>,
    pub emergency: Option<String>,
    pub category: Option<String>,
    pub rssi: Option<f64>, // dBFS
    pub military: bool,
}

impl Attributes {
    pub fn is_emergency (&self)->bool {
        self.emergency.as_ref().map( |e| e != "none").unwrap_or(false)
    }

    pub fn is_on_ground (&self)->bool { self.altitude_baro <= 0.0 }
}

/// the last reported position of an entity together with the kinematics we need to extrapolate it.
/// `timestamp` is the time the position was received, not the time we polled it
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct Fix {
    pub position: GeoPoint,
    pub ground_speed: Option<f64>, // knots
    pub heading: Option<f64>, // degrees true
    pub timestamp: EpochMillis,
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct TrailPoint {
    pub position: GeoPoint,
    pub altitude: f64, // feet
}

#[derive(Debug,Clone)]
pub struct TrackedEntity {
    pub id: Arc<String>, // we keep that in an Arc so that we can hand it out without heap allocation
    pub last_fix: Fix,
    pub attributes: Attributes,
    pub trail: VecDeque<TrailPoint>, // bounded ringbuffer, oldest first
    pub last_update: EpochMillis,
}

impl fmt::Display for TrackedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "TrackedEntity( id: {}", self.id)?;
        if let Some(cs) = &self.attributes.callsign { write!( f, ", cs: \"{cs}\"")?; }
        write!( f, ", pos: {}", self.last_fix.position)?;
        if let Some(gs) = self.last_fix.ground_speed { write!( f, ", spd: {:.0}", gs)?; }
        if let Some(hdg) = self.last_fix.heading { write!( f, ", hdg: {:.0}", hdg)?; }
        write!( f, ", alt: {:.0}, n_trail: {}, time: {})", self.attributes.altitude_baro, self.trail.len(), self.last_fix.timestamp)
    }
}

/// what changed in a reconcile step
#[derive(Debug,Default,Clone,PartialEq)]
pub struct ReconcileReport {
    pub added: Vec<Arc<String>>,
    pub updated: Vec<Arc<String>>,
    pub removed: Vec<Arc<String>>,
}

impl ReconcileReport {
    pub fn is_empty (&self)->bool { self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty() }
}

/// the set of currently tracked entities, keyed by id. The store always reflects the latest
/// successful poll: every poll is a full snapshot of the queried area
pub struct EntityStore {
    entities: HashMap<String,TrackedEntity>,
    max_trail: usize,
}

impl EntityStore {
    pub fn new (max_trail: usize)->Self {
        EntityStore { entities: HashMap::new(), max_trail }
    }

    pub fn len (&self)->usize { self.entities.len() }
    pub fn is_empty (&self)->bool { self.entities.is_empty() }
    pub fn contains (&self, id: &str)->bool { self.entities.contains_key(id) }
    pub fn get (&self, id: &str)->Option<&TrackedEntity> { self.entities.get(id) }
    pub fn iter (&self)->impl Iterator<Item=&TrackedEntity> { self.entities.values() }

    pub fn clear (&mut self) { self.entities.clear() }

    /// merge a complete poll result into the store.
    /// A fix only advances the trail and the fix timestamp if its position differs from the last stored
    /// one. Re-reported positions still update kinematics and attributes but keep the timestamp so
    /// that extrapolation continues instead of snapping back. Entities that are not in `fixes` are removed
    pub fn reconcile (&mut self, fixes: Vec<RawFix>, now: EpochMillis)->ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut seen: HashSet<String> = HashSet::with_capacity( fixes.len());
        let max_trail = self.max_trail;

        for raw in fixes {
            seen.insert( raw.id.clone());
            let timestamp = now.minus_secs_f64( raw.fix_age);
            let trail_point = TrailPoint { position: raw.position, altitude: raw.attributes.altitude_baro };

            if let Some(e) = self.entities.get_mut( raw.id.as_str()) {
                let last_pos = e.trail.last_entry().map( |p| p.position).unwrap_or( e.last_fix.position);
                if last_pos != raw.position {
                    e.trail.push_to_ringbuffer( max_trail, trail_point);
                    e.last_fix = Fix { position: raw.position, ground_speed: raw.ground_speed, heading: raw.heading, timestamp };
                } else {
                    e.last_fix.ground_speed = raw.ground_speed;
                    e.last_fix.heading = raw.heading;
                }
                e.attributes = raw.attributes;
                e.last_update = now;
                report.updated.push( e.id.clone());

            } else {
                let id = Arc::new( raw.id.clone());
                let mut trail = VecDeque::with_capacity( max_trail);
                trail.push_to_ringbuffer( max_trail, trail_point);

                let e = TrackedEntity {
                    id: id.clone(),
                    last_fix: Fix { position: raw.position, ground_speed: raw.ground_speed, heading: raw.heading, timestamp },
                    attributes: raw.attributes,
                    trail,
                    last_update: now,
                };
                self.entities.insert( raw.id, e);
                report.added.push( id);
            }
        }

        let stale: Vec<String> = self.entities.keys().filter( |k| !seen.contains(*k)).cloned().collect();
        for k in stale {
            if let Some(e) = self.entities.remove( &k) {
                report.removed.push( e.id);
            }
        }

        report
    }
}

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

use std::{collections::HashMap, sync::Arc, time::Duration};
use uom::si::{f64::{Length,Time,Velocity}, length::nautical_mile, time::second, velocity::knot};
use odin_common::{angle::Angle360, datetime::EpochMillis, geo::GeoPoint, geo_constants::NM_PER_DEGREE};

use crate::{AirPictureConfig, store::{Attributes, EntityStore, Fix}};

/// flat earth projection of `start` by the distance covered with `speed` in `elapsed` along `heading`.
/// This is only accurate for short distances, which is all we need between two polls
pub fn project (start: &GeoPoint, speed: Velocity, heading: Angle360, elapsed: Time)->GeoPoint {
    let dist: Length = speed * elapsed;
    let nm = dist.get::<nautical_mile>();

    let dlat = nm * heading.cos() / NM_PER_DEGREE;
    let cos_lat = start.lat.to_radians().cos();
    let dlon = if cos_lat.abs() > 1e-9 { nm * heading.sin() / (NM_PER_DEGREE * cos_lat) } else { 0.0 };

    GeoPoint::from_lon_lat_degrees( start.lon + dlon, start.lat + dlat)
}

/// an entity as it should be shown at a given time
#[derive(Debug,Clone)]
pub struct RenderedEntity {
    pub id: Arc<String>,
    pub position: GeoPoint,
    pub extrapolated: bool,
    pub attributes: Attributes,
}

/// the renderable state of all entities at one tick, ordered by id
#[derive(Debug,Clone,Default)]
pub struct Snapshot {
    pub timestamp: EpochMillis,
    entities: Vec<RenderedEntity>,
    index: HashMap<String,usize>,
}

impl Snapshot {
    pub fn new (timestamp: EpochMillis, mut entities: Vec<RenderedEntity>)->Self {
        entities.sort_by( |a,b| a.id.cmp(&b.id));
        let index = entities.iter().enumerate().map( |(i,e)| (e.id.as_ref().clone(), i)).collect();
        Snapshot { timestamp, entities, index }
    }

    pub fn len (&self)->usize { self.entities.len() }
    pub fn is_empty (&self)->bool { self.entities.is_empty() }
    pub fn iter (&self)->impl Iterator<Item=&RenderedEntity> { self.entities.iter() }
    pub fn get (&self, id: &str)->Option<&RenderedEntity> { self.index.get(id).map( |i| &self.entities[*i]) }
    pub fn position (&self, id: &str)->Option<GeoPoint> { self.get(id).map( |e| e.position) }
}

/// computes display positions from the last fixes. Fixes that are too old, have no usable timestamp
/// or belong to slow (taxiing) entities are shown where they were reported
#[derive(Debug,Clone)]
pub struct DeadReckoningEngine {
    min_speed: Velocity,
    max_age: Duration,
}

impl DeadReckoningEngine {
    pub fn new (min_speed_kn: f64, max_age: Duration)->Self {
        DeadReckoningEngine { min_speed: Velocity::new::<knot>(min_speed_kn), max_age }
    }

    pub fn from_config (config: &AirPictureConfig)->Self {
        Self::new( config.min_extrapolation_speed, config.max_extrapolation_age)
    }

    /// the display position of `fix` at `now`, and whether it was extrapolated
    pub fn display_position (&self, fix: &Fix, now: EpochMillis)->(GeoPoint,bool) {
        let (Some(gs), Some(hdg)) = (fix.ground_speed, fix.heading) else { return (fix.position, false) };

        let speed = Velocity::new::<knot>(gs);
        if speed < self.min_speed { return (fix.position, false) }

        let elapsed = now.secs_since( fix.timestamp);
        if elapsed <= 0.0 || elapsed > self.max_age.as_secs_f64() { return (fix.position, false) }

        let pos = project( &fix.position, speed, Angle360::from_degrees(hdg), Time::new::<second>(elapsed));
        (pos, true)
    }

    /// the display state of all entities in `store` at `now`. This never mutates the store
    pub fn tick (&self, store: &EntityStore, now: EpochMillis)->Snapshot {
        let entities = store.iter().map( |e| {
            let (position, extrapolated) = self.display_position( &e.last_fix, now);
            RenderedEntity { id: e.id.clone(), position, extrapolated, attributes: e.attributes.clone() }
        }).collect();

        Snapshot::new( now, entities)
    }
}

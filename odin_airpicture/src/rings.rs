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

use geo_types::LineString;
use geojson::FeatureCollection;
use serde_json::json;
use uom::si::{f64::Length, length::nautical_mile};
use odin_common::geo::{generate_circle, GeoPoint};

use crate::render::{line_feature, point_feature, feature_collection};

/// a single range ring with its label anchor (the northernmost vertex)
#[derive(Debug,Clone)]
pub struct Ring {
    pub radius: Length,
    pub line: LineString<f64>,
    pub label_position: GeoPoint,
    pub label: String,
}

/// the set of concentric range rings around one center
#[derive(Debug,Clone)]
pub struct RingSet {
    pub center: GeoPoint,
    pub rings: Vec<Ring>,
}

impl RingSet {
    pub fn lines (&self)->FeatureCollection {
        feature_collection( self.rings.iter().map( |r| {
            line_feature( &r.line, json!({ "radius_nm": r.radius.get::<nautical_mile>() }))
        }).collect())
    }

    pub fn labels (&self)->FeatureCollection {
        feature_collection( self.rings.iter().map( |r| {
            point_feature( &r.label_position, json!({ "label": r.label }))
        }).collect())
    }
}

/// builds range rings at configured radii. Rings are rebuilt whenever the center changes
#[derive(Debug,Clone)]
pub struct RingGeometryService {
    radii: Vec<Length>,
    current: Option<RingSet>,
}

impl RingGeometryService {
    pub fn new (radii_nm: &[f64])->Self {
        let radii = radii_nm.iter().map( |nm| Length::new::<nautical_mile>(*nm)).collect();
        RingGeometryService { radii, current: None }
    }

    pub fn build (&self, center: &GeoPoint)->RingSet {
        let rings = self.radii.iter().map( |radius| {
            let nm = radius.get::<nautical_mile>();
            let line = generate_circle( center, nm);
            let label_position = line.0.first().map( |c| GeoPoint { lon: c.x, lat: c.y }).unwrap_or(*center);
            Ring { radius: *radius, line, label_position, label: format!("{} nm", nm) }
        }).collect();

        RingSet { center: *center, rings }
    }

    /// rebuild rings for a new center. Returns `None` if the center did not change
    pub fn update_center (&mut self, center: &GeoPoint)->Option<&RingSet> {
        if self.current.as_ref().map( |rs| rs.center == *center).unwrap_or(false) {
            return None
        }
        self.current = Some( self.build( center));
        self.current.as_ref()
    }

    pub fn current (&self)->Option<&RingSet> { self.current.as_ref() }
}

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

//! the renderer seam. Everything the air picture needs from a map widget goes through [MapView],
//! data is handed over as GeoJSON feature collections

use std::{collections::HashMap, time::Duration};
use geo_types::LineString;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use serde_json::json;
use odin_common::geo::GeoPoint;

use crate::{
    dead_reckoning::Snapshot,
    info::{display_label, InfoPanel},
    selection::TrailSample,
    squawk::{is_emergency_squawk, SquawkEvent},
    store::Attributes
};

pub const LIVE_SOURCE: &str = "adsb-live";
pub const TRAIL_SOURCE: &str = "adsb-trails-source";
pub const TRAIL_LAYER: &str = "adsb-trails";
pub const BRACKET_LAYER: &str = "adsb-bracket";
pub const ICON_LAYER: &str = "adsb-icons";
pub const LIVE_LAYERS: [&str;3] = [TRAIL_LAYER, BRACKET_LAYER, ICON_LAYER];

pub const RING_LINES_SOURCE: &str = "range-rings-lines";
pub const RING_LABELS_SOURCE: &str = "range-rings-labels";
pub const RING_LAYERS: [&str;2] = [RING_LINES_SOURCE, RING_LABELS_SOURCE];

pub const SELECTED_TAG: &str = "tag:selected";
pub const HOVER_TAG: &str = "tag:hover";

pub fn label_marker_id (id: &str)->String { format!("label:{id}") }

#[derive(Debug,Clone,PartialEq)]
pub enum MarkerContent {
    Tag(InfoPanel),
    Label(String),
}

/// the operations we need from a map widget
pub trait MapView: Send {
    fn set_source_data (&mut self, source_id: &str, data: FeatureCollection);
    fn set_layer_visibility (&mut self, layer_id: &str, visible: bool);
    fn set_layer_filter (&mut self, layer_id: &str, filter: JsonValue);

    /// add a marker or replace the content of an existing one
    fn show_marker (&mut self, marker_id: &str, position: GeoPoint, content: MarkerContent);
    fn move_marker (&mut self, marker_id: &str, position: GeoPoint);
    fn remove_marker (&mut self, marker_id: &str);

    fn view_center (&self)->GeoPoint;
    fn zoom (&self)->f64;
    fn ease_to (&mut self, center: GeoPoint, duration: Duration);

    fn show_detail_panel (&mut self, panel: &InfoPanel);
    fn hide_detail_panel (&mut self);

    fn notify (&mut self, event: &SquawkEvent) {}
}

//--- GeoJSON construction

fn properties (props: JsonValue)->Option<JsonObject> {
    match props {
        JsonValue::Object(map) => Some(map),
        _ => None
    }
}

pub fn point_feature (pos: &GeoPoint, props: JsonValue)->Feature {
    Feature {
        bbox: None,
        geometry: Some( Geometry::new( Value::Point( pos.to_lon_lat_vec()))),
        id: None,
        properties: properties(props),
        foreign_members: None,
    }
}

pub fn line_feature (line: &LineString<f64>, props: JsonValue)->Feature {
    let coords = line.coords().map( |c| vec![c.x, c.y]).collect();
    Feature {
        bbox: None,
        geometry: Some( Geometry::new( Value::LineString(coords))),
        id: None,
        properties: properties(props),
        foreign_members: None,
    }
}

pub fn feature_collection (features: Vec<Feature>)->FeatureCollection {
    FeatureCollection { bbox: None, features, foreign_members: None }
}

pub fn entity_properties (id: &str, attrs: &Attributes)->JsonValue {
    json!({
        "hex": id,
        "flight": attrs.callsign,
        "r": attrs.registration,
        "t": attrs.type_code,
        "alt_baro": attrs.altitude_baro,
        "alt_geom": attrs.altitude_geom,
        "gs": attrs.ground_speed.unwrap_or(0.0),
        "ias": attrs.ias,
        "mach": attrs.mach,
        "track": attrs.track.unwrap_or(0.0),
        "baro_rate": attrs.vertical_rate.unwrap_or(0.0),
        "nav_altitude": attrs.nav_altitude,
        "nav_heading": attrs.nav_heading,
        "category": attrs.category,
        "emergency": attrs.emergency,
        "squawk": attrs.squawk,
        "rssi": attrs.rssi,
        "military": attrs.military,
        "squawkEmerg": if is_emergency_squawk( attrs.squawk.as_deref()) { 1 } else { 0 },
    })
}

/// the point features of all entities at their display positions
pub fn snapshot_features (snapshot: &Snapshot)->FeatureCollection {
    feature_collection( snapshot.iter().map( |e| point_feature( &e.position, entity_properties( &e.id, &e.attributes))).collect())
}

/// trail points of the selected entity with recency based opacity
pub fn trail_features (samples: &[TrailSample])->FeatureCollection {
    feature_collection( samples.iter().map( |s| point_feature( &s.position, json!({ "alt": s.altitude, "opacity": s.weight }))).collect())
}

//--- visibility rules

/// airborne entities are always shown, ground traffic only from `min_zoom` on
pub fn is_icon_visible (attrs: &Attributes, zoom: f64, min_zoom: f64)->bool {
    attrs.altitude_baro > 0.0 || zoom >= min_zoom
}

/// the renderer side expression of [is_icon_visible]
pub fn icon_filter (min_zoom: f64)->JsonValue {
    json!(["any", [">", ["get", "alt_baro"], 0], [">=", ["zoom"], min_zoom]])
}

/// only the selected entity gets a bracket
pub fn bracket_filter (selected: Option<&str>)->JsonValue {
    json!(["==", ["get", "hex"], selected.unwrap_or("")])
}

/// callsign labels next to visible entities. The selected and hovered entities are excluded since
/// they have their own tags
#[derive(Debug,Default)]
pub struct LabelMarkers {
    shown: HashMap<String,String>, // id -> label text
}

impl LabelMarkers {
    pub fn new ()->Self { LabelMarkers::default() }

    pub fn len (&self)->usize { self.shown.len() }
    pub fn contains (&self, id: &str)->bool { self.shown.contains_key(id) }

    pub fn sync (&mut self, snapshot: &Snapshot, selected: Option<&str>, hovered: Option<&str>, min_zoom: f64, view: &mut dyn MapView) {
        let zoom = view.zoom();
        let mut keep: HashMap<String,String> = HashMap::with_capacity( self.shown.len());

        for e in snapshot.iter() {
            let id = e.id.as_str();
            if Some(id) == selected || Some(id) == hovered || !is_icon_visible( &e.attributes, zoom, min_zoom) {
                continue
            }

            let marker_id = label_marker_id(id);
            let label = display_label( &e.attributes, id);
            match self.shown.remove(id) {
                Some(old) if old == label => view.move_marker( &marker_id, e.position),
                _ => view.show_marker( &marker_id, e.position, MarkerContent::Label( label.clone()))
            }
            keep.insert( id.to_string(), label);
        }

        for id in self.shown.keys() {
            view.remove_marker( &label_marker_id(id));
        }
        self.shown = keep;
    }

    pub fn clear (&mut self, view: &mut dyn MapView) {
        for id in self.shown.keys() {
            view.remove_marker( &label_marker_id(id));
        }
        self.shown.clear();
    }
}

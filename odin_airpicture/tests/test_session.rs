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

use std::{collections::HashMap, sync::{Arc,Mutex}, time::Duration};
use geojson::FeatureCollection;
use serde_json::{json, Value as JsonValue};
use odin_common::{datetime::EpochMillis, geo::GeoPoint};
use odin_airpicture::{
    AirPictureConfig,
    feed::FeedResponse,
    info::InfoPanel,
    location::{KeyValueStore, MemoryStore, USER_LOCATION_KEY},
    render::*,
    selection::SelectionMode,
    session::LiveSession,
    squawk::SquawkEvent
};

const T0: i64 = 1_760_000_000_000;

/// what the session did to the map
#[derive(Debug,Default)]
struct ViewLog {
    sources: HashMap<String,FeatureCollection>,
    visibility: HashMap<String,bool>,
    filters: HashMap<String,JsonValue>,
    markers: HashMap<String,(GeoPoint,MarkerContent)>,
    eases: Vec<(GeoPoint,Duration)>,
    detail: Option<InfoPanel>,
    notifications: Vec<SquawkEvent>,
}

impl ViewLog {
    fn n_features (&self, source_id: &str)->usize {
        self.sources.get(source_id).map( |fc| fc.features.len()).unwrap_or(0)
    }
    fn is_visible (&self, layer_id: &str)->bool {
        self.visibility.get(layer_id).copied().unwrap_or(false)
    }
}

struct RecordingView {
    center: GeoPoint,
    log: Arc<Mutex<ViewLog>>,
}

impl MapView for RecordingView {
    fn set_source_data (&mut self, source_id: &str, data: FeatureCollection) {
        self.log.lock().unwrap().sources.insert( source_id.to_string(), data);
    }
    fn set_layer_visibility (&mut self, layer_id: &str, visible: bool) {
        self.log.lock().unwrap().visibility.insert( layer_id.to_string(), visible);
    }
    fn set_layer_filter (&mut self, layer_id: &str, filter: JsonValue) {
        self.log.lock().unwrap().filters.insert( layer_id.to_string(), filter);
    }
    fn show_marker (&mut self, marker_id: &str, position: GeoPoint, content: MarkerContent) {
        self.log.lock().unwrap().markers.insert( marker_id.to_string(), (position,content));
    }
    fn move_marker (&mut self, marker_id: &str, position: GeoPoint) {
        if let Some(m) = self.log.lock().unwrap().markers.get_mut( marker_id) { m.0 = position }
    }
    fn remove_marker (&mut self, marker_id: &str) {
        self.log.lock().unwrap().markers.remove( marker_id);
    }
    fn view_center (&self)->GeoPoint { self.center }
    fn zoom (&self)->f64 { 8.0 }
    fn ease_to (&mut self, center: GeoPoint, duration: Duration) {
        self.log.lock().unwrap().eases.push( (center,duration));
    }
    fn show_detail_panel (&mut self, panel: &InfoPanel) {
        self.log.lock().unwrap().detail = Some( panel.clone());
    }
    fn hide_detail_panel (&mut self) {
        self.log.lock().unwrap().detail = None;
    }
    fn notify (&mut self, event: &SquawkEvent) {
        self.log.lock().unwrap().notifications.push( event.clone());
    }
}

fn view_center ()->GeoPoint { GeoPoint::from_lon_lat_degrees( -122.049, 37.415) }

fn new_session (kv: MemoryStore, now: EpochMillis)->(LiveSession, Arc<Mutex<ViewLog>>) {
    let log = Arc::new( Mutex::new( ViewLog::default()));
    let view = RecordingView { center: view_center(), log: log.clone() };
    let session = LiveSession::new( Arc::new( AirPictureConfig::default()), Box::new(view), Box::new(kv), now);
    (session, log)
}

fn aircraft (hex: &str, callsign: &str, lon: f64, lat: f64, squawk: &str)->JsonValue {
    json!({
        "hex": hex, "flight": format!("{callsign}  "), "alt_baro": 12000, "gs": 300.0, "track": 90.0,
        "lat": lat, "lon": lon, "seen_pos": 0.0, "squawk": squawk
    })
}

fn response (ac: Vec<JsonValue>)->FeedResponse {
    let total = ac.len();
    serde_json::from_value( json!({ "ac": ac, "msg": "No error", "now": T0 as f64, "total": total })).unwrap()
}

fn two_aircraft ()->FeedResponse {
    response( vec![
        aircraft( "a1b2c3", "SWA123", -122.0, 37.5, "1200"),
        aircraft( "a4d5e6", "UAL456", -122.2, 37.3, "4521"),
    ])
}

// run with "cargo test test_disabled_session -- --nocapture"

#[test]
fn test_disabled_session() {
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    assert!( !session.is_enabled());
    assert!( !log.lock().unwrap().is_visible( ICON_LAYER));
    assert_eq!( log.lock().unwrap().n_features( RING_LINES_SOURCE), 5); // rings are independent of the overlay

    let report = session.apply_feed( &two_aircraft(), EpochMillis::new(T0));
    assert!( report.is_empty());
    assert!( session.store().is_empty());
    assert_eq!( log.lock().unwrap().n_features( LIVE_SOURCE), 0);
}

#[test]
fn test_enable_and_apply() {
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    session.enable();
    for layer in LIVE_LAYERS { assert!( log.lock().unwrap().is_visible( layer)) }

    let report = session.apply_feed( &two_aircraft(), EpochMillis::new(T0));
    println!("{report:?}");
    assert_eq!( report.added.len(), 2);
    assert_eq!( session.store().len(), 2);
    assert_eq!( session.snapshot().len(), 2);

    let log = log.lock().unwrap();
    assert_eq!( log.n_features( LIVE_SOURCE), 2);
    assert_eq!( session.labels().len(), 2);
    assert!( matches!( log.markers.get( &label_marker_id("a1b2c3")), Some((_, MarkerContent::Label(l))) if l == "SWA123"));
}

#[test]
fn test_tick_extrapolates() {
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    session.enable();
    session.apply_feed( &two_aircraft(), EpochMillis::new(T0));
    let p0 = session.snapshot().position("a1b2c3").unwrap();

    session.tick( EpochMillis::new(T0 + 10_000));
    let p1 = session.snapshot().position("a1b2c3").unwrap();
    println!("{p0:?} -> {p1:?}");
    assert!( p1.lon > p0.lon); // eastbound
    assert!( session.snapshot().get("a1b2c3").unwrap().extrapolated);

    let label_pos = log.lock().unwrap().markers.get( &label_marker_id("a1b2c3")).unwrap().0;
    assert_eq!( label_pos, p1);
}

#[test]
fn test_click_entity() {
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    session.enable();
    session.apply_feed( &two_aircraft(), EpochMillis::new(T0));

    session.click_entity("a1b2c3");
    assert_eq!( session.selection().mode(), SelectionMode::Selected);
    {
        let log = log.lock().unwrap();
        assert!( matches!( log.markers.get( SELECTED_TAG), Some((_, MarkerContent::Tag(p))) if p.id == "a1b2c3"));
        assert!( !log.markers.contains_key( &label_marker_id("a1b2c3"))); // the tag replaces the label
        assert_eq!( log.n_features( TRAIL_SOURCE), 1);
        assert_eq!( log.filters.get( BRACKET_LAYER), Some( &bracket_filter( Some("a1b2c3"))));
    }

    session.click_entity("nothere"); // unknown ids are ignored
    assert!( session.selection().is_selected("a1b2c3"));

    session.click_background();
    assert_eq!( session.selection().mode(), SelectionMode::Idle);
    let log = log.lock().unwrap();
    assert!( !log.markers.contains_key( SELECTED_TAG));
    assert!( log.markers.contains_key( &label_marker_id("a1b2c3")));
    assert_eq!( log.n_features( TRAIL_SOURCE), 0);
    assert_eq!( log.filters.get( BRACKET_LAYER), Some( &bracket_filter( None)));
}

#[test]
fn test_follow() {
    let config = AirPictureConfig::default();
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    session.enable();
    session.apply_feed( &two_aircraft(), EpochMillis::new(T0));

    session.toggle_follow(); // nothing selected
    assert!( log.lock().unwrap().eases.is_empty());

    session.click_entity("a1b2c3");
    session.toggle_follow();
    assert_eq!( session.selection().mode(), SelectionMode::Following);
    {
        let log = log.lock().unwrap();
        assert!( log.detail.as_ref().map( |p| p.id == "a1b2c3").unwrap_or(false));
        assert_eq!( log.eases.last().map( |e| e.1), Some( config.follow_enter_ease));
    }

    session.tick( EpochMillis::new(T0 + 1000));
    {
        let log = log.lock().unwrap();
        let (center, duration) = log.eases.last().unwrap().clone();
        assert_eq!( duration, config.follow_ease);
        assert_eq!( Some(center), session.snapshot().position("a1b2c3"));
    }

    session.click_background(); // does not drop a followed entity
    assert_eq!( session.selection().mode(), SelectionMode::Following);

    session.toggle_follow();
    assert_eq!( session.selection().mode(), SelectionMode::Selected);
    assert!( log.lock().unwrap().detail.is_none());
}

#[test]
fn test_removed_selection() {
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    session.enable();
    session.apply_feed( &two_aircraft(), EpochMillis::new(T0));
    session.click_entity("a1b2c3");
    session.toggle_follow();

    let report = session.apply_feed( &response( vec![ aircraft( "a4d5e6", "UAL456", -122.2, 37.3, "4521")]), EpochMillis::new(T0 + 5000));
    assert_eq!( report.removed.len(), 1);
    assert_eq!( session.selection().mode(), SelectionMode::Idle);

    let log = log.lock().unwrap();
    assert!( !log.markers.contains_key( SELECTED_TAG));
    assert!( !log.markers.contains_key( &label_marker_id("a1b2c3")));
    assert!( log.detail.is_none());
    assert_eq!( log.n_features( TRAIL_SOURCE), 0);
    assert_eq!( log.n_features( LIVE_SOURCE), 1);
}

#[test]
fn test_hover() {
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    session.enable();
    session.apply_feed( &two_aircraft(), EpochMillis::new(T0));

    session.hover( Some("a4d5e6"), EpochMillis::new(T0));
    assert!( log.lock().unwrap().markers.contains_key( HOVER_TAG));
    assert!( !log.lock().unwrap().markers.contains_key( &label_marker_id("a4d5e6")));

    session.hover( None, EpochMillis::new(T0 + 10));
    session.tick( EpochMillis::new(T0 + 50)); // still within grace period
    assert!( log.lock().unwrap().markers.contains_key( HOVER_TAG));

    session.tick( EpochMillis::new(T0 + 100));
    assert!( !log.lock().unwrap().markers.contains_key( HOVER_TAG));
    assert!( log.lock().unwrap().markers.contains_key( &label_marker_id("a4d5e6")));
}

#[test]
fn test_expire_hover() {
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    session.enable();
    session.apply_feed( &two_aircraft(), EpochMillis::new(T0));

    session.hover( Some("a4d5e6"), EpochMillis::new(T0));
    session.hover( None, EpochMillis::new(T0 + 10));
    session.expire_hover( EpochMillis::new(T0 + 50));
    assert!( log.lock().unwrap().markers.contains_key( HOVER_TAG));

    session.expire_hover( EpochMillis::new(T0 + 90)); // no tick needed
    assert!( !log.lock().unwrap().markers.contains_key( HOVER_TAG));
    assert!( log.lock().unwrap().markers.contains_key( &label_marker_id("a4d5e6")));
}

#[test]
fn test_disable() {
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    session.enable();
    session.apply_feed( &two_aircraft(), EpochMillis::new(T0));
    session.click_entity("a1b2c3");
    session.hover( Some("a4d5e6"), EpochMillis::new(T0));

    session.disable();
    assert!( session.store().is_empty());
    assert!( session.snapshot().is_empty());
    assert_eq!( session.selection().mode(), SelectionMode::Idle);
    assert!( session.selection().hovered().is_none());

    let log = log.lock().unwrap();
    println!("remaining markers: {:?}", log.markers.keys().collect::<Vec<_>>());
    assert!( log.markers.is_empty());
    assert_eq!( log.n_features( LIVE_SOURCE), 0);
    assert_eq!( log.n_features( TRAIL_SOURCE), 0);
    for layer in LIVE_LAYERS { assert!( !log.is_visible( layer)) }
}

#[test]
fn test_labels_toggle() {
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    session.enable();
    session.apply_feed( &two_aircraft(), EpochMillis::new(T0));
    assert_eq!( session.labels().len(), 2);

    session.set_labels_visible( false);
    assert_eq!( session.labels().len(), 0);
    assert!( log.lock().unwrap().markers.is_empty());

    session.set_labels_visible( true);
    assert_eq!( session.labels().len(), 2);
}

#[test]
fn test_squawk_notification() {
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    session.enable();
    session.apply_feed( &two_aircraft(), EpochMillis::new(T0));
    assert!( log.lock().unwrap().notifications.is_empty());

    session.apply_feed( &response( vec![
        aircraft( "a1b2c3", "SWA123", -121.99, 37.5, "7700"),
        aircraft( "a4d5e6", "UAL456", -122.19, 37.3, "4521"),
    ]), EpochMillis::new(T0 + 5000));

    let log = log.lock().unwrap();
    assert_eq!( log.notifications.len(), 1);
    println!("{}", log.notifications[0]);
}

#[test]
fn test_query_center() {
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    assert_eq!( session.query_center( EpochMillis::new(T0)), view_center());
    assert_eq!( session.rings().current().unwrap().center, view_center());

    let user = GeoPoint::from_lon_lat_degrees( -121.5, 38.0);
    session.set_user_location( &user, EpochMillis::new(T0));
    assert_eq!( session.query_center( EpochMillis::new(T0 + 60_000)), user);
    assert_eq!( session.rings().current().unwrap().center, user);

    assert_eq!( session.query_center( EpochMillis::new(T0 + 600_000)), view_center()); // too old
}

#[test]
fn test_restore_location() {
    let user = GeoPoint::from_lon_lat_degrees( -121.5, 38.0);
    let entry = format!(r#"{{"longitude":{},"latitude":{},"ts":{}}}"#, user.lon, user.lat, T0);

    let mut kv = MemoryStore::new();
    kv.set( USER_LOCATION_KEY, entry.clone());
    let (session, _) = new_session( kv, EpochMillis::new(T0 + 4 * 60_000));
    assert_eq!( session.rings().current().unwrap().center, user);

    let mut kv = MemoryStore::new();
    kv.set( USER_LOCATION_KEY, entry);
    let (session, _) = new_session( kv, EpochMillis::new(T0 + 6 * 60_000));
    assert_eq!( session.rings().current().unwrap().center, view_center());
}

#[test]
fn test_rings_toggle() {
    let (mut session, log) = new_session( MemoryStore::new(), EpochMillis::new(T0));
    session.set_rings_visible( false);
    for layer in RING_LAYERS { assert!( !log.lock().unwrap().is_visible( layer)) }
    session.set_rings_visible( true);
    for layer in RING_LAYERS { assert!( log.lock().unwrap().is_visible( layer)) }
}

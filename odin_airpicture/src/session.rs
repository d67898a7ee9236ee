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

use std::{sync::Arc, time::Instant};
use tracing::{debug,info};
use odin_common::{datetime::EpochMillis, geo::GeoPoint};

use crate::{
    AirPictureConfig,
    dead_reckoning::{DeadReckoningEngine, Snapshot},
    feed::FeedResponse,
    location::{KeyValueStore, LocationCache},
    render::{
        bracket_filter, feature_collection, icon_filter, snapshot_features, trail_features, LabelMarkers, MapView, MarkerContent,
        BRACKET_LAYER, HOVER_TAG, ICON_LAYER, LIVE_LAYERS, LIVE_SOURCE, RING_LABELS_SOURCE, RING_LAYERS, RING_LINES_SOURCE, SELECTED_TAG, TRAIL_SOURCE
    },
    rings::RingGeometryService,
    selection::{SelectionController, SelectionEffect},
    squawk::SquawkMonitor,
    store::{EntityStore, ReconcileReport}
};

/// the live air picture: owns all state and drives the [MapView].
/// The session itself is passive, poll results and ticks are pushed in by the
/// [crate::scheduler::PollScheduler] (or by tests)
pub struct LiveSession {
    config: Arc<AirPictureConfig>,
    store: EntityStore,
    engine: DeadReckoningEngine,
    selection: SelectionController,
    squawks: SquawkMonitor,
    labels: LabelMarkers,
    rings: RingGeometryService,
    location: LocationCache,
    view: Box<dyn MapView>,
    snapshot: Snapshot,

    enabled: bool,
    labels_visible: bool,
    rings_visible: bool,
}

impl LiveSession {
    pub fn new (config: Arc<AirPictureConfig>, view: Box<dyn MapView>, kv_store: Box<dyn KeyValueStore>, now: EpochMillis)->Self {
        let mut location = LocationCache::new( kv_store);
        let ring_center = location.restore( now, config.startup_location_max_age).unwrap_or_else( || view.view_center());

        let mut session = LiveSession {
            store: EntityStore::new( config.max_trail),
            engine: DeadReckoningEngine::from_config( &config),
            selection: SelectionController::from_config( &config),
            squawks: SquawkMonitor::new(),
            labels: LabelMarkers::new(),
            rings: RingGeometryService::new( &config.ring_radii_nm),
            location,
            view,
            snapshot: Snapshot::default(),
            enabled: false,
            labels_visible: config.labels_visible,
            rings_visible: true,
            config,
        };
        session.init_layers( &ring_center);
        session
    }

    fn init_layers (&mut self, ring_center: &GeoPoint) {
        self.view.set_source_data( LIVE_SOURCE, feature_collection( Vec::new()));
        self.view.set_source_data( TRAIL_SOURCE, feature_collection( Vec::new()));
        self.view.set_layer_filter( ICON_LAYER, icon_filter( self.config.label_min_zoom));
        self.view.set_layer_filter( BRACKET_LAYER, bracket_filter( None));
        for layer in LIVE_LAYERS {
            self.view.set_layer_visibility( layer, false);
        }
        self.update_rings( ring_center);
    }

    //--- accessors

    pub fn config (&self)->&AirPictureConfig { &self.config }
    pub fn is_enabled (&self)->bool { self.enabled }
    pub fn store (&self)->&EntityStore { &self.store }
    pub fn selection (&self)->&SelectionController { &self.selection }
    pub fn snapshot (&self)->&Snapshot { &self.snapshot }
    pub fn labels (&self)->&LabelMarkers { &self.labels }
    pub fn rings (&self)->&RingGeometryService { &self.rings }

    //--- overlay lifecycle

    pub fn enable (&mut self) {
        if !self.enabled {
            self.enabled = true;
            for layer in LIVE_LAYERS {
                self.view.set_layer_visibility( layer, true);
            }
            info!("live air picture enabled");
        }
    }

    /// discards all entity, trail, selection and hover state
    pub fn disable (&mut self) {
        if self.enabled {
            self.enabled = false;

            let effects = self.selection.reset();
            self.apply_effects( effects);
            self.labels.clear( self.view.as_mut());
            self.store.clear();
            self.squawks.clear();
            self.snapshot = Snapshot::default();

            self.view.set_source_data( LIVE_SOURCE, feature_collection( Vec::new()));
            self.view.set_source_data( TRAIL_SOURCE, feature_collection( Vec::new()));
            self.view.set_layer_filter( BRACKET_LAYER, bracket_filter( None));
            for layer in LIVE_LAYERS {
                self.view.set_layer_visibility( layer, false);
            }
            info!("live air picture disabled");
        }
    }

    //--- data flow

    /// where the next feed query should be centered: a recent user location, or the view center
    pub fn query_center (&self, now: EpochMillis)->GeoPoint {
        self.location.recent_location( now, self.config.location_max_age).unwrap_or_else( || self.view.view_center())
    }

    /// reconcile a poll result and re-render
    pub fn apply_feed (&mut self, response: &FeedResponse, now: EpochMillis)->ReconcileReport {
        if !self.enabled {
            debug!("ignoring feed data for disabled air picture");
            return ReconcileReport::default()
        }

        let fixes = response.raw_fixes();
        let report = self.store.reconcile( fixes, now);
        debug!("reconciled {} added, {} updated, {} removed", report.added.len(), report.updated.len(), report.removed.len());

        for event in self.squawks.update( &self.store, &report) {
            self.view.notify( &event);
        }

        for id in &report.removed {
            let effects = self.selection.on_entity_removed( id);
            self.apply_effects( effects);
        }

        self.tick( now);

        let effects = self.selection.refresh( &self.snapshot);
        self.apply_effects( effects);
        self.update_trail();

        report
    }

    /// recompute display positions and move everything that follows entities
    pub fn tick (&mut self, now: EpochMillis) {
        if !self.enabled { return }

        self.snapshot = self.engine.tick( &self.store, now);
        self.view.set_source_data( LIVE_SOURCE, snapshot_features( &self.snapshot));

        let mut effects = self.selection.update( now);
        effects.extend( self.selection.on_tick( &self.snapshot));
        self.apply_effects( effects);
        self.sync_labels();
    }

    //--- user interaction

    pub fn click_entity (&mut self, id: &str) {
        if !self.enabled { return }
        let effects = self.selection.select_entity( id, &self.snapshot);
        self.apply_effects( effects);
        self.sync_labels();
    }

    pub fn click_background (&mut self) {
        let effects = self.selection.click_background();
        self.apply_effects( effects);
        self.sync_labels();
    }

    pub fn hover (&mut self, id: Option<&str>, now: EpochMillis) {
        if !self.enabled { return }
        let effects = self.selection.set_hover( id, now, &self.snapshot);
        self.apply_effects( effects);
        self.sync_labels();
    }

    /// process a pending hover-out without waiting for the next tick
    pub fn expire_hover (&mut self, now: EpochMillis) {
        let effects = self.selection.update( now);
        if !effects.is_empty() {
            self.apply_effects( effects);
            self.sync_labels();
        }
    }

    pub fn toggle_follow (&mut self) {
        let effects = self.selection.toggle_follow( &self.snapshot);
        self.apply_effects( effects);
    }

    pub fn set_labels_visible (&mut self, visible: bool) {
        self.labels_visible = visible;
        self.sync_labels();
    }

    pub fn set_rings_visible (&mut self, visible: bool) {
        self.rings_visible = visible;
        for layer in RING_LAYERS {
            self.view.set_layer_visibility( layer, visible);
        }
    }

    /// a new user position: persist it and move the range rings
    pub fn set_user_location (&mut self, pos: &GeoPoint, now: EpochMillis) {
        self.location.store_location( pos, now);
        self.update_rings( pos);
    }

    //--- internals

    fn update_rings (&mut self, center: &GeoPoint) {
        if let Some(ring_set) = self.rings.update_center( center) {
            self.view.set_source_data( RING_LINES_SOURCE, ring_set.lines());
            self.view.set_source_data( RING_LABELS_SOURCE, ring_set.labels());
        }
    }

    fn update_trail (&mut self) {
        let samples = self.selection.derived_trail( &self.store);
        self.view.set_source_data( TRAIL_SOURCE, trail_features( &samples));
        self.view.set_layer_filter( BRACKET_LAYER, bracket_filter( self.selection.selected().map( |id| id.as_str())));
    }

    fn sync_labels (&mut self) {
        if self.labels_visible && self.enabled {
            let selected = self.selection.selected().map( |id| id.as_str());
            let hovered = self.selection.hovered().map( |id| id.as_str());
            self.labels.sync( &self.snapshot, selected, hovered, self.config.label_min_zoom, self.view.as_mut());
        } else {
            self.labels.clear( self.view.as_mut());
        }
    }

    fn apply_effects (&mut self, effects: Vec<SelectionEffect>) {
        for effect in effects {
            match effect {
                SelectionEffect::ShowTag { id, position, panel } => self.view.show_marker( SELECTED_TAG, position, MarkerContent::Tag(panel)),
                SelectionEffect::MoveTag { position } => self.view.move_marker( SELECTED_TAG, position),
                SelectionEffect::HideTag => self.view.remove_marker( SELECTED_TAG),
                SelectionEffect::ShowHoverTag { id, position, panel } => self.view.show_marker( HOVER_TAG, position, MarkerContent::Tag(panel)),
                SelectionEffect::MoveHoverTag { position } => self.view.move_marker( HOVER_TAG, position),
                SelectionEffect::HideHoverTag => self.view.remove_marker( HOVER_TAG),
                SelectionEffect::ShowDetailPanel(panel) => self.view.show_detail_panel( &panel),
                SelectionEffect::HideDetailPanel => self.view.hide_detail_panel(),
                SelectionEffect::Recenter { center, duration } => self.view.ease_to( center, duration),
                SelectionEffect::TrailChanged => self.update_trail(),
            }
        }
    }
}

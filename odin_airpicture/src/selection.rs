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

//! selection, hover and follow state of the air picture.
//!
//! The controller does not talk to the map view directly. Each operation returns the
//! [SelectionEffect]s that have to be applied to the view, which keeps state transitions
//! testable without a renderer. The invariants are:
//!  - following implies a selection
//!  - the hovered entity is never the selected one
//!  - a newly selected entity is never followed

use std::{sync::Arc, time::Duration};
use odin_common::{datetime::EpochMillis, geo::GeoPoint};

use crate::{
    AirPictureConfig,
    dead_reckoning::Snapshot,
    info::InfoPanel,
    store::EntityStore
};

#[derive(Debug,Clone,PartialEq)]
pub enum SelectionEffect {
    ShowTag { id: Arc<String>, position: GeoPoint, panel: InfoPanel },
    MoveTag { position: GeoPoint },
    HideTag,
    ShowHoverTag { id: Arc<String>, position: GeoPoint, panel: InfoPanel },
    MoveHoverTag { position: GeoPoint },
    HideHoverTag,
    ShowDetailPanel(InfoPanel),
    HideDetailPanel,
    Recenter { center: GeoPoint, duration: Duration },
    TrailChanged,
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum SelectionMode {
    Idle,
    Selected,
    Following,
}

/// a trail point of the selected entity, weighted by recency (oldest 1/n .. newest 1.0)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct TrailSample {
    pub position: GeoPoint,
    pub altitude: f64,
    pub weight: f64,
}

#[derive(Debug)]
pub struct SelectionController {
    selected: Option<Arc<String>>,
    hovered: Option<Arc<String>>,
    following: bool,
    hover_clear_at: Option<EpochMillis>, // pending hover-out

    hover_grace: Duration,
    follow_enter_ease: Duration,
    follow_ease: Duration,
}

impl SelectionController {
    pub fn new (hover_grace: Duration, follow_enter_ease: Duration, follow_ease: Duration)->Self {
        SelectionController { selected: None, hovered: None, following: false, hover_clear_at: None, hover_grace, follow_enter_ease, follow_ease }
    }

    pub fn from_config (config: &AirPictureConfig)->Self {
        Self::new( config.hover_grace, config.follow_enter_ease, config.follow_ease)
    }

    pub fn selected (&self)->Option<&Arc<String>> { self.selected.as_ref() }
    pub fn hovered (&self)->Option<&Arc<String>> { self.hovered.as_ref() }
    pub fn is_following (&self)->bool { self.following }
    pub fn is_selected (&self, id: &str)->bool { self.selected.as_ref().map( |s| s.as_str() == id).unwrap_or(false) }
    pub fn is_hovered (&self, id: &str)->bool { self.hovered.as_ref().map( |s| s.as_str() == id).unwrap_or(false) }

    pub fn mode (&self)->SelectionMode {
        if self.following { SelectionMode::Following }
        else if self.selected.is_some() { SelectionMode::Selected }
        else { SelectionMode::Idle }
    }

    /// select `id`, or deselect it if it already is selected. Ids that are not in `snapshot` are ignored
    pub fn select_entity (&mut self, id: &str, snapshot: &Snapshot)->Vec<SelectionEffect> {
        if self.is_selected(id) {
            return self.clear_selection()
        }
        let Some(e) = snapshot.get(id) else { return Vec::new() };

        let mut effects = Vec::new();
        if self.following {
            self.following = false;
            effects.push( SelectionEffect::HideDetailPanel);
        }
        if self.is_hovered(id) {
            self.clear_hover( &mut effects);
        }

        self.selected = Some(e.id.clone());
        effects.push( SelectionEffect::ShowTag { id: e.id.clone(), position: e.position, panel: InfoPanel::tag( &e.id, &e.attributes, false) });
        effects.push( SelectionEffect::TrailChanged);
        effects
    }

    pub fn clear_selection (&mut self)->Vec<SelectionEffect> {
        let mut effects = Vec::new();
        if self.selected.take().is_some() {
            if self.following {
                self.following = false;
                effects.push( SelectionEffect::HideDetailPanel);
            }
            effects.push( SelectionEffect::HideTag);
            effects.push( SelectionEffect::TrailChanged);
        }
        effects
    }

    /// a click on the map outside of any entity. This does not drop a followed selection
    pub fn click_background (&mut self)->Vec<SelectionEffect> {
        if self.following { Vec::new() } else { self.clear_selection() }
    }

    /// pointer enters (`Some`) or leaves (`None`) an entity. Leaving is debounced by the hover grace period
    /// so that moving between adjacent entities does not flicker
    pub fn set_hover (&mut self, id: Option<&str>, now: EpochMillis, snapshot: &Snapshot)->Vec<SelectionEffect> {
        let mut effects = Vec::new();

        match id {
            Some(id) => {
                if self.is_selected(id) { return effects }
                let Some(e) = snapshot.get(id) else { return effects };

                self.hover_clear_at = None;
                if !self.is_hovered(id) {
                    self.hovered = Some(e.id.clone());
                    effects.push( SelectionEffect::ShowHoverTag { id: e.id.clone(), position: e.position, panel: InfoPanel::tag( &e.id, &e.attributes, false) });
                }
            }
            None => {
                if self.hovered.is_some() && self.hover_clear_at.is_none() {
                    self.hover_clear_at = Some( now + self.hover_grace);
                }
            }
        }
        effects
    }

    /// process expired hover-out debounces
    pub fn update (&mut self, now: EpochMillis)->Vec<SelectionEffect> {
        let mut effects = Vec::new();
        if let Some(deadline) = self.hover_clear_at {
            if now >= deadline {
                self.clear_hover( &mut effects);
            }
        }
        effects
    }

    /// switch follow mode of the current selection. This is a no-op without selection
    pub fn toggle_follow (&mut self, snapshot: &Snapshot)->Vec<SelectionEffect> {
        let mut effects = Vec::new();
        let Some(e) = self.selected.as_ref().and_then( |id| snapshot.get(id)) else { return effects };

        self.following = !self.following;
        effects.push( SelectionEffect::ShowTag { id: e.id.clone(), position: e.position, panel: InfoPanel::tag( &e.id, &e.attributes, self.following) });
        if self.following {
            effects.push( SelectionEffect::ShowDetailPanel( InfoPanel::detail( &e.id, &e.attributes)));
            effects.push( SelectionEffect::Recenter { center: e.position, duration: self.follow_enter_ease });
        } else {
            effects.push( SelectionEffect::HideDetailPanel);
        }
        effects
    }

    /// `id` is no longer tracked
    pub fn on_entity_removed (&mut self, id: &str)->Vec<SelectionEffect> {
        let mut effects = Vec::new();
        if self.is_selected(id) {
            effects = self.clear_selection();
        }
        if self.is_hovered(id) {
            self.clear_hover( &mut effects);
        }
        effects
    }

    /// keep tags on their entities and the view on the followed entity
    pub fn on_tick (&mut self, snapshot: &Snapshot)->Vec<SelectionEffect> {
        let mut effects = Vec::new();

        if let Some(pos) = self.selected.as_ref().and_then( |id| snapshot.position(id)) {
            effects.push( SelectionEffect::MoveTag { position: pos });
            if self.following {
                effects.push( SelectionEffect::Recenter { center: pos, duration: self.follow_ease });
            }
        }
        if let Some(pos) = self.hovered.as_ref().and_then( |id| snapshot.position(id)) {
            effects.push( SelectionEffect::MoveHoverTag { position: pos });
        }
        effects
    }

    /// rebuild tag and detail panel contents after new data came in
    pub fn refresh (&self, snapshot: &Snapshot)->Vec<SelectionEffect> {
        let mut effects = Vec::new();
        if let Some(e) = self.selected.as_ref().and_then( |id| snapshot.get(id)) {
            effects.push( SelectionEffect::ShowTag { id: e.id.clone(), position: e.position, panel: InfoPanel::tag( &e.id, &e.attributes, self.following) });
            if self.following {
                effects.push( SelectionEffect::ShowDetailPanel( InfoPanel::detail( &e.id, &e.attributes)));
            }
        }
        effects
    }

    /// drop all selection and hover state
    pub fn reset (&mut self)->Vec<SelectionEffect> {
        let mut effects = self.clear_selection();
        self.clear_hover( &mut effects);
        effects
    }

    /// the trail of the selected entity with recency weights, empty if nothing is selected
    pub fn derived_trail (&self, store: &EntityStore)->Vec<TrailSample> {
        let Some(e) = self.selected.as_ref().and_then( |id| store.get(id)) else { return Vec::new() };

        let n = e.trail.len() as f64;
        e.trail.iter().enumerate().map( |(i,p)| {
            TrailSample { position: p.position, altitude: p.altitude, weight: (i + 1) as f64 / n }
        }).collect()
    }

    fn clear_hover (&mut self, effects: &mut Vec<SelectionEffect>) {
        self.hover_clear_at = None;
        if self.hovered.take().is_some() {
            effects.push( SelectionEffect::HideHoverTag);
        }
    }
}

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

use std::{collections::HashMap, fmt, sync::Arc};
use serde::Serialize;
use tracing::warn;

use crate::{info::display_label, store::{EntityStore, ReconcileReport}};

/// the transponder codes that signal an emergency
#[derive(Serialize,Debug,Clone,Copy,PartialEq,Eq)]
pub enum EmergencySquawk {
    Hijack,        // 7500
    RadioFailure,  // 7600
    General,       // 7700
}

impl EmergencySquawk {
    pub fn from_code (code: &str)->Option<Self> {
        match code.trim() {
            "7500" => Some(EmergencySquawk::Hijack),
            "7600" => Some(EmergencySquawk::RadioFailure),
            "7700" => Some(EmergencySquawk::General),
            _ => None
        }
    }

    pub fn code (&self)->&'static str {
        match self {
            EmergencySquawk::Hijack => "7500",
            EmergencySquawk::RadioFailure => "7600",
            EmergencySquawk::General => "7700",
        }
    }

    pub fn description (&self)->&'static str {
        match self {
            EmergencySquawk::Hijack => "hijack",
            EmergencySquawk::RadioFailure => "radio failure",
            EmergencySquawk::General => "general emergency",
        }
    }
}

pub fn is_emergency_squawk (code: Option<&str>)->bool {
    code.and_then( EmergencySquawk::from_code).is_some()
}

/// notifications about emergency squawk transitions
#[derive(Serialize,Debug,Clone,PartialEq)]
pub enum SquawkEvent {
    Emergency { id: Arc<String>, label: String, code: EmergencySquawk },
    Cleared { id: Arc<String>, label: String, previous: EmergencySquawk, current: Option<String> },
}

impl fmt::Display for SquawkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquawkEvent::Emergency{id,label,code} => {
                write!( f, "EMERGENCY {} ({}) squawking {} - {}", label, id, code.code(), code.description())
            }
            SquawkEvent::Cleared{id,label,previous,current} => {
                write!( f, "SQUAWK CLEARED {} ({}) {} -> {}", label, id, previous.code(), current.as_deref().unwrap_or("none"))
            }
        }
    }
}

/// keeps track of the last squawk per entity so that we only report transitions
#[derive(Debug,Default)]
pub struct SquawkMonitor {
    previous: HashMap<String,Option<String>>,
}

impl SquawkMonitor {
    pub fn new ()->Self { SquawkMonitor::default() }

    pub fn clear (&mut self) { self.previous.clear() }

    pub fn len (&self)->usize { self.previous.len() }

    /// check the entities that were added or updated by `report`
    pub fn update (&mut self, store: &EntityStore, report: &ReconcileReport)->Vec<SquawkEvent> {
        let mut events = Vec::new();

        for id in report.removed.iter() {
            self.previous.remove( id.as_str());
        }

        for id in report.added.iter().chain( report.updated.iter()) {
            let Some(e) = store.get( id.as_str()) else { continue };
            let current = e.attributes.squawk.clone();
            let cur_emerg = current.as_deref().and_then( EmergencySquawk::from_code);
            let prev_emerg = self.previous.get( id.as_str()).and_then( |p| p.as_deref()).and_then( EmergencySquawk::from_code);

            match (prev_emerg, cur_emerg) {
                (prev, Some(code)) if prev != Some(code) => {
                    let event = SquawkEvent::Emergency { id: id.clone(), label: display_label( &e.attributes, id), code };
                    warn!("{}", event);
                    events.push( event);
                }
                (Some(previous), None) => {
                    let event = SquawkEvent::Cleared { id: id.clone(), label: display_label( &e.attributes, id), previous, current: current.clone() };
                    warn!("{}", event);
                    events.push( event);
                }
                _ => {}
            }

            self.previous.insert( id.as_ref().clone(), current);
        }

        events
    }
}

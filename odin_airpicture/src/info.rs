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

//! human readable presentation of entity attributes, for data tags and the detail panel

use std::fmt;
use num_format::{Locale, ToFormattedString};
use serde::Serialize;

use crate::store::Attributes;

/// barometric altitude from which we report flight levels
pub const TRANSITION_ALTITUDE: f64 = 18000.0;

/// vertical rate (fpm) beyond which we show climb/descent arrows
pub const VERTICAL_RATE_THRESHOLD: f64 = 200.0;

#[derive(Serialize,Debug,Clone,PartialEq)]
pub struct InfoField {
    pub label: &'static str,
    pub value: String,
}

impl InfoField {
    fn new (label: &'static str, value: String)->Self { InfoField { label, value } }
}

/// content of a data tag or the detail panel
#[derive(Serialize,Debug,Clone,PartialEq)]
pub struct InfoPanel {
    pub id: String,
    pub title: String,
    pub emergency: bool,
    pub tracking: bool, // is this the followed entity
    pub fields: Vec<InfoField>,
}

impl InfoPanel {
    pub fn field (&self, label: &str)->Option<&str> {
        self.fields.iter().find( |f| f.label == label).map( |f| f.value.as_str())
    }

    /// the compact data tag that is shown next to a selected or hovered entity.
    /// The followed entity only shows its title since details go into the detail panel
    pub fn tag (id: &str, attrs: &Attributes, tracking: bool)->Self {
        let mut fields = Vec::new();
        if !tracking {
            fields.push( InfoField::new( "ALT", format!("{}{}", format_altitude( attrs.altitude_baro), vertical_arrow( attrs.vertical_rate))));
            fields.push( InfoField::new( "SPD", format!("{} kt", whole( attrs.ground_speed.unwrap_or(0.0)))));
            fields.push( InfoField::new( "HDG", format!("{}°", whole( attrs.track.unwrap_or(0.0)))));
            if let Some(t) = &attrs.type_code { fields.push( InfoField::new( "TYP", t.clone())) }
            if let Some(r) = &attrs.registration { fields.push( InfoField::new( "REG", r.clone())) }
            if let Some(sq) = &attrs.squawk { fields.push( InfoField::new( "SQK", sq.clone())) }
        }

        InfoPanel { id: id.to_string(), title: display_label( attrs, id), emergency: attrs.is_emergency(), tracking, fields }
    }

    /// the full detail panel for the followed entity
    pub fn detail (id: &str, attrs: &Attributes)->Self {
        let mut fields = Vec::new();
        let mut push = |label: &'static str, value: String| fields.push( InfoField::new( label, value));

        if let Some(r) = &attrs.registration { push( "REG", r.clone()) }
        if let Some(t) = &attrs.type_code { push( "TYPE", t.clone()) }
        push( "ALT", format!("{}{}", format_altitude( attrs.altitude_baro), vertical_arrow( attrs.vertical_rate)));
        if let Some(alt) = attrs.altitude_geom { push( "ALT GEO", format!("{} ft", thousands(alt))) }
        push( "V/S", format_vertical_rate( attrs.vertical_rate.unwrap_or(0.0)));
        push( "GS", format!("{} kt", whole( attrs.ground_speed.unwrap_or(0.0))));
        if let Some(ias) = attrs.ias { push( "IAS", format!("{} kt", whole(ias))) }
        if let Some(mach) = attrs.mach { push( "MACH", format!("M{:.2}", mach)) }
        push( "HDG", format!("{}°", whole( attrs.track.unwrap_or(0.0))));
        if let Some(alt) = attrs.nav_altitude { push( "NAV ALT", format!("{} ft", thousands(alt))) }
        if let Some(hdg) = attrs.nav_heading { push( "NAV HDG", format!("{}°", whole(hdg))) }
        if let Some(sq) = &attrs.squawk { push( "SQUAWK", sq.clone()) }
        if let Some(cat) = &attrs.category { push( "CAT", cat.clone()) }
        if attrs.is_emergency() {
            if let Some(e) = &attrs.emergency { push( "EMRG", e.to_uppercase()) }
        }
        if let Some(rssi) = attrs.rssi { push( "RSSI", format!("{:.1} dBFS", rssi)) }
        if attrs.military { push( "CLASS", "MILITARY".to_string()) }

        InfoPanel { id: id.to_string(), title: display_label( attrs, id), emergency: attrs.is_emergency(), tracking: true, fields }
    }
}

impl fmt::Display for InfoPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}", self.title)?;
        if self.emergency { write!( f, " [EMERGENCY]")?; }
        for field in &self.fields {
            write!( f, " | {} {}", field.label, field.value)?;
        }
        Ok(())
    }
}

/// callsign, then registration, then the id itself
pub fn display_label (attrs: &Attributes, id: &str)->String {
    attrs.callsign.as_deref()
        .or( attrs.registration.as_deref())
        .map( |s| s.trim())
        .filter( |s| !s.is_empty())
        .or_else( || Some(id.trim()).filter( |s| !s.is_empty()))
        .unwrap_or("UNKNOWN")
        .to_string()
}

pub fn format_altitude (alt_ft: f64)->String {
    if alt_ft == 0.0 {
        "GND".to_string()
    } else if alt_ft >= TRANSITION_ALTITUDE {
        format!("FL{:03}", (alt_ft / 100.0).round() as i64)
    } else {
        format!("{} ft", thousands(alt_ft))
    }
}

pub fn format_vertical_rate (fpm: f64)->String {
    let fpm = whole(fpm);
    if fpm == 0.0 {
        "0 fpm".to_string()
    } else if fpm > 0.0 {
        format!("+{} fpm", thousands(fpm))
    } else {
        format!("{} fpm", thousands(fpm))
    }
}

fn vertical_arrow (fpm: Option<f64>)->&'static str {
    match fpm {
        Some(v) if v > VERTICAL_RATE_THRESHOLD => " ↑",
        Some(v) if v < -VERTICAL_RATE_THRESHOLD => " ↓",
        _ => ""
    }
}

/// rounded to an integer value, without negative zero
fn whole (v: f64)->f64 {
    let r = v.round();
    if r == 0.0 { 0.0 } else { r }
}

fn thousands (v: f64)->String {
    (v.round() as i64).to_formatted_string( &Locale::en)
}

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

use odin_airpicture::{info::*, store::Attributes};

fn attrs ()->Attributes {
    Attributes {
        callsign: Some("DAL1907".to_string()),
        registration: Some("N123DL".to_string()),
        type_code: Some("A321".to_string()),
        altitude_baro: 36000.0,
        altitude_geom: Some(36525.0),
        ground_speed: Some(471.6),
        ias: Some(278.0),
        mach: Some(0.784),
        track: Some(87.4),
        vertical_rate: Some(1216.0),
        nav_altitude: Some(37000.0),
        nav_heading: Some(88.0),
        squawk: Some("7700".to_string()),
        emergency: Some("general".to_string()),
        category: Some("A3".to_string()),
        rssi: Some(-12.34),
        military: false,
    }
}

// run with "cargo test test_display_label -- --nocapture"

#[test]
fn test_display_label() {
    let mut a = attrs();
    assert_eq!( display_label( &a, "a1b2c3"), "DAL1907");
    a.callsign = None;
    assert_eq!( display_label( &a, "a1b2c3"), "N123DL");
    a.registration = None;
    assert_eq!( display_label( &a, "a1b2c3"), "a1b2c3");
    assert_eq!( display_label( &a, ""), "UNKNOWN");
}

#[test]
fn test_altitude_format() {
    assert_eq!( format_altitude( 0.0), "GND");
    assert_eq!( format_altitude( 950.0), "950 ft");
    assert_eq!( format_altitude( 17999.0), "17,999 ft");
    assert_eq!( format_altitude( 18000.0), "FL180");
    assert_eq!( format_altitude( 35025.0), "FL350");
    assert_eq!( format_altitude( 4500.0), "4,500 ft");
}

#[test]
fn test_vertical_rate_format() {
    assert_eq!( format_vertical_rate( 0.0), "0 fpm");
    assert_eq!( format_vertical_rate( 1216.0), "+1,216 fpm");
    assert_eq!( format_vertical_rate( -640.0), "-640 fpm");
}

#[test]
fn test_detail_panel() {
    let panel = InfoPanel::detail( "a1b2c3", &attrs());
    println!("{panel}");

    assert_eq!( panel.title, "DAL1907");
    assert!( panel.emergency);
    assert_eq!( panel.field("REG"), Some("N123DL"));
    assert_eq!( panel.field("ALT"), Some("FL360 ↑"));
    assert_eq!( panel.field("ALT GEO"), Some("36,525 ft"));
    assert_eq!( panel.field("V/S"), Some("+1,216 fpm"));
    assert_eq!( panel.field("GS"), Some("472 kt"));
    assert_eq!( panel.field("MACH"), Some("M0.78"));
    assert_eq!( panel.field("HDG"), Some("87°"));
    assert_eq!( panel.field("NAV ALT"), Some("37,000 ft"));
    assert_eq!( panel.field("EMRG"), Some("GENERAL"));
    assert_eq!( panel.field("RSSI"), Some("-12.3 dBFS"));
    assert_eq!( panel.field("CLASS"), None);

    let labels: Vec<&str> = panel.fields.iter().map( |f| f.label).collect();
    assert_eq!( labels, vec!["REG","TYPE","ALT","ALT GEO","V/S","GS","IAS","MACH","HDG","NAV ALT","NAV HDG","SQUAWK","CAT","EMRG","RSSI"]);
}

#[test]
fn test_sparse_detail_panel() {
    let a = Attributes { military: true, emergency: Some("none".to_string()), vertical_rate: Some(-1500.0), altitude_baro: 8000.0, ..Default::default() };
    let panel = InfoPanel::detail( "ae1234", &a);
    println!("{panel}");

    assert_eq!( panel.title, "ae1234");
    assert!( !panel.emergency);
    assert_eq!( panel.field("ALT"), Some("8,000 ft ↓"));
    assert_eq!( panel.field("EMRG"), None);
    assert_eq!( panel.field("CLASS"), Some("MILITARY"));
    assert_eq!( panel.field("REG"), None);
}

#[test]
fn test_tag() {
    let tag = InfoPanel::tag( "a1b2c3", &attrs(), false);
    println!("{tag}");
    assert_eq!( tag.field("SPD"), Some("472 kt"));
    assert_eq!( tag.field("SQK"), Some("7700"));

    let tracking = InfoPanel::tag( "a1b2c3", &attrs(), true);
    assert!( tracking.tracking);
    assert!( tracking.fields.is_empty());
}

#[test]
fn test_no_negative_zero() {
    let a = Attributes { ground_speed: Some(-0.2), track: Some(-0.4), ias: Some(-0.1), nav_heading: Some(-0.3), vertical_rate: Some(-0.4), ..attrs() };

    let panel = InfoPanel::detail( "a1b2c3", &a);
    println!("{panel}");
    assert_eq!( panel.field("GS"), Some("0 kt"));
    assert_eq!( panel.field("HDG"), Some("0°"));
    assert_eq!( panel.field("IAS"), Some("0 kt"));
    assert_eq!( panel.field("NAV HDG"), Some("0°"));
    assert_eq!( panel.field("V/S"), Some("0 fpm"));

    let tag = InfoPanel::tag( "a1b2c3", &a, false);
    assert_eq!( tag.field("SPD"), Some("0 kt"));
    assert_eq!( tag.field("HDG"), Some("0°"));

    assert_eq!( format_vertical_rate( 0.3), "0 fpm");
}

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

use std::{path::PathBuf, sync::{Arc, Mutex}, time::Duration};
use anyhow::Result;
use clap::Parser;
use geojson::{FeatureCollection, JsonValue};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use odin_common::{datetime::EpochMillis, geo::GeoPoint};
use odin_airpicture::{
    load_config, AirPictureConfig,
    feed::HttpFeedSource,
    info::InfoPanel,
    location::MemoryStore,
    render::{MapView, MarkerContent, LIVE_SOURCE},
    scheduler::{with_session, PollScheduler},
    session::LiveSession,
    squawk::SquawkEvent,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "show the live ADS-B air picture around a position on the console")]
pub struct Args {
    /// RON config file (uses built-in defaults if not set)
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    #[arg(long, allow_negative_numbers = true, default_value_t = 37.415)]
    pub lat: f64,

    #[arg(long, allow_negative_numbers = true, default_value_t = -122.049)]
    pub lon: f64,

    /// number of poll cycles to run
    #[arg(short='n', long, default_value_t = 3)]
    pub cycles: u32,

    /// hex id of aircraft to select after the first poll
    #[arg(short,long)]
    pub select: Option<String>,

    /// follow the selected aircraft
    #[arg(short,long)]
    pub follow: bool,
}

/// a MapView that just logs what a map widget would show
struct ConsoleView {
    center: GeoPoint,
    zoom: f64,
}

impl MapView for ConsoleView {
    fn set_source_data (&mut self, source_id: &str, data: FeatureCollection) {
        if source_id == LIVE_SOURCE {
            info!("{} aircraft in view", data.features.len());
        } else {
            debug!("source {source_id}: {} features", data.features.len());
        }
    }

    fn set_layer_visibility (&mut self, layer_id: &str, visible: bool) { debug!("layer {layer_id} visible: {visible}") }
    fn set_layer_filter (&mut self, layer_id: &str, filter: JsonValue) { debug!("layer {layer_id} filter: {filter}") }

    fn show_marker (&mut self, marker_id: &str, position: GeoPoint, content: MarkerContent) {
        match content {
            MarkerContent::Tag(panel) => {
                let dist = self.center.distance_nm( &position);
                let bearing = self.center.bearing_to( &position).degrees();
                info!("{marker_id} at {position} ({dist:.1}nm, {bearing:.0}° from center): {panel}")
            }
            MarkerContent::Label(label) => debug!("{marker_id} at {position}: {label}")
        }
    }
    fn move_marker (&mut self, marker_id: &str, position: GeoPoint) { debug!("{marker_id} -> {position}") }
    fn remove_marker (&mut self, marker_id: &str) { debug!("removed {marker_id}") }

    fn view_center (&self)->GeoPoint { self.center }
    fn zoom (&self)->f64 { self.zoom }
    fn ease_to (&mut self, center: GeoPoint, duration: Duration) {
        info!("view center {} -> {} ({:?})", self.center, center, duration);
        self.center = center;
    }

    fn show_detail_panel (&mut self, panel: &InfoPanel) { info!("detail: {panel}") }
    fn hide_detail_panel (&mut self) { info!("detail panel closed") }

    fn notify (&mut self, event: &SquawkEvent) { warn!("{event}") }
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let args = Args::parse();
    let config = Arc::new( match &args.config {
        Some(path) => load_config( path)?,
        None => AirPictureConfig::default()
    });

    let center = GeoPoint::from_lon_lat_degrees( args.lon, args.lat);
    let view = Box::new( ConsoleView { center, zoom: 8.0 });
    let session = Arc::new( Mutex::new( LiveSession::new( config.clone(), view, Box::new( MemoryStore::new()), EpochMillis::now())));
    let feed = Arc::new( HttpFeedSource::new( &config)?);

    let mut scheduler = PollScheduler::new( config.clone(), session.clone(), feed);
    scheduler.start()?;

    if let Some(hex) = &args.select {
        tokio::time::sleep( Duration::from_secs(2)).await; // give the first poll a chance
        with_session( &session, |s| {
            s.click_entity( &hex.to_lowercase());
            if args.follow { s.toggle_follow() }
        });
    }

    tokio::time::sleep( config.poll_interval * args.cycles).await;
    scheduler.stop();

    Ok(())
}

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

use std::sync::{Arc, Mutex};
use tokio::{task::AbortHandle, time::{interval, sleep, MissedTickBehavior}};
use tracing::{error,info,warn};
use odin_common::datetime::{millis, EpochMillis};

use crate::{
    AirPictureConfig,
    errors::{op_failed, OdinAirPictureError, Result},
    feed::FeedSource,
    session::LiveSession
};

pub type SharedSession = Arc<Mutex<LiveSession>>;

/// run `f` on the locked session. The lock is never held across await points, a poisoned
/// lock is reported and yields `None`
pub fn with_session<R> (session: &SharedSession, f: impl FnOnce(&mut LiveSession)->R)->Option<R> {
    match session.lock() {
        Ok(mut guard) => Some( f( &mut guard)),
        Err(e) => {
            error!("air picture session lock poisoned: {e}");
            None
        }
    }
}

/// owns the two periodic tasks of a live air picture: the feed poll (which runs once immediately
/// on start) and the display tick. Both only touch the session while holding its lock, hence a
/// slow feed response never delays ticks. Must be started from within a tokio runtime
pub struct PollScheduler {
    config: Arc<AirPictureConfig>,
    session: SharedSession,
    feed: Arc<dyn FeedSource>,
    tasks: Vec<AbortHandle>,
    hover_task: Option<AbortHandle>, // pending hover-out
}

impl PollScheduler {
    pub fn new (config: Arc<AirPictureConfig>, session: SharedSession, feed: Arc<dyn FeedSource>)->Self {
        PollScheduler { config, session, feed, tasks: Vec::new(), hover_task: None }
    }

    pub fn session (&self)->&SharedSession { &self.session }

    pub fn is_running (&self)->bool { !self.tasks.is_empty() }

    pub fn start (&mut self)->Result<()> {
        if self.is_running() { return Ok(()) }

        with_session( &self.session, |s| s.enable()).ok_or_else( || op_failed!("cannot enable poisoned session"))?;

        let poll_task = tokio::spawn( run_poll_loop( self.config.clone(), self.session.clone(), self.feed.clone()));
        let tick_task = tokio::spawn( run_tick_loop( self.config.clone(), self.session.clone()));
        self.tasks.push( poll_task.abort_handle());
        self.tasks.push( tick_task.abort_handle());

        info!("started polling {} every {:?}", self.config.source, self.config.poll_interval);
        Ok(())
    }

    /// stops both tasks and discards the session state
    pub fn stop (&mut self) {
        if self.is_running() {
            self.abort_tasks();
            with_session( &self.session, |s| s.disable());
            info!("stopped polling {}", self.config.source);
        }
    }

    pub fn set_enabled (&mut self, enabled: bool)->Result<()> {
        if enabled { self.start() } else { self.stop(); Ok(()) }
    }

    /// pointer enters (`Some`) or leaves (`None`) an entity. Leaving clears the hover tag once the
    /// hover grace period has expired, independent of the tick interval
    pub fn hover (&mut self, id: Option<&str>) {
        if let Some(task) = self.hover_task.take() { task.abort() }
        with_session( &self.session, |s| s.hover( id, EpochMillis::now()));

        if id.is_none() && self.is_running() {
            let session = self.session.clone();
            let delay = self.config.hover_grace + millis(1); // EpochMillis truncates
            let task = tokio::spawn( async move {
                sleep( delay).await;
                with_session( &session, |s| s.expire_hover( EpochMillis::now()));
            });
            self.hover_task = Some( task.abort_handle());
        }
    }

    fn abort_tasks (&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if let Some(task) = self.hover_task.take() { task.abort() }
    }
}

impl Drop for PollScheduler {
    fn drop (&mut self) {
        self.abort_tasks();
    }
}

async fn run_poll_loop (config: Arc<AirPictureConfig>, session: SharedSession, feed: Arc<dyn FeedSource>) {
    let mut timer = interval( config.poll_interval);
    timer.set_missed_tick_behavior( MissedTickBehavior::Delay);

    loop {
        timer.tick().await; // first tick completes immediately

        let Some(center) = with_session( &session, |s| s.query_center( EpochMillis::now())) else { break };
        match feed.query( center, config.query_radius_nm).await {
            Ok(response) => {
                let applied = with_session( &session, |s| { s.apply_feed( &response, EpochMillis::now()); });
                if applied.is_none() { break }
            }
            Err(e) => {
                // keep the current picture, the next cycle retries
                warn!("{} query failed: {}", config.source, e);
            }
        }
    }
}

async fn run_tick_loop (config: Arc<AirPictureConfig>, session: SharedSession) {
    let mut timer = interval( config.tick_interval);
    timer.set_missed_tick_behavior( MissedTickBehavior::Skip);

    loop {
        timer.tick().await;
        if with_session( &session, |s| s.tick( EpochMillis::now())).is_none() { break }
    }
}

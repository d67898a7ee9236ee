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

//! spherical geodesy on a mean earth radius. This is what we need for range rings, distances
//! and label placement. All angles are degrees unless explicitly named `.._rad`

use std::fmt;
use serde::{Serialize,Deserialize};
use geo_types::{Coord, LineString, Point, Polygon};
use geo::{Bearing, Distance, HaversineMeasure};

use crate::{
    angle::{normalize_90, normalize_180, Angle360},
    geo_constants::MEAN_EARTH_RADIUS_NM,
    asin, atan2, cos, sin, sqrt, deg, rad, round_to
};

/// number of vertices in closed geodesic circles (2 degree steps, first == last)
pub const CIRCLE_VERTICES: usize = 181;

/// a geographic position in degrees
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeoPoint {
    #[serde(alias="longitude", alias="x")]
    pub lon: f64,
    #[serde(alias="latitude", alias="y")]
    pub lat: f64
}

impl GeoPoint {
    /// normalizes longitude into [-180,180] and latitude into [-90,90]
    pub fn from_lon_lat_degrees (lon: f64, lat: f64) -> Self {
        GeoPoint { lon: normalize_180(lon), lat: normalize_90(lat) }
    }

    #[inline] pub fn coord (&self)->Coord<f64> { Coord { x: self.lon, y: self.lat } }
    #[inline] pub fn point (&self)->Point<f64> { Point::new( self.lon, self.lat) }

    /// GeoJSON position order
    #[inline] pub fn to_lon_lat_vec (&self)->Vec<f64> { vec![self.lon, self.lat] }

    /// haversine great circle distance in nautical miles
    pub fn distance_nm (&self, other: &GeoPoint)->f64 {
        haversine_nm().distance( self.point(), other.point())
    }

    /// initial great circle bearing from self towards `other`
    pub fn bearing_to (&self, other: &GeoPoint)->Angle360 {
        Angle360::from_degrees( haversine_nm().bearing( self.point(), other.point()))
    }
}

/// haversine on the mean earth radius in nautical miles, hence distances come out as nm
#[inline]
fn haversine_nm ()->HaversineMeasure { HaversineMeasure::new( MEAN_EARTH_RADIUS_NM) }

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5},{:.5})", self.lon, self.lat)
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from (c: Coord<f64>)->Self { GeoPoint::from_lon_lat_degrees( c.x, c.y) }
}

impl From<GeoPoint> for Coord<f64> {
    fn from (p: GeoPoint)->Self { p.coord() }
}

/// the un-normalized great circle point for a given start, bearing and angular distance (both in radians).
/// Longitudes are not wrapped so that consecutive circle vertices stay continuous across the antimeridian
pub fn great_circle_coord (start: &GeoPoint, bearing_rad: f64, angular_dist: f64)->Coord<f64> {
    let lat1 = rad(start.lat);
    let lon1 = rad(start.lon);

    let lat2 = asin( sin(lat1)*cos(angular_dist) + cos(lat1)*sin(angular_dist)*cos(bearing_rad));
    let lon2 = lon1 + atan2( sin(bearing_rad)*sin(angular_dist)*cos(lat1), cos(angular_dist) - sin(lat1)*sin(lat2));

    Coord { x: deg(lon2), y: deg(lat2) }
}

/// closed great circle approximation of a circle with `radius_nm` around `center`.
/// Vertices are at bearings 0,2,..360 degrees, i.e. the first and last coordinate are identical
pub fn generate_circle (center: &GeoPoint, radius_nm: f64)->LineString<f64> {
    let d = radius_nm / MEAN_EARTH_RADIUS_NM;

    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(CIRCLE_VERTICES);
    for i in 0..CIRCLE_VERTICES-1 {
        let bearing = rad( (i * 2) as f64);
        coords.push( great_circle_coord( center, bearing, d));
    }
    coords.push( coords[0]); // close exactly, sin(2π) is not 0

    LineString::new(coords)
}

/// area weighted (shoelace) centroid of the exterior ring of `polygon`, treating lon/lat as planar.
/// Returns `None` for degenerate rings, i.e. if the area is negligible compared to the ring extent
pub fn centroid (polygon: &Polygon<f64>)->Option<Coord<f64>> {
    let ring = polygon.exterior();
    let origin = *ring.0.first()?; // sums are relative to the first vertex to avoid cancellation

    let mut area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;

    for line in ring.lines() {
        let (x0,y0) = (line.start.x - origin.x, line.start.y - origin.y);
        let (x1,y1) = (line.end.x - origin.x, line.end.y - origin.y);
        let cross = x0*y1 - x1*y0;
        area += cross;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }
    area *= 0.5;

    // degenerate is relative to the size of the ring, small polygons are still valid
    let extent = bbox_extent( ring);
    if !area.is_finite() || area.abs() <= extent * extent * 1e-12 {
        None
    } else {
        Some( Coord { x: origin.x + cx / (6.0 * area), y: origin.y + cy / (6.0 * area) })
    }
}

/// text rotation (degrees in (-90,90], one decimal) that aligns a label with the longest edge of the
/// exterior ring of `polygon`. Edge lengths are planar, edge bearings are corrected for the cos(lat)
/// longitude scaling of web mercator maps. Returns `None` if the ring has no edges
pub fn long_axis_rotation (polygon: &Polygon<f64>)->Option<f64> {
    let mut max_len = -1.0;
    let mut bearing: Option<f64> = None;

    for line in polygon.exterior().lines() {
        let dlon = line.end.x - line.start.x;
        let dlat = line.end.y - line.start.y;
        let len = sqrt( dlon*dlon + dlat*dlat);
        if len > max_len {
            max_len = len;
            let mid_lat = (line.start.y + line.end.y) / 2.0;
            bearing = Some( deg( atan2( dlon * cos(rad(mid_lat)), dlat)));
        }
    }

    bearing.map( |b| {
        let rot = round_to( fold_to_half_circle(b - 90.0), 1);
        fold_to_half_circle(rot) // rounding might have hit -90.0
    })
}

/// the larger side of the bounding box of `line`
fn bbox_extent (line: &LineString<f64>)->f64 {
    let mut min = Coord { x: f64::INFINITY, y: f64::INFINITY };
    let mut max = Coord { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY };
    for c in line.coords() {
        min.x = min.x.min(c.x); min.y = min.y.min(c.y);
        max.x = max.x.max(c.x); max.y = max.y.max(c.y);
    }
    if min.x > max.x { 0.0 } else { (max.x - min.x).max(max.y - min.y) }
}

fn fold_to_half_circle (mut a: f64)->f64 {
    while a > 90.0 { a -= 180.0 }
    while a <= -90.0 { a += 180.0 }
    a
}

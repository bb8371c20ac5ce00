/*!
 * Geospatial Index
 *
 * Members map to `(longitude, latitude)` pairs. Distances use the
 * haversine great-circle formula on the same earth radius Redis uses,
 * which is accurate well below kilometre scale for this purpose.
 */

use std::fmt;
use std::str::FromStr;

use hashbrown::HashMap;
use thiserror::Error;

use crate::error::{Result, StoreError};

/// Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_372_797.560_856;

pub const LON_MIN: f64 = -180.0;
pub const LON_MAX: f64 = 180.0;
/// Latitude limits of the Web-Mercator projection Redis indexes
pub const LAT_MIN: f64 = -85.051_128_78;
pub const LAT_MAX: f64 = 85.051_128_78;

/// Distance unit accepted by GEODIST / GEORADIUS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoUnit {
    Meters,
    Kilometers,
    Miles,
    Feet,
}

impl GeoUnit {
    /// Meters per one of this unit
    #[inline]
    pub fn meters(self) -> f64 {
        match self {
            GeoUnit::Meters => 1.0,
            GeoUnit::Kilometers => 1000.0,
            GeoUnit::Miles => 1609.34,
            GeoUnit::Feet => 0.3048,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported unit provided. please use m, km, ft, mi")]
pub struct UnknownUnit;

impl FromStr for GeoUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("m") {
            Ok(GeoUnit::Meters)
        } else if s.eq_ignore_ascii_case("km") {
            Ok(GeoUnit::Kilometers)
        } else if s.eq_ignore_ascii_case("mi") {
            Ok(GeoUnit::Miles)
        } else if s.eq_ignore_ascii_case("ft") {
            Ok(GeoUnit::Feet)
        } else {
            Err(UnknownUnit)
        }
    }
}

impl fmt::Display for GeoUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GeoUnit::Meters => "m",
            GeoUnit::Kilometers => "km",
            GeoUnit::Miles => "mi",
            GeoUnit::Feet => "ft",
        })
    }
}

/// Reject pairs outside the indexable area
pub fn validate(lon: f64, lat: f64) -> Result<()> {
    if (LON_MIN..=LON_MAX).contains(&lon) && (LAT_MIN..=LAT_MAX).contains(&lat) {
        Ok(())
    } else {
        Err(StoreError::InvalidCoordinates)
    }
}

/// Great-circle distance in meters between two `(lon, lat)` points
pub fn haversine_m(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (lat1r, lat2r) = (lat1.to_radians(), lat2.to_radians());
    let u = ((lat2r - lat1r) / 2.0).sin();
    let v = ((lon2 - lon1).to_radians() / 2.0).sin();
    let a = u * u + lat1r.cos() * lat2r.cos() * v * v;
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Member → position index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoSet {
    points: HashMap<String, (f64, f64), ahash::RandomState>,
}

impl GeoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or move a member. Returns `true` when the member is new.
    pub fn insert(&mut self, member: &str, lon: f64, lat: f64) -> Result<bool> {
        validate(lon, lat)?;
        Ok(self.points.insert(member.to_owned(), (lon, lat)).is_none())
    }

    pub fn remove(&mut self, member: &str) -> bool {
        self.points.remove(member).is_some()
    }

    pub fn position(&self, member: &str) -> Option<(f64, f64)> {
        self.points.get(member).copied()
    }

    /// Distance between two members, `None` if either is missing
    pub fn distance(&self, a: &str, b: &str, unit: GeoUnit) -> Option<f64> {
        let (lon1, lat1) = self.position(a)?;
        let (lon2, lat2) = self.position(b)?;
        Some(haversine_m(lon1, lat1, lon2, lat2) / unit.meters())
    }

    /// Members within `radius` of `(lon, lat)`, nearest first
    ///
    /// Distances are reported in `unit`; equal distances order by member.
    pub fn radius(&self, lon: f64, lat: f64, radius: f64, unit: GeoUnit) -> Vec<(String, f64)> {
        let limit_m = radius * unit.meters();
        let mut hits: Vec<(String, f64)> = self
            .points
            .iter()
            .filter_map(|(member, &(plon, plat))| {
                let d = haversine_m(lon, lat, plon, plat);
                (d <= limit_m).then(|| (member.clone(), d / unit.meters()))
            })
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        hits
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/*!
 * Geospatial Indexes
 *
 * GEOADD, GEOPOS, GEODIST and GEORADIUS over `Value::Geo`.
 */

use super::Store;
use crate::error::Result;
use crate::geo::{self, GeoSet, GeoUnit};
use crate::storage::Slot;
use crate::value::Value;

pub(crate) fn geoadd(slot: &mut Slot, lon: f64, lat: f64, member: &str) -> Result<bool> {
    geo::validate(lon, lat)?;
    slot.value_or_insert_with(|| Value::Geo(GeoSet::new()))
        .as_geo_mut()?
        .insert(member, lon, lat)
}

pub(crate) fn geopos(slot: &mut Slot, member: &str) -> Result<Option<(f64, f64)>> {
    match slot.value() {
        Some(v) => Ok(v.as_geo()?.position(member)),
        None => Ok(None),
    }
}

pub(crate) fn geodist(slot: &mut Slot, a: &str, b: &str, unit: GeoUnit) -> Result<Option<f64>> {
    match slot.value() {
        Some(v) => Ok(v.as_geo()?.distance(a, b, unit)),
        None => Ok(None),
    }
}

pub(crate) fn georadius(
    slot: &mut Slot,
    lon: f64,
    lat: f64,
    radius: f64,
    unit: GeoUnit,
) -> Result<Vec<(String, f64)>> {
    geo::validate(lon, lat)?;
    match slot.value() {
        Some(v) => Ok(v.as_geo()?.radius(lon, lat, radius, unit)),
        None => Ok(Vec::new()),
    }
}

impl Store {
    /// Index `member` at `(lon, lat)`
    ///
    /// # Returns
    /// * `true` if the member is new, `false` if its position was updated
    /// * `InvalidCoordinates` outside the indexable range
    pub fn geoadd(&self, key: &str, lon: f64, lat: f64, member: &str) -> Result<bool> {
        self.with_key(key, |s| geoadd(s, lon, lat, member))
    }

    /// Stored `(lon, lat)` of `member`
    pub fn geopos(&self, key: &str, member: &str) -> Result<Option<(f64, f64)>> {
        self.with_key(key, |s| geopos(s, member))
    }

    /// Great-circle distance between two members, `None` if either is missing
    pub fn geodist(&self, key: &str, a: &str, b: &str, unit: GeoUnit) -> Result<Option<f64>> {
        self.with_key(key, |s| geodist(s, a, b, unit))
    }

    /// Members within `radius` of `(lon, lat)`
    ///
    /// # Returns
    /// * `(member, distance)` pairs in `unit`, nearest first, ties by member
    pub fn georadius(
        &self,
        key: &str,
        lon: f64,
        lat: f64,
        radius: f64,
        unit: GeoUnit,
    ) -> Result<Vec<(String, f64)>> {
        self.with_key(key, |s| georadius(s, lon, lat, radius, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::error::StoreError;

    #[test]
    fn sicily() {
        let s = Store::new(StoreConfig::lazy_only());
        assert_eq!(s.geoadd("sicily", 13.361389, 38.115556, "Palermo"), Ok(true));
        assert_eq!(s.geoadd("sicily", 15.087269, 37.502669, "Catania"), Ok(true));
        assert_eq!(s.geoadd("sicily", 15.087269, 37.502669, "Catania"), Ok(false));

        let km = s.geodist("sicily", "Palermo", "Catania", GeoUnit::Kilometers).unwrap().unwrap();
        assert!((km - 166.274).abs() < 0.01);
        assert_eq!(s.geodist("sicily", "Palermo", "Rome", GeoUnit::Meters), Ok(None));

        let near = s.georadius("sicily", 15.0, 37.0, 100.0, GeoUnit::Kilometers).unwrap();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].0, "Catania");

        let both = s.georadius("sicily", 15.0, 37.0, 200.0, GeoUnit::Kilometers).unwrap();
        assert_eq!(both.iter().map(|(m, _)| m.as_str()).collect::<Vec<_>>(), ["Catania", "Palermo"]);
    }

    #[test]
    fn rejects_bad_coordinates() {
        let s = Store::new(StoreConfig::lazy_only());
        assert_eq!(s.geoadd("g", 181.0, 0.0, "x"), Err(StoreError::InvalidCoordinates));
        assert_eq!(s.geoadd("g", 0.0, 86.0, "x"), Err(StoreError::InvalidCoordinates));
        assert!(!s.exists("g"));
        assert_eq!(s.geopos("g", "x"), Ok(None));
    }
}

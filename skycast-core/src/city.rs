use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// Country code used for names that are not in the table.
pub const UNKNOWN_COUNTRY: &str = "??";

/// Geography of a single city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub utc_offset_hours: i32,
}

impl CityRecord {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        latitude: f64,
        longitude: f64,
        utc_offset_hours: i32,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            latitude,
            longitude,
            utc_offset_hours,
        }
    }

    /// Fallback geography for names the table doesn't know: equator, prime meridian, UTC.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, UNKNOWN_COUNTRY, 0.0, 0.0, 0)
    }

    pub fn is_unknown(&self) -> bool {
        self.country == UNKNOWN_COUNTRY
    }

    pub fn is_southern(&self) -> bool {
        self.latitude < 0.0
    }

    /// Check coordinates and offset are physically meaningful.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidCity {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(invalid(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(invalid(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(invalid(format!(
                "UTC offset {} is outside [-12, 14]",
                self.utc_offset_hours
            )));
        }

        Ok(())
    }
}

static BUILTIN: LazyLock<CityTable> = LazyLock::new(|| CityTable {
    records: vec![
        CityRecord::new("Istanbul", "Turkey", 41.0082, 28.9784, 3),
        CityRecord::new("Ankara", "Turkey", 39.9334, 32.8597, 3),
        CityRecord::new("Izmir", "Turkey", 38.4192, 27.1287, 3),
        CityRecord::new("Antalya", "Turkey", 36.8969, 30.7133, 3),
        CityRecord::new("London", "UK", 51.5074, -0.1278, 0),
        CityRecord::new("Paris", "France", 48.8566, 2.3522, 1),
        CityRecord::new("Berlin", "Germany", 52.5200, 13.4050, 1),
        CityRecord::new("Rome", "Italy", 41.9028, 12.4964, 1),
        CityRecord::new("New York", "USA", 40.7128, -74.0060, -5),
        CityRecord::new("Tokyo", "Japan", 35.6762, 139.6503, 9),
    ],
});

/// Immutable city reference table, in display order.
///
/// Lookups are exact and case-sensitive. The table is small enough that a
/// linear scan beats hashing and keeps the preset ordering for free.
#[derive(Debug, Clone, PartialEq)]
pub struct CityTable {
    records: Vec<CityRecord>,
}

impl CityTable {
    /// The ten preset cities.
    pub fn builtin() -> &'static CityTable {
        &BUILTIN
    }

    /// Build a table from arbitrary records. Later duplicates replace earlier ones.
    pub fn from_records(records: impl IntoIterator<Item = CityRecord>) -> Result<Self> {
        let mut table = CityTable {
            records: Vec::new(),
        };
        table.extend(records)?;
        Ok(table)
    }

    /// Builtin cities followed by `extra`; an extra city named like a builtin replaces it in place.
    pub fn with_extra(extra: impl IntoIterator<Item = CityRecord>) -> Result<Self> {
        Self::from_records(Self::builtin().records.iter().cloned().chain(extra))
    }

    fn extend(&mut self, records: impl IntoIterator<Item = CityRecord>) -> Result<()> {
        for record in records {
            record.validate()?;
            match self.records.iter_mut().find(|r| r.name == record.name) {
                Some(existing) => *existing = record,
                None => self.records.push(record),
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CityRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Never fails: unknown names get [`CityRecord::unknown`].
    pub fn lookup(&self, name: &str) -> CityRecord {
        self.get(name)
            .cloned()
            .unwrap_or_else(|| CityRecord::unknown(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn records(&self) -> &[CityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_ten_cities_in_display_order() {
        let names: Vec<_> = CityTable::builtin().names().collect();
        assert_eq!(
            names,
            [
                "Istanbul", "Ankara", "Izmir", "Antalya", "London", "Paris", "Berlin", "Rome",
                "New York", "Tokyo"
            ]
        );
    }

    #[test]
    fn lookup_returns_stored_record_for_every_builtin() {
        let table = CityTable::builtin();
        for record in table.records() {
            assert_eq!(&table.lookup(&record.name), record);
        }

        let ny = table.lookup("New York");
        assert_eq!(ny.country, "USA");
        assert_eq!(ny.utc_offset_hours, -5);
        assert_eq!(ny.longitude, -74.0060);
    }

    #[test]
    fn lookup_unknown_falls_back_to_default() {
        let record = CityTable::builtin().lookup("Atlantis");
        assert_eq!(record.name, "Atlantis");
        assert_eq!(record.country, "??");
        assert_eq!(record.latitude, 0.0);
        assert_eq!(record.longitude, 0.0);
        assert_eq!(record.utc_offset_hours, 0);
        assert!(record.is_unknown());
    }

    #[test]
    fn lookup_is_case_sensitive_and_exact() {
        let table = CityTable::builtin();
        assert!(table.lookup("istanbul").is_unknown());
        assert!(table.lookup("Istanbul ").is_unknown());
        assert!(table.lookup("Istan").is_unknown());
        assert!(!table.lookup("Istanbul").is_unknown());
    }

    #[test]
    fn with_extra_appends_and_replaces() {
        let table = CityTable::with_extra([
            CityRecord::new("Sydney", "Australia", -33.8688, 151.2093, 10),
            CityRecord::new("London", "UK", 51.5, 0.0, 1),
        ])
        .expect("valid extras");

        assert_eq!(table.len(), 11);
        assert_eq!(table.names().last(), Some("Sydney"));
        assert_eq!(table.names().nth(4), Some("London"));
        assert_eq!(table.lookup("London").utc_offset_hours, 1);
        assert!(table.lookup("Sydney").is_southern());

        // builtin is untouched
        assert_eq!(CityTable::builtin().lookup("London").utc_offset_hours, 0);
    }

    #[test]
    fn with_extra_rejects_bad_coordinates() {
        let rejected = |record: CityRecord| CityTable::with_extra([record]).unwrap_err();

        let err = rejected(CityRecord::new("Nowhere", "XX", 91.0, 0.0, 0));
        assert!(matches!(err, Error::InvalidCity { ref name, .. } if name == "Nowhere"));
        assert!(err.to_string().contains("latitude"));

        let err = rejected(CityRecord::new("Far", "XX", 0.0, 200.0, 0));
        assert!(err.to_string().contains("longitude"));

        let err = rejected(CityRecord::new("Late", "XX", 0.0, 0.0, 15));
        assert!(err.to_string().contains("UTC offset"));

        let err = rejected(CityRecord::new("  ", "XX", 0.0, 0.0, 0));
        assert!(err.to_string().contains("name must not be empty"));
    }

    #[test]
    fn from_records_builds_standalone_table() {
        let table =
            CityTable::from_records([CityRecord::new("Sydney", "Australia", -33.0, 151.0, 10)])
                .expect("valid record");
        assert_eq!(table.len(), 1);
        assert!(table.contains("Sydney"));
        assert!(!table.contains("Istanbul"));
    }
}

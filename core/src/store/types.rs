use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest integer a JavaScript number holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Identity of a stored workout record.
///
/// Stored as any JSON number: older data carries fractional ids built from
/// a millisecond timestamp plus a random fraction. New ids are integers,
/// creation time in milliseconds with three random digits appended, and are
/// written without a fractional part.
#[derive(Debug, Clone, Copy)]
pub struct RecordId(f64);

impl RecordId {
    /// Finite values only.
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Self(value))
    }

    pub fn generate(now_ms: u64) -> Self {
        let salt: u64 = rand::rng().random_range(0..1000);
        Self::from(now_ms.saturating_mul(1000).saturating_add(salt))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Inverse of `Display`, used for ids carried in markup attributes.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<f64>().ok().and_then(Self::new)
    }

    fn as_integer(self) -> Option<u64> {
        (self.0.fract() == 0.0 && self.0 >= 0.0 && self.0 <= MAX_SAFE_INTEGER).then_some(self.0 as u64)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value as f64)
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_f64(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).ok_or_else(|| serde::de::Error::custom("record id is not a finite number"))
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_integer() {
            Some(n) => write!(f, "{}", n),
            None => write!(f, "{}", self.0),
        }
    }
}

/// One weight/repetition pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SetEntry {
    pub weight: f64,
    pub reps: f64,
}

impl SetEntry {
    pub fn new(weight: f64, reps: f64) -> Self {
        Self { weight, reps }
    }

    /// Both fields strictly positive. NaN is never valid.
    pub fn is_valid(&self) -> bool {
        self.weight > 0.0 && self.reps > 0.0
    }

    pub fn volume(&self) -> f64 {
        self.weight * self.reps
    }
}

/// A committed exercise for one day. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: RecordId,
    pub date: NaiveDate,
    pub exercise: String,
    pub sets: Vec<SetEntry>,
}

impl WorkoutRecord {
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(SetEntry::volume).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_fit_js_numbers() {
        let id = RecordId::generate(1_700_000_000_000);
        assert!(id.value() >= 1_700_000_000_000_000.0);
        assert!(id.value() < MAX_SAFE_INTEGER);
        assert_eq!(id.value().fract(), 0.0);
    }

    #[test]
    fn test_set_entry_validity() {
        assert!(SetEntry::new(50.0, 5.0).is_valid());
        assert!(!SetEntry::new(0.0, 5.0).is_valid());
        assert!(!SetEntry::new(50.0, -1.0).is_valid());
        assert!(!SetEntry::new(f64::NAN, 5.0).is_valid());
    }

    #[test]
    fn test_record_json_shape() {
        let record = WorkoutRecord {
            id: RecordId::from(42u64),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            exercise: "Bench Press".to_string(),
            sets: vec![SetEntry::new(50.0, 5.0)],
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 42,
                "date": "2024-01-01",
                "exercise": "Bench Press",
                "sets": [{"weight": 50.0, "reps": 5.0}]
            })
        );
    }

    #[test]
    fn test_record_id_parse() {
        assert_eq!(RecordId::parse(" 17 "), Some(RecordId::from(17u64)));
        assert_eq!(RecordId::parse("1.5").map(RecordId::value), Some(1.5));
        assert_eq!(RecordId::parse("NaN"), None);
        assert_eq!(RecordId::parse("abc"), None);
    }

    #[test]
    fn test_fractional_id_loads_and_round_trips() {
        let json = r#"{"id":1704067200000.4321,"date":"2024-01-01","exercise":"Squat","sets":[{"weight":100,"reps":5}]}"#;
        let record: WorkoutRecord = serde_json::from_str(json).unwrap();
        assert!((record.id.value() - 1_704_067_200_000.432).abs() < 0.01);
        assert_eq!(record.sets, vec![SetEntry::new(100.0, 5.0)]);

        let shown = record.id.to_string();
        assert!(shown.starts_with("1704067200000.43"));
        assert_eq!(RecordId::parse(&shown), Some(record.id));

        let written = serde_json::to_value(&record).unwrap();
        assert_eq!(written["id"].as_f64(), Some(record.id.value()));
    }

    #[test]
    fn test_integer_ids_display_without_fraction() {
        let id = RecordId::from(1_704_153_600_000_513u64);
        assert_eq!(id.to_string(), "1704153600000513");
        assert_eq!(serde_json::to_string(&id).unwrap(), "1704153600000513");
    }
}

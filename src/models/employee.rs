//! Employee entity and wire-record normalization
//!
//! The upstream payload is loosely typed: each record arrives either as a
//! positional array `[name, role, city, id, start_date, salary]` or as a keyed
//! object with inconsistent field names (`id`/`emp_id`, `name`/`emp_name`,
//! `designation`/`role`). Normalization never fails; every field has a
//! defined default so dirty records degrade instead of aborting the load.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::gazetteer;

/// Center point for placeholder coordinates (India's centroid), matching the
/// upstream map's default view. An employee sitting exactly on its derived
/// placeholder is flagged as needing geocoding enrichment.
pub const PLACEHOLDER_CENTER: (f64, f64) = (20.5937, 78.9629);

const STATUS_OPTIONS: [EmployeeStatus; 3] = [
    EmployeeStatus::Active,
    EmployeeStatus::OnLeave,
    EmployeeStatus::Remote,
];

/// One raw wire record, shape-tagged at the deserialization boundary.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawRecord {
    /// `[name, role, city, id, start_date, salary]`
    Positional(Vec<Value>),
    /// Keyed object with inconsistent field names
    Keyed(Map<String, Value>),
}

/// Derived presence status, purely cosmetic (hash of id mod 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeStatus {
    Active,
    #[serde(rename = "On Leave")]
    OnLeave,
    Remote,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::OnLeave => "On Leave",
            EmployeeStatus::Remote => "Remote",
        }
    }
}

/// Map marker projection for the map view.
#[derive(Debug, Clone, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
}

/// Normalized employee entity.
///
/// Created by [`Employee::from_raw`]; `lat`/`lng` are the only fields mutated
/// after construction (backfilled by the geocoding enricher).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: String,
    pub city: String,
    pub start_date: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub salary: f64,
    pub lat: f64,
    pub lng: f64,
}

impl Employee {
    /// Normalize one raw record.
    ///
    /// `seq` is the record's position in the payload and feeds the
    /// deterministic fallback id (`row-{seq}`) when the input carries none.
    /// Never fails: missing or malformed fields resolve to defaults.
    pub fn from_raw(raw: &RawRecord, seq: usize) -> Self {
        let (id, name, role, city, start_date, email, phone, department, raw_salary) = match raw {
            RawRecord::Positional(fields) => (
                value_to_string(fields.get(3)).unwrap_or_else(|| format!("row-{seq}")),
                value_to_string(fields.first()).unwrap_or_else(|| "Unknown".to_string()),
                value_to_string(fields.get(1)).unwrap_or_else(|| "Employee".to_string()),
                value_to_string(fields.get(2)).unwrap_or_else(|| "Unknown".to_string()),
                value_to_string(fields.get(4)).unwrap_or_default(),
                String::new(),
                String::new(),
                String::new(),
                fields.get(5).cloned().unwrap_or(Value::Null),
            ),
            RawRecord::Keyed(map) => (
                value_to_string(map.get("id").or_else(|| map.get("emp_id")))
                    .unwrap_or_else(|| format!("row-{seq}")),
                value_to_string(map.get("name").or_else(|| map.get("emp_name")))
                    .unwrap_or_else(|| "Unknown".to_string()),
                value_to_string(map.get("designation").or_else(|| map.get("role")))
                    .unwrap_or_else(|| "Employee".to_string()),
                value_to_string(map.get("city")).unwrap_or_else(|| "Unknown".to_string()),
                value_to_string(map.get("start_date")).unwrap_or_default(),
                value_to_string(map.get("email")).unwrap_or_default(),
                value_to_string(map.get("phone")).unwrap_or_default(),
                value_to_string(map.get("department")).unwrap_or_default(),
                map.get("salary").cloned().unwrap_or(Value::Null),
            ),
        };

        let salary = parse_salary(&raw_salary);

        let (lat, lng) = match gazetteer::lookup(&city) {
            Some(coords) => coords,
            None => placeholder_coords(&id),
        };

        Self {
            id,
            name,
            role,
            city,
            start_date,
            email,
            phone,
            department,
            salary,
            lat,
            lng,
        }
    }

    /// True while `lat`/`lng` still hold the deterministic placeholder,
    /// i.e. the city was unknown to the gazetteer and has not been geocoded.
    pub fn has_placeholder_coords(&self) -> bool {
        let (lat, lng) = placeholder_coords(&self.id);
        self.lat == lat && self.lng == lng
    }

    /// Presence status derived from a numeric hash of the id. Not stored:
    /// recomputing keeps it consistent with the id by construction.
    pub fn status(&self) -> EmployeeStatus {
        let id_num = self
            .id
            .parse::<i64>()
            .ok()
            .filter(|n| *n != 0)
            .unwrap_or_else(|| self.id.chars().next().map(|c| c as i64).unwrap_or(0));
        STATUS_OPTIONS[(id_num.unsigned_abs() % 3) as usize]
    }

    /// Seeded identicon reference derived from the name.
    pub fn avatar_url(&self) -> String {
        format!(
            "https://api.dicebear.com/7.x/initials/svg?seed={}&backgroundColor=6366f1,8b5cf6,06b6d4,10b981&scale=90",
            urlencoding::encode(&self.name)
        )
    }

    /// Salary as a whole-dollar currency string, e.g. `$320,800`.
    pub fn display_salary(&self) -> String {
        let whole = self.salary.round() as u64;
        let digits = whole.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        out.push('$');
        for (i, c) in digits.chars().enumerate() {
            if i != 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }

    /// Up to two initial letters of the name, uppercased.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .flat_map(|c| c.to_uppercase())
            .collect()
    }

    pub fn map_marker(&self) -> MapMarker {
        MapMarker {
            lat: self.lat,
            lng: self.lng,
            label: format!("{} — {}", self.name, self.display_salary()),
        }
    }
}

/// Deterministic fallback coordinates for a city the gazetteer does not know:
/// the fixed center point offset by ±5 degrees from the id's first byte.
pub fn placeholder_coords(id: &str) -> (f64, f64) {
    let code = id.chars().next().map(|c| c as u32).unwrap_or(0);
    let offset = (code % 10) as f64 - 5.0;
    (PLACEHOLDER_CENTER.0 + offset, PLACEHOLDER_CENTER.1 + offset)
}

/// Parse a salary that may arrive as a number or a currency-formatted string.
/// Strings are stripped of everything but digits and the decimal point before
/// parsing; anything unparseable or negative yields 0.
fn parse_salary(raw: &Value) -> f64 {
    let parsed = match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
            cleaned.parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    };
    if parsed.is_finite() && parsed >= 0.0 {
        parsed
    } else {
        0.0
    }
}

/// Stringify a wire value, treating null and empty strings as absent so they
/// fall through to the field default.
fn value_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

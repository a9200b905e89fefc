// ── API-to-domain type conversions ──
//
// Bridges raw `moja_api` wire types into canonical `moja_core::model`
// types. Timestamps are parsed strictly (a bad one is an error, not a
// silent `None`); roles are normalized leniently (anything unrecognized is
// "no role").

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use moja_api::Role;
use moja_api::recorder::models::{
    DeviceEntry, RecordingEntry, SensorEntry, SensorSampleEntry, UserEntry,
};

use crate::error::CoreError;
use crate::model::{Device, Recording, SensorReading, SensorSample, User};

// ── Helpers ────────────────────────────────────────────────────────

/// Normalize an untyped role field: `"admin"` / `"user"` map, everything
/// else (other strings, `null`, numbers, missing) is `None`.
pub fn role_from_value(raw: Option<&Value>) -> Option<Role> {
    Role::from_claim(raw.and_then(Value::as_str))
}

/// Parse an ISO-8601 timestamp into UTC.
///
/// Accepts RFC 3339 with any offset, and also offset-less timestamps
/// (`2024-05-01T10:00:00.123456`), which the recorder emits for naive
/// database columns and which are UTC.
pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<DateTime<Utc>, CoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| CoreError::InvalidTimestamp {
            field,
            value: raw.to_owned(),
        })
}

// ── Users ──────────────────────────────────────────────────────────

impl TryFrom<UserEntry> for User {
    type Error = CoreError;

    fn try_from(u: UserEntry) -> Result<Self, Self::Error> {
        let created_at = u
            .created_at
            .as_deref()
            .map(|raw| parse_timestamp("created_at", raw))
            .transpose()?;

        Ok(User {
            role: role_from_value(u.role.as_ref()),
            id: u.id,
            uid: u.uid,
            email: u.email,
            created_at,
        })
    }
}

// ── Devices ────────────────────────────────────────────────────────

impl From<DeviceEntry> for Device {
    fn from(d: DeviceEntry) -> Self {
        Device {
            name: d.name,
            allowed_roles: d
                .allowed_roles
                .iter()
                .filter_map(|r| role_from_value(Some(r)))
                .collect(),
            active: d.active,
        }
    }
}

// ── History ────────────────────────────────────────────────────────

impl TryFrom<RecordingEntry> for Recording {
    type Error = CoreError;

    fn try_from(r: RecordingEntry) -> Result<Self, Self::Error> {
        Ok(Recording {
            created_at: parse_timestamp("created_at", &r.created_at)?,
            url: r.url,
        })
    }
}

impl TryFrom<SensorEntry> for SensorReading {
    type Error = CoreError;

    fn try_from(s: SensorEntry) -> Result<Self, Self::Error> {
        Ok(SensorReading {
            created_at: parse_timestamp("created_at", &s.created_at)?,
            temperature: s.temperature,
            humidity: s.humidity,
            cpu_temperature: s.cpu_temperature,
        })
    }
}

// ── Live ───────────────────────────────────────────────────────────

impl From<SensorSampleEntry> for SensorSample {
    fn from(s: SensorSampleEntry) -> Self {
        SensorSample {
            temperature: s.temperature,
            humidity: s.humidity,
            cpu_temperature: s.cpu_temperature,
        }
    }
}

/// Convert a list of wire entries, failing on the first bad one.
pub(crate) fn try_collect<W, D>(entries: Vec<W>) -> Result<Vec<D>, CoreError>
where
    D: TryFrom<W, Error = CoreError>,
{
    entries.into_iter().map(D::try_from).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn role_normalization() {
        assert_eq!(role_from_value(Some(&json!("admin"))), Some(Role::Admin));
        assert_eq!(role_from_value(Some(&json!("user"))), Some(Role::User));
        assert_eq!(role_from_value(Some(&json!("owner"))), None);
        assert_eq!(role_from_value(Some(&json!(""))), None);
        assert_eq!(role_from_value(Some(&Value::Null)), None);
        assert_eq!(role_from_value(Some(&json!(1))), None);
        assert_eq!(role_from_value(None), None);
    }

    #[test]
    fn allowed_roles_drop_unknowns() {
        let entry = DeviceEntry {
            name: "kitchen".into(),
            active: true,
            allowed_roles: vec![json!("user"), json!("guest"), Value::Null, json!("admin"), json!("user")],
        };
        let device = Device::from(entry);
        assert_eq!(
            device.allowed_roles.into_iter().collect::<Vec<_>>(),
            vec![Role::Admin, Role::User]
        );
        assert!(device.active);
    }

    #[test]
    fn timestamps_with_offset_become_utc() {
        let dt = parse_timestamp("created_at", "2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let dt = parse_timestamp("created_at", "2024-05-01T10:00:00.250000").unwrap();
        assert_eq!(dt.timestamp_millis(), Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap().timestamp_millis() + 250);
    }

    #[test]
    fn bad_timestamp_names_field_and_value() {
        match parse_timestamp("created_at", "yesterday") {
            Err(CoreError::InvalidTimestamp { field, value }) => {
                assert_eq!(field, "created_at");
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected InvalidTimestamp, got: {other:?}"),
        }
    }

    #[test]
    fn sensor_fields_are_not_invented() {
        let reading = SensorReading::try_from(SensorEntry {
            created_at: "2024-05-01T10:00:00Z".into(),
            temperature: Some(19.5),
            humidity: None,
            cpu_temperature: None,
        })
        .unwrap();
        assert_eq!(reading.temperature, Some(19.5));
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.cpu_temperature, None);

        let sample = SensorSample::from(SensorSampleEntry::default());
        assert_eq!(sample, SensorSample::default());
    }

    #[test]
    fn user_role_normalized_and_bad_created_at_rejected() {
        let user = User::try_from(UserEntry {
            id: "u-1".into(),
            uid: Some("abc".into()),
            email: None,
            created_at: None,
            role: Some(json!("superadmin")),
        })
        .unwrap();
        assert_eq!(user.role, None);
        assert!(!user.is_admin());

        let result = User::try_from(UserEntry {
            id: "u-2".into(),
            uid: None,
            email: None,
            created_at: Some("not a date".into()),
            role: None,
        });
        assert!(matches!(result, Err(CoreError::InvalidTimestamp { .. })));
    }

    #[test]
    fn try_collect_stops_at_first_bad_entry() {
        let entries = vec![
            RecordingEntry { url: "a".into(), created_at: "2024-01-01T00:00:00Z".into() },
            RecordingEntry { url: "b".into(), created_at: "garbage".into() },
        ];
        let result: Result<Vec<Recording>, _> = try_collect(entries);
        assert!(result.is_err());
    }
}

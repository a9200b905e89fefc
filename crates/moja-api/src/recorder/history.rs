// Recorder history endpoints
//
// Recordings and sensor logs over an optional time range, plus the
// recorder's own liveness check.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;

use crate::auth::Identity;
use crate::error::Error;
use crate::recorder::client::RecorderClient;
use crate::recorder::models::{RecordingEntry, SensorEntry};
use crate::request::RequestOptions;

impl RecorderClient {
    /// Recordings for a device.
    ///
    /// `GET recordings/{name}?from=..&to=..`
    pub async fn recordings<I: Identity>(
        &self,
        identity: &I,
        name: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<RecordingEntry>, Error> {
        let endpoint = range_endpoint(&format!("recordings/{name}"), from, to);
        self.get_json(identity, &endpoint).await
    }

    /// Logged sensor readings for a device.
    ///
    /// `GET sensors/{name}?from=..&to=..`
    pub async fn sensors<I: Identity>(
        &self,
        identity: &I,
        name: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<SensorEntry>, Error> {
        let endpoint = range_endpoint(&format!("sensors/{name}"), from, to);
        self.get_json(identity, &endpoint).await
    }

    /// The status the recorder answers its liveness check with.
    ///
    /// `GET healthz`. Transport errors propagate; any HTTP status is an answer.
    pub async fn healthz<I: Identity>(&self, identity: &I) -> Result<StatusCode, Error> {
        let resp = self.send(identity, "healthz", RequestOptions::get()).await?;
        Ok(resp.status())
    }
}

/// Append `from`/`to` as ISO-8601 UTC query parameters, only when present.
/// With neither bound, the path is returned bare and the upstream picks
/// its default range.
pub(crate) fn range_endpoint(
    path: &str,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(from) = from {
        query.append_pair("from", &from.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    if let Some(to) = to {
        query.append_pair("to", &to.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    let query = query.finish();

    if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn no_bounds_no_query() {
        assert_eq!(range_endpoint("recordings/kitchen", None, None), "recordings/kitchen");
    }

    #[test]
    fn bounds_are_iso_utc() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single();
        let to = Utc.with_ymd_and_hms(2024, 1, 2, 12, 30, 0).single();
        assert_eq!(
            range_endpoint("sensors/kitchen", from, to),
            "sensors/kitchen?from=2024-01-01T00%3A00%3A00.000Z&to=2024-01-02T12%3A30%3A00.000Z"
        );
    }

    #[test]
    fn only_upper_bound() {
        let to = Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).single();
        assert_eq!(
            range_endpoint("sensors/kitchen", None, to),
            "sensors/kitchen?to=2024-03-04T05%3A06%3A07.000Z"
        );
    }
}

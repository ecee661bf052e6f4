//! Telemetry envelopes
//!
//! JSON shape accepted by Application Insights compatible ingestion
//! endpoints. A batch is a JSON array of [`Envelope`]s.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use trailmark_core::domain::TelemetryContext;

/// Schema version of the `baseData` payloads
const DATA_VERSION: u32 = 2;

pub const TAG_SESSION_ID: &str = "ai.session.id";
pub const TAG_USER_ID: &str = "ai.user.id";
pub const TAG_DEVICE_OS: &str = "ai.device.os";

/// One telemetry item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub name: String,
    /// RFC 3339 timestamp with millisecond precision
    pub time: String,
    #[serde(rename = "iKey")]
    pub ikey: String,
    pub tags: BTreeMap<String, String>,
    pub data: EnvelopeData,
}

/// Typed payload, serialized as `{"baseType": ..., "baseData": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "baseType", content = "baseData")]
pub enum EnvelopeData {
    EventData(EventData),
    MetricData(MetricData),
    PageViewData(PageViewData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    pub ver: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricData {
    pub ver: u32,
    pub metrics: Vec<DataPoint>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub name: String,
    pub value: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageViewData {
    pub ver: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl Envelope {
    pub fn event(context: &TelemetryContext, ikey: &str, name: &str) -> Self {
        Self::new(
            "Event",
            context,
            ikey,
            EnvelopeData::EventData(EventData {
                ver: DATA_VERSION,
                name: name.to_string(),
                properties: context.properties.clone(),
            }),
        )
    }

    pub fn metric(context: &TelemetryContext, ikey: &str, name: &str, value: f64) -> Self {
        Self::new(
            "Metric",
            context,
            ikey,
            EnvelopeData::MetricData(MetricData {
                ver: DATA_VERSION,
                metrics: vec![DataPoint {
                    name: name.to_string(),
                    value,
                    count: 1,
                }],
                properties: context.properties.clone(),
            }),
        )
    }

    pub fn page_view(context: &TelemetryContext, ikey: &str, name: &str) -> Self {
        Self::new(
            "PageView",
            context,
            ikey,
            EnvelopeData::PageViewData(PageViewData {
                ver: DATA_VERSION,
                name: name.to_string(),
                properties: context.properties.clone(),
            }),
        )
    }

    fn new(kind: &str, context: &TelemetryContext, ikey: &str, data: EnvelopeData) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert(TAG_SESSION_ID.to_string(), context.session_id.clone());
        tags.insert(TAG_DEVICE_OS.to_string(), context.device_os.clone());
        if let Some(user_id) = &context.user_id {
            tags.insert(TAG_USER_ID.to_string(), user_id.clone());
        }

        Self {
            name: format!("Microsoft.ApplicationInsights.{}.{kind}", ikey.replace('-', "")),
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            ikey: ikey.to_string(),
            tags,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use trailmark_core::domain::SystemInfo;

    use super::*;

    const IKEY: &str = "0000-aaaa";

    fn context() -> TelemetryContext {
        let mut info = SystemInfo::new();
        info.insert("Culture".to_string(), "eng".to_string());
        TelemetryContext::new_session("linux 6.1", info)
    }

    #[test]
    fn test_event_envelope_json_shape() {
        let ctx = context();
        let envelope = Envelope::event(&ctx, IKEY, "Clicked");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["name"], "Microsoft.ApplicationInsights.0000aaaa.Event");
        assert_eq!(json["iKey"], IKEY);
        assert_eq!(json["tags"]["ai.session.id"], ctx.session_id.as_str());
        assert_eq!(json["tags"]["ai.device.os"], "linux 6.1");
        assert!(json["tags"].get("ai.user.id").is_none());
        assert_eq!(json["data"]["baseType"], "EventData");
        assert_eq!(json["data"]["baseData"]["name"], "Clicked");
        assert_eq!(json["data"]["baseData"]["ver"], 2);
        assert_eq!(json["data"]["baseData"]["properties"]["Culture"], "eng");
        assert!(json["time"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_metric_envelope_carries_value() {
        let envelope = Envelope::metric(&context(), IKEY, "LoadTimeMs", 42.0);
        match envelope.data {
            EnvelopeData::MetricData(data) => {
                assert_eq!(data.metrics.len(), 1);
                assert_eq!(data.metrics[0].name, "LoadTimeMs");
                assert_eq!(data.metrics[0].value, 42.0);
                assert_eq!(data.metrics[0].count, 1);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_user_id_tag_present_once_set() {
        let mut ctx = context();
        ctx.user_id = Some("base_00ff".to_string());
        let envelope = Envelope::page_view(&ctx, IKEY, "Settings");
        assert_eq!(
            envelope.tags.get(TAG_USER_ID).map(String::as_str),
            Some("base_00ff")
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["data"]["baseType"], "PageViewData");
    }
}

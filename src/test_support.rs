//! fixtures shared by the unit tests

use std::{net::SocketAddr, time::Duration};

use axum::{http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;

use crate::alert::{Alert, AlertGroup, Receiver};

pub const GROUPS_PATH: &str = "/api/v2/alerts/groups";

/// the `now` the fixtures are relative to
pub fn now() -> DateTime<Utc> {
	Utc.with_ymd_and_hms(2022, 5, 30, 12, 0, 0).unwrap()
}

pub fn alert(name: &str, severity: &str) -> Alert {
	alert_at(name, severity, now())
}

pub fn alert_at(name: &str, severity: &str, starts_at: DateTime<Utc>) -> Alert {
	let mut labels = IndexMap::new();
	labels.insert("alertname".to_string(), name.to_string());
	labels.insert("severity".to_string(), severity.to_string());

	let mut annotations = IndexMap::new();
	annotations.insert("summary".to_string(), format!("{name} is firing"));

	Alert {
		labels,
		annotations,
		starts_at: Some(starts_at.to_rfc3339()),
		generator_url: format!("http://prometheus/graph?g0.expr={name}"),
	}
}

pub fn group(receiver: &str, alerts: Vec<Alert>) -> AlertGroup {
	AlertGroup {
		receiver: Receiver {
			name: receiver.to_string(),
		},
		alerts,
	}
}

/// Serves a few fake alertmanagers under different path prefixes:
///
/// * `/healthy` - one group with a fresh critical `HighCPU` alert
/// * `/broken` - answers 500
/// * `/garbage` - answers 200 with a body that isn't json
/// * `/slow` - answers after ten seconds
pub async fn spawn_alertmanagers() -> SocketAddr {
	let app = Router::new()
		.route(&format!("/healthy{GROUPS_PATH}"), get(healthy))
		.route(&format!("/broken{GROUPS_PATH}"), get(broken))
		.route(&format!("/garbage{GROUPS_PATH}"), get(garbage))
		.route(&format!("/slow{GROUPS_PATH}"), get(slow));

	let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
		.serve(app.into_make_service());
	let addr = server.local_addr();

	tokio::spawn(server);

	addr
}

async fn healthy(
	axum::extract::RawQuery(query): axum::extract::RawQuery,
) -> Result<Json<serde_json::Value>, StatusCode> {
	// the monitor only wants active, unsilenced, uninhibited alerts
	if query.as_deref() != Some("silenced=false&inhibited=false&active=true") {
		return Err(StatusCode::BAD_REQUEST);
	}

	Ok(Json(serde_json::json!([{
		"receiver": {"name": "default"},
		"labels": {},
		"alerts": [{
			"labels": {"alertname": "HighCPU", "severity": "critical"},
			"annotations": {"summary": "cpu is busy"},
			"startsAt": Utc::now().to_rfc3339(),
			"generatorURL": "http://prometheus/graph"
		}]
	}])))
}

async fn broken() -> StatusCode {
	StatusCode::INTERNAL_SERVER_ERROR
}

async fn garbage() -> &'static str {
	"<html>not an alertmanager</html>"
}

async fn slow() -> Json<serde_json::Value> {
	tokio::time::sleep(Duration::from_secs(10)).await;
	Json(serde_json::json!([]))
}

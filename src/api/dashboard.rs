//! Dashboard statistics and AI report endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::{ApiRequest, Dispatcher};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatisticsRange {
    Last7Days,
    Last30Days,
    Month,
}

impl StatisticsRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatisticsRange::Last7Days => "last7Days",
            StatisticsRange::Last30Days => "last30Days",
            StatisticsRange::Month => "month",
        }
    }
}

/// Doctor count, department count and chart series for the admin dashboard
pub async fn admin_statistics(dispatcher: &Dispatcher, range: StatisticsRange) -> Result<Value> {
    dispatcher
        .send(ApiRequest::get("/admin/dashboard/statistics").query("type", range.as_str()))
        .await
}

/// Health record statistics for the patient dashboard
pub async fn health_statistics(dispatcher: &Dispatcher, range: StatisticsRange) -> Result<Value> {
    dispatcher
        .send(ApiRequest::get("/user/dashboard/statistics").query("type", range.as_str()))
        .await
}

/// Generate an AI health report; runs under the extended timeout
pub async fn generate_report(dispatcher: &Dispatcher, request: &Value) -> Result<Value> {
    dispatcher
        .send(ApiRequest::post("/user/report/generate").json(request)?.long_running())
        .await
}

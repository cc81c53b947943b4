use actix_web::{HttpResponse, web};
use tracing::trace;

use super::helpers::success_response;
use super::types::HealthResponse;

// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(app_start_time: web::Data<AppStartTime>) -> HttpResponse {
        trace!("Received health check request");
        let uptime = chrono::Utc::now() - app_start_time.start_datetime;

        success_response(
            "OK",
            HealthResponse {
                status: "healthy".to_string(),
                started_at: app_start_time.start_datetime,
                uptime_secs: uptime.num_seconds().max(0),
            },
        )
    }
}

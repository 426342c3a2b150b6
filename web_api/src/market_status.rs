//! market_status.rs
//!
//! GET /market/status?market=US|SA
//!
//! one market when asked for one, otherwise both keyed by code

use actix_web::{web, HttpResponse};
use common_lib::clock::Clock;
use common_lib::market::Market;
use common_lib::market_hours::MarketSessionClock;
use serde::Deserialize;

use crate::api::{ApiError, ApiResponse};

#[derive(Debug, Deserialize)]
pub struct MarketQuery {
    pub market: Option<String>,
}

impl MarketQuery {
    /// None when no market was asked for; an empty `market=` counts as not asking
    fn selected(&self) -> Result<Option<Market>, ApiError> {
        match self.market.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(code) => Ok(Some(Market::parse(code)?)),
        }
    }
}

/// GET /market/status
/// authorization: none
pub async fn get_market_status(query: web::Query<MarketQuery>, clock: web::Data<dyn Clock>) -> Result<HttpResponse, ApiError> {
    // the only clock read for this request
    let now = clock.now();
    tracing::debug!("[get_market_status] market: {:?}, now: {}", &query.market, &now);

    match query.selected()? {
        Some(market) => Ok(ApiResponse::ok(MarketSessionClock::status(now, market))),
        None => Ok(ApiResponse::ok(MarketSessionClock::status_all(now))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::{Method, StatusCode};
    use actix_web::{test, web, App};
    use chrono::{TimeZone, Utc};
    use common_lib::clock::{Clock, FixedClock};
    use serde_json::Value;

    use crate::configuration::Settings;
    use crate::web_server::{cors_headers, mount};

    fn settings() -> Settings {
        Settings {
            application_host: "127.0.0.1".to_string(),
            application_port: 8080,
            workers: 1,
            environment: "test".to_string(),
            tls: None,
        }
    }

    // tuesday 2024-01-16 17:00 in new york, 01:00 wednesday in riyadh
    fn tuesday_evening() -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 16, 22, 0, 0).unwrap()))
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::from(tuesday_evening()))
                    .app_data(web::Data::new(settings()))
                    .wrap(cors_headers())
                    .configure(mount),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_single_market() {
        let app = app!();
        let req = test::TestRequest::get().uri("/market/status?market=US").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("Access-Control-Allow-Origin").unwrap(), "*");
        assert_eq!(resp.headers().get("Cache-Control").unwrap(), "no-store");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["market"], "US");
        assert_eq!(body["data"]["status"], "AFTER_HOURS");
        assert_eq!(body["data"]["is_open"], false);
        assert_eq!(body["data"]["next_open"], "2024-01-17T14:30:00Z");
        assert!(body["data"]["next_close"].is_null());
        assert_eq!(body["data"]["timezone"], "America/New_York");
    }

    #[actix_web::test]
    async fn test_both_markets_share_one_instant() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/market/status").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["US"]["status"], "AFTER_HOURS");
        assert_eq!(body["data"]["SA"]["status"], "CLOSED");
        assert_eq!(body["data"]["SA"]["next_open"], "2024-01-17T07:00:00Z");
        assert_eq!(body["data"]["US"]["current_time"], body["data"]["SA"]["current_time"]);
    }

    #[actix_web::test]
    async fn test_empty_selector_means_both() {
        let app = app!();
        let req = test::TestRequest::get().uri("/market/status?market=").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["data"]["US"].is_object());
        assert!(body["data"]["SA"].is_object());
    }

    #[actix_web::test]
    async fn test_unknown_market_is_bad_request() {
        let app = app!();
        let req = test::TestRequest::get().uri("/market/status?market=JP").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("JP"));
    }

    #[actix_web::test]
    async fn test_post_is_method_not_allowed() {
        let app = app!();
        let req = test::TestRequest::post().uri("/market/status").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Method not allowed. Use GET.");
    }

    #[actix_web::test]
    async fn test_options_preflight() {
        let app = app!();
        let req = test::TestRequest::default().method(Method::OPTIONS).uri("/api/market/status").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("Access-Control-Allow-Methods").unwrap(), "GET, OPTIONS");
    }
}

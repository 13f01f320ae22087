//! HTTP inbound adapter exposing REST endpoints.

pub mod analytics;
pub mod error;
pub mod events;
pub mod health;
pub mod purchase;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use crate::domain::ApiResult;
use crate::domain::Error;

/// JSON body limits and the failure envelope for unreadable payloads.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            Error::invalid_request(format!("request body is not valid JSON: {err}"))
                .with_details(serde_json::json!({ "code": "invalid_json" }))
                .into()
        })
}

/// Query-string failures use the same envelope as body validation.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid query string: {err}"))
            .with_details(serde_json::json!({ "code": "invalid_query" }))
            .into()
    })
}

/// Register every `/api/v1` endpoint on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use ticketing::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(purchase::purchase)
        .service(purchase::get_order)
        .service(events::list_events)
        .service(events::get_event)
        .service(users::register)
        .service(users::login)
        .service(analytics::top_events)
        .service(analytics::events_by_city)
        .service(analytics::organizer_durations);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    use crate::inbound::http::test_utils::{MockPorts, detail_code};

    #[rstest]
    #[case(
        test::TestRequest::post()
            .uri("/api/v1/purchase")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
        "invalid_json"
    )]
    #[case(
        test::TestRequest::get().uri("/api/v1/analytics/top-events?limit=many"),
        "invalid_query"
    )]
    #[actix_web::test]
    async fn extractor_failures_use_the_envelope(
        #[case] request: test::TestRequest,
        #[case] code: &str,
    ) {
        let app = test::init_service(
            App::new()
                .app_data(MockPorts::default().into_state())
                .service(web::scope("/api/v1").configure(configure_api)),
        )
        .await;

        let res = test::call_service(&app, request.to_request()).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body.get("ok"), Some(&Value::Bool(false)));
        assert_eq!(detail_code(&body), Some(code));
    }
}

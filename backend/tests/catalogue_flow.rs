//! Catalogue reads, cache behaviour and analytics through the HTTP surface.

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Duration;
use rstest::rstest;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use ticketing::Trace;
use ticketing::domain::EventId;
use ticketing::domain::ports::{CatalogueCache, EventRepository};
use ticketing::inbound::http::configure_api;

mod support;

use support::{BUYER, EventSpec, Harness};

fn harness() -> Harness {
    Harness::new([
        EventSpec {
            city: Some("Vilnius"),
            organizer: Some("Blue Note"),
            duration_minutes: Some(120),
            starts_in: Duration::days(2),
            ..EventSpec::new("jazz", vec![("GA", dec!(10.00), 2)])
        }
        .build(),
        EventSpec {
            city: Some(" vilnius "),
            organizer: Some("Blue Note"),
            duration_minutes: Some(90),
            starts_in: Duration::days(1),
            ..EventSpec::new("blues", vec![("GA", dec!(12.00), 10), ("VIP", dec!(40.00), 1)])
        }
        .build(),
        EventSpec {
            city: Some("Kaunas"),
            organizer: Some("Opera House"),
            duration_minutes: Some(180),
            ..EventSpec::new("opera", vec![("Stalls", dec!(55.00), 4)])
        }
        .build(),
        EventSpec {
            starts_in: -Duration::days(3),
            ..EventSpec::new("past", vec![("GA", dec!(5.00), 8)])
        }
        .build(),
    ])
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data($harness.state.clone())
                .wrap(Trace)
                .service(web::scope("/api/v1").configure(configure_api)),
        )
        .await
    };
}

macro_rules! get_json {
    ($app:expr, $uri:expr) => {{
        let req = test::TestRequest::get().uri($uri).to_request();
        let value: Value = test::call_and_read_body_json(&$app, req).await;
        value
    }};
}

macro_rules! buy {
    ($app:expr, $event:expr, $tier:expr, $quantity:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/purchase")
            .set_json(json!({
                "userId": BUYER,
                "eventId": $event,
                "ticketTypeId": $tier,
                "quantity": $quantity,
            }))
            .to_request();
        test::call_service(&$app, req).await.status()
    }};
}

#[rstest]
#[actix_web::test]
async fn draining_an_event_removes_it_from_the_sellable_listing() {
    let harness = harness();
    harness.add_user(BUYER).await;
    let app = app!(harness);

    let first = get_json!(app, "/api/v1/events");
    assert_eq!(first["cached"], json!(false));
    assert_eq!(first["eventIds"], json!(["blues", "jazz", "opera"]));

    let second = get_json!(app, "/api/v1/events");
    assert_eq!(second["cached"], json!(true));
    assert_eq!(second["eventIds"], first["eventIds"]);

    assert_eq!(buy!(app, "jazz", "GA", 2), StatusCode::OK);

    let after = get_json!(app, "/api/v1/events");
    assert_eq!(after["cached"], json!(true));
    assert_eq!(after["eventIds"], json!(["blues", "opera"]));
}

#[rstest]
#[actix_web::test]
async fn partially_sold_events_stay_listed() {
    let harness = harness();
    harness.add_user(BUYER).await;
    let app = app!(harness);

    get_json!(app, "/api/v1/events");
    assert_eq!(buy!(app, "blues", "VIP", 1), StatusCode::OK);

    let listing = get_json!(app, "/api/v1/events");
    assert_eq!(listing["eventIds"], json!(["blues", "jazz", "opera"]));
}

#[rstest]
#[actix_web::test]
async fn event_reads_go_through_the_cache_and_are_invalidated_by_purchases() {
    let harness = harness();
    harness.add_user(BUYER).await;
    let app = app!(harness);

    let miss = get_json!(app, "/api/v1/events/opera");
    assert_eq!(miss["cached"], json!(false));
    assert_eq!(miss["event"]["ticketTypes"][0]["remaining"], json!(4));

    let hit = get_json!(app, "/api/v1/events/opera");
    assert_eq!(hit["cached"], json!(true));
    assert_eq!(hit["event"], miss["event"]);

    assert_eq!(buy!(app, "opera", "Stalls", 3), StatusCode::OK);
    let opera = EventId::new("opera").expect("event id");
    assert!(
        harness
            .cache
            .get_event(&opera)
            .await
            .expect("cache read")
            .is_none()
    );

    let refreshed = get_json!(app, "/api/v1/events/opera");
    assert_eq!(refreshed["cached"], json!(false));
    assert_eq!(refreshed["event"]["ticketTypes"][0]["remaining"], json!(1));
}

#[rstest]
#[actix_web::test]
async fn unknown_event_is_not_found() {
    let harness = harness();
    let app = app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/v1/events/nowhere")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["ok"], json!(false));
}

#[rstest]
#[actix_web::test]
async fn top_events_rank_sales_and_cache_the_ranking() {
    let harness = harness();
    harness.add_user(BUYER).await;
    let app = app!(harness);

    assert_eq!(buy!(app, "blues", "GA", 3), StatusCode::OK);
    assert_eq!(buy!(app, "blues", "GA", 2), StatusCode::OK);
    assert_eq!(buy!(app, "opera", "Stalls", 4), StatusCode::OK);
    assert_eq!(buy!(app, "jazz", "GA", 1), StatusCode::OK);

    let ranking = get_json!(app, "/api/v1/analytics/top-events?limit=2");
    assert_eq!(ranking["cached"], json!(false));
    let ranked: Vec<(&str, u64)> = ranking["events"]
        .as_array()
        .expect("events array")
        .iter()
        .map(|entry| {
            (
                entry["eventId"].as_str().expect("event id"),
                entry["ticketsSold"].as_u64().expect("tickets sold"),
            )
        })
        .collect();
    assert_eq!(ranked, [("blues", 5), ("opera", 4)]);

    let again = get_json!(app, "/api/v1/analytics/top-events?limit=2");
    assert_eq!(again["cached"], json!(true));
    assert_eq!(again["events"], ranking["events"]);
}

#[rstest]
#[case("0")]
#[case("51")]
#[case("ten")]
#[actix_web::test]
async fn top_events_limit_out_of_range_is_rejected(#[case] limit: &str) {
    let harness = harness();
    let app = app!(harness);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/analytics/top-events?limit={limit}"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn events_by_city_match_case_insensitively_in_start_order() {
    let harness = harness();
    let app = app!(harness);

    let body = get_json!(app, "/api/v1/analytics/events-by-city?city=VILNIUS");

    let ids: Vec<&str> = body["events"]
        .as_array()
        .expect("events array")
        .iter()
        .map(|entry| entry["eventId"].as_str().expect("event id"))
        .collect();
    assert_eq!(ids, ["blues", "jazz"]);
    assert_eq!(body["events"][0]["tickets"].as_array().map(Vec::len), Some(2));
}

#[rstest]
#[actix_web::test]
async fn organizer_durations_average_per_organizer() {
    let harness = harness();
    let app = app!(harness);

    let body = get_json!(app, "/api/v1/analytics/organizer-durations");

    let organizers: Vec<(&str, u64)> = body["organizers"]
        .as_array()
        .expect("organizers array")
        .iter()
        .map(|entry| {
            (
                entry["organizer"].as_str().expect("organizer"),
                entry["eventsCount"].as_u64().expect("events count"),
            )
        })
        .collect();
    assert_eq!(organizers, [("Opera House", 1), ("Blue Note", 2)]);
}

#[rstest]
#[actix_web::test]
async fn repricing_a_tier_leaves_recorded_orders_untouched() {
    let harness = harness();
    harness.add_user(BUYER).await;
    let app = app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/purchase")
        .set_json(json!({"userId": BUYER, "eventId": "opera", "ticketTypeId": "Stalls", "quantity": 3}))
        .to_request();
    let bought: Value = test::call_and_read_body_json(&app, req).await;
    let order_id = bought["orderId"].as_str().expect("order id").to_owned();
    assert_eq!(bought["order"]["lines"][0]["unitPrice"], json!("55.00"));

    let repriced = EventSpec {
        city: Some("Kaunas"),
        organizer: Some("Opera House"),
        duration_minutes: Some(180),
        ..EventSpec::new("opera", vec![("Stalls", dec!(99.00), 1)])
    }
    .build();
    harness
        .catalogue
        .upsert(&repriced)
        .await
        .expect("reprice event");

    let fetched = get_json!(app, &format!("/api/v1/orders/{order_id}"));
    assert_eq!(fetched["order"]["lines"][0]["unitPrice"], json!("55.00"));
    assert_eq!(fetched["order"]["lines"][0]["quantity"], json!(3));

    let event = get_json!(app, "/api/v1/events/opera");
    assert_eq!(event["event"]["ticketTypes"][0]["price"], json!("99.00"));
}

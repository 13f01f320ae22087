//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{events, order_lines, orders, ticket_types, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub interests: Vec<String>,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<&'a str>,
    pub city: Option<&'a str>,
    pub interests: Vec<String>,
    pub password_hash: &'a str,
}

/// Row struct for reading and upserting events.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct EventRow {
    pub id: String,
    pub title: String,
    pub city: Option<String>,
    pub venue: Option<String>,
    pub category: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub age_restriction: Option<i16>,
    pub organizer_name: Option<String>,
    pub organizer_contact: Option<String>,
}

/// Row struct for ticket types.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = ticket_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TicketTypeRow {
    pub event_id: String,
    pub ticket_type_id: String,
    pub position: i32,
    pub price: Decimal,
    pub remaining: i32,
}

/// Row struct for orders.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub user_id: String,
    pub placed_at: DateTime<Utc>,
}

/// Row struct for order lines.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = order_lines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderLineRow {
    pub order_id: Uuid,
    pub line_no: i32,
    pub event_id: String,
    pub ticket_type_id: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. Regenerate with `diesel print-schema` after changing them.

diesel::table! {
    /// Registered users keyed by email address.
    users (id) {
        id -> Varchar,
        first_name -> Nullable<Text>,
        last_name -> Nullable<Text>,
        birth_date -> Nullable<Date>,
        phone -> Nullable<Text>,
        city -> Nullable<Text>,
        interests -> Array<Text>,
        /// bcrypt hash in modular crypt format.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue events. Ticket types live in `ticket_types`.
    events (id) {
        id -> Varchar,
        title -> Text,
        city -> Nullable<Text>,
        venue -> Nullable<Text>,
        category -> Nullable<Text>,
        starts_at -> Timestamptz,
        duration_minutes -> Nullable<Int4>,
        age_restriction -> Nullable<Int2>,
        organizer_name -> Nullable<Text>,
        organizer_contact -> Nullable<Text>,
    }
}

diesel::table! {
    /// Ticket tiers per event.
    ///
    /// `position` preserves the event's ordering for positional purchase
    /// hints. `remaining` carries a `CHECK (remaining >= 0)` constraint.
    ticket_types (event_id, ticket_type_id) {
        event_id -> Varchar,
        ticket_type_id -> Varchar,
        position -> Int4,
        price -> Numeric,
        remaining -> Int4,
    }
}

diesel::table! {
    /// Committed orders. Rows are never updated.
    orders (id) {
        id -> Uuid,
        user_id -> Varchar,
        placed_at -> Timestamptz,
    }
}

diesel::table! {
    /// Order lines with the unit price captured at purchase time.
    order_lines (order_id, line_no) {
        order_id -> Uuid,
        line_no -> Int4,
        event_id -> Varchar,
        ticket_type_id -> Varchar,
        quantity -> Int4,
        unit_price -> Numeric,
    }
}

diesel::joinable!(ticket_types -> events (event_id));
diesel::joinable!(orders -> users (user_id));
diesel::joinable!(order_lines -> orders (order_id));

diesel::allow_tables_to_appear_in_same_query!(users, events, ticket_types, orders, order_lines);

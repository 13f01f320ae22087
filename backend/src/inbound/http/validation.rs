//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns an `invalid_request` [`Error`] whose details carry the
//! offending `field` and a machine-readable `code`.

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::domain::{
    CredentialsValidationError, Error, EventId, OrderId, TopEventsLimit, UserId,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidUuid,
    InvalidQuantity,
    InvalidLimit,
    InvalidEmail,
    InvalidDate,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidQuantity => "invalid_quantity",
            ErrorCode::InvalidLimit => "invalid_limit",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidDate => "invalid_date",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Require a present, non-blank string field.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(missing_field_error(field)),
    }
}

pub(crate) fn parse_user_id(value: Option<String>, field: FieldName) -> Result<UserId, Error> {
    let raw = require_text(value, field)?;
    UserId::new(raw.trim()).map_err(|err| field_error(field, ErrorCode::InvalidId, err.to_string()))
}

pub(crate) fn parse_event_id(raw: &str, field: FieldName) -> Result<EventId, Error> {
    if raw.trim().is_empty() {
        return Err(missing_field_error(field));
    }
    EventId::new(raw).map_err(|err| field_error(field, ErrorCode::InvalidId, err.to_string()))
}

pub(crate) fn parse_order_id(raw: &str, field: FieldName) -> Result<OrderId, Error> {
    let name = field.as_str();
    raw.parse().map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{name} must be a valid UUID"),
        )
    })
}

/// Quantity defaults to one and must be a positive integer.
pub(crate) fn parse_quantity(value: Option<&Value>, field: FieldName) -> Result<u32, Error> {
    let name = field.as_str();
    let invalid = || {
        field_error(
            field,
            ErrorCode::InvalidQuantity,
            format!("{name} must be a positive integer"),
        )
    };
    let parsed = match value {
        None | Some(Value::Null) => return Ok(1),
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        Some(_) => None,
    };
    parsed
        .filter(|quantity| *quantity > 0)
        .and_then(|quantity| u32::try_from(quantity).ok())
        .ok_or_else(invalid)
}

/// Render a number-or-string hint as text; other JSON types count as absent.
pub(crate) fn hint_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub(crate) fn parse_limit(value: Option<u32>, field: FieldName) -> Result<TopEventsLimit, Error> {
    let Some(raw) = value else {
        return Ok(TopEventsLimit::default());
    };
    let name = field.as_str();
    TopEventsLimit::new(raw).ok_or_else(|| {
        field_error(
            field,
            ErrorCode::InvalidLimit,
            format!(
                "{name} must be between 1 and {}",
                crate::domain::TOP_EVENTS_MAX
            ),
        )
    })
}

/// Optional `YYYY-MM-DD` date; blank counts as absent.
pub(crate) fn parse_date(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    let Some(raw) = value.filter(|text| !text.trim().is_empty()) else {
        return Ok(None);
    };
    let name = field.as_str();
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            field_error(
                field,
                ErrorCode::InvalidDate,
                format!("{name} must be a date formatted as YYYY-MM-DD"),
            )
        })
}

pub(crate) fn map_credentials_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::EmptyEmail => missing_field_error(FieldName::new("email")),
        CredentialsValidationError::MalformedEmail => field_error(
            FieldName::new("email"),
            ErrorCode::InvalidEmail,
            err.to_string(),
        ),
        CredentialsValidationError::EmptyPassword => {
            missing_field_error(FieldName::new("password"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const QUANTITY: FieldName = FieldName::new("quantity");

    #[rstest]
    #[case(None, 1)]
    #[case(Some(json!(null)), 1)]
    #[case(Some(json!(3)), 3)]
    #[case(Some(json!(" 4 ")), 4)]
    fn quantities_parse(#[case] value: Option<Value>, #[case] expected: u32) {
        assert_eq!(
            parse_quantity(value.as_ref(), QUANTITY).expect("valid quantity"),
            expected
        );
    }

    #[rstest]
    #[case(json!(0))]
    #[case(json!(-1))]
    #[case(json!(1.5))]
    #[case(json!("two"))]
    #[case(json!(true))]
    fn bad_quantities_are_rejected(#[case] value: Value) {
        let err = parse_quantity(Some(&value), QUANTITY).expect_err("invalid quantity");
        assert_eq!(
            err.details().and_then(|d| d.get("code")),
            Some(&json!("invalid_quantity"))
        );
    }

    #[rstest]
    #[case(Some(json!("10.50")), Some("10.50"))]
    #[case(Some(json!(10)), Some("10"))]
    #[case(Some(json!(["10"])), None)]
    #[case(None, None)]
    fn hints_accept_numbers_and_strings(
        #[case] value: Option<Value>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(hint_text(value.as_ref()).as_deref(), expected);
    }

    #[rstest]
    #[case(None, 3)]
    #[case(Some(50), 50)]
    fn limits_default_and_cap(#[case] raw: Option<u32>, #[case] expected: u8) {
        let limit = parse_limit(raw, FieldName::new("limit")).expect("valid limit");
        assert_eq!(limit.get(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(51)]
    fn out_of_range_limits_fail(#[case] raw: u32) {
        assert!(parse_limit(Some(raw), FieldName::new("limit")).is_err());
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(" "), None)]
    #[case(Some("1990-04-01"), NaiveDate::from_ymd_opt(1990, 4, 1))]
    fn dates_are_optional(#[case] raw: Option<&str>, #[case] expected: Option<NaiveDate>) {
        let parsed = parse_date(raw.map(str::to_owned), FieldName::new("birthDate"))
            .expect("valid date");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn malformed_dates_fail() {
        let err = parse_date(Some("01/04/1990".into()), FieldName::new("birthDate"))
            .expect_err("bad date");
        assert_eq!(
            err.details().and_then(|d| d.get("code")),
            Some(&json!("invalid_date"))
        );
    }

    #[rstest]
    fn blank_user_ids_are_missing() {
        let err = parse_user_id(Some("  ".to_owned()), FieldName::new("userId"))
            .expect_err("blank");
        assert_eq!(
            err.details().and_then(|d| d.get("code")),
            Some(&json!("missing_field"))
        );
    }
}

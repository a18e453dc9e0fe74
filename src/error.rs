use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::NaiveDate;
use derive_more::{Display, Error};
use serde_json::json;

use crate::model::attendance::Session;

/// Failures of the persistence collaborator.
#[derive(Debug, Display, Error)]
pub enum StoreError {
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
    /// Unique key violation.
    #[display(fmt = "conflicting write")]
    Conflict,
    #[display(fmt = "unreadable row: {}", message)]
    Corrupt { message: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some("23000") {
                return StoreError::Conflict;
            }
        }
        StoreError::Database(e)
    }
}

/// Everything a request can fail with. All variants except `Store` are
/// user-correctable policy violations.
#[derive(Debug, Display, Error)]
pub enum AttendanceError {
    #[display(fmt = "You must check out of your open session first")]
    MustCheckOutFirst,

    #[display(fmt = "Check-in is not open at {}", at)]
    OutsideCheckInWindow { at: String },

    #[display(fmt = "No approved overtime request for {}", date)]
    OvertimeNotApproved { date: NaiveDate },

    #[display(fmt = "Already checked in for the {} session today", session)]
    AlreadyCheckedIn { session: Session },

    #[display(fmt = "Daily check-in limit reached")]
    DailyLimitReached,

    #[display(fmt = "No open session to check out of")]
    NoOpenSession,

    #[display(fmt = "Checkout for the {} session opens at {}", session, allowed_from)]
    CheckoutTooEarly {
        session: Session,
        allowed_from: String,
    },

    #[display(fmt = "{}", message)]
    InvalidRequest { message: String },

    #[display(fmt = "{}", message)]
    Forbidden { message: String },

    #[display(fmt = "{} not found", what)]
    NotFound { what: String },

    #[display(fmt = "{}", _0)]
    Store(StoreError),
}

impl AttendanceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AttendanceError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AttendanceError::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        AttendanceError::NotFound { what: what.into() }
    }

    /// Stable identifier clients can branch on.
    pub fn code(&self) -> &'static str {
        match self {
            AttendanceError::MustCheckOutFirst => "must_check_out_first",
            AttendanceError::OutsideCheckInWindow { .. } => "outside_check_in_window",
            AttendanceError::OvertimeNotApproved { .. } => "overtime_not_approved",
            AttendanceError::AlreadyCheckedIn { .. } => "already_checked_in",
            AttendanceError::DailyLimitReached => "daily_limit_reached",
            AttendanceError::NoOpenSession => "no_open_session",
            AttendanceError::CheckoutTooEarly { .. } => "checkout_too_early",
            AttendanceError::InvalidRequest { .. } => "invalid_request",
            AttendanceError::Forbidden { .. } => "forbidden",
            AttendanceError::NotFound { .. } => "not_found",
            AttendanceError::Store(_) => "internal",
        }
    }

    pub fn is_policy_violation(&self) -> bool {
        !matches!(self, AttendanceError::Store(_))
    }
}

impl From<StoreError> for AttendanceError {
    fn from(e: StoreError) -> Self {
        AttendanceError::Store(e)
    }
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::MustCheckOutFirst
            | AttendanceError::AlreadyCheckedIn { .. }
            | AttendanceError::DailyLimitReached => StatusCode::CONFLICT,
            AttendanceError::Forbidden { .. } | AttendanceError::OvertimeNotApproved { .. } => {
                StatusCode::FORBIDDEN
            }
            AttendanceError::NotFound { .. } => StatusCode::NOT_FOUND,
            AttendanceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_policy_violation() {
            self.to_string()
        } else {
            tracing::error!(error = %self, "Store operation failed");
            "Internal Server Error".to_string()
        };

        HttpResponse::build(self.status_code()).json(json!({
            "code": self.code(),
            "message": message
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_violations_are_4xx() {
        let cases = [
            AttendanceError::MustCheckOutFirst,
            AttendanceError::NoOpenSession,
            AttendanceError::DailyLimitReached,
            AttendanceError::OutsideCheckInWindow { at: "17:30".into() },
            AttendanceError::CheckoutTooEarly {
                session: Session::Morning,
                allowed_from: "12:00".into(),
            },
        ];
        for e in cases {
            assert!(e.is_policy_violation());
            assert!(e.status_code().is_client_error(), "{e}");
        }
    }

    #[test]
    fn store_failures_are_5xx() {
        let e = AttendanceError::from(StoreError::Corrupt {
            message: "bad status".into(),
        });
        assert!(!e.is_policy_violation());
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn messages_read_well() {
        let e = AttendanceError::CheckoutTooEarly {
            session: Session::Afternoon,
            allowed_from: "17:00".into(),
        };
        assert_eq!(e.to_string(), "Checkout for the Afternoon session opens at 17:00");
    }
}

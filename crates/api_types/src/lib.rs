use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an authenticated user.
///
/// The server treats roles as:
/// - `visitor`: read-only on trips and locations, no expense access.
/// - `guide`: full access to resources they own, read access elsewhere.
/// - `admin`: unrestricted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Visitor,
    Guide,
    Admin,
}

/// Expense category (closed set).
///
/// The summary breakdown always carries exactly these five keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Transport,
    Accommodation,
    Food,
    Activity,
    Other,
}

pub mod user {
    use super::*;

    /// Request body for open registration.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub username: String,
        pub password: String,
        /// Defaults to `visitor` when omitted.
        pub role: Option<Role>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub role: Role,
    }
}

pub mod trip {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripNew {
        pub title: String,
        pub destination: String,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub budget_cents: i64,
        pub notes: Option<String>,
        /// Replaces the trip's location set; empty when omitted.
        pub location_ids: Option<Vec<Uuid>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripUpdate {
        pub title: String,
        pub destination: String,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub budget_cents: i64,
        pub notes: Option<String>,
        /// Replaces the trip's location set when present.
        pub location_ids: Option<Vec<Uuid>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripView {
        pub id: Uuid,
        /// Username of the owning user.
        pub user_id: String,
        pub title: String,
        pub destination: String,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub budget_cents: i64,
        pub notes: Option<String>,
        pub location_ids: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripListResponse {
        pub trips: Vec<TripView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripCreated {
        pub id: Uuid,
    }
}

pub mod location {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationNew {
        pub title: String,
        pub open_time: NaiveTime,
        pub close_time: NaiveTime,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationUpdate {
        pub title: String,
        pub open_time: NaiveTime,
        pub close_time: NaiveTime,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationView {
        pub id: Uuid,
        pub user_id: String,
        pub title: String,
        pub open_time: NaiveTime,
        pub close_time: NaiveTime,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationListResponse {
        pub locations: Vec<LocationView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationCreated {
        pub id: Uuid,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub trip_id: Uuid,
        pub category: ExpenseCategory,
        /// Must be > 0.
        pub amount_cents: i64,
        pub description: Option<String>,
        /// Must fall within the trip's date range.
        pub date: NaiveDate,
    }

    /// Update body; the trip association is fixed at creation.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub category: ExpenseCategory,
        pub amount_cents: i64,
        pub description: Option<String>,
        pub date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub trip_id: Uuid,
        /// Username of the user who logged the expense.
        pub user_id: String,
        pub category: ExpenseCategory,
        pub amount_cents: i64,
        pub description: Option<String>,
        pub date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListQuery {
        pub trip_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
    }
}

pub mod summary {
    use super::*;

    /// Per-category totals in cents. Always carries all five keys.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BreakdownView {
        pub transport: i64,
        pub accommodation: i64,
        pub food: i64,
        pub activity: i64,
        pub other: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub trip_id: Uuid,
        pub total_cents: i64,
        pub category_breakdown: BreakdownView,
        /// Absent for trips that never had an expense write.
        pub generated_at: Option<DateTime<Utc>>,
    }
}

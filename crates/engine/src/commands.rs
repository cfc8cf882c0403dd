//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. The acting principal is always
//! passed separately so authorization stays visible at the call site.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{ExpenseCategory, Money, Role};

/// Register a new user.
#[derive(Clone, Debug)]
pub struct UserNewCmd {
    pub username: String,
    pub password: String,
    /// Defaults to [`Role::Visitor`] when not set.
    pub role: Option<Role>,
}

impl UserNewCmd {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role: None,
        }
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// Create a trip.
#[derive(Clone, Debug)]
pub struct TripNewCmd {
    pub title: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Money,
    pub notes: Option<String>,
    pub location_ids: Vec<Uuid>,
}

impl TripNewCmd {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        destination: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        budget: Money,
    ) -> Self {
        Self {
            title: title.into(),
            destination: destination.into(),
            start_date,
            end_date,
            budget,
            notes: None,
            location_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn location_ids(mut self, location_ids: Vec<Uuid>) -> Self {
        self.location_ids = location_ids;
        self
    }
}

/// Update an existing trip. All scalar fields are replaced;
/// `location_ids`, when set, replaces the trip's location set wholesale.
#[derive(Clone, Debug)]
pub struct TripUpdateCmd {
    pub trip_id: Uuid,
    pub title: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Money,
    pub notes: Option<String>,
    pub location_ids: Option<Vec<Uuid>>,
}

impl TripUpdateCmd {
    #[must_use]
    pub fn new(
        trip_id: Uuid,
        title: impl Into<String>,
        destination: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        budget: Money,
    ) -> Self {
        Self {
            trip_id,
            title: title.into(),
            destination: destination.into(),
            start_date,
            end_date,
            budget,
            notes: None,
            location_ids: None,
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn location_ids(mut self, location_ids: Vec<Uuid>) -> Self {
        self.location_ids = Some(location_ids);
        self
    }
}

/// Create a location.
#[derive(Clone, Debug)]
pub struct LocationNewCmd {
    pub title: String,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub description: Option<String>,
}

impl LocationNewCmd {
    #[must_use]
    pub fn new(title: impl Into<String>, open_time: NaiveTime, close_time: NaiveTime) -> Self {
        Self {
            title: title.into(),
            open_time,
            close_time,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Update an existing location.
#[derive(Clone, Debug)]
pub struct LocationUpdateCmd {
    pub location_id: Uuid,
    pub title: String,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub description: Option<String>,
}

impl LocationUpdateCmd {
    #[must_use]
    pub fn new(
        location_id: Uuid,
        title: impl Into<String>,
        open_time: NaiveTime,
        close_time: NaiveTime,
    ) -> Self {
        Self {
            location_id,
            title: title.into(),
            open_time,
            close_time,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Log a new expense against a trip.
#[derive(Clone, Debug)]
pub struct ExpenseNewCmd {
    pub trip_id: Uuid,
    pub category: ExpenseCategory,
    pub amount: Money,
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl ExpenseNewCmd {
    #[must_use]
    pub fn new(trip_id: Uuid, category: ExpenseCategory, amount: Money, date: NaiveDate) -> Self {
        Self {
            trip_id,
            category,
            amount,
            description: None,
            date,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Revise an existing expense. The trip association is fixed at creation
/// and cannot be retargeted.
#[derive(Clone, Debug)]
pub struct ExpenseUpdateCmd {
    pub expense_id: Uuid,
    pub category: ExpenseCategory,
    pub amount: Money,
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl ExpenseUpdateCmd {
    #[must_use]
    pub fn new(
        expense_id: Uuid,
        category: ExpenseCategory,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            expense_id,
            category,
            amount,
            description: None,
            date,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

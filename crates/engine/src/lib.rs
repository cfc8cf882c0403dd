pub use categories::{CategoryBreakdown, ExpenseCategory};
pub use commands::{
    ExpenseNewCmd, ExpenseUpdateCmd, LocationNewCmd, LocationUpdateCmd, TripNewCmd, TripUpdateCmd,
    UserNewCmd,
};
pub use error::EngineError;
pub use expenses::Expense;
pub use locations::Location;
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use policy::{Action, ListScope, Principal, ResourceKind, Role};
pub use summaries::ExpenseSummary;
pub use trips::Trip;

pub mod categories;
mod commands;
mod error;
pub mod expenses;
pub mod locations;
mod money;
mod ops;
pub mod policy;
pub mod summaries;
pub mod trip_locations;
pub mod trips;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;

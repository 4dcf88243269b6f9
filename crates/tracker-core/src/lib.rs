pub mod error;
pub mod model;
pub mod time;
pub mod types;
pub mod uid;
pub mod user;

pub use error::{CoreError, Result};
pub use model::{
    DataEntryForm, OrganisationUnit, Program, TrackedEntityAttribute, TrackedEntityType,
};
pub use crate::time::{end_of_day_exclusive, parse_date_time, parse_duration};
pub use types::{
    AssignedUserSelectionMode, EventStatus, OrganisationUnitSelectionMode, ProgramStatus,
    QueryOperator,
};
pub use uid::{generate_uid, is_valid_uid};
pub use user::{CurrentUserService, FixedUserService, User};

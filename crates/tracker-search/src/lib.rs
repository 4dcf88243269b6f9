//! # tracker-search
//!
//! Validation and normalization of tracked-entity search requests.
//!
//! A request arrives as flat [`SearchCriteria`] (query string or JSON). The
//! [`TrackedEntityCriteriaMapper`] resolves every UID it references against
//! the metadata stores, checks requested organisation units against the
//! user's search scope and produces [`QueryParameters`] ready for a query
//! engine.
//!
//! ```ignore
//! let mapper = TrackedEntityCriteriaMapper::from_stores(&stores)
//!     .with_settings(SearchSettings::default());
//! let criteria = SearchCriteria::from_query("ou=DiszpKrYNg8&pageSize=10")?;
//! let params = mapper.map(criteria, &user).await?;
//! ```

pub mod config;
pub mod criteria;
pub mod error;
pub mod mapper;
pub mod params;

pub use config::SearchSettings;
pub use criteria::SearchCriteria;
pub use error::{MapperError, ValidationError};
pub use mapper::TrackedEntityCriteriaMapper;
pub use params::{QueryFilter, QueryItem, QueryParameters};

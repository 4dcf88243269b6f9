//! Validated query parameters produced by the criteria mapper.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tracker_core::{
    AssignedUserSelectionMode, EventStatus, OrganisationUnit, OrganisationUnitSelectionMode,
    Program, ProgramStatus, QueryOperator, TrackedEntityAttribute, TrackedEntityType,
};

use crate::criteria::date_format;

/// A single comparison, e.g. `LIKE "ja"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryFilter {
    pub operator: QueryOperator,
    pub filter: String,
}

impl QueryFilter {
    pub fn new(operator: QueryOperator, filter: impl Into<String>) -> Self {
        Self {
            operator,
            filter: filter.into(),
        }
    }

    /// Values of an `IN` filter, which are `;`-delimited.
    pub fn values(&self) -> Vec<&str> {
        match self.operator {
            QueryOperator::In => self.filter.split(';').filter(|v| !v.is_empty()).collect(),
            _ => vec![self.filter.as_str()],
        }
    }
}

impl fmt::Display for QueryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operator, self.filter)
    }
}

/// A resolved attribute together with the filters applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryItem {
    pub item: Arc<TrackedEntityAttribute>,
    pub filters: Vec<QueryFilter>,
}

impl QueryItem {
    pub fn new(item: Arc<TrackedEntityAttribute>) -> Self {
        Self {
            item,
            filters: Vec::new(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.item.uid
    }

    pub fn has_filter(&self) -> bool {
        !self.filters.is_empty()
    }
}

/// Normalized tracked-entity query.
///
/// Every UID reference of the originating criteria has been resolved, and the
/// enrollment, incident and event end dates are exclusive upper bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameters {
    pub query: Option<QueryFilter>,
    pub attributes: Vec<QueryItem>,
    pub filters: Vec<QueryItem>,
    pub organisation_units: Vec<Arc<OrganisationUnit>>,
    pub organisation_unit_mode: Option<OrganisationUnitSelectionMode>,
    pub program: Option<Arc<Program>>,
    pub program_status: Option<ProgramStatus>,
    pub follow_up: Option<bool>,
    #[serde(with = "date_format")]
    pub last_updated_start_date: Option<OffsetDateTime>,
    #[serde(with = "date_format")]
    pub last_updated_end_date: Option<OffsetDateTime>,
    #[serde(skip)]
    pub last_updated_duration: Option<Duration>,
    #[serde(with = "date_format")]
    pub program_enrollment_start_date: Option<OffsetDateTime>,
    #[serde(with = "date_format")]
    pub program_enrollment_end_date: Option<OffsetDateTime>,
    #[serde(with = "date_format")]
    pub program_incident_start_date: Option<OffsetDateTime>,
    #[serde(with = "date_format")]
    pub program_incident_end_date: Option<OffsetDateTime>,
    pub tracked_entity_type: Option<Arc<TrackedEntityType>>,
    pub event_status: Option<EventStatus>,
    #[serde(with = "date_format")]
    pub event_start_date: Option<OffsetDateTime>,
    #[serde(with = "date_format")]
    pub event_end_date: Option<OffsetDateTime>,
    pub assigned_user_selection_mode: Option<AssignedUserSelectionMode>,
    pub assigned_users: Vec<String>,
    /// Requested page; see [`QueryParameters::page_with_default`].
    pub page: Option<u32>,
    /// Requested page size; see [`QueryParameters::page_size_with_default`].
    pub page_size: Option<u32>,
    /// Page size applied when none was requested.
    pub default_page_size: u32,
    pub total_pages: bool,
    pub skip_paging: bool,
    pub skip_meta: bool,
    pub include_deleted: bool,
    pub include_all_attributes: bool,
    pub orders: Vec<String>,
}

impl QueryParameters {
    /// The requested page, or the first page.
    pub fn page_with_default(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// The requested page size, or the configured default.
    pub fn page_size_with_default(&self) -> u32 {
        self.page_size.unwrap_or(self.default_page_size)
    }

    /// Number of rows to skip for the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_with_default().saturating_sub(1))
            * u64::from(self.page_size_with_default())
    }

    pub fn is_paging(&self) -> bool {
        !self.skip_paging
    }

    pub fn has_program(&self) -> bool {
        self.program.is_some()
    }

    pub fn has_organisation_units(&self) -> bool {
        !self.organisation_units.is_empty()
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Attributes and filters that carry at least one comparison.
    pub fn filtered_items(&self) -> impl Iterator<Item = &QueryItem> {
        self.attributes
            .iter()
            .chain(self.filters.iter())
            .filter(|item| item.has_filter())
    }

    /// Effective last-updated bounds relative to `now`.
    ///
    /// A duration replaces the explicit bounds with `[now - duration, open)`.
    pub fn last_updated_window(
        &self,
        now: OffsetDateTime,
    ) -> (Option<OffsetDateTime>, Option<OffsetDateTime>) {
        match self.last_updated_duration {
            Some(duration) => (now.checked_sub(duration), None),
            None => (self.last_updated_start_date, self.last_updated_end_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn empty_params() -> QueryParameters {
        QueryParameters {
            query: None,
            attributes: Vec::new(),
            filters: Vec::new(),
            organisation_units: Vec::new(),
            organisation_unit_mode: None,
            program: None,
            program_status: None,
            follow_up: None,
            last_updated_start_date: None,
            last_updated_end_date: None,
            last_updated_duration: None,
            program_enrollment_start_date: None,
            program_enrollment_end_date: None,
            program_incident_start_date: None,
            program_incident_end_date: None,
            tracked_entity_type: None,
            event_status: None,
            event_start_date: None,
            event_end_date: None,
            assigned_user_selection_mode: None,
            assigned_users: Vec::new(),
            page: None,
            page_size: None,
            default_page_size: 50,
            total_pages: false,
            skip_paging: false,
            skip_meta: false,
            include_deleted: false,
            include_all_attributes: false,
            orders: Vec::new(),
        }
    }

    #[test]
    fn paging_falls_back_to_defaults() {
        let mut params = empty_params();
        assert_eq!(params.page_with_default(), 1);
        assert_eq!(params.page_size_with_default(), 50);
        assert_eq!(params.offset(), 0);

        params.page = Some(3);
        params.page_size = Some(20);
        assert_eq!(params.page_with_default(), 3);
        assert_eq!(params.page_size_with_default(), 20);
        assert_eq!(params.offset(), 40);
        assert!(params.is_paging());
    }

    #[test]
    fn duration_overrides_last_updated_bounds() {
        let now = datetime!(2020-08-05 12:00:00 UTC);
        let mut params = empty_params();
        params.last_updated_start_date = Some(datetime!(2020-01-01 00:00:00 UTC));
        assert_eq!(
            params.last_updated_window(now),
            (Some(datetime!(2020-01-01 00:00:00 UTC)), None)
        );

        params.last_updated_start_date = None;
        params.last_updated_duration = Some(Duration::days(5));
        assert_eq!(
            params.last_updated_window(now),
            (Some(datetime!(2020-07-31 12:00:00 UTC)), None)
        );
    }

    #[test]
    fn in_filter_values() {
        let filter = QueryFilter::new(QueryOperator::In, "a;b;;c");
        assert_eq!(filter.values(), vec!["a", "b", "c"]);
        assert_eq!(filter.to_string(), "IN:a;b;;c");
        let filter = QueryFilter::new(QueryOperator::Like, "a;b");
        assert_eq!(filter.values(), vec!["a;b"]);
    }

    #[test]
    fn filtered_items_skip_plain_attributes() {
        let mut params = empty_params();
        let first = Arc::new(TrackedEntityAttribute::new("w75KJ2mc4zz", "First name"));
        let last = Arc::new(TrackedEntityAttribute::new("zDhUuAYrxNC", "Last name"));
        params.attributes.push(QueryItem::new(first));
        params.filters.push(QueryItem {
            item: last,
            filters: vec![QueryFilter::new(QueryOperator::Eq, "Kamara")],
        });
        let uids: Vec<_> = params.filtered_items().map(QueryItem::uid).collect();
        assert_eq!(uids, vec!["zDhUuAYrxNC"]);
        assert!(params.has_filters());
    }

    #[test]
    fn serializes_dates_as_rfc3339() {
        let mut params = empty_params();
        params.event_end_date = Some(datetime!(2020-07-08 00:00:00 UTC));
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["eventEndDate"], "2020-07-08T00:00:00Z");
        assert!(json["pageSize"].is_null());
        assert_eq!(json["defaultPageSize"], 50);
    }
}

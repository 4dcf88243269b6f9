//! Translation of raw search criteria into validated query parameters.

use std::sync::Arc;

use time::OffsetDateTime;
use tracker_core::{
    AssignedUserSelectionMode, OrganisationUnit, OrganisationUnitSelectionMode, QueryOperator,
    User, end_of_day_exclusive, parse_duration,
};
use tracker_storage::{
    MetadataStores, OrganisationUnitStore, ProgramStore, TrackedEntityAttributeStore,
    TrackedEntityTypeStore,
};

use crate::config::SearchSettings;
use crate::criteria::SearchCriteria;
use crate::error::{MapperError, ValidationError};
use crate::params::{QueryFilter, QueryItem, QueryParameters};

/// Resolves [`SearchCriteria`] against the metadata stores.
///
/// Holds no per-request state, so one mapper can serve concurrent requests.
pub struct TrackedEntityCriteriaMapper {
    attributes: Arc<dyn TrackedEntityAttributeStore>,
    programs: Arc<dyn ProgramStore>,
    organisation_units: Arc<dyn OrganisationUnitStore>,
    tracked_entity_types: Arc<dyn TrackedEntityTypeStore>,
    settings: SearchSettings,
}

impl TrackedEntityCriteriaMapper {
    pub fn new(
        attributes: Arc<dyn TrackedEntityAttributeStore>,
        programs: Arc<dyn ProgramStore>,
        organisation_units: Arc<dyn OrganisationUnitStore>,
        tracked_entity_types: Arc<dyn TrackedEntityTypeStore>,
    ) -> Self {
        Self {
            attributes,
            programs,
            organisation_units,
            tracked_entity_types,
            settings: SearchSettings::default(),
        }
    }

    /// Build a mapper over a loaded set of in-memory stores.
    pub fn from_stores(stores: &MetadataStores) -> Self {
        Self::new(
            stores.attributes.clone(),
            stores.programs.clone(),
            stores.organisation_units.clone(),
            stores.tracked_entity_types.clone(),
        )
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Validate `criteria` for `user` and resolve it into query parameters.
    ///
    /// Lookups run one after another and are read-only. Any unknown UID,
    /// organisation unit outside the user's search scope, or inconsistent
    /// combination of fields fails with [`MapperError::Validation`].
    pub async fn map(
        &self,
        criteria: SearchCriteria,
        user: &User,
    ) -> Result<QueryParameters, MapperError> {
        let result = self.resolve(criteria, user).await;
        match &result {
            Ok(params) => tracing::debug!(
                user = %user.uid,
                attributes = params.attributes.len(),
                filters = params.filters.len(),
                organisation_units = params.organisation_units.len(),
                page = params.page_with_default(),
                page_size = params.page_size_with_default(),
                "Mapped tracked entity search criteria"
            ),
            Err(MapperError::Validation(e)) => {
                tracing::debug!(user = %user.uid, error = %e, "Rejected tracked entity search criteria")
            }
            Err(MapperError::Storage(e)) => {
                tracing::warn!(user = %user.uid, error = %e, "Metadata lookup failed")
            }
        }
        result
    }

    async fn resolve(
        &self,
        criteria: SearchCriteria,
        user: &User,
    ) -> Result<QueryParameters, MapperError> {
        let query = criteria
            .query
            .as_ref()
            .map(|q| QueryFilter::new(QueryOperator::Eq, q.clone()));

        let mut attributes = Vec::with_capacity(criteria.attribute.len());
        for item in &criteria.attribute {
            attributes.push(self.resolve_item(item).await?);
        }
        let mut filters = Vec::with_capacity(criteria.filter.len());
        for item in &criteria.filter {
            filters.push(self.resolve_item(item).await?);
        }

        let program = match &criteria.program {
            Some(uid) => Some(
                self.programs
                    .find_by_uid(uid)
                    .await?
                    .ok_or_else(|| ValidationError::ProgramNotFound(uid.clone()))?,
            ),
            None => None,
        };

        let tracked_entity_type = match &criteria.tracked_entity_type {
            Some(uid) => Some(
                self.tracked_entity_types
                    .find_by_uid(uid)
                    .await?
                    .ok_or_else(|| ValidationError::TrackedEntityTypeNotFound(uid.clone()))?,
            ),
            None => None,
        };

        let organisation_units = self.resolve_organisation_units(&criteria, user).await?;
        let organisation_unit_mode = match criteria.ou_mode {
            None if organisation_units.is_empty() => Some(OrganisationUnitSelectionMode::Accessible),
            mode => mode,
        };

        let (last_updated_duration, last_updated_start_date, last_updated_end_date) =
            resolve_last_updated(&criteria)?;

        let assigned_users = criteria.assigned_users();
        if !assigned_users.is_empty()
            && criteria.assigned_user_mode != Some(AssignedUserSelectionMode::Provided)
        {
            return Err(ValidationError::AssignedUsersWithoutProvidedMode.into());
        }

        self.check_paging(&criteria)?;
        let orders = criteria.orders();

        Ok(QueryParameters {
            query,
            attributes,
            filters,
            organisation_units,
            organisation_unit_mode,
            program,
            program_status: criteria.program_status,
            follow_up: criteria.follow_up,
            last_updated_start_date,
            last_updated_end_date,
            last_updated_duration,
            program_enrollment_start_date: criteria.program_enrollment_start_date,
            program_enrollment_end_date: exclusive_end(
                "programEnrollmentEndDate",
                criteria.program_enrollment_end_date,
            )?,
            program_incident_start_date: criteria.program_incident_start_date,
            program_incident_end_date: exclusive_end(
                "programIncidentEndDate",
                criteria.program_incident_end_date,
            )?,
            tracked_entity_type,
            event_status: criteria.event_status,
            event_start_date: criteria.event_start_date,
            event_end_date: exclusive_end("eventEndDate", criteria.event_end_date)?,
            assigned_user_selection_mode: criteria.assigned_user_mode,
            assigned_users,
            page: criteria.page,
            page_size: criteria.page_size,
            default_page_size: self.settings.default_page_size,
            total_pages: criteria.total_pages,
            skip_paging: criteria.skip_paging,
            skip_meta: criteria.skip_meta,
            include_deleted: criteria.include_deleted,
            include_all_attributes: criteria.include_all_attributes,
            orders,
        })
    }

    /// Resolve `uid[:OP:value]...` into an attribute and its filters.
    async fn resolve_item(&self, item: &str) -> Result<QueryItem, MapperError> {
        let (uid, filters) = parse_item(item)?;
        let attribute = self
            .attributes
            .find_by_uid(uid)
            .await?
            .ok_or_else(|| ValidationError::AttributeNotFound(uid.to_string()))?;
        Ok(QueryItem {
            item: attribute,
            filters,
        })
    }

    async fn resolve_organisation_units(
        &self,
        criteria: &SearchCriteria,
        user: &User,
    ) -> Result<Vec<Arc<OrganisationUnit>>, MapperError> {
        let uids = criteria.organisation_unit_uids();
        let mut units = Vec::with_capacity(uids.len());
        for uid in uids {
            let unit = self
                .organisation_units
                .find_by_uid(&uid)
                .await?
                .ok_or_else(|| ValidationError::OrganisationUnitNotFound(uid.clone()))?;
            if !user.is_in_search_scope(&unit) {
                return Err(ValidationError::OrganisationUnitNotInSearchScope(uid).into());
            }
            units.push(unit);
        }
        Ok(units)
    }

    fn check_paging(&self, criteria: &SearchCriteria) -> Result<(), ValidationError> {
        if criteria.page == Some(0) {
            return Err(ValidationError::InvalidPage);
        }
        match criteria.page_size {
            Some(0) => Err(ValidationError::InvalidPageSize),
            Some(size) if size > self.settings.max_page_size => {
                Err(ValidationError::PageSizeTooLarge(self.settings.max_page_size))
            }
            _ => Ok(()),
        }
    }
}

/// Split a query item into its UID and `OP:value` filters.
fn parse_item(item: &str) -> Result<(&str, Vec<QueryFilter>), ValidationError> {
    let mut parts = item.split(':');
    let uid = parts.next().map(str::trim).unwrap_or_default();
    if uid.is_empty() {
        return Err(ValidationError::InvalidQueryItem(item.to_string()));
    }

    let rest: Vec<&str> = parts.collect();
    if rest.len() % 2 != 0 {
        return Err(ValidationError::InvalidQueryItem(item.to_string()));
    }

    let mut filters = Vec::with_capacity(rest.len() / 2);
    for pair in rest.chunks(2) {
        let operator: QueryOperator = pair[0]
            .parse()
            .map_err(|_| ValidationError::InvalidQueryOperator(pair[0].to_string()))?;
        filters.push(QueryFilter::new(operator, pair[1]));
    }
    Ok((uid, filters))
}

fn exclusive_end(
    param: &str,
    end: Option<OffsetDateTime>,
) -> Result<Option<OffsetDateTime>, ValidationError> {
    end.map(|end| {
        end_of_day_exclusive(end).map_err(|e| ValidationError::invalid_value(param, e.to_string()))
    })
    .transpose()
}

type LastUpdated = (
    Option<time::Duration>,
    Option<OffsetDateTime>,
    Option<OffsetDateTime>,
);

fn resolve_last_updated(criteria: &SearchCriteria) -> Result<LastUpdated, ValidationError> {
    let Some(raw) = &criteria.last_updated_duration else {
        return Ok((
            None,
            criteria.last_updated_start_date,
            criteria.last_updated_end_date,
        ));
    };
    if criteria.last_updated_start_date.is_some() || criteria.last_updated_end_date.is_some() {
        return Err(ValidationError::LastUpdatedDurationConflict);
    }
    let duration =
        parse_duration(raw).map_err(|_| ValidationError::InvalidDuration(raw.clone()))?;
    Ok((Some(duration), None, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_uid() {
        let (uid, filters) = parse_item("w75KJ2mc4zz").unwrap();
        assert_eq!(uid, "w75KJ2mc4zz");
        assert!(filters.is_empty());
    }

    #[test]
    fn parses_operator_value_pairs() {
        let (uid, filters) = parse_item("cejWyOfXge6:GE:10:lt:20").unwrap();
        assert_eq!(uid, "cejWyOfXge6");
        assert_eq!(
            filters,
            vec![
                QueryFilter::new(QueryOperator::Ge, "10"),
                QueryFilter::new(QueryOperator::Lt, "20"),
            ]
        );
    }

    #[test]
    fn rejects_dangling_operator() {
        assert_eq!(
            parse_item("cejWyOfXge6:EQ").unwrap_err(),
            ValidationError::InvalidQueryItem("cejWyOfXge6:EQ".into())
        );
        assert_eq!(
            parse_item(":EQ:x").unwrap_err(),
            ValidationError::InvalidQueryItem(":EQ:x".into())
        );
    }

    #[test]
    fn rejects_unknown_operator() {
        assert_eq!(
            parse_item("cejWyOfXge6:BETWEEN:1").unwrap_err(),
            ValidationError::InvalidQueryOperator("BETWEEN".into())
        );
    }
}

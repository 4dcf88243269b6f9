//! Raw tracked-entity search criteria as supplied by a client.
//!
//! Nothing here is resolved or checked against stored metadata; that is the
//! job of [`crate::TrackedEntityCriteriaMapper`]. Parsing only rejects values
//! that cannot be read at all (bad numbers, dates, enum names).

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use tracker_core::{
    AssignedUserSelectionMode, EventStatus, OrganisationUnitSelectionMode, ProgramStatus,
    parse_date_time,
};
use url::form_urlencoded;

use crate::error::ValidationError;

/// Flat search criteria for tracked entities.
///
/// Field names serialize in camelCase, matching the query parameter names
/// accepted by [`SearchCriteria::from_query`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    /// Free-text query matched against searchable attributes.
    pub query: Option<String>,
    /// Attributes to return: `uid` or `uid:OP:value[:OP:value]`.
    pub attribute: IndexSet<String>,
    /// Attribute filters, same encoding as `attribute`.
    pub filter: IndexSet<String>,
    /// Organisation unit UID(s), `;`-delimited.
    pub ou: Option<String>,
    pub ou_mode: Option<OrganisationUnitSelectionMode>,
    pub program: Option<String>,
    pub program_status: Option<ProgramStatus>,
    pub follow_up: Option<bool>,
    #[serde(with = "date_format")]
    pub last_updated_start_date: Option<OffsetDateTime>,
    #[serde(with = "date_format")]
    pub last_updated_end_date: Option<OffsetDateTime>,
    /// Relative last-updated window such as `20d` or `12h`.
    pub last_updated_duration: Option<String>,
    #[serde(with = "date_format")]
    pub program_enrollment_start_date: Option<OffsetDateTime>,
    #[serde(with = "date_format")]
    pub program_enrollment_end_date: Option<OffsetDateTime>,
    #[serde(with = "date_format")]
    pub program_incident_start_date: Option<OffsetDateTime>,
    #[serde(with = "date_format")]
    pub program_incident_end_date: Option<OffsetDateTime>,
    pub tracked_entity_type: Option<String>,
    pub event_status: Option<EventStatus>,
    #[serde(with = "date_format")]
    pub event_start_date: Option<OffsetDateTime>,
    #[serde(with = "date_format")]
    pub event_end_date: Option<OffsetDateTime>,
    pub assigned_user_mode: Option<AssignedUserSelectionMode>,
    /// Assigned user UIDs, `;`-delimited.
    pub assigned_user: Option<String>,
    pub skip_meta: bool,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub total_pages: bool,
    pub skip_paging: bool,
    pub include_deleted: bool,
    pub include_all_attributes: bool,
    /// Order specification, e.g. `created:desc,w75KJ2mc4zz:asc`.
    pub order: Option<String>,
}

impl SearchCriteria {
    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// Example: `ou=DiszpKrYNg8&ouMode=DESCENDANTS&filter=w75KJ2mc4zz:LIKE:ja&pageSize=10`
    ///
    /// `attribute` and `filter` may be repeated; other parameters keep their
    /// last value. `paging=false` is accepted as an alias of `skipPaging=true`.
    pub fn from_query(query: &str) -> Result<Self, ValidationError> {
        let mut criteria = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            match key.as_ref() {
                "query" => criteria.query = non_empty(value),
                "attribute" => {
                    if let Some(item) = non_empty(value) {
                        criteria.attribute.insert(item);
                    }
                }
                "filter" => {
                    if let Some(item) = non_empty(value) {
                        criteria.filter.insert(item);
                    }
                }
                "ou" => criteria.ou = non_empty(value),
                "ouMode" => criteria.ou_mode = Some(parse_enum("ouMode", value)?),
                "program" => criteria.program = non_empty(value),
                "programStatus" => {
                    criteria.program_status = Some(parse_enum("programStatus", value)?)
                }
                "followUp" => criteria.follow_up = Some(parse_bool("followUp", value)?),
                "lastUpdatedStartDate" => {
                    criteria.last_updated_start_date = Some(parse_date("lastUpdatedStartDate", value)?)
                }
                "lastUpdatedEndDate" => {
                    criteria.last_updated_end_date = Some(parse_date("lastUpdatedEndDate", value)?)
                }
                "lastUpdatedDuration" => criteria.last_updated_duration = non_empty(value),
                "programEnrollmentStartDate" => {
                    criteria.program_enrollment_start_date =
                        Some(parse_date("programEnrollmentStartDate", value)?)
                }
                "programEnrollmentEndDate" => {
                    criteria.program_enrollment_end_date =
                        Some(parse_date("programEnrollmentEndDate", value)?)
                }
                "programIncidentStartDate" => {
                    criteria.program_incident_start_date =
                        Some(parse_date("programIncidentStartDate", value)?)
                }
                "programIncidentEndDate" => {
                    criteria.program_incident_end_date =
                        Some(parse_date("programIncidentEndDate", value)?)
                }
                "trackedEntityType" => criteria.tracked_entity_type = non_empty(value),
                "eventStatus" => criteria.event_status = Some(parse_enum("eventStatus", value)?),
                "eventStartDate" => {
                    criteria.event_start_date = Some(parse_date("eventStartDate", value)?)
                }
                "eventEndDate" => criteria.event_end_date = Some(parse_date("eventEndDate", value)?),
                "assignedUserMode" => {
                    criteria.assigned_user_mode = Some(parse_enum("assignedUserMode", value)?)
                }
                "assignedUser" => criteria.assigned_user = non_empty(value),
                "skipMeta" => criteria.skip_meta = parse_bool("skipMeta", value)?,
                "page" => criteria.page = Some(parse_number("page", value)?),
                "pageSize" => criteria.page_size = Some(parse_number("pageSize", value)?),
                "totalPages" => criteria.total_pages = parse_bool("totalPages", value)?,
                "skipPaging" => criteria.skip_paging = parse_bool("skipPaging", value)?,
                "paging" => criteria.skip_paging = !parse_bool("paging", value)?,
                "includeDeleted" => criteria.include_deleted = parse_bool("includeDeleted", value)?,
                "includeAllAttributes" => {
                    criteria.include_all_attributes = parse_bool("includeAllAttributes", value)?
                }
                "order" => criteria.order = non_empty(value),
                other => return Err(ValidationError::UnknownParameter(other.to_string())),
            }
        }

        Ok(criteria)
    }

    /// Organisation unit UIDs from `ou`, distinct and in caller order.
    pub fn organisation_unit_uids(&self) -> Vec<String> {
        split_distinct(self.ou.as_deref(), &[';'])
    }

    /// Assigned user UIDs from `assigned_user`, distinct and in caller order.
    pub fn assigned_users(&self) -> Vec<String> {
        split_distinct(self.assigned_user.as_deref(), &[';'])
    }

    /// Order tokens from `order`, split on `,` or `;`, in caller order.
    pub fn orders(&self) -> Vec<String> {
        self.order
            .as_deref()
            .map(|order| {
                order
                    .split([',', ';'])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn split_distinct(value: Option<&str>, separators: &[char]) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    value
        .split(separators)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_enum<T: FromStr>(param: &str, value: &str) -> Result<T, ValidationError> {
    value
        .parse()
        .map_err(|_| ValidationError::invalid_value(param, format!("unsupported value '{value}'")))
}

fn parse_bool(param: &str, value: &str) -> Result<bool, ValidationError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ValidationError::invalid_value(param, "must be true or false"))
    }
}

fn parse_number(param: &str, value: &str) -> Result<u32, ValidationError> {
    value
        .parse::<u32>()
        .map_err(|_| ValidationError::invalid_value(param, "must be a non-negative integer"))
}

fn parse_date(param: &str, value: &str) -> Result<OffsetDateTime, ValidationError> {
    parse_date_time(value).map_err(|e| ValidationError::invalid_value(param, e.to_string()))
}

/// Serde adapter for optional search dates.
///
/// Serializes as RFC 3339; deserializes anything [`parse_date_time`] accepts.
pub(crate) mod date_format {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;
    use tracker_core::parse_date_time;

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => {
                let formatted = dt.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| parse_date_time(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_full_query_string() {
        let criteria = SearchCriteria::from_query(
            "query=query-test&attribute=w75KJ2mc4zz&attribute=zDhUuAYrxNC\
             &filter=cejWyOfXge6:LIKE:fe&ou=DiszpKrYNg8&ouMode=descendants\
             &program=IpHINAT79UW&programStatus=ACTIVE&followUp=true\
             &programEnrollmentEndDate=2020-08-05&eventStatus=COMPLETED\
             &assignedUserMode=PROVIDED&assignedUser=user-1;user-2\
             &page=2&pageSize=10&totalPages=true&order=created:desc",
        )
        .unwrap();

        assert_eq!(criteria.query.as_deref(), Some("query-test"));
        assert_eq!(criteria.attribute.len(), 2);
        assert!(criteria.filter.contains("cejWyOfXge6:LIKE:fe"));
        assert_eq!(
            criteria.ou_mode,
            Some(OrganisationUnitSelectionMode::Descendants)
        );
        assert_eq!(criteria.program_status, Some(ProgramStatus::Active));
        assert_eq!(criteria.follow_up, Some(true));
        assert_eq!(
            criteria.program_enrollment_end_date,
            Some(datetime!(2020-08-05 00:00:00 UTC))
        );
        assert_eq!(criteria.event_status, Some(EventStatus::Completed));
        assert_eq!(criteria.assigned_users(), vec!["user-1", "user-2"]);
        assert_eq!(criteria.page, Some(2));
        assert_eq!(criteria.page_size, Some(10));
        assert!(criteria.total_pages);
        assert_eq!(criteria.orders(), vec!["created:desc"]);
    }

    #[test]
    fn empty_query_gives_default_criteria() {
        assert_eq!(SearchCriteria::from_query("").unwrap(), SearchCriteria::default());
    }

    #[test]
    fn rejects_unknown_parameters() {
        let err = SearchCriteria::from_query("foo=bar").unwrap_err();
        assert_eq!(err, ValidationError::UnknownParameter("foo".into()));
    }

    #[test]
    fn rejects_unreadable_values() {
        for query in [
            "page=-1",
            "pageSize=ten",
            "followUp=yes",
            "ouMode=UP",
            "eventEndDate=2020-13-01",
        ] {
            let err = SearchCriteria::from_query(query).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidValue { .. }),
                "{query}: {err}"
            );
        }
    }

    #[test]
    fn paging_false_means_skip_paging() {
        let criteria = SearchCriteria::from_query("paging=false").unwrap();
        assert!(criteria.skip_paging);
    }

    #[test]
    fn splits_delimited_values_distinctly() {
        let criteria = SearchCriteria {
            ou: Some("DiszpKrYNg8; ;O6uvpzGd5pu;DiszpKrYNg8".into()),
            assigned_user: Some("u1;u2;u1;".into()),
            order: Some("created:desc; lastUpdated ,w75KJ2mc4zz:asc".into()),
            ..Default::default()
        };
        assert_eq!(
            criteria.organisation_unit_uids(),
            vec!["DiszpKrYNg8", "O6uvpzGd5pu"]
        );
        assert_eq!(criteria.assigned_users(), vec!["u1", "u2"]);
        assert_eq!(
            criteria.orders(),
            vec!["created:desc", "lastUpdated", "w75KJ2mc4zz:asc"]
        );
    }

    #[test]
    fn deserializes_camel_case_json() {
        let criteria: SearchCriteria = serde_json::from_str(
            r#"{
                "program": "IpHINAT79UW",
                "ouMode": "ACCESSIBLE",
                "eventEndDate": "2020-07-07",
                "lastUpdatedStartDate": "2019-01-01T10:00:00Z",
                "filter": ["w75KJ2mc4zz:EQ:Anna"],
                "includeDeleted": true
            }"#,
        )
        .unwrap();
        assert_eq!(criteria.program.as_deref(), Some("IpHINAT79UW"));
        assert_eq!(criteria.event_end_date, Some(datetime!(2020-07-07 00:00:00 UTC)));
        assert_eq!(
            criteria.last_updated_start_date,
            Some(datetime!(2019-01-01 10:00:00 UTC))
        );
        assert!(criteria.include_deleted);
        assert_eq!(criteria.page, None);

        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["eventEndDate"], "2020-07-07T00:00:00Z");
        assert!(json["eventStartDate"].is_null());
    }
}

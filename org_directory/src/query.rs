//! Directory: Query Engine
//!
//! Total functions over the collections: no error path. Results keep
//! the input order. Unresolved references degrade to sentinels.

use std::str::FromStr;

use crate::domain::{OrgType, Organization, Personnel, PersonnelStatus};
use crate::error::DirectoryResult;

/// Display name for an organization id that does not resolve.
pub const UNKNOWN_ORGANIZATION: &str = "Unknown organization";

/// Filter keyword meaning "no restriction" in list filters.
pub const ALL: &str = "all";

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationFilter {
    pub search_term: String,
    /// `None` matches every type.
    pub org_type: Option<OrgType>,
}

impl OrganizationFilter {
    /// Build from raw list-view parameters; `"all"` (or empty) disables
    /// the type restriction.
    pub fn from_params(search_term: &str, org_type: &str) -> DirectoryResult<Self> {
        Ok(Self {
            search_term: search_term.to_string(),
            org_type: parse_selection(org_type)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonnelFilter {
    pub search_term: String,
    pub organization_id: Option<String>,
    pub status: Option<PersonnelStatus>,
}

impl PersonnelFilter {
    pub fn from_params(
        search_term: &str,
        organization_id: &str,
        status: &str,
    ) -> DirectoryResult<Self> {
        let organization_id = match organization_id {
            "" | ALL => None,
            id => Some(id.to_string()),
        };
        Ok(Self {
            search_term: search_term.to_string(),
            organization_id,
            status: parse_selection(status)?,
        })
    }
}

fn parse_selection<T: FromStr>(raw: &str) -> Result<Option<T>, T::Err> {
    match raw {
        "" | ALL => Ok(None),
        value => value.parse().map(Some),
    }
}

/// Case-insensitive substring match; an empty needle matches everything.
fn matches_term(needle: &str, haystacks: &[Option<&str>]) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    haystacks
        .iter()
        .flatten()
        .any(|h| h.to_lowercase().contains(&needle))
}

/// Organizations whose type matches and whose name, description or
/// manager contains the search term.
pub fn filter_organizations<'a>(
    orgs: &'a [Organization],
    filter: &OrganizationFilter,
) -> Vec<&'a Organization> {
    orgs.iter()
        .filter(|o| filter.org_type.map_or(true, |t| o.org_type == t))
        .filter(|o| {
            matches_term(
                &filter.search_term,
                &[
                    Some(o.name.as_str()),
                    o.description.as_deref(),
                    o.manager.as_deref(),
                ],
            )
        })
        .collect()
}

/// Personnel matching organization and status exactly, and whose name,
/// position, email or department contains the search term.
pub fn filter_personnel<'a>(
    personnel: &'a [Personnel],
    filter: &PersonnelFilter,
) -> Vec<&'a Personnel> {
    personnel
        .iter()
        .filter(|p| {
            filter
                .organization_id
                .as_deref()
                .map_or(true, |id| p.organization_id == id)
        })
        .filter(|p| filter.status.map_or(true, |s| p.status == s))
        .filter(|p| {
            matches_term(
                &filter.search_term,
                &[
                    Some(p.name.as_str()),
                    Some(p.position.as_str()),
                    Some(p.email.as_str()),
                    Some(p.department.as_str()),
                ],
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Name of the organization, or `UNKNOWN_ORGANIZATION`. Never fails.
pub fn resolve_organization_name<'a>(orgs: &'a [Organization], id: &str) -> &'a str {
    orgs.iter()
        .find(|o| o.id == id)
        .map(|o| o.name.as_str())
        .unwrap_or(UNKNOWN_ORGANIZATION)
}

/// Organizations that may be chosen as a parent: every non-team
/// organization except `exclude_id` itself.
pub fn eligible_parents<'a>(
    orgs: &'a [Organization],
    exclude_id: Option<&str>,
) -> Vec<&'a Organization> {
    orgs.iter()
        .filter(|o| Some(o.id.as_str()) != exclude_id)
        .filter(|o| o.org_type.can_parent())
        .collect()
}

/// Personnel whose `organization_id` points at `org_id`.
pub fn members_of<'a>(personnel: &'a [Personnel], org_id: &str) -> Vec<&'a Personnel> {
    personnel
        .iter()
        .filter(|p| p.organization_id == org_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_term_is_case_insensitive() {
        assert!(matches_term("ENG", &[Some("Engineering")]));
        assert!(matches_term("", &[None]));
        assert!(!matches_term("sales", &[Some("Engineering"), None]));
        assert!(matches_term("lead", &[None, Some("Team Lead")]));
    }

    #[test]
    fn test_from_params_all_disables_restriction() {
        let f = OrganizationFilter::from_params("x", "all").unwrap();
        assert_eq!(f.org_type, None);
        let f = OrganizationFilter::from_params("", "team").unwrap();
        assert_eq!(f.org_type, Some(OrgType::Team));
        assert!(OrganizationFilter::from_params("", "guild").is_err());

        let f = PersonnelFilter::from_params("", "all", "on-leave").unwrap();
        assert_eq!(f.organization_id, None);
        assert_eq!(f.status, Some(PersonnelStatus::OnLeave));
        let f = PersonnelFilter::from_params("", "3", "").unwrap();
        assert_eq!(f.organization_id.as_deref(), Some("3"));
    }
}

//! Directory: Hierarchy Utilities
//!
//! The organizations form a forest through `parent_id` links.
//! Every walk is bounded by the collection size, so a corrupt
//! handed-in collection can never loop.

use std::collections::BTreeMap;

use crate::domain::Organization;

fn parent_links(orgs: &[Organization]) -> BTreeMap<&str, Option<&str>> {
    orgs.iter()
        .map(|o| (o.id.as_str(), o.parent_id.as_deref()))
        .collect()
}

// ---------------------------------------------------------------------------
// Ancestry
// ---------------------------------------------------------------------------

/// Ancestors of `id`, nearest first. Stops at a root, at a parent link
/// that does not resolve, or when a cycle is met.
pub fn ancestors<'a>(orgs: &'a [Organization], id: &str) -> Vec<&'a Organization> {
    let mut chain: Vec<&Organization> = Vec::new();
    let mut current = orgs
        .iter()
        .find(|o| o.id == id)
        .and_then(|o| o.parent_id.as_deref());

    while let Some(pid) = current {
        if chain.len() >= orgs.len() || pid == id || chain.iter().any(|a| a.id == pid) {
            break;
        }
        match orgs.iter().find(|o| o.id == pid) {
            Some(parent) => {
                chain.push(parent);
                current = parent.parent_id.as_deref();
            }
            None => break,
        }
    }
    chain
}

/// Number of resolvable ancestors. Roots have depth 0.
pub fn depth(orgs: &[Organization], id: &str) -> usize {
    ancestors(orgs, id).len()
}

/// Would linking `id` under `new_parent` close a cycle?
///
/// True when `new_parent` is `id` itself or `id` is already an ancestor
/// of `new_parent`.
pub fn would_create_cycle(orgs: &[Organization], id: &str, new_parent: &str) -> bool {
    if id == new_parent {
        return true;
    }
    let links = parent_links(orgs);
    let mut current = Some(new_parent);
    let mut steps = 0usize;
    while let Some(node) = current {
        if node == id {
            return true;
        }
        steps += 1;
        if steps > orgs.len() {
            // Pre-existing loop that does not pass through `id`.
            return false;
        }
        current = links.get(node).copied().flatten();
    }
    false
}

// ---------------------------------------------------------------------------
// Forest views
// ---------------------------------------------------------------------------

/// Direct children of `id`, in collection order.
pub fn children_of<'a>(orgs: &'a [Organization], id: &str) -> Vec<&'a Organization> {
    orgs.iter()
        .filter(|o| o.parent_id.as_deref() == Some(id))
        .collect()
}

/// Organizations with no parent, or whose parent no longer resolves.
pub fn roots(orgs: &[Organization]) -> Vec<&Organization> {
    let links = parent_links(orgs);
    orgs.iter()
        .filter(|o| match o.parent_id.as_deref() {
            None => true,
            Some(pid) => !links.contains_key(pid),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Cycle detection
// ---------------------------------------------------------------------------

/// Detect every parent-link cycle in the collection.
/// Each cycle is reported once, starting from its first member in
/// collection order.
pub fn find_cycles(orgs: &[Organization]) -> Vec<Vec<String>> {
    const WHITE: u8 = 0;
    const GREY: u8 = 1;
    const BLACK: u8 = 2;

    let links = parent_links(orgs);
    let mut colour: BTreeMap<&str, u8> = orgs.iter().map(|o| (o.id.as_str(), WHITE)).collect();
    let mut cycles: Vec<Vec<String>> = Vec::new();

    for start in orgs.iter().map(|o| o.id.as_str()) {
        if colour.get(start).copied().unwrap_or(WHITE) != WHITE {
            continue;
        }

        let mut path: Vec<&str> = Vec::new();
        let mut node = Some(start);
        while let Some(n) = node {
            match colour.get(n).copied() {
                Some(WHITE) => {
                    colour.insert(n, GREY);
                    path.push(n);
                    node = links.get(n).copied().flatten();
                }
                Some(GREY) => {
                    // Closed a loop on the current path.
                    if let Some(pos) = path.iter().position(|p| *p == n) {
                        cycles.push(path[pos..].iter().map(|s| s.to_string()).collect());
                    }
                    break;
                }
                // Already finished, or dangling parent link.
                _ => break,
            }
        }
        for n in path {
            colour.insert(n, BLACK);
        }
    }

    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrgStatus, OrgType};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn org(id: &str, parent: Option<&str>) -> Organization {
        Organization {
            id: id.to_string(),
            name: format!("org {}", id),
            org_type: OrgType::Department,
            parent_id: parent.map(str::to_string),
            description: None,
            location: None,
            manager: None,
            established_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            status: OrgStatus::Active,
            employee_count: 0,
            created_by: "test".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_by: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let orgs = vec![org("a", None), org("b", Some("a")), org("c", Some("b"))];
        let ids: Vec<&str> = ancestors(&orgs, "c").iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(depth(&orgs, "a"), 0);
        assert_eq!(depth(&orgs, "c"), 2);
    }

    #[test]
    fn test_ancestors_stop_at_dangling_parent() {
        let orgs = vec![org("b", Some("gone")), org("c", Some("b"))];
        assert_eq!(depth(&orgs, "c"), 1);
    }

    #[test]
    fn test_ancestors_terminate_on_existing_cycle() {
        let orgs = vec![org("a", Some("c")), org("b", Some("a")), org("c", Some("b"))];
        assert_eq!(ancestors(&orgs, "a").len(), 2);
    }

    #[test]
    fn test_would_create_cycle() {
        let orgs = vec![org("a", None), org("b", Some("a")), org("c", Some("b"))];
        assert!(would_create_cycle(&orgs, "a", "c"));
        assert!(would_create_cycle(&orgs, "a", "a"));
        assert!(!would_create_cycle(&orgs, "c", "a"));
    }

    #[test]
    fn test_roots_include_orphaned_children() {
        let orgs = vec![org("a", None), org("b", Some("a")), org("x", Some("gone"))];
        let ids: Vec<&str> = roots(&orgs).iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "x"]);
        assert_eq!(children_of(&orgs, "a").len(), 1);
    }

    #[test]
    fn test_find_cycles() {
        let acyclic = vec![org("a", None), org("b", Some("a"))];
        assert!(find_cycles(&acyclic).is_empty());

        let cyclic = vec![
            org("a", Some("c")),
            org("b", Some("a")),
            org("c", Some("b")),
            org("d", Some("a")),
        ];
        let cycles = find_cycles(&cyclic);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["a", "c", "b"]);
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let orgs = vec![org("a", Some("a"))];
        assert_eq!(find_cycles(&orgs), vec![vec!["a".to_string()]]);
    }
}

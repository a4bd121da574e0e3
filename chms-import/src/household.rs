//! Household resolution
//!
//! Groups validated rows into households using the Family key and the
//! Relation column:
//! - rows sharing a non-empty Family value (exact, case-sensitive) form one
//!   household;
//! - rows without a family, or marked `individual`, are a household of one;
//! - a spouse or child with no family cannot be placed and is excluded.
//!
//! Output order is deterministic: families in first-seen order, then
//! individuals in row order.

use crate::source::RawRow;
use crate::validator::ValidatedRow;
use std::collections::HashMap;
use tracing::warn;

/// Role assigned to heads and to every standalone individual
pub const HEAD_ROLE: &str = "head";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKind {
    /// Members sharing this Family value
    Family(String),
    /// One standalone person
    Individual,
}

/// A household to be created in one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseholdGroup {
    pub kind: GroupKind,
    pub members: Vec<ValidatedRow>,
}

impl HouseholdGroup {
    /// Family key, `None` for individuals
    pub fn family_name(&self) -> Option<&str> {
        match &self.kind {
            GroupKind::Family(name) => Some(name),
            GroupKind::Individual => None,
        }
    }

    /// Relation text used to derive `row`'s household role
    ///
    /// Individuals are always heads. Family members keep their lowercased
    /// relation, or head when it is blank; unknown relations are rejected
    /// later by the transformer.
    pub fn role_for(&self, row: &RawRow) -> String {
        match self.kind {
            GroupKind::Individual => HEAD_ROLE.to_string(),
            GroupKind::Family(_) => {
                let relation = relation_of(row);
                if relation.is_empty() {
                    HEAD_ROLE.to_string()
                } else {
                    relation
                }
            }
        }
    }

    /// Name for the household record
    pub fn household_name(&self) -> String {
        match &self.kind {
            GroupKind::Family(name) => name.clone(),
            GroupKind::Individual => self
                .members
                .first()
                .map(|m| m.name().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Result of grouping a run's rows
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub groups: Vec<HouseholdGroup>,
    /// Spouse/child rows with no family, excluded from the import
    pub orphans: Vec<ValidatedRow>,
}

fn family_of(row: &RawRow) -> &str {
    row.family.as_deref().map(str::trim).unwrap_or("")
}

fn relation_of(row: &RawRow) -> String {
    row.relation
        .as_deref()
        .map(|r| r.trim().to_lowercase())
        .unwrap_or_default()
}

fn is_orphaned_dependent(relation: &str, family: &str) -> bool {
    family.is_empty() && matches!(relation, "spouse" | "child")
}

pub fn group_by_household(rows: Vec<ValidatedRow>) -> Resolution {
    let mut family_order: Vec<String> = Vec::new();
    let mut families: HashMap<String, Vec<ValidatedRow>> = HashMap::new();
    let mut individuals: Vec<ValidatedRow> = Vec::new();
    let mut orphans: Vec<ValidatedRow> = Vec::new();

    for entry in rows {
        let family = family_of(&entry.row).to_string();
        let relation = relation_of(&entry.row);

        if is_orphaned_dependent(&relation, &family) {
            warn!(
                "[Row {}] {} without Family - skipping",
                entry.line_number, relation
            );
            orphans.push(entry);
            continue;
        }

        if family.is_empty() || relation == "individual" {
            individuals.push(entry);
            continue;
        }

        match families.get_mut(&family) {
            Some(members) => members.push(entry),
            None => {
                family_order.push(family.clone());
                families.insert(family, vec![entry]);
            }
        }
    }

    let mut groups = Vec::with_capacity(family_order.len() + individuals.len());
    for name in family_order {
        let members = families.remove(&name).unwrap_or_default();
        groups.push(HouseholdGroup {
            kind: GroupKind::Family(name),
            members,
        });
    }
    for individual in individuals {
        groups.push(HouseholdGroup {
            kind: GroupKind::Individual,
            members: vec![individual],
        });
    }

    Resolution { groups, orphans }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(line: usize, name: &str, family: &str, relation: &str) -> ValidatedRow {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        ValidatedRow {
            row: RawRow {
                name: Some(name.to_string()),
                family: opt(family),
                relation: opt(relation),
                ..Default::default()
            },
            line_number: line,
        }
    }

    #[test]
    fn families_then_individuals_in_first_seen_order() {
        let resolution = group_by_household(vec![
            entry(2, "Raj", "", "Individual"),
            entry(3, "Bala", "B", "Head"),
            entry(4, "Anil", "A", "Head"),
            entry(5, "Bina", "B", "Spouse"),
            entry(6, "Ravi", "", ""),
        ]);

        let kinds: Vec<Option<&str>> =
            resolution.groups.iter().map(|g| g.family_name()).collect();
        assert_eq!(kinds, vec![Some("B"), Some("A"), None, None]);

        assert_eq!(resolution.groups[0].members.len(), 2);
        assert_eq!(resolution.groups[2].members[0].name(), "Raj");
        assert_eq!(resolution.groups[3].members[0].name(), "Ravi");
        assert!(resolution.orphans.is_empty());
    }

    #[test]
    fn individual_groups_have_one_head() {
        let resolution = group_by_household(vec![
            entry(2, "Raj", "", "Individual"),
            entry(3, "Meena", "C", "individual"),
            entry(4, "Sam", "", "Head"),
        ]);

        assert_eq!(resolution.groups.len(), 3);
        for group in &resolution.groups {
            assert_eq!(group.kind, GroupKind::Individual);
            assert_eq!(group.members.len(), 1);
            assert_eq!(group.role_for(&group.members[0].row), HEAD_ROLE);
        }
    }

    #[test]
    fn orphaned_dependents_are_excluded() {
        let resolution = group_by_household(vec![
            entry(2, "Asha", "", "Spouse"),
            entry(3, "Kid", " ", "child"),
            entry(4, "Anil", "A", "Head"),
        ]);

        assert_eq!(resolution.groups.len(), 1);
        assert_eq!(resolution.orphans.len(), 2);
        let grouped: Vec<&str> = resolution
            .groups
            .iter()
            .flat_map(|g| g.members.iter().map(|m| m.name()))
            .collect();
        assert!(!grouped.contains(&"Asha"));
        assert!(!grouped.contains(&"Kid"));
    }

    #[test]
    fn family_key_is_exact_and_trimmed() {
        let resolution = group_by_household(vec![
            entry(2, "One", "Smith", "Head"),
            entry(3, "Two", " Smith ", "Child"),
            entry(4, "Three", "smith", "Head"),
        ]);

        assert_eq!(resolution.groups.len(), 2);
        assert_eq!(resolution.groups[0].family_name(), Some("Smith"));
        assert_eq!(resolution.groups[0].members.len(), 2);
        assert_eq!(resolution.groups[1].family_name(), Some("smith"));
    }

    #[test]
    fn family_roles_default_to_head_and_keep_unknown_relations() {
        let resolution = group_by_household(vec![
            entry(2, "Anil", "A", ""),
            entry(3, "Asha", "A", "SPOUSE"),
            entry(4, "Uncle", "A", "Brother"),
        ]);

        let group = &resolution.groups[0];
        let roles: Vec<String> = group.members.iter().map(|m| group.role_for(&m.row)).collect();
        assert_eq!(roles, vec!["head", "spouse", "brother"]);
        assert_eq!(group.household_name(), "A");
    }
}

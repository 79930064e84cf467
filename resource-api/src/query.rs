//! Translation of listing filters into typed predicates.
//!
//! A listing request carries at most two filters. Each present filter becomes a
//! `Predicate::Contains`; with none present the query is `[Predicate::All]`.
//! Predicates are always combined with AND, both when rendered to SQL and when
//! evaluated in memory.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{Postgres, QueryBuilder};

use crate::resources::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceField {
    Location,
    Category,
}

impl ResourceField {
    pub fn column(self) -> &'static str {
        match self {
            ResourceField::Location => "location",
            ResourceField::Category => "category",
        }
    }

    fn value_of(self, resource: &Resource) -> &str {
        match self {
            ResourceField::Location => &resource.location,
            ResourceField::Category => &resource.category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    All,
    /// Case-insensitive substring match on a single field.
    Contains { field: ResourceField, value: String },
}

impl Predicate {
    pub fn contains(field: ResourceField, value: impl Into<String>) -> Self {
        Predicate::Contains {
            field,
            value: value.into(),
        }
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Contains { field, value } => field
                .value_of(resource)
                .to_lowercase()
                .contains(&value.to_lowercase()),
        }
    }
}

/// Optional filters accepted by the listing endpoint.
/// Empty values are treated as absent and echo back as `null`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceFilters {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

impl ResourceFilters {
    pub fn new(location: Option<&str>, category: Option<&str>) -> Self {
        let present = |v: Option<&str>| v.filter(|v| !v.is_empty()).map(str::to_owned);
        Self {
            location: present(location),
            category: present(category),
        }
    }

    pub fn predicates(&self) -> Vec<Predicate> {
        let predicates: Vec<Predicate> = [
            (ResourceField::Location, &self.location),
            (ResourceField::Category, &self.category),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_ref().map(|v| Predicate::contains(field, v.as_str())))
        .collect();

        if predicates.is_empty() {
            vec![Predicate::All]
        } else {
            predicates
        }
    }
}

/// Escape LIKE wildcards so the value is matched literally.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append a WHERE clause for the given predicates. `All` contributes nothing.
pub fn push_predicates(qb: &mut QueryBuilder<'_, Postgres>, predicates: &[Predicate]) {
    let mut first = true;
    for predicate in predicates {
        if let Predicate::Contains { field, value } = predicate {
            qb.push(if first { " WHERE " } else { " AND " });
            first = false;
            qb.push(field.column());
            qb.push(" ILIKE '%' || ");
            qb.push_bind(escape_like(value));
            qb.push(r" || '%' ESCAPE '\'");
        }
    }
}

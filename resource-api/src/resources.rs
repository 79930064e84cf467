use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A crisis or support resource, as stored in the `resources` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub location: String,
    pub phone: String,
    pub website: String,
    #[serde(rename = "available24h")]
    pub available_24h: bool,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// The creation shape of a Resource: everything but the timestamp, which the store assigns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub location: String,
    pub phone: String,
    pub website: String,
    #[serde(rename = "available24h")]
    pub available_24h: bool,
    pub description: String,
}

impl NewResource {
    pub fn into_resource(self, created_at: DateTime<Utc>) -> Resource {
        Resource {
            id: self.id,
            name: self.name,
            category: self.category,
            location: self.location,
            phone: self.phone,
            website: self.website,
            available_24h: self.available_24h,
            description: self.description,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_with_api_field_names() {
        let created_at = DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let resource = NewResource {
            id: 7,
            name: "Helpline".to_string(),
            category: "mental-health".to_string(),
            location: "Boston".to_string(),
            phone: "555-0100".to_string(),
            website: "https://example.org".to_string(),
            available_24h: true,
            description: "Talk to someone".to_string(),
        }
        .into_resource(created_at);

        let value = serde_json::to_value(&resource).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 7,
                "name": "Helpline",
                "category": "mental-health",
                "location": "Boston",
                "phone": "555-0100",
                "website": "https://example.org",
                "available24h": true,
                "description": "Talk to someone",
                "createdAt": "2024-06-01T12:00:00Z",
            })
        );
    }
}

//! The one profile document: upsert on save, point lookup on load.

use mongodb::{
    Database,
    bson::{Document, doc, to_document},
};
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::{database::ConnectionHandle, error::AppError};

pub const USERS_COLLECTION: &str = "users";
pub const PROFILE_USER_ID: i64 = 1;

/// Stamps the fixed key onto whatever the client submitted.
fn with_profile_key(mut fields: Map<String, Value>) -> Map<String, Value> {
    fields.insert("userid".to_string(), Value::from(PROFILE_USER_ID));

    fields
}

/// Upserts the submitted fields into the profile document and echoes
/// them back. Requires a connected database; callers get a 503 otherwise.
pub async fn save_profile(
    database: &ConnectionHandle<Database>,
    fields: Map<String, Value>,
) -> Result<Map<String, Value>, AppError> {
    let Some(db) = database.get() else {
        return Err(AppError::ServiceUnavailable);
    };

    let fields = with_profile_key(fields);
    let update = to_document(&fields).map_err(mongodb::error::Error::from)?;

    db.collection::<Document>(USERS_COLLECTION)
        .update_one(
            doc! { "userid": PROFILE_USER_ID },
            doc! { "$set": update },
        )
        .upsert(true)
        .await?;

    info!("Profile updated successfully");

    Ok(fields)
}

/// Looks up the profile document. Degrades to an empty map when the
/// database is unavailable, the document is absent, or the lookup fails;
/// only the last of those is worth a log line.
pub async fn load_profile(database: &ConnectionHandle<Database>) -> Map<String, Value> {
    let Some(db) = database.get() else {
        return Map::new();
    };

    match db
        .collection::<Document>(USERS_COLLECTION)
        .find_one(doc! { "userid": PROFILE_USER_ID })
        .await
    {
        Ok(Some(mut document)) => {
            document.remove("_id");

            match serde_json::to_value(&document) {
                Ok(Value::Object(fields)) => fields,
                _ => Map::new(),
            }
        }
        Ok(None) => Map::new(),
        Err(e) => {
            error!("Find error: {e}");

            Map::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), Value::from(*value)))
            .collect()
    }

    #[test]
    fn profile_key_is_stamped_onto_submitted_fields() {
        let merged = with_profile_key(fields(&[("name", "Jane"), ("email", "jane@example.com")]));

        assert_eq!(merged.get("userid"), Some(&Value::from(PROFILE_USER_ID)));
        assert_eq!(merged.get("name"), Some(&Value::from("Jane")));
        assert_eq!(merged.get("email"), Some(&Value::from("jane@example.com")));
    }

    #[test]
    fn profile_key_overrides_a_spoofed_userid() {
        let merged = with_profile_key(fields(&[("userid", "999")]));

        assert_eq!(merged.get("userid"), Some(&Value::from(PROFILE_USER_ID)));
    }

    #[tokio::test]
    async fn save_is_gated_on_readiness() {
        let database = Arc::new(ConnectionHandle::new());

        let result = save_profile(&database, fields(&[("name", "Jane")])).await;

        assert!(matches!(result, Err(AppError::ServiceUnavailable)));
    }

    #[tokio::test]
    async fn load_degrades_to_empty_when_disconnected() {
        let database = Arc::new(ConnectionHandle::new());

        assert!(load_profile(&database).await.is_empty());
    }
}

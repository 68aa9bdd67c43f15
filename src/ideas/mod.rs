//! Request and response shapes of the IdeaCenter `Idea` resource.

use serde::{Deserialize, Deserializer, Serialize};

pub const AUTHENTICATION_PATH: &str = "/api/User/Authentication";
pub const CREATE_PATH: &str = "/api/Idea/Create";
pub const LIST_PATH: &str = "/api/Idea/All";
pub const EDIT_PATH: &str = "/api/Idea/Edit";
pub const DELETE_PATH: &str = "/api/Idea/Delete";

/// Query parameter naming the idea targeted by edit and delete.
pub const IDEA_ID_PARAM: &str = "ideaId";

pub const CREATED_MSG: &str = "Successfully created!";
pub const EDITED_MSG: &str = "Edited successfully";
pub const NO_SUCH_IDEA_MSG: &str = "There is no such idea!";

/// Body of create and edit requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub url: String,
}

impl IdeaRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: String::new(),
        }
    }
}

/// One element of the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdeaRecord {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Credentials posted to the authentication endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Identifiers are opaque: servers may emit them as strings or numbers.
fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}

//! Endpoints for resource types and resources.

use reqwest::{Client, RequestBuilder};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::{endpoint, ApiError, ApiRequest};

/// `GET /resource-types.json`
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceTypesRequest;

/// A server-declared resource type (secret schema).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ApiRequest for ResourceTypesRequest {
    type Response = Vec<ResourceType>;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoint(base_url, "resource-types.json")?))
    }
}

/// `GET /resources.json`
///
/// Returns every resource in one response; there is no pagination.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListResourcesRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub resource_type_id: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
}

impl ApiRequest for ListResourcesRequest {
    type Response = Vec<Resource>;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(endpoint(base_url, "resources.json")?))
    }
}

/// `POST /resources.json`
///
/// Only ever built by the submission pipeline, after the secret has been
/// encrypted.
#[derive(Debug, Clone, Serialize)]
pub struct CreateResourceRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resource_type_id: String,
    pub secrets: Vec<SecretData>,
}

/// One encrypted secret: armored ciphertext.
#[derive(Debug, Clone, Serialize)]
pub struct SecretData {
    pub data: String,
}

impl ApiRequest for CreateResourceRequest {
    type Response = Resource;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client
            .post(endpoint(base_url, "resources.json")?)
            .json(&self))
    }
}

/// `DELETE /resources/{id}.json`
#[derive(Debug, Clone, Copy)]
pub struct DeleteResourceRequest {
    pub id: Uuid,
}

impl ApiRequest for DeleteResourceRequest {
    type Response = IgnoredAny;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let path = format!("resources/{}.json", self.id);
        Ok(client.delete(endpoint(base_url, &path)?))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_create_body_omits_absent_fields() {
        let request = CreateResourceRequest {
            name: "mail".into(),
            username: None,
            uri: Some("https://mail.example.com".into()),
            description: None,
            resource_type_id: "669f8c64-242a-59fb-92fc-81f660975fd3".into(),
            secrets: vec![SecretData {
                data: "-----BEGIN PGP MESSAGE-----".into(),
            }],
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "name": "mail",
                "uri": "https://mail.example.com",
                "resource_type_id": "669f8c64-242a-59fb-92fc-81f660975fd3",
                "secrets": [{"data": "-----BEGIN PGP MESSAGE-----"}]
            })
        );
    }

    #[test]
    fn test_resource_parses_sparse_records() {
        let resource: Resource = serde_json::from_value(serde_json::json!({
            "id": "8e3874ae-4b40-590b-968a-418f704b9d9a",
            "name": "apache",
            "username": null,
            "folder_parent_id": null,
            "personal": false
        }))
        .unwrap();

        assert_eq!(resource.name, "apache");
        assert!(resource.username.is_none());
        assert!(resource.resource_type_id.is_none());
    }
}

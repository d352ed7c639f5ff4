//! Shared fixture: a mock vault server that speaks the login handshake
#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use common::config::ClientConfig;
use common::crypto::{CryptoProvider, OpenPgpCrypto, PublicKey, SecretKey};
use common::handshake::Challenge;
use common::key_directory::ClientIdentity;
use common::VaultClient;

pub const ACCESS_TOKEN: &str = "eyJhbGciOiJSUzI1NiJ9.access";
pub const REFRESH_TOKEN: &str = "8a1c2d3e-refresh";
pub const PASSWORD_TYPE_ID: &str = "a28a04cd-6f53-518a-967c-9963bf9cec51";
pub const DESCRIPTION_TYPE_ID: &str = "669f8c64-242a-59fb-92fc-81f660975fd3";

pub const SERVER_PUBLIC: &str = include_str!("../fixtures/server.pub.asc");
pub const SERVER_SECRET: &str = include_str!("../fixtures/server.sec.asc");
pub const SERVER_PASSPHRASE: &str = "server-passphrase";
pub const SERVER_FINGERPRINT: &str = "12B89FE5CCF6620A2BA64A9C73D0DB4FB84EFFDA";
pub const CLIENT_PUBLIC: &str = include_str!("../fixtures/client.pub.asc");
pub const CLIENT_SECRET: &str = include_str!("../fixtures/client.sec.asc");
pub const CLIENT_PASSPHRASE: &str = "correct horse battery staple";

/// Wrap `body` in the server's `{header, body}` envelope.
pub fn envelope(body: Value) -> Value {
    json!({
        "header": {
            "id": Uuid::new_v4().to_string(),
            "status": "success",
            "servertime": 1_700_000_000,
            "action": Uuid::new_v4().to_string(),
            "message": "The operation was successful.",
            "url": "/",
            "code": 200
        },
        "body": body
    })
}

pub fn error_envelope(code: u16, message: &str, body: Value) -> Value {
    json!({
        "header": {
            "status": "error",
            "message": message,
            "code": code
        },
        "body": body
    })
}

/// Plays the server side of the login: decrypts the challenge with the
/// server key and replies with the verify token and a token pair.
pub struct ChallengeResponder {
    server_key: SecretKey,
    client_public: PublicKey,
    corrupt_token: bool,
}

impl Respond for ChallengeResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(login) = serde_json::from_slice::<Value>(&request.body) else {
            return ResponseTemplate::new(400);
        };
        let armored = login["challenge"].as_str().unwrap_or_default();

        let Ok(plaintext) = OpenPgpCrypto.decrypt(armored, &self.server_key, &self.client_public)
        else {
            return ResponseTemplate::new(403).set_body_json(error_envelope(
                403,
                "The authentication failed.",
                Value::Null,
            ));
        };
        let challenge: Challenge = serde_json::from_slice(&plaintext).unwrap();

        let verify_token = if self.corrupt_token {
            Uuid::new_v4().to_string()
        } else {
            challenge.verify_token
        };
        let reply = json!({
            "version": challenge.version,
            "domain": challenge.domain,
            "verify_token": verify_token,
            "access_token": ACCESS_TOKEN,
            "refresh_token": REFRESH_TOKEN,
        });
        let armored = OpenPgpCrypto
            .encrypt(
                reply.to_string().as_bytes(),
                &self.client_public,
                &self.server_key,
            )
            .unwrap();

        ResponseTemplate::new(200).set_body_json(envelope(json!({ "challenge": armored })))
    }
}

/// Route library logs to the test harness; `RUST_LOG=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct TestVault {
    pub server: MockServer,
    pub server_key: SecretKey,
    pub client: Arc<ClientIdentity<SecretKey>>,
    pub client_public: PublicKey,
    pub user_id: Uuid,
}

impl TestVault {
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
            server_key: SecretKey::from_armored(SERVER_SECRET, SERVER_PASSPHRASE).unwrap(),
            client: Arc::new(ClientIdentity::new(
                SecretKey::from_armored(CLIENT_SECRET, CLIENT_PASSPHRASE).unwrap(),
            )),
            client_public: PublicKey::from_armored(CLIENT_PUBLIC).unwrap(),
            user_id: Uuid::new_v4(),
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.server.uri().parse().unwrap())
    }

    pub fn vault_client(&self) -> VaultClient {
        VaultClient::new(self.config()).unwrap()
    }

    pub fn responder(&self, corrupt_token: bool) -> ChallengeResponder {
        ChallengeResponder {
            server_key: self.server_key.clone(),
            client_public: self.client_public.clone(),
            corrupt_token,
        }
    }

    pub async fn mount_verify(&self) {
        Mock::given(method("GET"))
            .and(path("/auth/verify.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "fingerprint": SERVER_FINGERPRINT,
                "keydata": SERVER_PUBLIC,
            }))))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_login(&self, corrupt_token: bool) {
        Mock::given(method("POST"))
            .and(path("/auth/jwt/login.json"))
            .respond_with(self.responder(corrupt_token))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_resource_types(&self) {
        Mock::given(method("GET"))
            .and(path("/resource-types.json"))
            .and(bearer_token(ACCESS_TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
                {
                    "id": PASSWORD_TYPE_ID,
                    "slug": "password-string",
                    "name": "Simple password",
                    "description": "The original passbolt resource type"
                },
                {
                    "id": DESCRIPTION_TYPE_ID,
                    "slug": "password-and-description",
                    "name": "Password with description"
                }
            ]))))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_logout(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/auth/jwt/logout.json"))
            .respond_with(ResponseTemplate::new(status).set_body_json(envelope(Value::Null)))
            .mount(&self.server)
            .await;
    }

    /// Mount a well-behaved server and log a fresh client in.
    pub async fn logged_in(&self) -> VaultClient {
        self.mount_verify().await;
        self.mount_login(false).await;
        self.mount_resource_types().await;

        let mut vault = self.vault_client();
        vault
            .login(self.user_id, self.client.clone())
            .await
            .unwrap();
        vault
    }

    /// Requests received for `path`, in order.
    pub async fn requests_to(&self, route: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == route)
            .collect()
    }
}

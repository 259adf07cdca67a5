use serde::{Deserialize, Serialize};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

/// The signed-in traveler. Serialized with camelCase keys, matching the
/// record kept in durable client storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl SessionUser {
    /// Builds a user from a bare email: the local part, capitalized, becomes
    /// the first name.
    pub fn from_email(email: &str) -> Self {
        let local = email.split('@').next().unwrap_or_default();
        Self {
            id: generate_user_id(),
            name: local.to_string(),
            email: email.to_string(),
            first_name: capitalize(local),
            last_name: PLACEHOLDER_LAST_NAME.to_string(),
        }
    }

    pub fn from_registration(registration: &Registration) -> Self {
        Self {
            id: generate_user_id(),
            name: format!("{} {}", registration.first_name, registration.last_name),
            email: registration.email.clone(),
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
        }
    }
}

pub const PLACEHOLDER_LAST_NAME: &str = "User";

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve credentials to a user, or `None` when they are rejected.
    async fn login(&self, credentials: &Credentials) -> Option<SessionUser>;

    /// Register a new user, or `None` when the registration is rejected.
    async fn signup(&self, registration: &Registration) -> Option<SessionUser>;
}

/// Stand-in identity provider. Accepts any non-empty input after an
/// artificial delay.
pub struct MockAuthenticator {
    login_delay: Duration,
    signup_delay: Duration,
}

impl MockAuthenticator {
    pub fn new(login_delay: Duration, signup_delay: Duration) -> Self {
        Self { login_delay, signup_delay }
    }

    /// No artificial latency.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

impl Default for MockAuthenticator {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500), Duration::from_millis(2000))
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn login(&self, credentials: &Credentials) -> Option<SessionUser> {
        tokio::time::sleep(self.login_delay).await;

        // No real verification happens here: any non-empty pair is accepted.
        if credentials.email.is_empty() || credentials.password.is_empty() {
            tracing::debug!("Mock login rejected: empty credentials");
            return None;
        }

        Some(SessionUser::from_email(&credentials.email))
    }

    async fn signup(&self, registration: &Registration) -> Option<SessionUser> {
        tokio::time::sleep(self.signup_delay).await;

        let complete = [
            &registration.first_name,
            &registration.last_name,
            &registration.email,
            &registration.password,
        ]
        .iter()
        .all(|field| !field.is_empty());

        if !complete {
            tracing::debug!("Mock signup rejected: incomplete registration");
            return None;
        }

        Some(SessionUser::from_registration(registration))
    }
}

fn generate_user_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials { email: email.to_string(), password: password.to_string() }
    }

    #[test]
    fn test_user_from_email() {
        let user = SessionUser::from_email("jane.doe@example.com");
        assert_eq!(user.first_name, "Jane.doe");
        assert_eq!(user.last_name, "User");
        assert_eq!(user.name, "jane.doe");
        assert!(user.id.parse::<i64>().is_ok());
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = SessionUser::from_email("a@b.com");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["firstName"], "A");
        assert_eq!(json["lastName"], "User");
    }

    #[tokio::test]
    async fn test_mock_login() {
        let auth = MockAuthenticator::instant();

        let user = auth.login(&credentials("a@b.com", "pw")).await.unwrap();
        assert_eq!(user.first_name, "A");

        assert!(auth.login(&credentials("", "pw")).await.is_none());
        assert!(auth.login(&credentials("a@b.com", "")).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_login_waits_for_delay() {
        let auth = MockAuthenticator::default();
        let started = tokio::time::Instant::now();

        auth.login(&credentials("a@b.com", "pw")).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_mock_signup() {
        let auth = MockAuthenticator::instant();
        let registration = Registration {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        };

        let user = auth.signup(&registration).await.unwrap();
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.last_name, "Lovelace");

        let incomplete = Registration { last_name: String::new(), ..registration };
        assert!(auth.signup(&incomplete).await.is_none());
    }
}

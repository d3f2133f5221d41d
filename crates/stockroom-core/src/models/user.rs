//! User profile and authentication payloads.

use serde::{Deserialize, Serialize};

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Last-known profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl RegisterRequest {
    /// Check the form fields before anything goes over the wire.
    /// Returns every problem found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();

        if !is_plausible_email(&self.email) {
            problems.push("Email address is not valid".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            problems.push(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ));
        }
        if self.full_name.trim().is_empty() {
            problems.push("Full name is required".to_string());
        }
        if let Some(ref phone) = self.phone {
            let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
            if digits < 7 {
                problems.push("Phone number is too short".to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

/// Shape check only: one `@`, something before it, a dotted domain after it.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    if email.contains(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    }
}

/// Partial profile update; fields left as `None` are not sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Body returned by the login and register endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegisterRequest {
        RegisterRequest {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            full_name: "Ada Lovelace".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_user_json_field_names() {
        let json = r#"{"id":"1","email":"a@b.com","fullName":"A"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name, "A");
        assert_eq!(user.phone, None);

        let out = serde_json::to_value(&user).unwrap();
        assert_eq!(out["fullName"], "A");
        assert!(out.get("phone").is_none());
    }

    #[test]
    fn test_is_plausible_email() {
        assert!(is_plausible_email("a@b.com"));
        assert!(is_plausible_email(" user.name@shop.example.org "));

        assert!(!is_plausible_email(""));
        assert!(!is_plausible_email("no-at-sign.com"));
        assert!(!is_plausible_email("@b.com"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("a@.com"));
        assert!(!is_plausible_email("a@@b.com"));
        assert!(!is_plausible_email("a b@c.com"));
    }

    #[test]
    fn test_register_validation_collects_all_problems() {
        assert!(registration().validate().is_ok());

        let bad = RegisterRequest {
            email: "nope".to_string(),
            password: "123".to_string(),
            full_name: "  ".to_string(),
            phone: Some("12".to_string()),
        };
        let problems = bad.validate().unwrap_err();
        assert_eq!(problems.len(), 4);
    }

    #[test]
    fn test_profile_update_skips_absent_fields() {
        let update = ProfileUpdate {
            phone: Some("555-0100".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"phone":"555-0100"}"#);
    }

    #[test]
    fn test_auth_response_tolerates_missing_fields() {
        let resp: AuthResponse = serde_json::from_str(r#"{"message":"Registered"}"#).unwrap();
        assert_eq!(resp.token, None);
        assert_eq!(resp.user, None);
        assert_eq!(resp.message.as_deref(), Some("Registered"));
    }
}

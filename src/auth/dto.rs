use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inbound registration body. Fields are optional so that a missing field
/// produces the field-specific message instead of a serde rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Inbound login body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration body after shape validation. The plaintext password lives
/// only here and in the hasher call.
#[derive(Debug)]
pub(crate) struct RegisterPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Login body after shape validation.
#[derive(Debug)]
pub(crate) struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Public identifiers echoed after registration. Never the hash, never the
/// internal ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub email: String,
    pub uuid: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: RegisteredUser,
}

/// Access/refresh pair, serialized with the wire field names clients expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub tokens: TokenPair,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_pair_uses_camel_case_wire_names() {
        let pair = TokenPair {
            access_token: "a".into(),
            refresh_token: "r".into(),
        };
        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
        assert!(json.get("access_token").is_none());
    }

    #[test]
    fn register_request_tolerates_missing_fields() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
        assert!(req.first_name.is_none());
        assert_eq!(req.email.as_deref(), Some("a@b.co"));
    }
}

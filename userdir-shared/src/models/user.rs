use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Represents a user in the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier assigned by the store on creation.
    pub id: i64,

    /// The user's first name.
    pub first_name: String,

    /// The user's last name.
    pub last_name: String,

    /// The user's email address, unique across all users.
    pub email: String,

    /// The user's phone number, if known.
    pub phone: Option<String>,
}

/// Request to create a new user. The identifier is assigned by the store.
///
/// Required fields default to empty on absence so a missing key surfaces as
/// an "is required" validation error rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// The user's first name.
    #[serde(default)]
    pub first_name: String,

    /// The user's last name.
    #[serde(default)]
    pub last_name: String,

    /// The user's email address.
    #[serde(default)]
    pub email: String,

    /// The user's phone number.
    pub phone: Option<String>,
}

/// Request to replace the mutable fields of an existing user.
///
/// The target identifier travels in the request path, never in the body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// The user's first name.
    #[serde(default)]
    pub first_name: String,

    /// The user's last name.
    #[serde(default)]
    pub last_name: String,

    /// The user's email address.
    #[serde(default)]
    pub email: String,

    /// The user's phone number.
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_uses_camel_case() {
        let user = User {
            id: 1,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: Some("555-0101".to_string()),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["firstName"], "John");
        assert_eq!(value["lastName"], "Doe");
        assert_eq!(value["email"], "john.doe@example.com");
        assert_eq!(value["phone"], "555-0101");
    }

    #[test]
    fn test_user_round_trip() {
        let user = User {
            id: 7,
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            phone: None,
        };

        let serialized = serde_json::to_string(&user).unwrap();
        let deserialized: User = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, user);
    }

    #[test]
    fn test_create_request_accepts_missing_phone() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"firstName":"Mike","lastName":"Johnson","email":"mike.johnson@example.com"}"#,
        )
        .unwrap();

        assert_eq!(request.first_name, "Mike");
        assert_eq!(request.last_name, "Johnson");
        assert_eq!(request.email, "mike.johnson@example.com");
        assert_eq!(request.phone, None);
    }

    #[test]
    fn test_create_request_tolerates_absent_required_keys() {
        let request: CreateUserRequest = serde_json::from_str("{}").unwrap();

        assert_eq!(request.first_name, "");
        assert_eq!(request.last_name, "");
        assert_eq!(request.email, "");
        assert_eq!(request.phone, None);
    }

    #[test]
    fn test_update_request_tolerates_absent_required_keys() {
        let request: UpdateUserRequest = serde_json::from_str("{}").unwrap();

        assert_eq!(request.first_name, "");
        assert_eq!(request.last_name, "");
        assert_eq!(request.email, "");
        assert_eq!(request.phone, None);
    }

    #[test]
    fn test_update_request_round_trip() {
        let request = UpdateUserRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            phone: Some("555-0102".to_string()),
        };

        let serialized = serde_json::to_string(&request).unwrap();
        let deserialized: UpdateUserRequest = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, request);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role carried by the session scope and by user records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
    #[default]
    Customer,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
            Role::Customer => "customer",
        }
    }
}

// Accepts token scopes (`ROLE_ADMIN`) as well as bare names (`admin`).
impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from(value.as_str())
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        let name = value.trim();
        let name = name.strip_prefix("ROLE_").unwrap_or(name);
        match name.to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "editor" => Role::Editor,
            "viewer" => Role::Viewer,
            _ => Role::Customer,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a registered user in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "fullName")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Payload of the user editor.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: Role::Viewer,
        }
    }
}

impl User {
    /// Creates a new User instance.
    ///
    /// # Notes
    /// The `id` field is initialized as an empty string and is assigned by
    /// whichever store persists the user.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            username: String::new(),
            name: name.into(),
            email: email.into(),
            role: Role::Customer,
            address: None,
            phone: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_scopes_and_names() {
        assert_eq!(Role::from("ROLE_ADMIN"), Role::Admin);
        assert_eq!(Role::from("editor"), Role::Editor);
        assert_eq!(Role::from("ROLE_USER"), Role::Customer);
    }

    #[test]
    fn user_accepts_full_name_alias() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","username":"tan","fullName":"Nguyễn Trọng Tấn","role":"ROLE_ADMIN","address":"Thôn 4"}"#,
        )
        .unwrap();
        assert_eq!(user.name, "Nguyễn Trọng Tấn");
        assert!(user.role.is_admin());
        assert_eq!(user.address.as_deref(), Some("Thôn 4"));
    }
}

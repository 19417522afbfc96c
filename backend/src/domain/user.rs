//! User data model.
//!
//! The record mirrors the `users` table: a server-generated integer key and
//! three required text columns of at most 100 characters, with the email
//! unique across all rows.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum length, in characters, of each user text field.
pub const USER_FIELD_MAX: usize = 100;

/// The text fields carried by a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Email,
    Role,
}

impl UserField {
    /// Wire-level field name as it appears in request payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Role => "role",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned by the field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyField { field: UserField },
    FieldTooLong { field: UserField, max: usize },
}

impl UserValidationError {
    /// The offending field.
    pub fn field(&self) -> UserField {
        match self {
            Self::EmptyField { field } | Self::FieldTooLong { field, .. } => *field,
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

fn validate_field(value: &str, field: UserField) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::EmptyField { field });
    }
    if value.chars().count() > USER_FIELD_MAX {
        return Err(UserValidationError::FieldTooLong {
            field,
            max: USER_FIELD_MAX,
        });
    }
    Ok(())
}

/// Stable user identifier, generated by the database serial key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Name shown for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        validate_field(&name, UserField::Name)?;
        Ok(Self(name))
    }
}

/// Contact email, unique across all users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`] from owned input.
    ///
    /// Only emptiness and length are checked; address syntax is out of
    /// scope for this service.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        validate_field(&email, UserField::Email)?;
        Ok(Self(email))
    }
}

/// Role label attached to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Validate and construct a [`RoleName`] from owned input.
    pub fn new(role: impl Into<String>) -> Result<Self, UserValidationError> {
        let role = role.into();
        validate_field(&role, UserField::Role)?;
        Ok(Self(role))
    }
}

macro_rules! impl_field_conversions {
    ($($ty:ident),* $(,)?) => {
        $(
            impl AsRef<str> for $ty {
                fn as_ref(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_ref())
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.0
                }
            }

            impl TryFrom<String> for $ty {
                type Error = UserValidationError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }
        )*
    };
}

impl_field_conversions!(UserName, EmailAddress, RoleName);

/// A stored user record.
///
/// ## Invariants
/// - `id` is immutable once assigned by the database.
/// - text fields satisfy the [`USER_FIELD_MAX`] bound and are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[serde(rename = "user_id")]
    #[schema(value_type = i32, example = 1)]
    id: UserId,
    #[serde(rename = "user_name")]
    #[schema(value_type = String, example = "Ann")]
    name: UserName,
    #[serde(rename = "user_email")]
    #[schema(value_type = String, example = "ann@x.com")]
    email: EmailAddress,
    #[serde(rename = "user_role")]
    #[schema(value_type = String, example = "admin")]
    role: RoleName,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(id: UserId, name: UserName, email: EmailAddress, role: RoleName) -> Self {
        Self {
            id,
            name,
            email,
            role,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Name shown for the user.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Contact email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Role label.
    pub fn role(&self) -> &RoleName {
        &self.role
    }
}

/// Validated name/email/role triple used by create and full-replacement
/// update requests. Carries no identifier; the database assigns one on
/// insert and the caller names the target on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    name: UserName,
    email: EmailAddress,
    role: RoleName,
}

impl UserDraft {
    /// Build a draft from validated components.
    pub fn new(name: UserName, email: EmailAddress, role: RoleName) -> Self {
        Self { name, email, role }
    }

    /// Fallible constructor enforcing the field invariants on raw strings.
    pub fn try_from_strings(
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            name: UserName::new(name)?,
            email: EmailAddress::new(email)?,
            role: RoleName::new(role)?,
        })
    }

    /// Name field.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Email field.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Role field.
    pub fn role(&self) -> &RoleName {
        &self.role
    }

    /// Materialise the stored record this draft describes under `id`.
    pub fn into_user(self, id: UserId) -> User {
        User::new(id, self.name, self.email, self.role)
    }
}

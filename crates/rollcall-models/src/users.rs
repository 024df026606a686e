//! User domain models and DTOs.
//!
//! A user is an identity with a single [`Role`]. The role decides what the
//! user may take part in: only students can be enrolled, only teachers can
//! own courses and mark attendance.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, FromRow, Type,
    postgres::PgTypeInfo,
};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

/// Role assigned to a user.
///
/// Stored as its variant name in a `TEXT` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Teacher => "Teacher",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl Type<sqlx::Postgres> for Role {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for Role {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

/// A user in the system.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }
}

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub role: Role,
}

/// DTO for creating a new user.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    pub role: Role,
}

impl From<CreateUserDto> for NewUser {
    fn from(dto: CreateUserDto) -> Self {
        NewUser {
            username: dto.username.trim().to_string(),
            role: dto.role,
        }
    }
}

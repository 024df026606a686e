//! Strongly-typed ID newtypes for domain entities.
//!
//! Each entity gets its own wrapper around `Uuid` so a `CourseId` can never be
//! passed where a `UserId` is expected.
//!
//! ```ignore
//! use rollcall_models::ids::{CourseId, UserId};
//!
//! fn enroll(student: UserId, course: CourseId) { /* ... */ }
//!
//! enroll(UserId::new(), CourseId::new());    // OK
//! // enroll(CourseId::new(), UserId::new()); // Compile error
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Generates a `Uuid` newtype with serde, sqlx and OpenAPI support.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random ID.
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[inline]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            #[inline]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            #[inline]
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            #[inline]
            fn from(id: $name) -> Uuid {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <Uuid as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <Uuid as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <Uuid as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <Uuid as Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        // Needed for `= ANY($1)` binds
        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <Uuid as PgHasArrayType>::array_type_info()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                Uuid::deserialize(deserializer).map(Self)
            }
        }
    };
}

define_id!(
    /// Strongly-typed ID for User entities.
    UserId
);

define_id!(
    /// Strongly-typed ID for Course entities.
    CourseId
);

define_id!(
    /// Strongly-typed ID for Enrollment entities.
    EnrollmentId
);

define_id!(
    /// Strongly-typed ID for Attendance entities.
    AttendanceId
);

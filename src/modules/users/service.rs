use anyhow::anyhow;
use rollcall_core::AppError;
use rollcall_db::{Store, UnitOfWork};
use rollcall_models::{CreateUserDto, NewUser, Role, User, UserId};
use tracing::{info, instrument};

use crate::modules::enrollments::EnrollmentService;

pub struct UserService;

impl UserService {
    #[instrument(skip(store, dto), fields(username = %dto.username, role = %dto.role))]
    pub async fn create_user(store: &dyn Store, dto: CreateUserDto) -> Result<User, AppError> {
        let new_user = NewUser::from(dto);
        if new_user.username.is_empty() {
            return Err(AppError::unprocessable(anyhow!("Username must not be blank")));
        }

        let mut uow = store.begin().await?;

        if uow.get_user_by_username(&new_user.username).await?.is_some() {
            return Err(username_taken());
        }

        let user = uow.create_user(new_user).await.map_err(|e| {
            if e.is_unique_violation() {
                username_taken()
            } else {
                AppError::from(e)
            }
        })?;

        uow.commit().await?;
        info!(user_id = %user.id, "User created");

        Ok(user)
    }

    #[instrument(skip(store))]
    pub async fn list_users(store: &dyn Store) -> Result<Vec<User>, AppError> {
        let mut uow = store.begin().await?;
        Ok(uow.list_users().await?)
    }

    /// Deletes a user together with what hangs off them.
    ///
    /// Students lose their enrollments and teachers are unassigned from their
    /// courses, in the same unit of work as the delete. Attendance rows stay.
    #[instrument(skip(store))]
    pub async fn delete_user(store: &dyn Store, id: UserId) -> Result<(), AppError> {
        let mut uow = store.begin().await?;

        let user = uow
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        match user.role {
            Role::Student => {
                EnrollmentService::cascade_delete_for_student(uow.as_mut(), id).await?;
            }
            Role::Teacher => {
                let unassigned = uow.unassign_teacher(id).await?;
                info!(unassigned, "Unassigned teacher from courses");
            }
            Role::Admin => {}
        }

        uow.delete_user(id).await?;
        uow.commit().await?;
        info!(username = %user.username, "User deleted");

        Ok(())
    }

    #[instrument(skip(store))]
    pub async fn get_teacher(store: &dyn Store, id: UserId) -> Result<User, AppError> {
        let mut uow = store.begin().await?;
        Self::require_teacher(uow.as_mut(), id).await
    }

    /// Resolves `id` to a teacher: `NotFound` when absent, `RoleMismatch`
    /// when the user has another role.
    pub async fn require_teacher(uow: &mut dyn UnitOfWork, id: UserId) -> Result<User, AppError> {
        let user = uow
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))?;
        ensure_teacher(user)
    }

    /// Same as [`Self::require_teacher`], looked up by username.
    pub async fn require_teacher_by_name(
        uow: &mut dyn UnitOfWork,
        username: &str,
    ) -> Result<User, AppError> {
        let user = uow
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher '{}' not found", username)))?;
        ensure_teacher(user)
    }
}

fn ensure_teacher(user: User) -> Result<User, AppError> {
    if !user.is_teacher() {
        return Err(AppError::role_mismatch(anyhow!(
            "User '{}' is not a teacher",
            user.username
        )));
    }
    Ok(user)
}

fn username_taken() -> AppError {
    AppError::conflict(anyhow!("Username already exists"))
}

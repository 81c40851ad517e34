use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use acm_db::models::{NewUserPermission, User};
use acm_db::repositories::user as user_repo;

use crate::error::ApiError;
use crate::pagination::{PageQuery, Paginated};
use crate::validation::{require_name, validate_password};

use super::model::{
    UserFilterQuery, UserPermissionRequest, UserPermissionView, UserRequest, UserResponse,
};

const DEFAULT_STATUS: &str = "active";

/// Merge request flags over a base; `None` keeps the base value. For creates
/// the base is all-false, so omitted flags default to denied.
fn merge_permission(base: NewUserPermission, req: &UserPermissionRequest) -> NewUserPermission {
    NewUserPermission {
        people_permission: req.people_permission.unwrap_or(base.people_permission),
        device_permission: req.device_permission.unwrap_or(base.device_permission),
        rule_permission: req.rule_permission.unwrap_or(base.rule_permission),
        time_attendance_permission: req
            .time_attendance_permission
            .unwrap_or(base.time_attendance_permission),
        report_permission: req.report_permission.unwrap_or(base.report_permission),
        notification_permission: req
            .notification_permission
            .unwrap_or(base.notification_permission),
        system_log_permission: req
            .system_log_permission
            .unwrap_or(base.system_log_permission),
    }
}

/// Replace the user's 1:1 permission row inside the caller's transaction.
/// Same discipline as the list-shaped children: drop, then insert.
async fn replace_permission(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    permission: &NewUserPermission,
) -> Result<(), ApiError> {
    user_repo::delete_permission_by_user(&mut **tx, user_id).await?;
    user_repo::insert_permission(&mut **tx, user_id, permission).await?;
    Ok(())
}

pub async fn create_user(
    pool: &PgPool,
    bcrypt_cost: u32,
    req: UserRequest,
) -> Result<UserResponse, ApiError> {
    let username = require_name(req.username.as_deref(), "username")?;
    let password = req
        .password
        .as_deref()
        .ok_or_else(|| ApiError::Validation("password cannot be empty".to_string()))?;
    validate_password(password)?;
    let permission_req = req
        .permission
        .ok_or_else(|| ApiError::Validation("permission configuration is mandatory".to_string()))?;

    if user_repo::username_exists(pool, &username, None).await? {
        return Err(ApiError::Duplicate {
            field: "username",
            value: username,
        });
    }

    let password_hash = bcrypt::hash(password, bcrypt_cost)?;
    let status = req
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STATUS)
        .to_string();
    let permission = merge_permission(NewUserPermission::default(), &permission_req);

    let mut tx = pool.begin().await?;
    let user = user_repo::create_user(&mut *tx, &username, &password_hash, &status).await?;
    replace_permission(&mut tx, user.id, &permission).await?;
    tx.commit().await?;

    assemble(pool, &user).await
}

/// Full replacement: username, status and the whole permission row are taken
/// from the request. Password changes only when a new one is supplied.
pub async fn update_user(pool: &PgPool, bcrypt_cost: u32, id: Uuid, req: UserRequest) -> Result<UserResponse, ApiError> {
    let existing = user_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user with ID '{id}' not found")))?;

    let username = require_name(req.username.as_deref(), "username")?;
    let permission_req = req
        .permission
        .ok_or_else(|| ApiError::Validation("permission configuration is mandatory".to_string()))?;

    if user_repo::username_exists(pool, &username, Some(existing.id)).await? {
        return Err(ApiError::Duplicate {
            field: "username",
            value: username,
        });
    }

    let password_hash = match req.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => {
            validate_password(password)?;
            bcrypt::hash(password, bcrypt_cost)?
        }
        None => existing.password_hash.clone(),
    };
    let status = req
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STATUS)
        .to_string();
    let permission = merge_permission(NewUserPermission::default(), &permission_req);

    let mut tx = pool.begin().await?;
    let user =
        user_repo::update_user(&mut *tx, existing.id, &username, &password_hash, &status).await?;
    replace_permission(&mut tx, user.id, &permission).await?;
    tx.commit().await?;

    assemble(pool, &user).await
}

/// Merge semantics: each scalar updates only when present; permission flags
/// merge onto the current row, which is then rewritten wholesale.
pub async fn partial_update_user(
    pool: &PgPool,
    bcrypt_cost: u32,
    id: Uuid,
    req: UserRequest,
) -> Result<UserResponse, ApiError> {
    let existing = user_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user with ID '{id}' not found")))?;

    let username = match req.username.as_deref() {
        Some(_) => require_name(req.username.as_deref(), "username")?,
        None => existing.username.clone(),
    };

    if user_repo::username_exists(pool, &username, Some(existing.id)).await? {
        return Err(ApiError::Duplicate {
            field: "username",
            value: username,
        });
    }

    let password_hash = match req.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => {
            validate_password(password)?;
            bcrypt::hash(password, bcrypt_cost)?
        }
        None => existing.password_hash.clone(),
    };
    let status = match req.status.as_deref().filter(|s| !s.is_empty()) {
        Some(status) => status.to_string(),
        None => existing.status.clone(),
    };

    let mut tx = pool.begin().await?;
    let user =
        user_repo::update_user(&mut *tx, existing.id, &username, &password_hash, &status).await?;
    if let Some(permission_req) = &req.permission {
        let base = user_repo::get_permission_by_user(&mut *tx, user.id)
            .await?
            .map(|p| NewUserPermission {
                people_permission: p.people_permission,
                device_permission: p.device_permission,
                rule_permission: p.rule_permission,
                time_attendance_permission: p.time_attendance_permission,
                report_permission: p.report_permission,
                notification_permission: p.notification_permission,
                system_log_permission: p.system_log_permission,
            })
            .unwrap_or_default();
        let permission = merge_permission(base, permission_req);
        replace_permission(&mut tx, user.id, &permission).await?;
    }
    tx.commit().await?;

    assemble(pool, &user).await
}

/// Cascade delete: the permission row goes first, then the user row. Both
/// removals are hard.
pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let existing = user_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user with ID '{id}' not found")))?;

    let mut tx = pool.begin().await?;
    user_repo::delete_permission_by_user(&mut *tx, existing.id).await?;
    user_repo::hard_delete_user(&mut *tx, existing.id).await?;
    tx.commit().await?;

    Ok(())
}

pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<UserResponse, ApiError> {
    let user = user_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user with ID '{id}' not found")))?;
    assemble(pool, &user).await
}

pub async fn list_users(
    pool: &PgPool,
    filter: &UserFilterQuery,
    page: &PageQuery,
) -> Result<Paginated<UserResponse>, ApiError> {
    page.validate()?;

    let users = user_repo::list_users(
        pool,
        filter.username.as_deref(),
        filter.status.as_deref(),
        page.limit,
        page.offset(),
    )
    .await?;
    let total =
        user_repo::count_users(pool, filter.username.as_deref(), filter.status.as_deref()).await?;

    let mut items = Vec::with_capacity(users.len());
    for user in &users {
        items.push(assemble(pool, user).await?);
    }

    Ok(Paginated::new(items, page, total))
}

pub(crate) async fn assemble(pool: &PgPool, user: &User) -> Result<UserResponse, ApiError> {
    let permission = user_repo::get_permission_by_user(pool, user.id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("permission row for user '{}' not found", user.id))
        })?;

    Ok(UserResponse {
        id: user.id,
        username: user.username.clone(),
        status: user.status.clone(),
        permission: UserPermissionView {
            id: permission.id,
            people_permission: permission.people_permission,
            device_permission: permission.device_permission,
            rule_permission: permission.rule_permission,
            time_attendance_permission: permission.time_attendance_permission,
            report_permission: permission.report_permission,
            notification_permission: permission.notification_permission,
            system_log_permission: permission.system_log_permission,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_permission_defaults_omitted_flags_to_base() {
        let req = UserPermissionRequest {
            device_permission: Some(true),
            ..UserPermissionRequest::default()
        };
        let merged = merge_permission(NewUserPermission::default(), &req);
        assert!(merged.device_permission);
        assert!(!merged.people_permission);
        assert!(!merged.system_log_permission);
    }

    #[test]
    fn test_merge_permission_preserves_base_on_partial() {
        let base = NewUserPermission {
            people_permission: true,
            report_permission: true,
            ..NewUserPermission::default()
        };
        let req = UserPermissionRequest {
            report_permission: Some(false),
            ..UserPermissionRequest::default()
        };
        let merged = merge_permission(base, &req);
        assert!(merged.people_permission); // untouched
        assert!(!merged.report_permission); // explicitly revoked
    }
}

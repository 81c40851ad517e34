use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use acm_db::models::AccessControlRule;
use acm_db::repositories::{group as group_repo, rule as rule_repo};

use crate::error::ApiError;
use crate::pagination::{PageQuery, Paginated};
use crate::validation::require_name;

use super::model::{GroupInfo, RuleFilterQuery, RuleRequest, RuleResponse};

/// Replace the rule's group links inside the caller's transaction: validate
/// every referenced group is live, drop the old set, insert the new one.
async fn replace_groups(
    tx: &mut Transaction<'_, Postgres>,
    rule_id: Uuid,
    group_ids: &[Uuid],
) -> Result<(), ApiError> {
    for group_id in group_ids {
        if !group_repo::exists_live(&mut **tx, *group_id).await? {
            return Err(ApiError::NotFound(format!(
                "group with ID '{group_id}' not found"
            )));
        }
    }
    rule_repo::delete_rule_groups(&mut **tx, rule_id).await?;
    rule_repo::insert_rule_groups(&mut **tx, rule_id, group_ids).await?;
    Ok(())
}

pub async fn create_rule(pool: &PgPool, req: RuleRequest) -> Result<RuleResponse, ApiError> {
    let name = require_name(req.name.as_deref(), "rule name")?;
    let group_ids = req.group_ids.unwrap_or_default();

    if rule_repo::name_exists(pool, &name, None).await? {
        return Err(ApiError::Duplicate {
            field: "name",
            value: name,
        });
    }

    let mut tx = pool.begin().await?;
    let rule = rule_repo::create_rule(&mut *tx, &name).await?;
    replace_groups(&mut tx, rule.id, &group_ids).await?;
    tx.commit().await?;

    assemble(pool, &rule).await
}

/// Full replacement of the rule's name and group set.
pub async fn update_rule(
    pool: &PgPool,
    id: Uuid,
    req: RuleRequest,
) -> Result<RuleResponse, ApiError> {
    let existing = rule_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("rule with ID '{id}' not found")))?;

    let name = require_name(req.name.as_deref(), "rule name")?;
    let group_ids = req.group_ids.unwrap_or_default();

    if rule_repo::name_exists(pool, &name, Some(existing.id)).await? {
        return Err(ApiError::Duplicate {
            field: "name",
            value: name,
        });
    }

    let mut tx = pool.begin().await?;
    let rule = rule_repo::update_rule(&mut *tx, existing.id, &name).await?;
    replace_groups(&mut tx, rule.id, &group_ids).await?;
    tx.commit().await?;

    assemble(pool, &rule).await
}

/// Merge semantics: the group set is replaced only when `group_ids` was
/// present in the request.
pub async fn partial_update_rule(
    pool: &PgPool,
    id: Uuid,
    req: RuleRequest,
) -> Result<RuleResponse, ApiError> {
    let existing = rule_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("rule with ID '{id}' not found")))?;

    let name = match req.name.as_deref() {
        Some(_) => require_name(req.name.as_deref(), "rule name")?,
        None => existing.name.clone(),
    };

    if rule_repo::name_exists(pool, &name, Some(existing.id)).await? {
        return Err(ApiError::Duplicate {
            field: "name",
            value: name,
        });
    }

    let mut tx = pool.begin().await?;
    let rule = rule_repo::update_rule(&mut *tx, existing.id, &name).await?;
    if let Some(group_ids) = &req.group_ids {
        replace_groups(&mut tx, rule.id, group_ids).await?;
    }
    tx.commit().await?;

    assemble(pool, &rule).await
}

/// Cascade delete: group links first, then the rule row, one transaction.
pub async fn delete_rule(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let existing = rule_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("rule with ID '{id}' not found")))?;

    let mut tx = pool.begin().await?;
    rule_repo::delete_rule_groups(&mut *tx, existing.id).await?;
    rule_repo::hard_delete_rule(&mut *tx, existing.id).await?;
    tx.commit().await?;

    Ok(())
}

pub async fn get_rule(pool: &PgPool, id: Uuid) -> Result<RuleResponse, ApiError> {
    let rule = rule_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("rule with ID '{id}' not found")))?;
    assemble(pool, &rule).await
}

pub async fn list_rules(
    pool: &PgPool,
    filter: &RuleFilterQuery,
    page: &PageQuery,
) -> Result<Paginated<RuleResponse>, ApiError> {
    page.validate()?;

    let rules =
        rule_repo::list_rules(pool, filter.name.as_deref(), page.limit, page.offset()).await?;
    let total = rule_repo::count_rules(pool, filter.name.as_deref()).await?;

    let mut items = Vec::with_capacity(rules.len());
    for rule in &rules {
        items.push(assemble(pool, rule).await?);
    }

    Ok(Paginated::new(items, page, total))
}

/// Build the read view; a group id whose target has been deleted since is
/// skipped rather than surfaced as an error.
pub(crate) async fn assemble(
    pool: &PgPool,
    rule: &AccessControlRule,
) -> Result<RuleResponse, ApiError> {
    let group_ids = rule_repo::get_group_ids_by_rule(pool, rule.id).await?;
    let mut groups = Vec::with_capacity(group_ids.len());
    for group_id in group_ids {
        match group_repo::find_live_by_id(pool, group_id).await? {
            Some(g) => groups.push(GroupInfo {
                id: g.id,
                name: g.name,
            }),
            None => {
                tracing::debug!(rule_id = %rule.id, %group_id, "skipping dangling group reference");
            }
        }
    }

    Ok(RuleResponse {
        id: rule.id,
        name: rule.name.clone(),
        groups,
    })
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Create/update payload for an access control rule. `group_ids: None` means
/// the field was omitted (defaults to empty on create/full update);
/// `Some(vec![])` means "no groups".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub group_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleFilterQuery {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResponse {
    pub id: Uuid,
    pub name: String,
    pub groups: Vec<GroupInfo>,
}

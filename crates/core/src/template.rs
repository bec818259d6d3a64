//! Card template visibility scopes and input validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::DbId;

pub const SCOPE_GLOBAL: &str = "global";
pub const SCOPE_TEAM: &str = "team";
pub const SCOPE_PRIVATE: &str = "private";

pub const VALID_SCOPES: &[&str] = &[SCOPE_GLOBAL, SCOPE_TEAM, SCOPE_PRIVATE];

/// Who can see and apply a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateScope {
    Global,
    Team,
    Private,
}

impl TemplateScope {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            SCOPE_GLOBAL => Ok(Self::Global),
            SCOPE_TEAM => Ok(Self::Team),
            SCOPE_PRIVATE => Ok(Self::Private),
            _ => Err(format!(
                "Invalid template scope '{s}'. Must be one of: {}",
                VALID_SCOPES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => SCOPE_GLOBAL,
            Self::Team => SCOPE_TEAM,
            Self::Private => SCOPE_PRIVATE,
        }
    }
}

/// Request to save an existing card's design as a new template.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveCardAsTemplate {
    pub card_id: DbId,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub scope: Option<TemplateScope>,
    pub team_id: Option<DbId>,
}

impl SaveCardAsTemplate {
    /// Field checks plus the rule that team templates name their team.
    pub fn check(&self) -> Result<TemplateScope, String> {
        self.validate().map_err(|e| e.to_string())?;
        let scope = self.scope.unwrap_or(TemplateScope::Private);
        if scope == TemplateScope::Team && self.team_id.is_none() {
            return Err("team_id is required for team-scoped templates".to_string());
        }
        Ok(scope)
    }
}

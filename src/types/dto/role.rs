use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// One role's menu replacement within a batch update
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RoleMenuUpdate {
    /// Role name to update
    pub role: String,

    /// Full replacement menu list for this role
    pub menus: Vec<String>,
}

/// Request model for the batch menu-access update
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateMenuAccessRequest {
    /// Per-role menu replacements, applied all-or-nothing
    pub roles: Vec<RoleMenuUpdate>,
}

/// Role as listed in the dashboard
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RoleView {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    /// Menu identifiers this role may see
    pub menus: Vec<String>,
    pub is_active: bool,
}

/// Response model for the role listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RoleListResponse {
    pub roles: Vec<RoleView>,
}

//! Permission catalog. Every permission is a string claim of type
//! [`PERMISSION_CLAIM`] shaped `Permissions.{Module}.{Action}`.

pub const PERMISSION_CLAIM: &str = "Permission";

pub const USERS: &str = "Users";
pub const PRISONS: &str = "Prisons";
pub const MANAGEMENTS: &str = "Managements";
pub const COURTS: &str = "Courts";

pub const MODULES: [&str; 4] = [USERS, PRISONS, MANAGEMENTS, COURTS];

/// Granted separately from the CRUD actions on users.
pub const MANAGE_PERMISSIONS: &str = "Permissions.Users.ManagePermissions";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "View",
            Action::Create => "Create",
            Action::Edit => "Edit",
            Action::Delete => "Delete",
        }
    }
}

pub fn permission(module: &str, action: Action) -> String {
    format!("Permissions.{module}.{}", action.as_str())
}

/// Every permission in the catalog, module by module.
pub fn all() -> Vec<String> {
    let mut out: Vec<String> = MODULES
        .iter()
        .flat_map(|m| Action::ALL.iter().map(move |a| permission(m, *a)))
        .collect();
    out.push(MANAGE_PERMISSIONS.to_string());
    out
}

pub fn is_known(name: &str) -> bool {
    all().iter().any(|p| p == name)
}

use serde::{Deserialize, Serialize};

/// Client record owned by exactly one signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub email: String,
}

impl Client {
    /// Name to greet the user with; blank names count as missing.
    pub fn display_name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }
}

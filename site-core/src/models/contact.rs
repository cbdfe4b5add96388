use serde::{Deserialize, Serialize};

/// Contact details collected on the budget form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
}

impl ContactInfo {
    /// Name and surname as shown on the confirmation summary.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.trim(), self.surname.trim())
    }
}

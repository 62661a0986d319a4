use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Public-facing application identity, echoed by the frontend footer/contact page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppInfo {
    pub name: String,
    pub contact_email: String,
    pub support_phone: String,
}

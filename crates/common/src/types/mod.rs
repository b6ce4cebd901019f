use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body rendered for every missing or forbidden resource.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NotFoundBody {
    pub error: String,
}

impl Default for NotFoundBody {
    fn default() -> Self {
        Self { error: "Not Found".into() }
    }
}

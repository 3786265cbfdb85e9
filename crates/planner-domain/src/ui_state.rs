use serde::{Deserialize, Serialize};

/// Server-side key holding the projects panel collapsed flag.
pub const PROJECTS_PANEL_COLLAPSED: &str = "projects_panel_collapsed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiStateValue {
    #[serde(default = "default_value")]
    pub value: String,
}

fn default_value() -> String {
    "0".to_string()
}

impl UiStateValue {
    pub fn from_flag(flag: bool) -> Self {
        Self {
            value: if flag { "1" } else { "0" }.to_string(),
        }
    }

    pub fn as_flag(&self) -> bool {
        self.value == "1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_encoding() {
        assert_eq!(UiStateValue::from_flag(true).value, "1");
        assert!(!UiStateValue::from_flag(false).as_flag());

        let missing: UiStateValue = serde_json::from_str("{}").unwrap();
        assert!(!missing.as_flag());
    }
}

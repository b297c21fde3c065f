//! Zone lockdown models.

use cis_core::response::ResponseEnvelope;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationError};

/// What a lockdown configuration matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockdownTarget {
    /// A single IP address
    Ip,
    /// A CIDR range
    IpRange,
    /// Value not known to this client
    #[serde(other)]
    Unknown,
}

fn known_target(target: &LockdownTarget) -> Result<(), ValidationError> {
    if *target == LockdownTarget::Unknown {
        return Err(ValidationError::new("unknown_target")
            .with_message("target must be `ip` or `ip_range`".into()));
    }
    Ok(())
}

/// A single allowed client: an address or a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LockdownInputConfigurationsItem {
    /// Match target
    #[validate(custom(function = "known_target"))]
    pub target: LockdownTarget,
    /// Address or CIDR range
    #[validate(length(min = 1, message = "configuration value must not be empty"))]
    pub value: String,
}

impl LockdownInputConfigurationsItem {
    /// Create a configuration item.
    #[must_use]
    pub fn new(target: LockdownTarget, value: impl Into<String>) -> Self {
        Self {
            target,
            value: value.into(),
        }
    }

    /// Allow a single IP address.
    #[must_use]
    pub fn ip(value: impl Into<String>) -> Self {
        Self::new(LockdownTarget::Ip, value)
    }

    /// Allow a CIDR range.
    #[must_use]
    pub fn ip_range(value: impl Into<String>) -> Self {
        Self::new(LockdownTarget::IpRange, value)
    }
}

/// Lockdown rule as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockdownObject {
    /// Identifier
    pub id: String,
    /// Evaluation priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// Whether the rule is paused
    #[serde(default)]
    pub paused: bool,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL patterns the rule protects
    #[serde(default)]
    pub urls: Vec<String>,
    /// Allowed clients, in order
    #[serde(default)]
    pub configurations: Vec<LockdownInputConfigurationsItem>,
}

/// Identifier of a deleted lockdown rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteLockdownRespResult {
    /// Identifier
    pub id: String,
}

/// Single lockdown rule.
pub type LockdownResp = ResponseEnvelope<LockdownObject>;

/// Page of lockdown rules with `result_info`.
pub type ListLockdownResp = ResponseEnvelope<Vec<LockdownObject>>;

/// Result of a delete.
pub type DeleteLockdownResp = ResponseEnvelope<DeleteLockdownRespResult>;

/// Options for `list_all_zone_lockdown_rules`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAllZoneLockdownRulesOptions {
    /// Page number
    pub page: Option<i64>,
    /// Rules per page
    pub per_page: Option<i64>,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl ListAllZoneLockdownRulesOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number.
    #[must_use]
    pub const fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: i64) -> Self {
        self.per_page = Some(per_page);
        self
    }
}

/// Lockdown rule fields sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct LockdownSettings {
    /// Rule identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Pause the rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL patterns to protect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,
    /// Allowed clients
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub configurations: Option<Vec<LockdownInputConfigurationsItem>>,
    /// Evaluation priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

/// Options for `create_zone_lockdown_rule`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CreateZoneLockdownRuleOptions {
    /// Request body
    #[validate(nested)]
    pub settings: LockdownSettings,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl CreateZoneLockdownRuleOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for `update_lockdown_rule`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct UpdateLockdownRuleOptions {
    /// Lockdown rule identifier
    #[validate(length(min = 1, message = "lockdown_rule_identifier must not be empty"))]
    pub lockdown_rule_identifier: String,
    /// Request body
    #[validate(nested)]
    pub settings: LockdownSettings,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl UpdateLockdownRuleOptions {
    /// Create options for a lockdown rule.
    #[must_use]
    pub fn new(lockdown_rule_identifier: impl Into<String>) -> Self {
        Self {
            lockdown_rule_identifier: lockdown_rule_identifier.into(),
            ..Self::default()
        }
    }

    /// Set the lockdown rule identifier.
    #[must_use]
    pub fn with_lockdown_rule_identifier(mut self, id: impl Into<String>) -> Self {
        self.lockdown_rule_identifier = id.into();
        self
    }
}

/// Generates the body setters shared by create and update options.
macro_rules! impl_settings_setters {
    ($($options:ty),+) => {
        $(
            impl $options {
                /// Set the rule identifier sent in the body.
                #[must_use]
                pub fn with_id(mut self, id: impl Into<String>) -> Self {
                    self.settings.id = Some(id.into());
                    self
                }

                /// Pause or resume the rule.
                #[must_use]
                pub fn with_paused(mut self, paused: bool) -> Self {
                    self.settings.paused = Some(paused);
                    self
                }

                /// Set the description.
                #[must_use]
                pub fn with_description(mut self, description: impl Into<String>) -> Self {
                    self.settings.description = Some(description.into());
                    self
                }

                /// Set the protected URL patterns.
                #[must_use]
                pub fn with_urls(mut self, urls: Vec<String>) -> Self {
                    self.settings.urls = Some(urls);
                    self
                }

                /// Set the allowed clients.
                #[must_use]
                pub fn with_configurations(
                    mut self,
                    configurations: Vec<LockdownInputConfigurationsItem>,
                ) -> Self {
                    self.settings.configurations = Some(configurations);
                    self
                }

                /// Set the priority.
                #[must_use]
                pub fn with_priority(mut self, priority: i64) -> Self {
                    self.settings.priority = Some(priority);
                    self
                }
            }
        )+
    };
}

impl_settings_setters!(CreateZoneLockdownRuleOptions, UpdateLockdownRuleOptions);

/// Options for `delete_zone_lockdown_rule`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct DeleteZoneLockdownRuleOptions {
    /// Lockdown rule identifier
    #[validate(length(min = 1, message = "lockdown_rule_identifier must not be empty"))]
    pub lockdown_rule_identifier: String,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl DeleteZoneLockdownRuleOptions {
    /// Create options for a lockdown rule.
    #[must_use]
    pub fn new(lockdown_rule_identifier: impl Into<String>) -> Self {
        Self {
            lockdown_rule_identifier: lockdown_rule_identifier.into(),
            headers: HashMap::new(),
        }
    }

    /// Set the lockdown rule identifier.
    #[must_use]
    pub fn with_lockdown_rule_identifier(mut self, id: impl Into<String>) -> Self {
        self.lockdown_rule_identifier = id.into();
        self
    }
}

/// Options for `get_lockdown`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct GetLockdownOptions {
    /// Lockdown rule identifier
    #[validate(length(min = 1, message = "lockdown_rule_identifier must not be empty"))]
    pub lockdown_rule_identifier: String,
    /// Custom request headers
    pub headers: HashMap<String, String>,
}

impl GetLockdownOptions {
    /// Create options for a lockdown rule.
    #[must_use]
    pub fn new(lockdown_rule_identifier: impl Into<String>) -> Self {
        Self {
            lockdown_rule_identifier: lockdown_rule_identifier.into(),
            headers: HashMap::new(),
        }
    }

    /// Set the lockdown rule identifier.
    #[must_use]
    pub fn with_lockdown_rule_identifier(mut self, id: impl Into<String>) -> Self {
        self.lockdown_rule_identifier = id.into();
        self
    }
}

cis_core::impl_custom_headers!(
    ListAllZoneLockdownRulesOptions,
    CreateZoneLockdownRuleOptions,
    UpdateLockdownRuleOptions,
    DeleteZoneLockdownRuleOptions,
    GetLockdownOptions,
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RULE_ID: &str = "372e67954025e0ba6aaa6d586b9e0b59";
    const DESCRIPTION: &str = "Restrict access to these endpoints to requests from a known IP address";

    #[test]
    fn create_options_setters() {
        let item = LockdownInputConfigurationsItem::ip("198.51.100.4");
        let options = CreateZoneLockdownRuleOptions::new()
            .with_id(RULE_ID)
            .with_paused(false)
            .with_description(DESCRIPTION)
            .with_urls(vec!["api.mysite.com/some/endpoint*".to_string()])
            .with_configurations(vec![item.clone()])
            .with_priority(5)
            .with_header("foo", "bar");

        let settings = &options.settings;
        assert_eq!(settings.id.as_deref(), Some(RULE_ID));
        assert_eq!(settings.paused, Some(false));
        assert_eq!(settings.description.as_deref(), Some(DESCRIPTION));
        assert_eq!(
            settings.urls,
            Some(vec!["api.mysite.com/some/endpoint*".to_string()])
        );
        assert_eq!(settings.configurations, Some(vec![item]));
        assert_eq!(settings.priority, Some(5));
        assert_eq!(options.headers["foo"], "bar");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn identifier_options_setters() {
        let update = UpdateLockdownRuleOptions::new("first")
            .with_lockdown_rule_identifier("testString")
            .with_priority(5);
        assert_eq!(update.lockdown_rule_identifier, "testString");
        assert_eq!(update.settings.priority, Some(5));

        let get = GetLockdownOptions::new("first").with_lockdown_rule_identifier("testString");
        assert_eq!(get.lockdown_rule_identifier, "testString");

        let delete = DeleteZoneLockdownRuleOptions::new("first")
            .with_lockdown_rule_identifier("testString")
            .with_header("foo", "bar");
        assert_eq!(delete.lockdown_rule_identifier, "testString");
        assert_eq!(delete.headers["foo"], "bar");

        let list = ListAllZoneLockdownRulesOptions::new()
            .with_page(38)
            .with_per_page(5);
        assert_eq!((list.page, list.per_page), (Some(38), Some(5)));
    }

    #[test]
    fn required_identifiers_are_validated() {
        assert!(UpdateLockdownRuleOptions::default().validate().is_err());
        assert!(GetLockdownOptions::default().validate().is_err());
        assert!(DeleteZoneLockdownRuleOptions::default().validate().is_err());
        assert!(CreateZoneLockdownRuleOptions::default().validate().is_ok());
    }

    #[test]
    fn each_configuration_item_is_validated() {
        assert!(LockdownInputConfigurationsItem::ip_range("2.2.2.0/24")
            .validate()
            .is_ok());
        assert!(LockdownInputConfigurationsItem::ip("").validate().is_err());
        assert!(
            LockdownInputConfigurationsItem::new(LockdownTarget::Unknown, "198.51.100.4")
                .validate()
                .is_err()
        );

        let options = UpdateLockdownRuleOptions::new("testString").with_configurations(vec![
            LockdownInputConfigurationsItem::ip("198.51.100.4"),
            LockdownInputConfigurationsItem::ip_range(""),
        ]);
        assert!(options.validate().is_err());
    }

    #[test]
    fn settings_serialize_only_set_fields() {
        let options = CreateZoneLockdownRuleOptions::new()
            .with_urls(vec!["api.mysite.com/some/endpoint*".to_string()])
            .with_configurations(vec![LockdownInputConfigurationsItem::ip_range("2.2.2.0/24")])
            .with_paused(true);
        assert_eq!(
            serde_json::to_value(&options.settings).unwrap(),
            json!({
                "paused": true,
                "urls": ["api.mysite.com/some/endpoint*"],
                "configurations": [{"target": "ip_range", "value": "2.2.2.0/24"}]
            })
        );
    }

    #[test]
    fn unknown_target_still_decodes() {
        let item: LockdownInputConfigurationsItem =
            serde_json::from_value(json!({"target": "country", "value": "US"})).unwrap();
        assert_eq!(item.target, LockdownTarget::Unknown);
    }
}

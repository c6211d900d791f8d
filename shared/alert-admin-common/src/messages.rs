//! User-facing message keys and their default English texts
//!
//! Keys are stable identifiers shared with the UI's resource bundle. Texts may
//! carry positional placeholders (`{0}`, `{1}`) filled from [`Message::args`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageKey {
    // Field validation
    #[serde(rename = "requiredField")]
    RequiredField,
    #[serde(rename = "invalidBExQuery")]
    InvalidBExQuery,
    #[serde(rename = "orderOnCTZero")]
    OrderOnCtZero,
    #[serde(rename = "orderExceedsMax")]
    OrderExceedsMax,
    #[serde(rename = "emailToOrOrgrequiredField")]
    EmailToOrOrgRequired,

    // Order conflicts and remote checks
    #[serde(rename = "orderReservedConfirm")]
    OrderReservedConfirm,
    #[serde(rename = "validateOrderFail")]
    ValidateOrderFail,
    #[serde(rename = "validateBExFail")]
    ValidateBExFail,

    // Save, create, delete
    #[serde(rename = "detailValidationFail")]
    DetailValidationFail,
    #[serde(rename = "detailUpdateSuccess")]
    DetailUpdateSuccess,
    #[serde(rename = "detailUpdateFail")]
    DetailUpdateFail,
    #[serde(rename = "masterCreateAlertSuccess")]
    MasterCreateAlertSuccess,
    #[serde(rename = "masterCreateAlertFail")]
    MasterCreateAlertFail,
    #[serde(rename = "confirmCancelEdit")]
    ConfirmCancelEdit,
    #[serde(rename = "confirmDelete")]
    ConfirmDelete,
    #[serde(rename = "deleteSuccess")]
    DeleteSuccess,
    #[serde(rename = "deleteFail")]
    DeleteFail,

    // Onboarding guide
    #[serde(rename = "guideTitle")]
    GuideTitle,
    #[serde(rename = "guideMessage")]
    GuideMessage,
    #[serde(rename = "guideDetails")]
    GuideDetails,

    // Master list
    #[serde(rename = "masterTitleCount")]
    MasterTitleCount,
    #[serde(rename = "masterListNoDataText")]
    MasterListNoDataText,
    #[serde(rename = "masterListNoDataWithFilterOrSearchText")]
    MasterListNoDataWithFilterOrSearchText,
    #[serde(rename = "masterFilterBarText")]
    MasterFilterBarText,
    #[serde(rename = "masterGroupCatHeaderInv")]
    MasterGroupCatHeaderInv,
    #[serde(rename = "masterGroupCatHeaderLog")]
    MasterGroupCatHeaderLog,
    #[serde(rename = "masterGroupCatHeaderProc")]
    MasterGroupCatHeaderProc,
    #[serde(rename = "masterGroupLevelHeaderC")]
    MasterGroupLevelHeaderC,
    #[serde(rename = "masterGroupLevelHeaderW")]
    MasterGroupLevelHeaderW,
    #[serde(rename = "masterGroupLevelHeaderN")]
    MasterGroupLevelHeaderN,
}

impl MessageKey {
    /// Resource bundle key
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::RequiredField => "requiredField",
            MessageKey::InvalidBExQuery => "invalidBExQuery",
            MessageKey::OrderOnCtZero => "orderOnCTZero",
            MessageKey::OrderExceedsMax => "orderExceedsMax",
            MessageKey::EmailToOrOrgRequired => "emailToOrOrgrequiredField",
            MessageKey::OrderReservedConfirm => "orderReservedConfirm",
            MessageKey::ValidateOrderFail => "validateOrderFail",
            MessageKey::ValidateBExFail => "validateBExFail",
            MessageKey::DetailValidationFail => "detailValidationFail",
            MessageKey::DetailUpdateSuccess => "detailUpdateSuccess",
            MessageKey::DetailUpdateFail => "detailUpdateFail",
            MessageKey::MasterCreateAlertSuccess => "masterCreateAlertSuccess",
            MessageKey::MasterCreateAlertFail => "masterCreateAlertFail",
            MessageKey::ConfirmCancelEdit => "confirmCancelEdit",
            MessageKey::ConfirmDelete => "confirmDelete",
            MessageKey::DeleteSuccess => "deleteSuccess",
            MessageKey::DeleteFail => "deleteFail",
            MessageKey::GuideTitle => "guideTitle",
            MessageKey::GuideMessage => "guideMessage",
            MessageKey::GuideDetails => "guideDetails",
            MessageKey::MasterTitleCount => "masterTitleCount",
            MessageKey::MasterListNoDataText => "masterListNoDataText",
            MessageKey::MasterListNoDataWithFilterOrSearchText => {
                "masterListNoDataWithFilterOrSearchText"
            }
            MessageKey::MasterFilterBarText => "masterFilterBarText",
            MessageKey::MasterGroupCatHeaderInv => "masterGroupCatHeaderInv",
            MessageKey::MasterGroupCatHeaderLog => "masterGroupCatHeaderLog",
            MessageKey::MasterGroupCatHeaderProc => "masterGroupCatHeaderProc",
            MessageKey::MasterGroupLevelHeaderC => "masterGroupLevelHeaderC",
            MessageKey::MasterGroupLevelHeaderW => "masterGroupLevelHeaderW",
            MessageKey::MasterGroupLevelHeaderN => "masterGroupLevelHeaderN",
        }
    }

    /// Default English text
    pub fn default_text(&self) -> &'static str {
        match self {
            MessageKey::RequiredField => "This field is required",
            MessageKey::InvalidBExQuery => "The technical name is not a valid BEx query",
            MessageKey::OrderOnCtZero => "Order on control tower must be a positive number",
            MessageKey::OrderExceedsMax => {
                "The order exceeds the maximum number of alerts displayed on this page"
            }
            MessageKey::EmailToOrOrgRequired => {
                "Enter a valid e-mail address or an organization code (#123456)"
            }
            MessageKey::OrderReservedConfirm => {
                "This order is already reserved for alert {0}. Do you want to take it over?"
            }
            MessageKey::ValidateOrderFail => "Failed to validate the alert order",
            MessageKey::ValidateBExFail => "Failed to validate BEx query {0}",
            MessageKey::DetailValidationFail => "Please correct the highlighted fields",
            MessageKey::DetailUpdateSuccess => "Alert updated successfully",
            MessageKey::DetailUpdateFail => "Failed to update the alert",
            MessageKey::MasterCreateAlertSuccess => "Alert created successfully",
            MessageKey::MasterCreateAlertFail => "Failed to create the alert",
            MessageKey::ConfirmCancelEdit => "Discard your changes?",
            MessageKey::ConfirmDelete => "Are you sure you want to delete this alert?",
            MessageKey::DeleteSuccess => "Alert deleted successfully",
            MessageKey::DeleteFail => "Failed to delete the alert",
            MessageKey::GuideTitle => "Welcome",
            MessageKey::GuideMessage => "This application maintains the control tower alerts.",
            MessageKey::GuideDetails => "The user guide is available at {0}",
            MessageKey::MasterTitleCount => "Alerts ({0})",
            MessageKey::MasterListNoDataText => "No alerts are currently available",
            MessageKey::MasterListNoDataWithFilterOrSearchText => "No matching alerts found",
            MessageKey::MasterFilterBarText => "Filtered by {0}",
            MessageKey::MasterGroupCatHeaderInv => "Inventory",
            MessageKey::MasterGroupCatHeaderLog => "Logistics",
            MessageKey::MasterGroupCatHeaderProc => "Process",
            MessageKey::MasterGroupLevelHeaderC => "Critical",
            MessageKey::MasterGroupLevelHeaderW => "Warning",
            MessageKey::MasterGroupLevelHeaderN => "Normal",
        }
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message key together with its placeholder arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub key: MessageKey,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Message {
    pub fn new(key: MessageKey) -> Self {
        Self {
            key,
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(key: MessageKey, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Render the default text with placeholders substituted
    pub fn text(&self) -> String {
        let mut text = self.key.default_text().to_string();
        for (i, arg) in self.args.iter().enumerate() {
            text = text.replace(&format!("{{{}}}", i), arg);
        }
        text
    }
}

impl From<MessageKey> for Message {
    fn from(key: MessageKey) -> Self {
        Self::new(key)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text())
    }
}

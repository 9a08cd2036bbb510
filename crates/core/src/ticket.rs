//! Ticket input and the intent label catalog

use serde::{Deserialize, Serialize};
use std::fmt;

/// A support ticket as submitted by the caller
///
/// Both fields are optional; a ticket with neither is classified as `unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Ticket {
    pub fn new(subject: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            description: Some(description.into()),
        }
    }

    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// True when both subject and description are missing or whitespace-only
    pub fn is_empty(&self) -> bool {
        self.subject().trim().is_empty() && self.description().trim().is_empty()
    }
}

/// Intent labels
///
/// The fixed catalog covers every intent the rule engine can score. Labels
/// reported by the external classifier that have no catalog entry pass
/// through as `Unmapped`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum IntentLabel {
    TechnicalSupport,
    BillingInquiry,
    AccountManagement,
    FeatureRequest,
    ComplaintIssue,
    InformationRequest,
    RefundRequest,
    CancellationRequest,
    OrderManagement,
    Escalation,
    GeneralInquiry,
    Feedback,
    SatisfactionPraise,
    Other,
    /// Empty ticket
    Unknown,
    /// Internal failure surfaced in-band
    ClassificationError,
    Unmapped(String),
}

impl IntentLabel {
    /// Catalog intents, in display order
    pub const CATALOG: [IntentLabel; 14] = [
        IntentLabel::TechnicalSupport,
        IntentLabel::BillingInquiry,
        IntentLabel::AccountManagement,
        IntentLabel::FeatureRequest,
        IntentLabel::ComplaintIssue,
        IntentLabel::InformationRequest,
        IntentLabel::RefundRequest,
        IntentLabel::CancellationRequest,
        IntentLabel::OrderManagement,
        IntentLabel::Escalation,
        IntentLabel::GeneralInquiry,
        IntentLabel::Feedback,
        IntentLabel::SatisfactionPraise,
        IntentLabel::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::TechnicalSupport => "technical_support",
            Self::BillingInquiry => "billing_inquiry",
            Self::AccountManagement => "account_management",
            Self::FeatureRequest => "feature_request",
            Self::ComplaintIssue => "complaint_issue",
            Self::InformationRequest => "information_request",
            Self::RefundRequest => "refund_request",
            Self::CancellationRequest => "cancellation_request",
            Self::OrderManagement => "order_management",
            Self::Escalation => "escalation",
            Self::GeneralInquiry => "general_inquiry",
            Self::Feedback => "feedback",
            Self::SatisfactionPraise => "satisfaction_praise",
            Self::Other => "other",
            Self::Unknown => "unknown",
            Self::ClassificationError => "classification_error",
            Self::Unmapped(name) => name.as_str(),
        }
    }

    /// Parse a snake_case label; anything outside the catalog becomes `Unmapped`
    pub fn from_name(name: &str) -> Self {
        match name {
            "technical_support" => Self::TechnicalSupport,
            "billing_inquiry" => Self::BillingInquiry,
            "account_management" => Self::AccountManagement,
            "feature_request" => Self::FeatureRequest,
            "complaint_issue" => Self::ComplaintIssue,
            "information_request" => Self::InformationRequest,
            "refund_request" => Self::RefundRequest,
            "cancellation_request" => Self::CancellationRequest,
            "order_management" => Self::OrderManagement,
            "escalation" => Self::Escalation,
            "general_inquiry" => Self::GeneralInquiry,
            "feedback" => Self::Feedback,
            "satisfaction_praise" => Self::SatisfactionPraise,
            "other" => Self::Other,
            "unknown" => Self::Unknown,
            "classification_error" => Self::ClassificationError,
            other => Self::Unmapped(other.to_string()),
        }
    }

    pub fn is_catalog(&self) -> bool {
        !matches!(
            self,
            Self::Unknown | Self::ClassificationError | Self::Unmapped(_)
        )
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for IntentLabel {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<&str> for IntentLabel {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<IntentLabel> for String {
    fn from(label: IntentLabel) -> Self {
        label.as_str().to_string()
    }
}

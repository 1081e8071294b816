//! Targeting rule and campaign documents.
//!
//! Field names follow the stored documents (`campaign_id`, `rules`, ...).

use serde::{Deserialize, Deserializer, Serialize};

/// Include/exclude constraint of a campaign on one dimension.
///
/// A missing or `null` `include` or `exclude` field is read as an empty
/// list. Both lists may be non-empty on the same rule; the matcher evaluates
/// each.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rule {
    /// Dimension name (`app`, `country`, `os`).
    pub dimension: String,
    /// Allow-list of values.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub include: Vec<String>,
    /// Deny-list of values.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub exclude: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Rule {
    /// Creates a rule without constraints for the given dimension.
    pub fn unconstrained(dimension: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            ..Self::default()
        }
    }

    /// Creates an allow-list rule.
    pub fn include<I, S>(dimension: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dimension: dimension.into(),
            include: values.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    /// Creates a deny-list rule.
    pub fn exclude<I, S>(dimension: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dimension: dimension.into(),
            include: Vec::new(),
            exclude: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if this rule constrains its dimension at all.
    pub fn is_constrained(&self) -> bool {
        !self.include.is_empty() || !self.exclude.is_empty()
    }
}

/// Targeting document: every rule of one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetingRule {
    /// Campaign the rules belong to.
    pub campaign_id: String,
    /// Rules in stored order.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl TargetingRule {
    /// Creates a targeting document.
    pub fn new(campaign_id: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            rules,
        }
    }

    /// Iterates over the rules stored for a dimension name.
    pub fn rules_for<'a>(&'a self, dimension: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.dimension == dimension)
    }
}

/// Delivery status of a campaign. Only `ACTIVE` campaigns are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Active,
    Inactive,
    /// Any other stored status.
    #[serde(other)]
    Unknown,
}

impl CampaignStatus {
    /// Returns the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Campaign document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_id: String,
    #[serde(default)]
    pub name: String,
    pub image: String,
    pub cta: String,
    pub status: CampaignStatus,
}

impl Campaign {
    /// Returns the part of the campaign that is delivered and cached.
    pub fn summary(&self) -> CampaignSummary {
        CampaignSummary {
            campaign_id: self.campaign_id.clone(),
            image: self.image.clone(),
            cta: self.cta.clone(),
        }
    }
}

/// Delivered view of a campaign, serialized as `{"cid", "img", "cta"}`.
///
/// This is both the HTTP payload and the cached representation.
///
/// # Example
///
/// ```
/// use delivery_core::CampaignSummary;
///
/// let summary = CampaignSummary::new("spotify", "https://img", "Download");
/// let json = serde_json::to_string(&summary).unwrap();
/// assert_eq!(json, r#"{"cid":"spotify","img":"https://img","cta":"Download"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSummary {
    #[serde(rename = "cid")]
    pub campaign_id: String,
    #[serde(rename = "img")]
    pub image: String,
    pub cta: String,
}

impl CampaignSummary {
    pub fn new(
        campaign_id: impl Into<String>,
        image: impl Into<String>,
        cta: impl Into<String>,
    ) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            image: image.into(),
            cta: cta.into(),
        }
    }
}

//! Rule predicate builder.
//!
//! A [`DimensionPredicate`] decides whether a targeting document matches one
//! dimension of a request. A document matches when any of these holds:
//!
//! 1. it has no rule for the dimension with a non-empty `include` or a
//!    non-empty `exclude` (the dimension is unconstrained);
//! 2. it has a rule for the dimension whose non-empty `include` contains the
//!    value;
//! 3. it has a rule for the dimension whose non-empty `exclude` does not
//!    contain the value.
//!
//! [`TargetingFilter`] is the conjunction of one predicate per dimension.
//! Store backends either evaluate these values directly or translate them
//! into their native query language; both must agree.

use serde::{Deserialize, Serialize};

use crate::model::{Campaign, TargetingRule};
use crate::types::{Dimension, NormalizedDimensions};

/// Builds the predicate for one dimension of a request.
///
/// The value is compared as given; callers normalize it first.
///
/// # Example
///
/// ```
/// use delivery_core::{Dimension, Rule, TargetingRule, build_predicate};
///
/// let doc = TargetingRule::new("spotify", vec![Rule::include("country", ["us", "in"])]);
///
/// assert!(build_predicate(Dimension::Country, "us").matches(&doc));
/// assert!(!build_predicate(Dimension::Country, "fr").matches(&doc));
/// assert!(build_predicate(Dimension::Os, "android").matches(&doc));
/// ```
pub fn build_predicate(dimension: Dimension, value: impl Into<String>) -> DimensionPredicate {
    DimensionPredicate {
        dimension,
        value: value.into(),
    }
}

/// Matching condition of a targeting document on one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionPredicate {
    dimension: Dimension,
    value: String,
}

impl DimensionPredicate {
    /// Returns the dimension this predicate constrains.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Returns the request value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Evaluates the predicate against a decoded document.
    pub fn matches(&self, doc: &TargetingRule) -> bool {
        self.is_unconstrained(doc) || self.allow_listed(doc) || self.not_deny_listed(doc)
    }

    fn is_unconstrained(&self, doc: &TargetingRule) -> bool {
        !doc.rules_for(self.dimension.as_str())
            .any(|rule| rule.is_constrained())
    }

    fn allow_listed(&self, doc: &TargetingRule) -> bool {
        doc.rules_for(self.dimension.as_str())
            .any(|rule| !rule.include.is_empty() && rule.include.contains(&self.value))
    }

    fn not_deny_listed(&self, doc: &TargetingRule) -> bool {
        doc.rules_for(self.dimension.as_str())
            .any(|rule| !rule.exclude.is_empty() && !rule.exclude.contains(&self.value))
    }
}

/// Conjunction of the app, country and os predicates of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetingFilter {
    predicates: Vec<DimensionPredicate>,
}

impl TargetingFilter {
    /// Builds the filter for a normalized request.
    pub fn for_dimensions(dimensions: &NormalizedDimensions) -> Self {
        Self {
            predicates: Dimension::ALL
                .iter()
                .map(|d| build_predicate(*d, dimensions.value(*d)))
                .collect(),
        }
    }

    /// Returns the per-dimension predicates, in app, country, os order.
    pub fn predicates(&self) -> &[DimensionPredicate] {
        &self.predicates
    }

    /// Returns true if the document matches every dimension.
    pub fn matches(&self, doc: &TargetingRule) -> bool {
        self.predicates.iter().all(|p| p.matches(doc))
    }
}

/// Selects active campaigns among a set of identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignFilter {
    campaign_ids: Vec<String>,
}

impl CampaignFilter {
    pub fn new(campaign_ids: Vec<String>) -> Self {
        Self { campaign_ids }
    }

    pub fn campaign_ids(&self) -> &[String] {
        &self.campaign_ids
    }

    /// Returns true if the campaign is one of the identifiers and is active.
    pub fn matches(&self, campaign: &Campaign) -> bool {
        campaign.status.is_active() && self.campaign_ids.contains(&campaign.campaign_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CampaignStatus, Rule};
    use crate::types::Dimensions;

    fn doc(rules: Vec<Rule>) -> TargetingRule {
        TargetingRule::new("campaign", rules)
    }

    #[test]
    fn test_no_rule_is_unconstrained() {
        let predicate = build_predicate(Dimension::App, "netflix");

        assert!(predicate.matches(&doc(vec![])));
        assert!(predicate.matches(&doc(vec![Rule::include("os", ["ios"])])));
    }

    #[test]
    fn test_empty_rule_is_unconstrained() {
        let predicate = build_predicate(Dimension::Os, "windows");

        assert!(predicate.matches(&doc(vec![Rule::unconstrained("os")])));
    }

    #[test]
    fn test_include_list() {
        let d = doc(vec![Rule::include("app", ["com.whatsapp", "com.duolingo"])]);

        assert!(build_predicate(Dimension::App, "com.whatsapp").matches(&d));
        assert!(!build_predicate(Dimension::App, "com.netflix").matches(&d));
    }

    #[test]
    fn test_exclude_list() {
        let d = doc(vec![Rule::exclude("country", ["us"])]);

        assert!(!build_predicate(Dimension::Country, "us").matches(&d));
        assert!(build_predicate(Dimension::Country, "brazil").matches(&d));
    }

    #[test]
    fn test_include_and_exclude_on_same_rule_are_both_evaluated() {
        let d = doc(vec![Rule {
            dimension: "os".into(),
            include: vec!["android".into()],
            exclude: vec!["ios".into()],
        }]);

        // include hit
        assert!(build_predicate(Dimension::Os, "android").matches(&d));
        // not excluded
        assert!(build_predicate(Dimension::Os, "web").matches(&d));
        // excluded and not included
        assert!(!build_predicate(Dimension::Os, "ios").matches(&d));
    }

    #[test]
    fn test_duplicate_rules_any_match_wins() {
        let d = doc(vec![
            Rule::include("country", ["in"]),
            Rule::include("country", ["us"]),
        ]);

        assert!(build_predicate(Dimension::Country, "us").matches(&d));
        assert!(build_predicate(Dimension::Country, "in").matches(&d));
        assert!(!build_predicate(Dimension::Country, "fr").matches(&d));
    }

    #[test]
    fn test_empty_rule_next_to_constrained_rule_does_not_unconstrain() {
        let d = doc(vec![
            Rule::unconstrained("country"),
            Rule::include("country", ["us"]),
        ]);

        assert!(!build_predicate(Dimension::Country, "fr").matches(&d));
    }

    #[test]
    fn test_filter_is_conjunction() {
        let d = doc(vec![
            Rule::include("app", ["duolingo"]),
            Rule::exclude("country", ["us"]),
            Rule::include("os", ["android", "ios"]),
        ]);

        let matching = TargetingFilter::for_dimensions(
            &Dimensions::new("duolingo", "in", "android").normalize(),
        );
        let wrong_country = TargetingFilter::for_dimensions(
            &Dimensions::new("duolingo", "us", "android").normalize(),
        );
        let wrong_os = TargetingFilter::for_dimensions(
            &Dimensions::new("duolingo", "in", "web").normalize(),
        );

        assert!(matching.matches(&d));
        assert!(!wrong_country.matches(&d));
        assert!(!wrong_os.matches(&d));
    }

    #[test]
    fn test_filter_predicate_order() {
        let filter =
            TargetingFilter::for_dimensions(&Dimensions::new("a", "b", "c").normalize());
        let dims: Vec<_> = filter.predicates().iter().map(|p| p.dimension()).collect();

        assert_eq!(dims, Dimension::ALL.to_vec());
    }

    #[test]
    fn test_campaign_filter_requires_active_status() {
        let filter = CampaignFilter::new(vec!["spotify".into(), "zepto".into()]);
        let mut campaign = Campaign {
            campaign_id: "spotify".into(),
            name: "Spotify".into(),
            image: "https://img".into(),
            cta: "Download".into(),
            status: CampaignStatus::Active,
        };

        assert!(filter.matches(&campaign));

        campaign.status = CampaignStatus::Inactive;
        assert!(!filter.matches(&campaign));

        campaign.status = CampaignStatus::Active;
        campaign.campaign_id = "netflix".into();
        assert!(!filter.matches(&campaign));
    }
}

#![allow(dead_code)]
use delivery_core::{Rule, TargetingRule};

/// Builds a targeting document with one rule per (dimension, include, exclude).
pub fn targeting(campaign_id: &str, rules: &[(&str, &[&str], &[&str])]) -> TargetingRule {
    TargetingRule::new(
        campaign_id,
        rules
            .iter()
            .map(|(dimension, include, exclude)| Rule {
                dimension: dimension.to_string(),
                include: include.iter().map(|s| s.to_string()).collect(),
                exclude: exclude.iter().map(|s| s.to_string()).collect(),
            })
            .collect(),
    )
}

/// Targeting documents shared by the matcher tests.
pub fn fixture_rules() -> Vec<TargetingRule> {
    vec![
        targeting(
            "spotify",
            &[
                ("app", &["spotify"], &[]),
                ("country", &["us", "in"], &[]),
                ("os", &[], &[]),
            ],
        ),
        targeting(
            "duolingo",
            &[
                ("app", &[], &[]),
                ("country", &[], &["us"]),
                ("os", &["android", "ios"], &[]),
            ],
        ),
        targeting(
            "whatsapp",
            &[
                ("app", &["com.whatsapp"], &[]),
                ("country", &[], &[]),
                ("os", &["android"], &[]),
            ],
        ),
    ]
}

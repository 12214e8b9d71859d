//! User-flow analysis: how often reviews mention a journey such as paying a
//! bill or logging in, and how those reviews feel.

use crate::aggregation::{aggregate, share_where};
use crate::core::{Error, Priority, Result, ReviewRecord};
use serde::{Deserialize, Serialize};

/// A user journey recognised by keywords in review text (`[[flows]]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Business impact used for presentation order
    #[serde(default = "default_impact")]
    pub impact: Priority,
    pub keywords: Vec<String>,
}

fn default_impact() -> Priority {
    Priority::Medium
}

impl FlowDefinition {
    pub fn new(name: &str, description: &str, impact: Priority, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            impact,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Case-insensitive match of any keyword against the review text.
    pub fn mentioned_in(&self, record: &ReviewRecord) -> bool {
        let text = record.text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| !k.is_empty())
            .any(|k| text.contains(k.to_lowercase().as_str()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("flow name must not be empty".into()));
        }
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(Error::Validation(format!(
                "flow '{}' needs at least one keyword",
                self.name
            )));
        }
        Ok(())
    }
}

pub fn default_flows() -> Vec<FlowDefinition> {
    vec![
        FlowDefinition::new(
            "Bill Payment & Management",
            "View bills, make payments and manage payment methods",
            Priority::High,
            &["bill", "payment", "pay", "charge"],
        ),
        FlowDefinition::new(
            "Account Access & Authentication",
            "Login, password reset and secure access to the account",
            Priority::Critical,
            &["login", "sign in", "password", "access"],
        ),
        FlowDefinition::new(
            "Usage Monitoring",
            "Track data usage, minutes and plan limits",
            Priority::High,
            &["usage", "data", "limit", "balance"],
        ),
        FlowDefinition::new(
            "Plan & Service Management",
            "View plan details, make changes and add features",
            Priority::Medium,
            &["plan", "upgrade", "change", "feature"],
        ),
        FlowDefinition::new(
            "Customer Support Access",
            "Contact support, find help and resolve issues",
            Priority::High,
            &["support", "help", "contact", "chat"],
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowStats {
    pub name: String,
    pub description: String,
    pub impact: Priority,
    pub mentions: usize,
    /// Share of the subset that mentions the flow
    pub share_of_subset: u32,
    pub negative_rate: u32,
    /// One-decimal average over rated mentions; 0.0 without any
    pub average_rating: f64,
}

/// Mentions, negative rate and rating of every flow within `subset`.
pub fn analyze_flows(subset: &[&ReviewRecord], flows: &[FlowDefinition]) -> Vec<FlowStats> {
    flows
        .iter()
        .map(|flow| {
            let matching: Vec<&ReviewRecord> = subset
                .iter()
                .copied()
                .filter(|r| flow.mentioned_in(r))
                .collect();
            let stats = aggregate(&matching);
            FlowStats {
                name: flow.name.clone(),
                description: flow.description.clone(),
                impact: flow.impact,
                mentions: stats.count,
                share_of_subset: share_where(subset, |r| flow.mentioned_in(r)),
                negative_rate: stats.negative_rate,
                average_rating: stats.display_rating(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sentiment;

    #[test]
    fn flows_match_text_case_insensitively() {
        let records = [
            ReviewRecord::new("1", "Rogers", "iOS")
                .with_text("Can't PAY my bill")
                .with_sentiment(Sentiment::Negative)
                .with_rating(1),
            ReviewRecord::new("2", "Rogers", "iOS")
                .with_text("Login works great")
                .with_sentiment(Sentiment::Positive)
                .with_rating(5),
            ReviewRecord::new("3", "Bell", "iOS")
                .with_text("Billing page is fine")
                .with_sentiment(Sentiment::Neutral)
                .with_rating(4),
        ];
        let subset: Vec<&ReviewRecord> = records.iter().collect();
        let stats = analyze_flows(&subset, &default_flows());

        let billing = &stats[0];
        assert_eq!(billing.mentions, 2);
        assert_eq!(billing.share_of_subset, 67);
        assert_eq!(billing.negative_rate, 50);
        assert_eq!(billing.average_rating, 2.5);

        let access = &stats[1];
        assert_eq!(access.mentions, 1);
        assert_eq!(access.impact, Priority::Critical);
    }

    #[test]
    fn empty_subset_reports_zero_mentions() {
        let stats = analyze_flows(&[], &default_flows());
        assert_eq!(stats.len(), 5);
        assert!(stats
            .iter()
            .all(|s| s.mentions == 0 && s.share_of_subset == 0 && s.negative_rate == 0));
    }

    #[test]
    fn flow_without_keywords_is_invalid() {
        let flow = FlowDefinition::new("Empty", "", Priority::Low, &[" "]);
        assert!(flow.validate().is_err());
        assert!(default_flows().iter().all(|f| f.validate().is_ok()));
    }
}

//! Behavior prediction from sentiment and risk
//!
//! Decision table, first match wins:
//!
//! | condition                              | behavior             |
//! |----------------------------------------|----------------------|
//! | risk is not NoConcern                  | Support-Seeking      |
//! | sentiment is Positive                  | Positive Contributor |
//! | sentiment is Neutral                   | Passive Observer     |
//! | sentiment is Negative, risk NoConcern  | Highly Engaged       |
//!
//! Negative sentiment without a risk keyword maps to Highly Engaged.

use socialpulse_core::{BehaviorLabel, RiskLabel, SentimentLabel};

/// Predict the behavior label for a sentiment/risk pair
pub fn predict_behavior(sentiment: SentimentLabel, risk: RiskLabel) -> BehaviorLabel {
    if risk != RiskLabel::NoConcern {
        return BehaviorLabel::SupportSeeking;
    }

    match sentiment {
        SentimentLabel::Positive => BehaviorLabel::PositiveContributor,
        SentimentLabel::Neutral => BehaviorLabel::PassiveObserver,
        SentimentLabel::Negative => BehaviorLabel::HighlyEngaged,
    }
}

pub mod quick_reply;

use serde::{ Deserialize, Serialize };
use std::collections::HashMap;
use std::fmt;
use log::debug;

use crate::config::links::PlatformLinks;
use crate::config::responses::ResponseCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    SignUp,
    LogIn,
    Deposit,
    Withdraw,
    Investment,
    Wallet,
    Referral,
    Profile,
    Navigation,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::SignUp => "sign_up",
            Topic::LogIn => "log_in",
            Topic::Deposit => "deposit",
            Topic::Withdraw => "withdraw",
            Topic::Investment => "investment",
            Topic::Wallet => "wallet",
            Topic::Referral => "referral",
            Topic::Profile => "profile",
            Topic::Navigation => "navigation",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TopicRule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
}

impl TopicRule {
    /// `normalized` must already be lowercase.
    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|keyword| normalized.contains(keyword))
    }
}

/// Rules in priority order. Earlier entries win over later ones.
pub const TOPIC_RULES: [TopicRule; 9] = [
    TopicRule { topic: Topic::SignUp, keywords: &["sign up", "register", "create account"] },
    TopicRule { topic: Topic::LogIn, keywords: &["log in", "login", "sign in"] },
    TopicRule { topic: Topic::Deposit, keywords: &["deposit", "add money", "fund"] },
    TopicRule { topic: Topic::Withdraw, keywords: &["withdraw", "take money", "cash out"] },
    TopicRule { topic: Topic::Investment, keywords: &["invest", "investment", "plan", "tier"] },
    TopicRule { topic: Topic::Wallet, keywords: &["wallet", "balance", "transaction"] },
    TopicRule { topic: Topic::Referral, keywords: &["refer", "referral", "friend", "earn"] },
    TopicRule { topic: Topic::Profile, keywords: &["profile", "account", "settings"] },
    TopicRule {
        topic: Topic::Navigation,
        keywords: &["navigate", "find", "where is", "page", "menu"],
    },
];

pub fn classify(utterance: &str) -> Option<Topic> {
    let normalized = utterance.to_lowercase();
    TOPIC_RULES.iter()
        .find(|rule| rule.matches(&normalized))
        .map(|rule| rule.topic)
}

pub fn classify_and_respond(utterance: &str, links: &PlatformLinks) -> String {
    let catalog = ResponseCatalog::default();
    match classify(utterance) {
        Some(topic) => catalog.render(topic, links),
        None => catalog.fallback().to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct IntentDispatcher {
    links: PlatformLinks,
    responses: HashMap<Topic, String>,
    fallback: String,
    greeting: String,
}

impl IntentDispatcher {
    pub fn new(links: PlatformLinks, catalog: &ResponseCatalog) -> Self {
        let responses = TOPIC_RULES.iter()
            .map(|rule| (rule.topic, catalog.render(rule.topic, &links)))
            .collect();
        Self {
            links,
            responses,
            fallback: catalog.fallback().to_string(),
            greeting: catalog.greeting().to_string(),
        }
    }

    pub fn links(&self) -> &PlatformLinks {
        &self.links
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn respond_to(&self, topic: Option<Topic>) -> &str {
        topic
            .and_then(|t| self.responses.get(&t))
            .map(|s| s.as_str())
            .unwrap_or(&self.fallback)
    }

    pub fn dispatch(&self, utterance: &str) -> (Option<Topic>, &str) {
        let topic = classify(utterance);
        match topic {
            Some(t) => debug!("Utterance classified as '{}'", t),
            None => debug!("No topic matched, using fallback"),
        }
        (topic, self.respond_to(topic))
    }

    pub fn classify_and_respond(&self, utterance: &str) -> String {
        self.dispatch(utterance).1.to_string()
    }
}

impl Default for IntentDispatcher {
    fn default() -> Self {
        Self::new(PlatformLinks::default(), &ResponseCatalog::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_fixed() {
        let order: Vec<Topic> = TOPIC_RULES.iter().map(|r| r.topic).collect();
        assert_eq!(order, vec![
            Topic::SignUp,
            Topic::LogIn,
            Topic::Deposit,
            Topic::Withdraw,
            Topic::Investment,
            Topic::Wallet,
            Topic::Referral,
            Topic::Profile,
            Topic::Navigation
        ]);
    }

    #[test]
    fn earlier_topic_wins_on_overlap() {
        assert_eq!(classify("I want to check my tier deposit"), Some(Topic::Deposit));
        assert_eq!(classify("create account"), Some(Topic::SignUp));
        assert_eq!(classify("my account settings"), Some(Topic::Profile));
        assert_eq!(classify("withdraw my referral earnings"), Some(Topic::Withdraw));
        assert_eq!(classify("which page shows my wallet"), Some(Topic::Wallet));
        assert_eq!(classify("sign in to fund my wallet"), Some(Topic::LogIn));
    }

    #[test]
    fn keywords_match_as_substrings() {
        // "earn" inside "learn", "plan" inside "planet"
        assert_eq!(classify("I'd like to learn more"), Some(Topic::Referral));
        assert_eq!(classify("hello planet"), Some(Topic::Investment));
        assert_eq!(classify("refund please"), Some(Topic::Deposit));
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(classify("DEPOSIT now"), classify("deposit now"));
        assert_eq!(classify("Where Is the FAQ?"), Some(Topic::Navigation));
    }

    #[test]
    fn unmatched_and_empty_fall_through() {
        assert_eq!(classify("what's the weather today"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
    }

    #[test]
    fn dispatcher_matches_free_function() {
        let dispatcher = IntentDispatcher::default();
        let links = PlatformLinks::default();
        for utterance in ["how do I register", "cash out", "hmm", "Referral Program"] {
            assert_eq!(
                dispatcher.classify_and_respond(utterance),
                classify_and_respond(utterance, &links)
            );
        }
    }
}

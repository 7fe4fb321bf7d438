use super::Topic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    /// Send the label as the utterance.
    Ask(Topic),
    /// Show the main quick-reply set again without sending anything.
    MainMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickReply {
    pub label: &'static str,
    pub action: QuickAction,
}

// Each Ask label must classify to its own topic, so no label may contain a
// keyword of an earlier rule.
pub const DEPOSIT_PROCESS: QuickReply = QuickReply {
    label: "Deposit Process",
    action: QuickAction::Ask(Topic::Deposit),
};
pub const WITHDRAWAL_PROCESS: QuickReply = QuickReply {
    label: "Withdrawal Process",
    action: QuickAction::Ask(Topic::Withdraw),
};
pub const INVESTMENT_PLANS: QuickReply = QuickReply {
    label: "Investment Plans",
    action: QuickAction::Ask(Topic::Investment),
};
pub const WALLET_MANAGEMENT: QuickReply = QuickReply {
    label: "Wallet Management",
    action: QuickAction::Ask(Topic::Wallet),
};
pub const REFERRAL_PROGRAM: QuickReply = QuickReply {
    label: "Referral Program",
    action: QuickAction::Ask(Topic::Referral),
};
pub const NAVIGATION_MENU: QuickReply = QuickReply {
    label: "Navigation Menu",
    action: QuickAction::Ask(Topic::Navigation),
};
pub const MAIN_MENU: QuickReply = QuickReply {
    label: "Main Menu",
    action: QuickAction::MainMenu,
};

pub const QUICK_REPLIES: [QuickReply; 6] = [
    DEPOSIT_PROCESS,
    WITHDRAWAL_PROCESS,
    INVESTMENT_PLANS,
    WALLET_MANAGEMENT,
    REFERRAL_PROGRAM,
    NAVIGATION_MENU,
];

const FALLBACK_FOLLOW_UPS: [QuickReply; 7] = [
    DEPOSIT_PROCESS,
    WITHDRAWAL_PROCESS,
    INVESTMENT_PLANS,
    WALLET_MANAGEMENT,
    REFERRAL_PROGRAM,
    NAVIGATION_MENU,
    MAIN_MENU,
];

/// Buttons shown under a reply for `topic`; `None` is the fallback reply.
pub fn follow_ups(topic: Option<Topic>) -> &'static [QuickReply] {
    match topic {
        Some(Topic::SignUp) => &[DEPOSIT_PROCESS, INVESTMENT_PLANS, MAIN_MENU],
        Some(Topic::LogIn) => &[WALLET_MANAGEMENT, INVESTMENT_PLANS, MAIN_MENU],
        Some(Topic::Deposit) => &[WITHDRAWAL_PROCESS, WALLET_MANAGEMENT, MAIN_MENU],
        Some(Topic::Withdraw) => &[DEPOSIT_PROCESS, WALLET_MANAGEMENT, MAIN_MENU],
        Some(Topic::Investment) => &[DEPOSIT_PROCESS, REFERRAL_PROGRAM, MAIN_MENU],
        Some(Topic::Wallet) => &[DEPOSIT_PROCESS, WITHDRAWAL_PROCESS, MAIN_MENU],
        Some(Topic::Referral) => &[INVESTMENT_PLANS, NAVIGATION_MENU, MAIN_MENU],
        Some(Topic::Profile) => &[WALLET_MANAGEMENT, REFERRAL_PROGRAM, MAIN_MENU],
        Some(Topic::Navigation) => &[DEPOSIT_PROCESS, INVESTMENT_PLANS, MAIN_MENU],
        None => &FALLBACK_FOLLOW_UPS,
    }
}

pub fn labels(replies: &[QuickReply]) -> Vec<&'static str> {
    replies
        .iter()
        .map(|q| q.label)
        .collect()
}

pub fn find(label: &str) -> Option<&'static QuickReply> {
    FALLBACK_FOLLOW_UPS.iter().find(|q| q.label == label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{ classify, TOPIC_RULES };

    fn assert_resolves(quick: &QuickReply) {
        match quick.action {
            QuickAction::Ask(topic) => {
                assert_eq!(classify(quick.label), Some(topic), "label '{}'", quick.label);
            }
            QuickAction::MainMenu => {}
        }
    }

    #[test]
    fn every_label_resolves_to_its_topic() {
        for quick in QUICK_REPLIES {
            assert_resolves(&quick);
        }
    }

    #[test]
    fn follow_up_labels_resolve_and_end_with_main_menu() {
        let topics = TOPIC_RULES.iter().map(|r| Some(r.topic)).chain(std::iter::once(None));
        for topic in topics {
            let replies = follow_ups(topic);
            assert_eq!(replies.last(), Some(&MAIN_MENU), "topic {:?}", topic);
            for quick in replies {
                assert_resolves(quick);
                assert_eq!(find(quick.label), Some(quick), "label '{}' not findable", quick.label);
            }
        }
    }

    #[test]
    fn follow_ups_match_answered_topic() {
        assert_eq!(labels(follow_ups(Some(Topic::LogIn))), vec![
            "Wallet Management",
            "Investment Plans",
            "Main Menu"
        ]);
        assert_eq!(labels(follow_ups(Some(Topic::Profile))), vec![
            "Wallet Management",
            "Referral Program",
            "Main Menu"
        ]);
        assert_eq!(follow_ups(None).len(), QUICK_REPLIES.len() + 1);
    }

    #[test]
    fn navigation_help_would_miss() {
        // "navigation" does not contain "navigate"
        assert_eq!(classify("Navigation Help"), None);
    }

    #[test]
    fn unknown_label_is_not_found() {
        assert!(find("Deposit").is_none());
        assert_eq!(find("Main Menu").map(|q| q.action), Some(QuickAction::MainMenu));
    }
}

use capitalx_assistant::config::links::{ LinkConfig, Page, PlatformLinks };
use capitalx_assistant::config::responses::{ ResponseCatalog, DEFAULT_FALLBACK };
use capitalx_assistant::intent::quick_reply::{ follow_ups, QuickAction, QUICK_REPLIES };
use capitalx_assistant::intent::{ classify_and_respond, IntentDispatcher, Topic, TOPIC_RULES };

fn response_for(topic: Topic, links: &PlatformLinks) -> String {
    ResponseCatalog::default().render(topic, links)
}

#[test]
fn deposit_outranks_tier() {
    let links = PlatformLinks::default();
    let reply = classify_and_respond("I want to check my tier deposit", &links);
    assert_eq!(reply, response_for(Topic::Deposit, &links));
    assert_ne!(reply, response_for(Topic::Investment, &links));
}

#[test]
fn weather_gets_exact_fallback() {
    let links = PlatformLinks::default();
    assert_eq!(classify_and_respond("what's the weather today", &links), DEFAULT_FALLBACK);
}

#[test]
fn fallback_mentions_every_topic_area() {
    for needle in [
        "Registration",
        "Login",
        "Deposit",
        "Withdrawal",
        "Investment",
        "Wallet",
        "Referral",
        "Profile",
        "navigation",
    ] {
        assert!(DEFAULT_FALLBACK.contains(needle), "fallback lacks '{}'", needle);
    }
}

#[test]
fn case_does_not_matter() {
    let links = PlatformLinks::default();
    assert_eq!(
        classify_and_respond("DEPOSIT now", &links),
        classify_and_respond("deposit now", &links)
    );
}

#[test]
fn repeated_calls_are_identical() {
    let links = PlatformLinks::default();
    for utterance in ["hi there", "Sign Up", "where is the FAQ", "my balance please", "x"] {
        let first = classify_and_respond(utterance, &links);
        for _ in 0..5 {
            assert_eq!(classify_and_respond(utterance, &links), first);
        }
    }
}

#[test]
fn each_keyword_reaches_its_topic_alone() {
    let dispatcher = IntentDispatcher::default();
    for rule in TOPIC_RULES {
        for keyword in rule.keywords {
            // earlier rules must not claim a bare keyword of a later rule
            let expected = TOPIC_RULES.iter()
                .find(|r| r.matches(keyword))
                .map(|r| r.topic);
            assert_eq!(expected, Some(rule.topic), "keyword '{}'", keyword);
            assert_eq!(
                dispatcher.classify_and_respond(keyword),
                dispatcher.respond_to(Some(rule.topic))
            );
        }
    }
}

#[test]
fn quick_replies_resolve_to_intended_responses() {
    let links = PlatformLinks::default();
    let follow_up_sets = TOPIC_RULES.iter()
        .map(|rule| follow_ups(Some(rule.topic)))
        .chain(std::iter::once(follow_ups(None)));
    for quick in QUICK_REPLIES.iter().chain(follow_up_sets.flatten()) {
        if let QuickAction::Ask(topic) = quick.action {
            assert_eq!(
                classify_and_respond(quick.label, &links),
                response_for(topic, &links),
                "label '{}'",
                quick.label
            );
        }
    }
    assert!(
        classify_and_respond("Withdrawal Process", &links).contains("*Withdrawal Process*")
    );
    assert!(classify_and_respond("Referral Program", &links).contains("*Referral Program*"));
}

#[test]
fn responses_embed_configured_urls_exactly() {
    let config: LinkConfig = serde_json
        ::from_str(
            r#"{
                "base_url": "https://invest.example.org/en",
                "paths": { "wallet": "/account/wallet?tab=main", "faq": "help/faq" }
            }"#
        )
        .unwrap();
    let links = PlatformLinks::from_config(&config).unwrap();
    let catalog = ResponseCatalog::default();
    let dispatcher = IntentDispatcher::new(links.clone(), &catalog);

    assert_eq!(links.get(Page::Wallet), "https://invest.example.org/en/account/wallet?tab=main");
    assert_eq!(links.get(Page::Faq), "https://invest.example.org/en/help/faq");

    for rule in TOPIC_RULES {
        let rendered = dispatcher.respond_to(Some(rule.topic));
        let pages = catalog.referenced_pages(rule.topic);
        assert!(!pages.is_empty(), "topic {} links nowhere", rule.topic);
        for page in pages {
            assert!(
                rendered.contains(links.get(page)),
                "topic {} missing {} url",
                rule.topic,
                page
            );
        }
    }
}

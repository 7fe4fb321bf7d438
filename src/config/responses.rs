use serde::Deserialize;
use std::collections::HashMap;
use log::info;

use super::links::{ Page, PlatformLinks };
use super::{ read_json, ConfigError };
use crate::intent::{ Topic, TOPIC_RULES };

pub const DEFAULT_GREETING: &str =
    "👋 Hello! I'm your CapitalX Assistant. How can I help you today?";

pub const DEFAULT_FALLBACK: &str =
    "I'm your CapitalX Assistant, here to help you navigate our platform!

I can help you with:
• Registration and account setup
• Login process
• Deposit process
• Withdrawal process
• Investment plans
• Wallet management
• Referral program
• Profile management
• Platform navigation

What would you like to know? You can also use the buttons below for quick access to common topics.";

const SIGN_UP: &str =
    "📝 *How to Sign Up for CapitalX*

1️⃣ Visit the Registration Page
   • Go to: {register}
   • Or click \"Start for Free\" on the home page

2️⃣ Fill Out the Registration Form
   • Enter your full name
   • Provide a valid email address
   • Enter your phone number
   • Create a secure password

3️⃣ Verify Your Email
   • Check your email inbox for a verification message
   • Click the verification link in the email
   • If you don't see it, check your spam folder

4️⃣ Complete Your Profile
   • Log in to your new account
   • Add any additional profile information
   • Set up two-factor authentication (optional but recommended)

5️⃣ Get Your Bonus
   • As a new user, you'll receive an R50 bonus
   • This bonus can be used to try our investment plans
   • Bonus must be used within 7 days

🔗 Registration Link: {register}

Need help with any specific step in the registration process?";

const LOG_IN: &str =
    "🔐 *How to Log In to CapitalX*

1️⃣ Visit the Login Page
   • Go to: {login}
   • Or click \"Login\" in the navigation menu

2️⃣ Enter Your Credentials
   • Enter the email you used during registration
   • Enter your password

3️⃣ Two-Factor Authentication (if enabled)
   • If you've enabled 2FA, enter the code from your authenticator app
   • Or use a backup code if you've generated them

4️⃣ Access Your Dashboard
   • After successful login, you'll be redirected to your dashboard
   • From here you can access all platform features

🔗 Login Link: {login}

Forgot your password? Click \"Forgot Password\" on the login page to reset it.";

const DEPOSIT: &str =
    "💳 *Deposit Process*

To add funds to your CapitalX wallet:

1️⃣ Navigate to Wallet
   • Go to your dashboard
   • Click on \"Wallet\" in the navigation menu
   • Or visit: {wallet}

2️⃣ Initiate Deposit
   • Click the \"Deposit Funds\" button
   • Choose your preferred payment method:
     - Card (Credit/Debit)
     - EFT (Bank Transfer)
     - Voucher

3️⃣ Complete Transaction
   • Enter amount (minimum R50)
   • Follow the on-screen instructions
   • For EFT/voucher deposits, upload proof of payment

4️⃣ Confirmation
   • Your deposit will be processed within minutes
   • Funds will appear in your wallet balance";

const WITHDRAW: &str =
    "📤 *Withdrawal Process*

To withdraw your funds from CapitalX:

1️⃣ Access Wallet
   • Go to your dashboard
   • Click on \"Wallet\" in the navigation menu
   • Or visit: {wallet}

2️⃣ Request Withdrawal
   • Click the \"Withdraw Funds\" button
   • Enter withdrawal amount (minimum R50)
   • Provide your banking details

3️⃣ Processing
   • Withdrawal requests are processed within 1-3 business days
   • You'll receive a confirmation email when processed

4️⃣ Receive Funds
   • Funds will be transferred to your provided bank account
   • Processing times may vary by bank

Important: You must deposit at least 50% of your total earnings before withdrawing.";

const INVESTMENT: &str =
    "📈 *Investment Plans*

CapitalX offers a tiered investment system with 10 plans across 3 stages:

*Stage 1: Foundation Tier (R70 - R1,120)*
Perfect for beginners to get started with small investments.

*Stage 2: Growth Tier (R2,240 - R17,920)*
For intermediate investors looking to scale their investments.

*Stage 3: Premium Tier (R35,840 - R50,000)*
For advanced investors with significant capital.

Each plan offers:
• Guaranteed 100% return on investment
• Progressive duration (12 hours to 6 days)
• One investment per plan allowed
• Compound growth opportunities

To invest:
1. Ensure your wallet has sufficient funds
2. Go to Investment Plans page: {investment_plans}
3. Select a plan that matches your budget
4. Click \"Invest Now\" button
5. Confirm investment amount and expected returns";

const WALLET: &str =
    "💰 *Wallet Management*

Your CapitalX wallet is your financial hub for all transactions:

*Wallet Features:*
• Real-time balance tracking
• Transaction history with detailed records
• Pending deposits tracking
• Separate tracking of bonus and real balances

*Wallet Operations:*
• Deposit Funds: Add money to your account
• Withdraw Funds: Transfer earnings to your bank account
• View History: See all transactions
• Track Pending: Monitor deposit status

To access your wallet:
• Visit: {wallet}
• Or navigate from your dashboard

*Wallet Security:*
• All transactions are encrypted
• Two-factor authentication available
• Detailed transaction records
• 24/7 monitoring for suspicious activity";

const REFERRAL: &str =
    "👥 *Referral Program*

Earn extra income by inviting friends to CapitalX!

*How It Works:*
1. Go to your Referral page: {referral}
2. Copy your unique referral link
3. Share it with friends and family
4. Earn R10 for each friend who signs up and makes a deposit

*Referral Benefits:*
• R10 bonus for each successful referral
• No limit to how many people you can refer
• Track your referrals in real-time
• Bonus earnings are withdrawable

*Best Practices:*
• Share your link on social media
• Tell friends and family about CapitalX
• Encourage referrals to make their first deposit quickly
• Check your referral dashboard regularly for updates";

const PROFILE: &str =
    "👤 *How to Manage Your Profile*

1️⃣ Access Your Profile
   • Log in to your account
   • Click on your name or avatar in the top right
   • Select \"Profile\" from the dropdown menu
   • Or visit: {profile}

2️⃣ View Profile Information
   • See your personal details
   • Check your account status
   • View your investment level
   • See security settings

3️⃣ Edit Profile Details
   • Update your contact information
   • Change your password
   • Set up two-factor authentication
   • Update banking details for withdrawals

4️⃣ Security Settings
   • Enable two-factor authentication
   • Review login history
   • Set up backup codes
   • Update security questions

🔗 Profile Page: {profile}

Need help with a specific profile setting?";

const NAVIGATION: &str =
    "🧭 *Navigation Help*

Here are the key pages on the CapitalX platform and how to access them:

🌐 *Main Pages:*
• Home Page: {home}
• Registration: {register}
• Login: {login}
• Dashboard: {dashboard}

💼 *Account Pages:*
• Wallet: {wallet}
• Profile: {profile}
• Referral: {referral}

💰 *Financial Pages:*
• Deposit: {deposit}
• Withdraw: {withdraw}
• Investment Plans: {investment_plans}
• Tiers: {tiers}

❓ *Support Pages:*
• Support Center: {support}
• FAQ: {faq}
• Contact Us: {contact}";

fn builtin_template(topic: Topic) -> &'static str {
    match topic {
        Topic::SignUp => SIGN_UP,
        Topic::LogIn => LOG_IN,
        Topic::Deposit => DEPOSIT,
        Topic::Withdraw => WITHDRAW,
        Topic::Investment => INVESTMENT,
        Topic::Wallet => WALLET,
        Topic::Referral => REFERRAL,
        Topic::Profile => PROFILE,
        Topic::Navigation => NAVIGATION,
    }
}

/// Optional JSON overrides; anything left out keeps the built-in text.
#[derive(Deserialize, Debug, Default)]
pub struct ResponseOverrides {
    pub greeting: Option<String>,
    pub fallback: Option<String>,
    #[serde(default)]
    pub templates: HashMap<Topic, String>,
}

/// Templates reference page URLs as `{page}`, e.g. `{investment_plans}`.
#[derive(Debug, Clone)]
pub struct ResponseCatalog {
    greeting: String,
    fallback: String,
    templates: HashMap<Topic, String>,
}

impl Default for ResponseCatalog {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            fallback: DEFAULT_FALLBACK.to_string(),
            templates: TOPIC_RULES.iter()
                .map(|rule| (rule.topic, builtin_template(rule.topic).to_string()))
                .collect(),
        }
    }
}

impl ResponseCatalog {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        info!("Loading response overrides from: {}", path);
        let overrides: ResponseOverrides = read_json(path)?;
        Self::with_overrides(overrides)
    }

    pub fn with_overrides(overrides: ResponseOverrides) -> Result<Self, ConfigError> {
        let mut catalog = Self::default();
        if let Some(greeting) = overrides.greeting {
            catalog.greeting = greeting;
        }
        if let Some(fallback) = overrides.fallback {
            catalog.fallback = fallback;
        }
        for (topic, template) in overrides.templates {
            info!("Overriding response template for '{}'", topic);
            catalog.templates.insert(topic, template);
        }
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (topic, template) in &self.templates {
            for name in placeholders(template) {
                if name.parse::<Page>().is_err() {
                    return Err(ConfigError::UnknownPlaceholder {
                        template: topic.to_string(),
                        placeholder: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn template(&self, topic: Topic) -> &str {
        self.templates
            .get(&topic)
            .map(|t| t.as_str())
            .unwrap_or_else(|| builtin_template(topic))
    }

    /// Pages whose URL the topic's response contains once rendered.
    pub fn referenced_pages(&self, topic: Topic) -> Vec<Page> {
        let mut pages: Vec<Page> = placeholders(self.template(topic))
            .filter_map(|name| name.parse().ok())
            .collect();
        pages.sort();
        pages.dedup();
        pages
    }

    /// Fills `{page}` placeholders in one left-to-right pass; inserted URLs
    /// are never scanned again.
    pub fn render(&self, topic: Topic, links: &PlatformLinks) -> String {
        let template = self.template(topic);
        let mut rendered = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.split_once('}') {
                Some((name, tail)) if is_identifier(name) => {
                    match name.parse::<Page>() {
                        Ok(page) => rendered.push_str(links.get(page)),
                        Err(_) => {
                            rendered.push('{');
                            rendered.push_str(name);
                            rendered.push('}');
                        }
                    }
                    rest = tail;
                }
                _ => {
                    rendered.push('{');
                    rest = after;
                }
            }
        }
        rendered.push_str(rest);
        rendered
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    template
        .split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
        .filter(|name| is_identifier(name))
}

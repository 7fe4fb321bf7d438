use serde::{ Deserialize, Serialize };
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::Url;
use log::info;

use super::{ read_json, ConfigError };

pub const DEFAULT_BASE_URL: &str = "https://capitalx-rtn.onrender.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Register,
    Login,
    Dashboard,
    Wallet,
    Deposit,
    Withdraw,
    InvestmentPlans,
    Tiers,
    Referral,
    Profile,
    Support,
    Faq,
    Contact,
}

impl Page {
    pub const ALL: [Page; 14] = [
        Page::Home,
        Page::Register,
        Page::Login,
        Page::Dashboard,
        Page::Wallet,
        Page::Deposit,
        Page::Withdraw,
        Page::InvestmentPlans,
        Page::Tiers,
        Page::Referral,
        Page::Profile,
        Page::Support,
        Page::Faq,
        Page::Contact,
    ];

    /// Placeholder name used inside response templates, e.g. `{investment_plans}`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Register => "register",
            Page::Login => "login",
            Page::Dashboard => "dashboard",
            Page::Wallet => "wallet",
            Page::Deposit => "deposit",
            Page::Withdraw => "withdraw",
            Page::InvestmentPlans => "investment_plans",
            Page::Tiers => "tiers",
            Page::Referral => "referral",
            Page::Profile => "profile",
            Page::Support => "support",
            Page::Faq => "faq",
            Page::Contact => "contact",
        }
    }

    pub fn default_path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Register => "/register/",
            Page::Login => "/login/",
            Page::Dashboard => "/dashboard/",
            Page::Wallet => "/wallet/",
            Page::Deposit => "/deposit/",
            Page::Withdraw => "/withdraw/",
            Page::InvestmentPlans => "/investment-plans/",
            Page::Tiers => "/tiers/",
            Page::Referral => "/referral/",
            Page::Profile => "/profile/",
            Page::Support => "/support/",
            Page::Faq => "/faq/",
            Page::Contact => "/contact/",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParsePageError(String);

impl fmt::Display for ParsePageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown page name: '{}'", self.0)
    }
}

impl std::error::Error for ParsePageError {}

impl FromStr for Page {
    type Err = ParsePageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL.iter()
            .copied()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| ParsePageError(s.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub paths: BTreeMap<Page, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            paths: BTreeMap::new(),
        }
    }
}

impl LinkConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        info!("Loading link configuration from: {}", path);
        read_json(path)
    }

    pub fn path_for(&self, page: Page) -> &str {
        self.paths
            .get(&page)
            .map(|p| p.as_str())
            .unwrap_or_else(|| page.default_path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlatformLinks {
    urls: BTreeMap<Page, String>,
}

impl PlatformLinks {
    pub fn from_config(config: &LinkConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&config.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(config.base_url.clone()));
        }

        let urls = Page::ALL.iter()
            .map(|&page| (page, join_url(&config.base_url, config.path_for(page))))
            .collect();
        Ok(Self { urls })
    }

    pub fn get(&self, page: Page) -> &str {
        // from_config fills every page
        self.urls.get(&page).map(|u| u.as_str()).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (Page, &str)> {
        self.urls.iter().map(|(page, url)| (*page, url.as_str()))
    }
}

impl Default for PlatformLinks {
    fn default() -> Self {
        let urls = Page::ALL.iter()
            .map(|&page| (page, join_url(DEFAULT_BASE_URL, page.default_path())))
            .collect();
        Self { urls }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_production_urls() {
        let links = PlatformLinks::default();
        assert_eq!(links.get(Page::Home), "https://capitalx-rtn.onrender.com/");
        assert_eq!(links.get(Page::Register), "https://capitalx-rtn.onrender.com/register/");
        assert_eq!(
            links.get(Page::InvestmentPlans),
            "https://capitalx-rtn.onrender.com/investment-plans/"
        );
        assert_eq!(links.get(Page::Contact), "https://capitalx-rtn.onrender.com/contact/");
        assert_eq!(links, PlatformLinks::from_config(&LinkConfig::default()).unwrap());
    }

    #[test]
    fn partial_overrides_keep_default_paths() {
        let config: LinkConfig = serde_json
            ::from_str(
                r#"{ "base_url": "https://staging.example.com/", "paths": { "wallet": "/my-wallet" } }"#
            )
            .unwrap();
        let links = PlatformLinks::from_config(&config).unwrap();
        assert_eq!(links.get(Page::Wallet), "https://staging.example.com/my-wallet");
        assert_eq!(links.get(Page::Deposit), "https://staging.example.com/deposit/");
    }

    #[test]
    fn missing_base_url_falls_back_to_default() {
        let config: LinkConfig = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn rejects_relative_or_non_http_base() {
        let relative = LinkConfig { base_url: "capitalx/".into(), ..LinkConfig::default() };
        assert!(matches!(
            PlatformLinks::from_config(&relative),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));

        let ftp = LinkConfig { base_url: "ftp://capitalx.example".into(), ..LinkConfig::default() };
        assert!(matches!(PlatformLinks::from_config(&ftp), Err(ConfigError::UnsupportedScheme(_))));
    }

    #[test]
    fn page_names_round_trip_through_from_str() {
        for page in Page::ALL {
            assert_eq!(page.as_str().parse::<Page>(), Ok(page));
        }
        assert!("investmentPlans".parse::<Page>().is_err());
    }
}

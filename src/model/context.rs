//! Page context supplied by the surrounding service.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of site the audited page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SiteType {
    Ecommerce,
    Saas,
    Content,
    Government,
    Corporate,
    #[default]
    Other,
}

impl SiteType {
    #[must_use]
    pub const fn is_commerce(&self) -> bool {
        matches!(self, Self::Ecommerce)
    }
}

impl FromStr for SiteType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "ecommerce" | "e-commerce" | "shop" | "store" | "retail" => Self::Ecommerce,
            "saas" | "app" | "webapp" => Self::Saas,
            "content" | "blog" | "news" | "media" => Self::Content,
            "government" | "gov" | "public-sector" => Self::Government,
            "corporate" | "business" | "marketing" => Self::Corporate,
            _ => Self::Other,
        })
    }
}

/// Front-end technology detected on the page, used to pick code samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum TechStack {
    #[default]
    Html,
    React,
    Vue,
    Angular,
    Svelte,
    WordPress,
    Shopify,
}

impl TechStack {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::React => "React",
            Self::Vue => "Vue",
            Self::Angular => "Angular",
            Self::Svelte => "Svelte",
            Self::WordPress => "WordPress",
            Self::Shopify => "Shopify",
        }
    }

    /// Snippet language for code samples in this stack
    #[must_use]
    pub const fn snippet_language(&self) -> &'static str {
        match self {
            Self::React => "jsx",
            Self::Vue => "vue",
            Self::Svelte => "svelte",
            Self::Shopify => "liquid",
            Self::Html | Self::Angular | Self::WordPress => "html",
        }
    }
}

/// Context about the audited page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub site_type: SiteType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<TechStack>,
}

impl PageContext {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_site_type(mut self, site_type: SiteType) -> Self {
        self.site_type = site_type;
        self
    }

    #[must_use]
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    #[must_use]
    pub const fn with_tech_stack(mut self, stack: TechStack) -> Self {
        self.tech_stack = Some(stack);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_type_aliases() {
        assert_eq!("e-commerce".parse::<SiteType>().unwrap(), SiteType::Ecommerce);
        assert_eq!("Ecommerce".parse::<SiteType>().unwrap(), SiteType::Ecommerce);
        assert_eq!("portfolio".parse::<SiteType>().unwrap(), SiteType::Other);
        assert!(SiteType::Ecommerce.is_commerce());
        assert!(!SiteType::Saas.is_commerce());
    }

    #[test]
    fn test_context_deserializes_with_defaults() {
        let ctx: PageContext =
            serde_json::from_str(r#"{"url":"https://shop.test","siteType":"ecommerce"}"#).unwrap();
        assert_eq!(ctx.site_type, SiteType::Ecommerce);
        assert_eq!(ctx.tech_stack, None);
    }
}

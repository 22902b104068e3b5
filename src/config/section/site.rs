//! `[site]` section: site metadata and SEO defaults.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// `[site]` configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site name, used as the fallback document title.
    pub name: String,
    /// Absolute base URL (`https://example.com`), required for the sitemap.
    pub url: Option<String>,
    pub seo: SeoConfig,
}

/// `[site.seo]`: passed through untouched to the document assembler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    /// Default page title.
    pub title: Option<String>,
    /// Title template, `%s` is replaced with the page title (`"%s | My Site"`).
    pub title_template: Option<String>,
    pub description: Option<String>,
}

impl SiteSectionConfig {
    const URL: FieldPath = FieldPath::new("site.url");
    const TEMPLATE: FieldPath = FieldPath::new("site.seo.title_template");

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> Option<&str> {
        self.url.as_deref().map(|u| u.trim_end_matches('/'))
    }

    pub fn validate(&self, sitemap_enabled: bool, diag: &mut ConfigDiagnostics) {
        match self.url.as_deref() {
            Some(url) => {
                if let Err(e) = url::Url::parse(url) {
                    diag.error_with_hint(
                        Self::URL,
                        format!("invalid url `{url}`: {e}"),
                        "use an absolute URL such as \"https://example.com\"",
                    );
                }
            }
            None if sitemap_enabled => diag.error_with_hint(
                Self::URL,
                "required when sitemap generation is enabled",
                "set [site] url or disable [build.sitemap]",
            ),
            None => {}
        }

        if let Some(template) = &self.seo.title_template
            && !template.contains("%s")
        {
            diag.warn(Self::TEMPLATE, "contains no `%s`, every page gets the same title");
        }
    }
}

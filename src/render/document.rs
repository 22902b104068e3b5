//! HTML document assembly.

use anyhow::{Context, Result};
use std::fmt::Write;

use crate::config::SiteSectionConfig;
use crate::page::PageProps;
use crate::utils::html::{escape, escape_attr, script_json};

/// A full pre-rendered page.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    pub title: Option<String>,
    pub description: Option<&'a str>,
    /// Asset tags from [`asset_tags`](super::asset_tags).
    pub head: &'a str,
    /// Server-rendered markup placed inside `#root`.
    pub body: &'a str,
    /// Serialized into `window.__INITIAL_PROPS__` for hydration.
    pub props: &'a PageProps,
}

impl<'a> Document<'a> {
    /// Document for a page with the site's SEO defaults applied.
    pub fn new(
        site: &'a SiteSectionConfig,
        route_title: Option<&str>,
        head: &'a str,
        body: &'a str,
        props: &'a PageProps,
    ) -> Self {
        Self {
            title: page_title(site, route_title),
            description: site.seo.description.as_deref(),
            head,
            body,
            props,
        }
    }

    pub fn to_html(&self) -> Result<String> {
        let props = script_json(self.props).context("Failed to serialize page props")?;
        let mut html = String::with_capacity(self.body.len() + self.head.len() + props.len() + 512);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        if let Some(title) = &self.title {
            let _ = writeln!(html, "<title>{}</title>", escape(title));
        }
        if let Some(description) = self.description {
            let _ = writeln!(
                html,
                "<meta name=\"description\" content=\"{}\">",
                escape_attr(description)
            );
        }
        html.push_str(self.head);
        html.push_str("</head>\n<body>\n");
        let _ = writeln!(html, "<div id=\"root\">{}</div>", self.body);
        let _ = writeln!(html, "<script>window.__INITIAL_PROPS__ = {props};</script>");
        html.push_str("</body>\n</html>\n");

        Ok(html)
    }
}

/// Route title through `title_template`, else the SEO title, else the site name.
pub fn page_title(site: &SiteSectionConfig, route_title: Option<&str>) -> Option<String> {
    if let Some(title) = route_title {
        return Some(match &site.seo.title_template {
            Some(template) => template.replace("%s", title),
            None => title.to_owned(),
        });
    }

    site.seo
        .title
        .clone()
        .or_else(|| (!site.name.is_empty()).then(|| site.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeoConfig;
    use crate::route::Params;
    use serde_json::json;

    fn site() -> SiteSectionConfig {
        SiteSectionConfig {
            name: "Site".into(),
            url: None,
            seo: SeoConfig {
                title: Some("Default".into()),
                title_template: Some("%s | Site".into()),
                description: Some("About \"us\"".into()),
            },
        }
    }

    #[test]
    fn test_page_title() {
        let site = site();
        assert_eq!(page_title(&site, Some("Blog")).as_deref(), Some("Blog | Site"));
        assert_eq!(page_title(&site, None).as_deref(), Some("Default"));

        let bare = SiteSectionConfig {
            name: "Bare".into(),
            ..Default::default()
        };
        assert_eq!(page_title(&bare, Some("Blog")).as_deref(), Some("Blog"));
        assert_eq!(page_title(&bare, None).as_deref(), Some("Bare"));
        assert_eq!(page_title(&SiteSectionConfig::default(), None), None);
    }

    #[test]
    fn test_document_html() {
        let site = site();
        let props = PageProps::new(Params::new(), Some(json!({ "bio": "</script>" })));
        let head = "<link rel=\"stylesheet\" href=\"/a.css\">\n";
        let html = Document::new(&site, Some("<Home>"), head, "<h1>Hi</h1>", &props)
            .to_html()
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>&lt;Home&gt; | Site</title>"));
        assert!(html.contains("content=\"About &quot;us&quot;\""));
        assert!(html.contains(head));
        assert!(html.contains("<div id=\"root\"><h1>Hi</h1></div>"));
        assert!(html.contains(r#"window.__INITIAL_PROPS__ = {"params":{},"props":{"bio":"\u003c/script\u003e"}};"#));
        assert_eq!(html.matches("</script>").count(), 1);
    }
}

//! Site building orchestration.
//!
//! Build pipeline phases:
//! - **Routes** - Load the ordered route table
//! - **Manifest** - Resolve the bundler metafile, write `manifest.json`
//! - **Init** - Clean (optional) and create the output directory
//! - **Render** - Per route: load module, expand dynamic paths, render, emit
//! - **Finalize** - `sitemap.xml`, `robots.txt`, summary
//!
//! Routes are processed sequentially in declaration order. Hook failures
//! (path enumeration, props) skip the affected route or page; load, render
//! and write failures abort the build.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::generator::{build_robots, build_sitemap};
use crate::logger::ProgressLine;
use crate::manifest::{Manifest, ManifestResolver, Metafile};
use crate::page::{
    CommandLoader, ExpandedPath, Hook, HookKind, ModuleLoader, PageModule, PageProps, expand,
    guard,
};
use crate::render::{Document, Emitter, ExtraAssets, FsEmitter, asset_tags};
use crate::route::{Params, Route, RouteTable};
use crate::{debug, log};

/// What a build produced.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// URL paths of every emitted page, in emission order.
    pub pages: Vec<String>,
    /// Route patterns skipped because path enumeration failed or is missing.
    pub skipped_routes: Vec<String>,
    /// Output paths skipped because their props hook failed.
    pub skipped_pages: Vec<String>,
    /// Manifest files written (empty without a usable metafile).
    pub manifest_files: Vec<PathBuf>,
}

/// `tessera build`: production loader + filesystem output.
pub async fn run(config: &SiteConfig) -> Result<BuildReport> {
    let loader = CommandLoader::new(config.ssr.command.clone(), config.get_root());
    let emitter = FsEmitter::new(&config.build.output);

    let report = build_site(config, &loader, &emitter).await?;

    if report.pages.is_empty() {
        log!("warning"; "no pages emitted, check {}", config.build.routes.display());
    } else {
        log!(
            "build";
            "{} pages -> {}",
            report.pages.len(),
            config.root_relative(&config.build.output).display()
        );
    }
    Ok(report)
}

/// Build the site with the given module loader and emitter.
///
/// Pipeline: routes -> manifest -> init -> render -> finalize
pub async fn build_site(
    config: &SiteConfig,
    loader: &dyn ModuleLoader,
    emitter: &dyn Emitter,
) -> Result<BuildReport> {
    let table = RouteTable::load(&config.build.routes)?;
    debug!("build"; "{} routes, loader `{}`", table.len(), loader.name());

    init_output(&config.build.output, config.build.clean)?;

    let mut report = BuildReport::default();
    let manifest = prepare_manifest(config, &mut report)?;

    let builder = PageBuilder {
        config,
        manifest: manifest.as_ref(),
        emitter,
    };

    let progress = ProgressLine::new("build", &[("routes", table.len()), ("pages", 0)]);
    for route in table.routes() {
        let module = loader
            .load(route)
            .await
            .with_context(|| format!("Failed to load page module for `{}`", route.path))?;

        builder
            .build_route(route, module.as_ref(), &mut report, &progress)
            .await?;
        progress.inc("routes");
    }
    progress.finish();

    build_sitemap(config, &report.pages)?;
    build_robots(config)?;

    Ok(report)
}

fn init_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clean output directory {}", output.display()))?;
        debug!("build"; "cleaned {}", output.display());
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))
}

/// Resolve and persist the manifest. A missing metafile is not fatal: pages
/// are still rendered, just without asset tags.
fn prepare_manifest(config: &SiteConfig, report: &mut BuildReport) -> Result<Option<Manifest>> {
    let path = &config.build.metafile;
    if !path.exists() {
        log!("warning"; "metafile not found: {}, building without asset tags", path.display());
        return Ok(None);
    }

    let metafile = Metafile::load(path)?;
    let Some(manifest) = ManifestResolver::new(config.output_roots()).resolve(&metafile) else {
        return Ok(None);
    };

    report.manifest_files = manifest.write(&config.build.manifest, config.build.css_manifest)?;
    log!("manifest"; "{} entries", manifest.len());
    Ok(Some(manifest))
}

struct PageBuilder<'a> {
    config: &'a SiteConfig,
    manifest: Option<&'a Manifest>,
    emitter: &'a dyn Emitter,
}

impl PageBuilder<'_> {
    async fn build_route(
        &self,
        route: &Route,
        module: &dyn PageModule,
        report: &mut BuildReport,
        progress: &ProgressLine,
    ) -> Result<()> {
        let pages = if route.is_dynamic() {
            match guard(HookKind::StaticPaths, route, module.static_paths()).await {
                Hook::Ready(paths) => expand(route, &paths.paths),
                Hook::Absent => {
                    log!("warning"; "`{}` is dynamic but has no static paths, skipped", route.path);
                    report.skipped_routes.push(route.path.clone());
                    return Ok(());
                }
                Hook::Failed => {
                    report.skipped_routes.push(route.path.clone());
                    return Ok(());
                }
            }
        } else {
            vec![ExpandedPath {
                output_path: route.path.clone(),
                params: Params::new(),
                props: None,
            }]
        };

        debug!("build"; "`{}` -> {} page(s)", route.path, pages.len());

        for page in pages {
            let props = match page.props {
                Some(props) => Some(props),
                None => match guard(HookKind::StaticProps, route, module.static_props(&page.params))
                    .await
                {
                    Hook::Ready(props) => Some(props),
                    Hook::Absent => None,
                    Hook::Failed => {
                        report.skipped_pages.push(page.output_path);
                        continue;
                    }
                },
            };

            let props = PageProps::new(page.params, props);
            self.render_page(route, module, &page.output_path, &props).await?;
            report.pages.push(page.output_path);
            progress.inc("pages");
        }

        Ok(())
    }

    async fn render_page(
        &self,
        route: &Route,
        module: &dyn PageModule,
        output_path: &str,
        props: &PageProps,
    ) -> Result<PathBuf> {
        let body = module
            .render(props)
            .await
            .with_context(|| format!("Failed to render `{output_path}` ({})", route.entry))?;

        let build = &self.config.build;
        let extra = ExtraAssets {
            styles: &build.styles,
            scripts: &build.scripts,
        };
        let head = asset_tags(self.manifest, route.entry_key(), extra);

        let html = Document::new(&self.config.site, route.title.as_deref(), &head, &body, props)
            .to_html()?;

        self.emitter.emit(output_path, &html).await
    }
}

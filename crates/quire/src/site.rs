//! Building a [`Site`] from the loaded configuration.

use std::sync::Arc;

use quire_config::{CliSettings, Config};
use quire_markup::MarkdownRenderer;
use quire_site::{ContentLayout, PageDefaults, Site, SiteConfig};

use crate::GlobalArgs;
use crate::error::CliError;

/// Convert resolved configuration into a [`SiteConfig`].
pub(crate) fn site_config_from_config(config: &Config) -> SiteConfig {
    let content = &config.content_resolved;
    let defaults = &config.defaults;

    SiteConfig {
        root: content.root.clone(),
        layout: ContentLayout {
            index: content.index.clone(),
            extension: content.extension.clone(),
            private_prefix: content.private_prefix.clone(),
        },
        defaults: PageDefaults {
            title: defaults.title.clone(),
            description: defaults.description.clone(),
            keywords: defaults.keywords.clone(),
            template: defaults.template.clone(),
            image: defaults.image.clone(),
            thumbnail: defaults.thumbnail.clone(),
        },
        cache_file: Some(content.cache_file.clone()),
        check_stale: content.check_stale,
        feed_limit: config.feed_resolved.limit,
        base_url: config.feed_resolved.base_url.clone(),
    }
}

/// Load configuration (with command-line overrides) and open the site.
pub(crate) fn open_site(
    global: &GlobalArgs,
    mut settings: CliSettings,
) -> Result<(Config, Site), CliError> {
    settings.root.clone_from(&global.root);
    settings.check_stale = global.check_stale.then_some(true);

    let config = Config::load(global.config.as_deref(), Some(&settings))?;
    tracing::debug!(
        root = %config.content_resolved.root.display(),
        config = ?config.config_path,
        "Loaded configuration"
    );

    let site = Site::new(
        site_config_from_config(&config),
        Arc::new(MarkdownRenderer::new()),
    )?;
    Ok((config, site))
}

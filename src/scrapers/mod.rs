//! Homepage scraping: fetching markup and reading articles out of it.
//!
//! Every source goes through the same two steps:
//!
//! 1. **Fetching**: [`fetch::HttpFetcher`] downloads the homepage
//! 2. **Extraction**: [`extract::locate`] finds the article containers and
//!    [`extract::extract`] reads the title and description of each one
//!
//! # Supported Sources
//!
//! | Source | Container | Title | Description |
//! |--------|-----------|-------|-------------|
//! | Dawn.com | `article.story` | `h2.story__title` | `div.story__excerpt` |
//! | BBC.com | `div.gs-c-promo-body` | `h3.gs-c-promo-heading__title` | `p.gs-c-promo-summary` |
//!
//! Both are plain [`Source`](crate::models::Source) records; adding a third
//! site is a configuration change, not new code.

pub mod extract;
pub mod fetch;

//! Markdown-based static pages.
//!
//! Brand copy that rarely changes (the brand story) lives in the repository
//! rather than the content store. Pages are loaded from `content/pages` at
//! startup, their YAML front matter parsed, and the markdown rendered to
//! HTML once.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;

/// Metadata for static pages.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Small label above the page heading.
    #[serde(default)]
    pub eyebrow: Option<String>,
    /// Page heading; the title is used when absent.
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub lede: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A rendered page with metadata and HTML content
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// Pages held in memory for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Load all pages from `{content_dir}/pages`.
    ///
    /// A missing directory yields an empty store; individual files that fail
    /// to parse are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the pages directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let pages = Self::load_pages(&content_dir.join("pages"))?;
        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    /// Load all pages from the pages directory
    fn load_pages(dir: &Path) -> Result<HashMap<String, Page>, ContentError> {
        let mut pages = HashMap::new();

        if !dir.exists() {
            tracing::warn!(dir = %dir.display(), "Pages directory does not exist");
            return Ok(pages);
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match std::fs::read_to_string(&path)
                    .map_err(|e| ContentError::Io(e.to_string()))
                    .and_then(|source| Self::parse_page(&path, &source))
                {
                    Ok(page) => {
                        tracing::info!(slug = %page.slug, "Loaded page");
                        pages.insert(page.slug.clone(), page);
                    }
                    Err(e) => {
                        tracing::error!(path = %path.display(), error = %e, "Failed to load page");
                    }
                }
            }
        }

        Ok(pages)
    }

    /// Parse a page from its file path and markdown source.
    fn parse_page(path: &Path, source: &str) -> Result<Page, ContentError> {
        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
            .to_string();

        let matter = Matter::<YAML>::new();
        let parsed: ParsedEntity<PageMeta> = matter
            .parse(source)
            .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
        let meta = parsed
            .data
            .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

        let content_html = render_markdown(&parsed.content);

        Ok(Page {
            slug,
            meta,
            content_html,
        })
    }

    /// Get a page by slug
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    /// Number of loaded pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
///
/// Page sources are trusted repository files, so raw HTML passes through.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());

    options.render.r#unsafe = true;

    markdown_to_html(content, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ABOUT: &str = "---
title: 品牌故事
description: 止時品牌故事
eyebrow: 止時 品牌故事
---

## 止時的故事

比黃金更珍貴的是**你的心意**。
";

    #[test]
    fn test_parse_page_front_matter_and_markdown() {
        let page = ContentStore::parse_page(Path::new("pages/about.md"), ABOUT).unwrap();
        assert_eq!(page.slug, "about");
        assert_eq!(page.meta.title, "品牌故事");
        assert_eq!(page.meta.eyebrow.as_deref(), Some("止時 品牌故事"));
        assert!(page.meta.headline.is_none());
        assert!(page.content_html.contains("<h2"));
        assert!(page.content_html.contains("<strong>你的心意</strong>"));
    }

    #[test]
    fn test_parse_page_without_front_matter_fails() {
        let err = ContentStore::parse_page(Path::new("about.md"), "# Hello").unwrap_err();
        assert!(matches!(err, ContentError::Parse(_)));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let store = ContentStore::load(Path::new("/nonexistent/kiyone-content")).unwrap();
        assert!(store.is_empty());
        assert!(store.get_page("about").is_none());
    }

    #[test]
    fn test_load_bundled_pages() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("content");
        let store = ContentStore::load(&dir).unwrap();
        let about = store.get_page("about").unwrap();
        assert_eq!(about.meta.title, "品牌故事");
        assert!(!about.content_html.is_empty());
    }
}

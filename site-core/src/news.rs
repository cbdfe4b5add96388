//! News feed for the home page.
//!
//! Articles come from a [`NewsSource`]; the feed keeps the first
//! [`LATEST_NEWS_LIMIT`] in source order and turns them into [`NewsCard`]s.
//! Every query re-fetches from the source, so the feed holds no cache.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::NewsArticle;

/// Number of articles shown on the home page.
pub const LATEST_NEWS_LIMIT: usize = 6;

/// Stagger between consecutive card reveal animations.
pub const CARD_REVEAL_STAGGER: Duration = Duration::from_millis(100);

pub const NO_NEWS_MESSAGE: &str = "No news available.";
pub const NEWS_FAILED_MESSAGE: &str = "Error loading the news. Please try again later.";

const DEFAULT_ICON: &str = "fa-newspaper";

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news source unavailable: {0}")]
    Unavailable(String),

    #[error("malformed news data: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<NewsArticle>, NewsError>;
}

/// Icon class for an article category. Spanish category names from older
/// feeds map to the same icons.
pub fn category_icon(category: &str) -> &'static str {
    match category {
        "Technology" | "Tecnología" => "fa-laptop-code",
        "Security" | "Seguridad" => "fa-shield-alt",
        "Cloud" => "fa-cloud",
        "Mobile" | "Móvil" => "fa-mobile-alt",
        "Automation" | "Automatización" => "fa-robot",
        "Blockchain" => "fa-link",
        _ => DEFAULT_ICON,
    }
}

/// Which categories a filtered view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Category(String),
}

impl CategoryFilter {
    /// `"all"` (any case) selects every category.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Category(token.to_string())
        }
    }

    pub fn matches(
        &self,
        article: &NewsArticle,
    ) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => article.category == *category,
        }
    }
}

/// Articles of the given category, capped at [`LATEST_NEWS_LIMIT`].
pub fn filter_by_category<'a>(
    articles: &'a [NewsArticle],
    filter: &CategoryFilter,
) -> Vec<&'a NewsArticle> {
    articles
        .iter()
        .filter(|article| filter.matches(article))
        .take(LATEST_NEWS_LIMIT)
        .collect()
}

/// Case-insensitive substring search over title, excerpt and category.
pub fn search<'a>(
    articles: &'a [NewsArticle],
    query: &str,
) -> Vec<&'a NewsArticle> {
    let needle = query.trim().to_lowercase();
    articles
        .iter()
        .filter(|article| {
            article.title.to_lowercase().contains(&needle)
                || article.excerpt.to_lowercase().contains(&needle)
                || article.category.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Render-ready article card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsCard {
    pub id: String,
    pub icon: &'static str,
    pub date: String,
    pub category: String,
    pub author: String,
    pub title: String,
    pub excerpt: String,
    pub reveal_delay: Duration,
}

impl NewsCard {
    pub fn new(
        article: &NewsArticle,
        position: usize,
    ) -> Self {
        Self {
            id: article.id.clone(),
            icon: category_icon(&article.category),
            date: article.date.format("%B %-d, %Y").to_string(),
            category: article.category.clone(),
            author: article.author.clone(),
            title: article.title.clone(),
            excerpt: article.excerpt.clone(),
            reveal_delay: CARD_REVEAL_STAGGER * position as u32,
        }
    }
}

impl fmt::Display for NewsCard {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "[{}] {}", self.icon, self.title)?;
        writeln!(f, "  {} | {} | {}", self.date, self.category, self.author)?;
        write!(f, "  {}", self.excerpt)
    }
}

/// What the news container shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsView {
    Cards(Vec<NewsCard>),
    Empty,
    Failed,
}

impl NewsView {
    pub fn from_articles<'a>(articles: impl IntoIterator<Item = &'a NewsArticle>) -> Self {
        let cards: Vec<_> = articles
            .into_iter()
            .enumerate()
            .map(|(position, article)| NewsCard::new(article, position))
            .collect();
        if cards.is_empty() {
            Self::Empty
        } else {
            Self::Cards(cards)
        }
    }
}

impl fmt::Display for NewsView {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Cards(cards) => {
                for (i, card) in cards.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    writeln!(f, "{card}")?;
                }
                Ok(())
            }
            Self::Empty => write!(f, "{NO_NEWS_MESSAGE}"),
            Self::Failed => write!(f, "{NEWS_FAILED_MESSAGE}"),
        }
    }
}

/// Loads and queries articles from a [`NewsSource`].
pub struct NewsFeed {
    source: Box<dyn NewsSource>,
}

impl NewsFeed {
    pub fn new(source: Box<dyn NewsSource>) -> Self {
        Self { source }
    }

    /// The first [`LATEST_NEWS_LIMIT`] articles.
    pub async fn latest(&self) -> NewsView {
        self.query(|articles| NewsView::from_articles(articles.iter().take(LATEST_NEWS_LIMIT)))
            .await
    }

    pub async fn by_category(
        &self,
        filter: &CategoryFilter,
    ) -> NewsView {
        self.query(|articles| NewsView::from_articles(filter_by_category(articles, filter)))
            .await
    }

    /// Search results, uncapped. A blank query shows the latest feed instead.
    pub async fn search(
        &self,
        query: &str,
    ) -> NewsView {
        if query.trim().is_empty() {
            return self.latest().await;
        }
        self.query(|articles| NewsView::from_articles(search(articles, query)))
            .await
    }

    async fn query(
        &self,
        view: impl FnOnce(&[NewsArticle]) -> NewsView,
    ) -> NewsView {
        match self.source.fetch().await {
            Ok(articles) => {
                debug!(count = articles.len(), "news fetched");
                view(&articles)
            }
            Err(err) => {
                error!(error = %err, "loading news failed");
                NewsView::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn article(
        id: usize,
        category: &str,
    ) -> NewsArticle {
        NewsArticle {
            id: id.to_string(),
            title: format!("Headline {id}"),
            excerpt: format!("Excerpt about {category}"),
            category: category.to_string(),
            author: "TechPro Team".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, id as u32 + 1).unwrap(),
        }
    }

    fn articles() -> Vec<NewsArticle> {
        let categories = [
            "Technology",
            "Security",
            "Cloud",
            "Technology",
            "Mobile",
            "Technology",
            "Blockchain",
            "Technology",
            "Technology",
        ];
        categories
            .iter()
            .enumerate()
            .map(|(i, c)| article(i, c))
            .collect()
    }

    struct StaticSource(Vec<NewsArticle>);

    #[async_trait]
    impl NewsSource for StaticSource {
        async fn fetch(&self) -> Result<Vec<NewsArticle>, NewsError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl NewsSource for BrokenSource {
        async fn fetch(&self) -> Result<Vec<NewsArticle>, NewsError> {
            Err(NewsError::Unavailable("404 Not Found".to_string()))
        }
    }

    #[test]
    fn category_icon_maps_known_and_default() {
        assert_eq!(category_icon("Security"), "fa-shield-alt");
        assert_eq!(category_icon("Automatización"), "fa-robot");
        assert_eq!(category_icon("Gardening"), "fa-newspaper");
    }

    #[test]
    fn filter_by_category_caps_results() {
        let articles = articles();

        let technology = filter_by_category(&articles, &CategoryFilter::parse("Technology"));
        let all = filter_by_category(&articles, &CategoryFilter::parse("ALL"));

        assert_eq!(technology.len(), 5);
        assert!(technology.iter().all(|a| a.category == "Technology"));
        assert_eq!(all.len(), LATEST_NEWS_LIMIT);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let articles = articles();

        assert_eq!(search(&articles, "headline 3").len(), 1);
        assert_eq!(search(&articles, "CLOUD").len(), 1);
        assert_eq!(search(&articles, "about security").len(), 1);
        assert!(search(&articles, "quantum").is_empty());
    }

    #[test]
    fn card_formats_date_and_staggers_reveal() {
        let card = NewsCard::new(&article(4, "Mobile"), 3);

        assert_eq!(card.date, "March 5, 2024");
        assert_eq!(card.icon, "fa-mobile-alt");
        assert_eq!(card.reveal_delay, Duration::from_millis(300));
    }

    #[tokio::test]
    async fn latest_keeps_first_six_in_source_order() {
        let feed = NewsFeed::new(Box::new(StaticSource(articles())));

        let NewsView::Cards(cards) = feed.latest().await else {
            panic!("expected cards");
        };

        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0].id, "0");
        assert_eq!(cards[5].id, "5");
    }

    #[tokio::test]
    async fn empty_source_renders_empty_message() {
        let feed = NewsFeed::new(Box::new(StaticSource(Vec::new())));

        let view = feed.latest().await;

        assert_eq!(view, NewsView::Empty);
        assert_eq!(view.to_string(), NO_NEWS_MESSAGE);
    }

    #[tokio::test]
    async fn failing_source_renders_failure_message() {
        let feed = NewsFeed::new(Box::new(BrokenSource));

        let view = feed.latest().await;

        assert_eq!(view, NewsView::Failed);
        assert_eq!(view.to_string(), NEWS_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn blank_search_falls_back_to_latest() {
        let feed = NewsFeed::new(Box::new(StaticSource(articles())));

        assert_eq!(feed.search("  ").await, feed.latest().await);
    }

    #[tokio::test]
    async fn search_results_are_not_capped() {
        let feed = NewsFeed::new(Box::new(StaticSource(articles())));

        let NewsView::Cards(cards) = feed.search("headline").await else {
            panic!("expected cards");
        };

        assert_eq!(cards.len(), 9);
    }
}

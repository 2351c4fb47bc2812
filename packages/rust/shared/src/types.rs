//! Core domain types for the Avagenc blog feed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AvagencError, Result};

// ---------------------------------------------------------------------------
// PostId
// ---------------------------------------------------------------------------

/// Post identifier as the content store returns it (numeric or text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Int(i64),
    Text(String),
}

impl From<String> for PostId {
    /// Text that looks like an integer becomes [`PostId::Int`]. Use
    /// [`PostId::Text`] directly when the text form must be kept.
    fn from(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Text(s),
        }
    }
}

impl From<i64> for PostId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for PostId {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

/// A blog post record from the content store.
///
/// Every field except `id` may be missing or `null` in the store; accessors
/// below give each derived value a defined fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Stable identifier, used to build the detail-page path.
    pub id: PostId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Free-text category, compared case-insensitively against [`Category`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Publication date; the store orders by it, descending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Display label such as "5 min read".
    #[serde(
        default,
        rename = "readTime",
        alias = "read_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub read_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Cover image URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl Post {
    /// A post with only its identifier set.
    pub fn new(id: impl Into<PostId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            excerpt: None,
            category: None,
            date: None,
            read_time: None,
            author: None,
            image: None,
            tags: None,
            featured: None,
        }
    }

    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Detail-page path, `/blog/<id>`.
    pub fn detail_path(&self) -> String {
        format!("/blog/{}", self.id)
    }

    /// First letter of each space-separated word of the author name.
    /// Empty when the author is missing.
    pub fn author_initials(&self) -> String {
        self.author
            .as_deref()
            .map(|name| name.split(' ').filter_map(|w| w.chars().next()).collect())
            .unwrap_or_default()
    }

    /// The `date` field parsed as a calendar day, if it starts with `YYYY-MM-DD`.
    pub fn published_on(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?;
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The fixed category selector set, in display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    All,
    AiTechnology,
    Automation,
    Development,
    CaseStudies,
    BusinessStrategy,
    Security,
}

impl Category {
    /// Every selector, `All` first.
    pub const ALL: [Category; 7] = [
        Category::All,
        Category::AiTechnology,
        Category::Automation,
        Category::Development,
        Category::CaseStudies,
        Category::BusinessStrategy,
        Category::Security,
    ];

    /// Display label, as stored in post records.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::AiTechnology => "AI Technology",
            Self::Automation => "Automation",
            Self::Development => "Development",
            Self::CaseStudies => "Case Studies",
            Self::BusinessStrategy => "Business Strategy",
            Self::Security => "Security",
        }
    }

    /// Next selector in display order, wrapping around.
    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous selector in display order, wrapping around.
    pub fn prev(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Position within [`Category::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = AvagencError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AvagencError::validation(format!("unknown category '{wanted}'")))
    }
}

// ---------------------------------------------------------------------------
// FilterState
// ---------------------------------------------------------------------------

/// Active (category, search term) pair. Each user action yields a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: Category,
    pub search: String,
}

impl FilterState {
    pub fn new(category: Category, search: impl Into<String>) -> Self {
        Self {
            category,
            search: search.into(),
        }
    }

    pub fn with_category(self, category: Category) -> Self {
        Self { category, ..self }
    }

    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    /// The dedicated featured block is only shown in the default view.
    pub fn shows_featured_block(&self) -> bool {
        self.category == Category::All && self.search.is_empty()
    }
}

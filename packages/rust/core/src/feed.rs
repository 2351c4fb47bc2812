//! The blog feed derivation: filter → featured → regular.
//!
//! Every function here is pure. The unfiltered collection is borrowed, never
//! mutated, and derived lists keep the collection's (date-descending) order.

use avagenc_shared::{Category, FilterState, Post};

/// Everything the presentation layer renders for one (collection, filter) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedView<'a> {
    /// Posts passing both predicates.
    pub filtered: Vec<&'a Post>,
    /// The post for the dedicated featured block, if that block is shown.
    pub featured: Option<&'a Post>,
    /// The grid below the featured block.
    pub regular: Vec<&'a Post>,
    /// Grid heading: "Latest Articles" or "<Category> Articles".
    pub heading: String,
}

impl FeedView<'_> {
    /// "1 article found" / "N articles found", counted over the grid.
    pub fn count_label(&self) -> String {
        let n = self.regular.len();
        let plural = if n == 1 { "" } else { "s" };
        format!("{n} article{plural} found")
    }

    pub fn is_empty(&self) -> bool {
        self.featured.is_none() && self.regular.is_empty()
    }
}

/// Derive the full view for `posts` under `filter`.
pub fn derive_view<'a>(posts: &'a [Post], filter: &FilterState) -> FeedView<'a> {
    let filtered = filter_posts(posts, filter);
    let featured = if filter.shows_featured_block() {
        featured_post(&filtered)
    } else {
        None
    };
    let regular = regular_posts(&filtered, featured);

    FeedView {
        filtered,
        featured,
        regular,
        heading: heading(filter.category),
    }
}

/// Posts matching both the category and the search predicate, in input order.
pub fn filter_posts<'a>(posts: &'a [Post], filter: &FilterState) -> Vec<&'a Post> {
    let category = filter.category.label().to_lowercase();
    let search = filter.search.to_lowercase();

    posts
        .iter()
        .filter(|post| matches_category(post, filter.category, &category))
        .filter(|post| matches_search(post, &search))
        .collect()
}

/// First featured-flagged post, or `None`.
pub fn featured_post<'a>(filtered: &[&'a Post]) -> Option<&'a Post> {
    filtered.iter().copied().find(|post| post.is_featured())
}

/// `filtered` without the shown featured post.
///
/// Only the featured post's identifier is removed; other featured-flagged
/// posts stay in the grid.
pub fn regular_posts<'a>(filtered: &[&'a Post], featured: Option<&Post>) -> Vec<&'a Post> {
    match featured {
        Some(shown) => filtered
            .iter()
            .copied()
            .filter(|post| post.id != shown.id)
            .collect(),
        None => filtered.to_vec(),
    }
}

fn matches_category(post: &Post, selector: Category, selector_lower: &str) -> bool {
    selector == Category::All
        || post
            .category
            .as_deref()
            .is_some_and(|c| c.to_lowercase() == selector_lower)
}

/// `search_lower` is already lower-cased. An empty term matches everything.
fn matches_search(post: &Post, search_lower: &str) -> bool {
    if search_lower.is_empty() {
        return true;
    }
    let contains = |field: Option<&str>| {
        field.is_some_and(|text| text.to_lowercase().contains(search_lower))
    };
    contains(post.title.as_deref()) || contains(post.excerpt.as_deref())
}

fn heading(category: Category) -> String {
    match category {
        Category::All => "Latest Articles".to_string(),
        other => format!("{other} Articles"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avagenc_shared::PostId;

    fn post(id: i64, category: &str, title: &str, featured: bool, date: &str) -> Post {
        let mut p = Post::new(id);
        p.category = Some(category.into());
        p.title = Some(title.into());
        p.featured = Some(featured);
        p.date = Some(date.into());
        p
    }

    fn ids(posts: &[&Post]) -> Vec<PostId> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    fn fixture() -> Vec<Post> {
        let raw = std::fs::read_to_string("../../../fixtures/json/posts.fixture.json")
            .expect("read posts fixture");
        serde_json::from_str(&raw).expect("parse posts fixture")
    }

    fn sample() -> Vec<Post> {
        vec![
            post(1, "AI Technology", "Foo", true, "2024-02-01"),
            post(2, "Security", "Bar", false, "2024-01-01"),
        ]
    }

    #[test]
    fn default_filter_is_identity() {
        for posts in [sample(), fixture(), Vec::new()] {
            let filtered = filter_posts(&posts, &FilterState::default());
            let expected: Vec<&Post> = posts.iter().collect();
            assert_eq!(filtered, expected);
        }
    }

    #[test]
    fn category_filter_is_sound_and_complete() {
        let posts = fixture();
        for category in Category::ALL.into_iter().skip(1) {
            let filter = FilterState::default().with_category(category);
            let filtered = filter_posts(&posts, &filter);

            for p in &posts {
                let same = p
                    .category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(category.label()));
                let included = filtered.iter().any(|f| f.id == p.id);
                assert_eq!(same, included, "post {} under {category}", p.id);
            }
        }
    }

    #[test]
    fn category_match_ignores_case() {
        let posts = fixture();
        let filter = FilterState::default().with_category(Category::Development);
        assert_eq!(ids(&filter_posts(&posts, &filter)), vec![PostId::Int(2)]);
    }

    #[test]
    fn search_matches_title_or_excerpt() {
        let posts = fixture();

        let by_title = FilterState::default().with_search("INVOICE");
        assert_eq!(ids(&filter_posts(&posts, &by_title)), vec![PostId::Int(3)]);

        // Post 1 has no title but its excerpt matches.
        let by_excerpt = FilterState::default().with_search("roi");
        assert_eq!(ids(&filter_posts(&posts, &by_excerpt)), vec![PostId::Int(1)]);

        for term in ["automation", "agents", "zzz"] {
            let filter = FilterState::default().with_search(term);
            for p in filter_posts(&posts, &filter) {
                let hit = |f: &Option<String>| {
                    f.as_deref().is_some_and(|t| t.to_lowercase().contains(term))
                };
                assert!(hit(&p.title) || hit(&p.excerpt));
            }
        }
    }

    #[test]
    fn missing_text_fields_do_not_match_search() {
        let bare = vec![Post::new(9)];
        assert!(filter_posts(&bare, &FilterState::default().with_search("a")).is_empty());
        assert_eq!(filter_posts(&bare, &FilterState::default()).len(), 1);
    }

    #[test]
    fn predicates_combine_with_and() {
        let posts = fixture();
        let filter = FilterState::new(Category::Security, "customer");
        assert!(filter_posts(&posts, &filter).is_empty());

        let filter = FilterState::new(Category::AiTechnology, "customer");
        assert_eq!(ids(&filter_posts(&posts, &filter)), vec![PostId::Int(4)]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let posts = fixture();
        let filter = FilterState::new(Category::All, "a");
        assert_eq!(filter_posts(&posts, &filter), filter_posts(&posts, &filter));
    }

    #[test]
    fn first_featured_post_wins() {
        let posts = fixture();
        let view = derive_view(&posts, &FilterState::default());

        assert_eq!(view.featured.map(|p| p.id.clone()), Some(PostId::Int(4)));
        // Post 3 is also flagged but stays in the grid.
        assert_eq!(
            ids(&view.regular),
            vec![PostId::Int(5), PostId::Int(3), PostId::Int(2), PostId::Int(1)]
        );
        assert_eq!(view.count_label(), "4 articles found");
        assert_eq!(view.heading, "Latest Articles");
    }

    #[test]
    fn featured_block_hidden_when_filtering() {
        let posts = fixture();
        let filter = FilterState::default().with_category(Category::AiTechnology);
        let view = derive_view(&posts, &filter);

        assert!(view.featured.is_none());
        assert_eq!(ids(&view.regular), vec![PostId::Int(4)]);
        assert_eq!(view.count_label(), "1 article found");
        assert_eq!(view.heading, "AI Technology Articles");

        // Search also hides the block; the featured post appears exactly once.
        let view = derive_view(&posts, &FilterState::default().with_search("ai"));
        assert!(view.featured.is_none());
        let count = view.regular.iter().filter(|p| p.id == PostId::Int(4)).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn end_to_end_security_scenario() {
        let posts = sample();
        let filter = FilterState::new(Category::Security, "");
        let view = derive_view(&posts, &filter);

        assert_eq!(ids(&view.filtered), vec![PostId::Int(2)]);
        assert!(view.featured.is_none());
        assert_eq!(ids(&view.regular), vec![PostId::Int(2)]);
    }

    #[test]
    fn empty_collection_yields_empty_view() {
        let view = derive_view(&[], &FilterState::default());
        assert!(view.is_empty());
        assert_eq!(view.count_label(), "0 articles found");
    }

    #[test]
    fn regular_without_featured_is_filtered_list() {
        let posts = sample();
        let refs: Vec<&Post> = posts.iter().collect();
        assert_eq!(regular_posts(&refs, None), refs);
        assert_eq!(ids(&regular_posts(&refs, Some(&posts[0]))), vec![PostId::Int(2)]);
        assert_eq!(featured_post(&refs).map(|p| p.id.clone()), Some(PostId::Int(1)));
    }
}

//! Post list view
//!
//! Renders posts in the order given. Ordering, filtering and paging belong
//! to the caller.

use super::layout::{boxed, column, grid, heading, link, row, spacer, text, System};
use super::{render_attrs, Props, RenderContext};
use crate::content::Post;
use crate::helpers::{format_date, html_escape};

/// Format used for card dates
pub const DATE_FORMAT: &str = "MMM D, YYYY";

/// One slot of the list: a card or the spacer between two cards
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListSlot<'a> {
    Spacer,
    Card(&'a Post),
}

/// A vertical list of post cards
pub struct PostListView<'a> {
    posts: &'a [Post],
    date_format: &'a str,
}

impl<'a> PostListView<'a> {
    pub fn new(posts: &'a [Post]) -> Self {
        Self {
            posts,
            date_format: DATE_FORMAT,
        }
    }

    pub fn with_date_format(mut self, date_format: &'a str) -> Self {
        self.date_format = date_format;
        self
    }

    /// Cards interleaved with spacers; no spacer precedes the first card
    pub fn slots(&self) -> Vec<ListSlot<'a>> {
        let mut slots = Vec::with_capacity(self.posts.len() * 2);
        for (index, post) in self.posts.iter().enumerate() {
            if index != 0 {
                slots.push(ListSlot::Spacer);
            }
            slots.push(ListSlot::Card(post));
        }
        slots
    }

    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        let children: String = self
            .slots()
            .into_iter()
            .map(|slot| match slot {
                ListSlot::Spacer => spacer(3).attr("data-role", "separator").render("", ctx),
                ListSlot::Card(post) => render_post_item(post, self.date_format, ctx),
            })
            .collect();

        boxed().attr("data-role", "post-list").render(&children, ctx)
    }
}

/// A single clickable card
pub fn render_post_item(post: &Post, date_format: &str, ctx: &RenderContext<'_>) -> String {
    let title = heading()
        .system(System::new().color("black").font_size(3).font_weight("bold"))
        .render(&html_escape(&post.title), ctx);

    let description = text()
        .system(
            System::new()
                .font_family("robotoslab")
                .font_size(1)
                .font_weight("normal")
                .line_height("copy")
                .letter_spacing("tracked"),
        )
        .render(&html_escape(&post.description), ctx);

    let date = text()
        .system(System::new().mr(2))
        .render(&format_date(&post.created_at, date_format), ctx);
    let reading = text()
        .system(System::new().ml(2))
        .render(&format!("{} min read", post.time_to_read), ctx);
    let meta = boxed()
        .system(System::new().font_size(0).font_weight("normal").color("gray.1"))
        .render(&format!("{}|{}", date, reading), ctx);

    let summary = column(8, 0).render(
        &[title, spacer(2).render("", ctx), description, spacer(2).render("", ctx), meta].concat(),
        ctx,
    );
    let image = column(4, 1).render(&featured_image(post), ctx);
    let card = grid().render(&row().render(&(summary + &image), ctx), ctx);

    link(&post.path(), ctx)
        .attr("data-role", "post-card")
        .attr("data-post-id", post.id.clone())
        .system(System::new().css("display", "flex").css("width", "100%"))
        .render(&card, ctx)
}

/// The bounded-height image, or nothing when the post has none
fn featured_image(post: &Post) -> String {
    let Some(src) = &post.featured_image else {
        return String::new();
    };

    let mut props = Props::new();
    props.insert("class".to_string(), "pf-featured-image".to_string());
    props.insert("src".to_string(), src.clone());
    props.insert("style".to_string(), "max-height: 150px;".to_string());
    if let Some(alt) = &post.featured_image_alt {
        props.insert("title".to_string(), alt.clone());
        props.insert("alt".to_string(), alt.clone());
    }
    format!("<img{} />", render_attrs(&props))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::layout::Theme;
    use crate::config::SiteConfig;
    use crate::router::SiteRouter;
    use chrono::{FixedOffset, TimeZone};

    fn post(id: &str) -> Post {
        let created = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2020, 6, 1, 12, 0, 0)
            .unwrap();
        Post::new(id, format!("Title {}", id), created)
            .with_description(format!("About {}", id))
            .with_time_to_read(5)
    }

    fn render(posts: &[Post]) -> String {
        let theme = Theme::from_config(&SiteConfig::default());
        let router = SiteRouter::default();
        let ctx = RenderContext::new(&router, &theme);
        PostListView::new(posts).render(&ctx)
    }

    #[test]
    fn test_empty_list() {
        let html = render(&[]);
        assert_eq!(html.matches(r#"data-role="post-card""#).count(), 0);
        assert_eq!(html.matches(r#"data-role="separator""#).count(), 0);
        assert!(PostListView::new(&[]).slots().is_empty());
    }

    #[test]
    fn test_cards_and_separators() {
        let posts: Vec<Post> = ["a", "b", "c"].iter().map(|id| post(id)).collect();
        let html = render(&posts);
        assert_eq!(html.matches(r#"data-role="post-card""#).count(), 3);
        assert_eq!(html.matches(r#"data-role="separator""#).count(), 2);

        // No separator before the first card
        let first_card = html.find(r#"data-role="post-card""#).unwrap();
        let first_separator = html.find(r#"data-role="separator""#).unwrap();
        assert!(first_card < first_separator);

        let view = PostListView::new(&posts);
        let slots = view.slots();
        assert_eq!(slots.len(), 5);
        assert_eq!(slots[0], ListSlot::Card(&posts[0]));
        assert_eq!(slots[1], ListSlot::Spacer);
        assert_eq!(slots[4], ListSlot::Card(&posts[2]));
    }

    #[test]
    fn test_card_targets() {
        let posts: Vec<Post> = ["first", "second"].iter().map(|id| post(id)).collect();
        let html = render(&posts);
        for p in &posts {
            assert!(html.contains(&format!(r#"href="/posts/{}.html""#, p.id)));
        }
    }

    #[test]
    fn test_card_contents() {
        let html = render(&[post("a")]);
        assert!(html.contains("Title a"));
        assert!(html.contains("About a"));
        assert!(html.contains("Jun 1, 2020"));
        assert!(html.contains("5 min read"));
    }

    #[test]
    fn test_featured_image_is_optional() {
        let without = render(&[post("plain")]);
        assert!(!without.contains("<img"));

        let with = render(&[post("pic").with_featured_image("/img/pic.png", Some("A pic".to_string()))]);
        assert!(with.contains(
            r#"<img class="pf-featured-image" src="/img/pic.png" style="max-height: 150px;" title="A pic" alt="A pic" />"#
        ));
    }

    #[test]
    fn test_order_is_preserved() {
        let posts: Vec<Post> = ["z", "a", "m"].iter().map(|id| post(id)).collect();
        let html = render(&posts);
        let z = html.find("/posts/z.html").unwrap();
        let a = html.find("/posts/a.html").unwrap();
        let m = html.find("/posts/m.html").unwrap();
        assert!(z < a && a < m);
    }

    #[test]
    fn test_title_is_escaped() {
        let html = render(&[post("x").with_description("<script>")]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}

//! In-memory post store with the status contract of the blog's REST API.
//!
//! Mutations take the raw `Authorization` header value; any value starting
//! with `Bearer ` is accepted.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{Author, PostRecord, PostStatus};

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

const SUMMARY_CHARS: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    Created,
    BadRequest,
    Unauthorized,
    NotFound,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::BadRequest => 400,
            Status::Unauthorized => 401,
            Status::NotFound => 404,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reply<T> {
    pub status: Status,
    pub body: T,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiError {
    pub status: Status,
    pub message: String,
}

impl ApiError {
    fn new(status: Status, message: &str) -> Self {
        ApiError {
            status,
            message: message.to_string(),
        }
    }

    fn unauthorized() -> Self {
        ApiError::new(Status::Unauthorized, "Unauthorized")
    }

    fn not_found() -> Self {
        ApiError::new(Status::NotFound, "Blog post not found")
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.code(), self.message)
    }
}

impl std::error::Error for ApiError {}

/// Body of a create request. Every field is optional on the wire.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub thumbnail: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub status: Option<PostStatus>,
}

/// Body of an update request; only the fields present are changed.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub thumbnail: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub status: Option<PostStatus>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostPage {
    pub posts: Vec<PostRecord>,
    pub total: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    pub total_posts: usize,
    pub total_views: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Message {
    pub message: String,
}

/// Lowercase, collapse every run of non-alphanumerics to `-`, trim the ends.
pub fn slugify(title: &str) -> String {
    NON_SLUG
        .replace_all(&title.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

fn default_summary(content: &str) -> String {
    let head: String = content.chars().take(SUMMARY_CHARS).collect();
    format!("{head}...")
}

fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

fn authorized(authorization: Option<&str>) -> Result<(), ApiError> {
    match authorization {
        Some(value) if value.starts_with("Bearer ") => Ok(()),
        _ => Err(ApiError::unauthorized()),
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn default_author() -> Author {
    Author {
        id: 1,
        name: "John Doe".to_string(),
        avatar: Some("/diverse-user-avatars.png".to_string()),
    }
}

#[derive(Clone, Debug, Default)]
pub struct PostStore {
    posts: Vec<PostRecord>,
}

impl PostStore {
    pub fn new(posts: Vec<PostRecord>) -> Self {
        PostStore { posts }
    }

    /// The four demo posts the site ships with.
    pub fn seeded() -> Self {
        PostStore::new(seed_posts())
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Match by slug first, then by numeric id.
    fn position(&self, slug_or_id: &str) -> Option<usize> {
        self.posts
            .iter()
            .position(|p| p.slug == slug_or_id)
            .or_else(|| {
                let id: u64 = slug_or_id.parse().ok()?;
                self.posts.iter().position(|p| p.id == id)
            })
    }

    /// Fetch a post and count the view.
    pub fn get(&mut self, slug_or_id: &str) -> Result<Reply<PostRecord>, ApiError> {
        let index = self.position(slug_or_id).ok_or_else(ApiError::not_found)?;
        let post = &mut self.posts[index];
        post.views += 1;
        Ok(Reply {
            status: Status::Ok,
            body: post.clone(),
        })
    }

    /// One page of posts, `page` counted from 1.
    pub fn list(&self, page: usize, limit: usize) -> Reply<PostPage> {
        let skip = page.saturating_sub(1).saturating_mul(limit);
        Reply {
            status: Status::Ok,
            body: PostPage {
                posts: self.posts.iter().skip(skip).take(limit).cloned().collect(),
                total: self.posts.len(),
            },
        }
    }

    pub fn stats(&self) -> Reply<BlogStats> {
        Reply {
            status: Status::Ok,
            body: BlogStats {
                total_posts: self.posts.len(),
                total_views: self.posts.iter().map(|p| p.views).sum(),
            },
        }
    }

    pub fn create(
        &mut self,
        authorization: Option<&str>,
        draft: PostDraft,
    ) -> Result<Reply<PostRecord>, ApiError> {
        authorized(authorization)?;
        let (Some(title), Some(content), Some(category)) = (
            present(&draft.title),
            present(&draft.content),
            present(&draft.category),
        ) else {
            return Err(ApiError::new(Status::BadRequest, "Missing required fields"));
        };

        let stamp = now();
        let post = PostRecord {
            id: u64::try_from(stamp.timestamp_millis()).unwrap_or_default(),
            title: title.to_string(),
            slug: slugify(title),
            content: content.to_string(),
            summary: present(&draft.summary)
                .map(str::to_string)
                .unwrap_or_else(|| default_summary(content)),
            thumbnail: draft.thumbnail,
            category: category.to_string(),
            tags: draft.tags.unwrap_or_default(),
            views: 0,
            is_featured: draft.is_featured.unwrap_or(false),
            status: draft.status.unwrap_or(PostStatus::Published),
            created_at: stamp,
            updated_at: stamp,
            author: default_author(),
        };
        log::info!("Created post {:?} ({})", post.slug, post.id);
        self.posts.insert(0, post.clone());
        Ok(Reply {
            status: Status::Created,
            body: post,
        })
    }

    pub fn update(
        &mut self,
        authorization: Option<&str>,
        slug_or_id: &str,
        patch: PostPatch,
    ) -> Result<Reply<PostRecord>, ApiError> {
        authorized(authorization)?;
        let index = self.position(slug_or_id).ok_or_else(ApiError::not_found)?;
        let post = &mut self.posts[index];

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(slug) = patch.slug {
            post.slug = slug;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(summary) = patch.summary {
            post.summary = summary;
        }
        if patch.thumbnail.is_some() {
            post.thumbnail = patch.thumbnail;
        }
        if let Some(category) = patch.category {
            post.category = category;
        }
        if let Some(tags) = patch.tags {
            post.tags = tags;
        }
        if let Some(is_featured) = patch.is_featured {
            post.is_featured = is_featured;
        }
        if let Some(status) = patch.status {
            post.status = status;
        }
        post.updated_at = now();

        log::info!("Updated post {:?}", post.slug);
        Ok(Reply {
            status: Status::Ok,
            body: post.clone(),
        })
    }

    pub fn delete(
        &mut self,
        authorization: Option<&str>,
        slug_or_id: &str,
    ) -> Result<Reply<Message>, ApiError> {
        authorized(authorization)?;
        let index = self.position(slug_or_id).ok_or_else(ApiError::not_found)?;
        let removed = self.posts.remove(index);
        log::info!("Deleted post {:?}", removed.slug);
        Ok(Reply {
            status: Status::Ok,
            body: Message {
                message: "Blog post deleted successfully".to_string(),
            },
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn seed_post(
    id: u64,
    slug: &str,
    title: &str,
    category: &str,
    tags: &[&str],
    views: u64,
    is_featured: bool,
    created_at: &str,
    content: &str,
    summary: &str,
) -> PostRecord {
    let created_at = DateTime::parse_from_rfc3339(created_at).unwrap_or_else(|_| now());
    PostRecord {
        id,
        thumbnail: Some(format!("/{slug}.jpg")),
        title: title.to_string(),
        slug: slug.to_string(),
        content: content.to_string(),
        summary: summary.to_string(),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        views,
        is_featured,
        status: PostStatus::Published,
        created_at,
        updated_at: created_at,
        author: default_author(),
    }
}

fn seed_posts() -> Vec<PostRecord> {
    vec![
        seed_post(
            1,
            "getting-started-react-typescript",
            "Getting Started with React and TypeScript",
            "React",
            &["React", "TypeScript", "JavaScript", "Frontend"],
            1250,
            true,
            "2024-01-15T10:00:00Z",
            "React and TypeScript together give you a typed component model for large web \
             applications. This guide walks through setting up a project, what static types buy \
             you, and habits that keep components easy to change.\n\nTypes catch mistakes while \
             you compile instead of while your users click, and editors use them for completion \
             and safe refactoring.",
            "Combine React with TypeScript for a better development experience and type safety.",
        ),
        seed_post(
            2,
            "advanced-javascript-patterns",
            "Advanced JavaScript Patterns You Should Know",
            "JavaScript",
            &["JavaScript", "Design Patterns", "Advanced", "Programming"],
            890,
            true,
            "2024-01-10T14:30:00Z",
            "A handful of patterns make JavaScript code easier to read and maintain. We look at \
             modules, observers and factories.\n\nModules keep private state out of the global \
             namespace. Observers let one object notify many dependents when it changes, which \
             is the backbone of most event-driven code.",
            "Module, Observer and Factory patterns with practical examples.",
        ),
        seed_post(
            3,
            "building-career-developer",
            "Building Your Career as a Developer",
            "Career",
            &["Career", "Professional Development", "Tech Industry", "Growth"],
            2100,
            false,
            "2024-01-05T09:15:00Z",
            "A developer career takes more than technical skill. Planning, steady learning and a \
             network of peers all matter.\n\nThe industry moves quickly, so set aside time to \
             learn. Conferences, open source and local meetups are where many opportunities \
             first show up.",
            "Building and advancing a career as a software developer.",
        ),
        seed_post(
            4,
            "css-grid-vs-flexbox",
            "CSS Grid vs Flexbox: When to Use Which",
            "CSS",
            &["CSS", "Layout", "Grid", "Flexbox", "Frontend"],
            1680,
            true,
            "2024-01-01T16:45:00Z",
            "Grid and Flexbox are both layout systems, built for different jobs.\n\nFlexbox lays \
             items out along one axis: navigation bars, button groups, centering. Grid works in \
             rows and columns at once, which suits page layouts and card grids.",
            "The differences between CSS Grid and Flexbox and when to reach for each.",
        ),
    ]
}

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::DateTime;
use post_pdf::{Author, PostRecord, PostStatus};

pub fn post(title: &str, content: &str) -> PostRecord {
    let created_at = DateTime::parse_from_rfc3339("2024-01-15T10:00:00Z").unwrap();
    PostRecord {
        id: 1,
        title: title.to_string(),
        slug: "getting-started".to_string(),
        content: content.to_string(),
        summary: String::new(),
        thumbnail: None,
        category: "React".to_string(),
        tags: vec![
            "React".to_string(),
            "TypeScript".to_string(),
            "Architecture".to_string(),
        ],
        views: 0,
        is_featured: false,
        status: PostStatus::Published,
        created_at,
        updated_at: created_at,
        author: Author {
            id: 1,
            name: "John Doe".to_string(),
            avatar: None,
        },
    }
}

pub fn long_post() -> PostRecord {
    post("Hi", &"word ".repeat(1000))
}

pub fn output_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

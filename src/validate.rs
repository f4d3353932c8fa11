//! Field rules for the dashboard and sign-in forms.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::model::PostStatus;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub status: PostStatus,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewsletterForm {
    pub email: String,
}

/// Collects failures in field order.
#[derive(Default)]
struct Report(Vec<FieldError>);

impl Report {
    fn check(&mut self, ok: bool, field: &'static str, message: &'static str) {
        if !ok {
            self.0.push(FieldError { field, message });
        }
    }

    fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.0.is_empty() { Ok(()) } else { Err(self.0) }
    }
}

fn min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn validate_post(form: &PostForm) -> Result<(), Vec<FieldError>> {
    let mut report = Report::default();
    report.check(min_chars(&form.title, 5), "title", "Title must be at least 5 characters");
    report.check(
        min_chars(&form.content, 50),
        "content",
        "Content must be at least 50 characters",
    );
    report.check(
        min_chars(&form.summary, 20),
        "summary",
        "Summary must be at least 20 characters",
    );
    report.check(!form.category.is_empty(), "category", "Please select a category");
    report.check(!form.tags.is_empty(), "tags", "Please add at least one tag");
    if let Some(thumbnail) = &form.thumbnail {
        report.check(
            url::Url::parse(thumbnail).is_ok(),
            "thumbnail",
            "Thumbnail must be a valid URL",
        );
    }
    report.finish()
}

pub fn validate_login(form: &LoginForm) -> Result<(), Vec<FieldError>> {
    let mut report = Report::default();
    report.check(is_email(&form.email), "email", "Please enter a valid email address");
    report.check(
        min_chars(&form.password, 6),
        "password",
        "Password must be at least 6 characters",
    );
    report.finish()
}

pub fn validate_contact(form: &ContactForm) -> Result<(), Vec<FieldError>> {
    let mut report = Report::default();
    report.check(min_chars(&form.name, 2), "name", "Name must be at least 2 characters");
    report.check(is_email(&form.email), "email", "Please enter a valid email address");
    report.check(
        min_chars(&form.message, 10),
        "message",
        "Message must be at least 10 characters",
    );
    report.finish()
}

pub fn validate_newsletter(form: &NewsletterForm) -> Result<(), Vec<FieldError>> {
    let mut report = Report::default();
    report.check(is_email(&form.email), "email", "Please enter a valid email address");
    report.finish()
}

//! Post domain model.
//!
//! # Responsibility
//! - Define the persisted post record, the caller-supplied draft, and the
//!   resolved insert payload handed to storage.
//! - Parse and format post dates in the strict `YYYY-MM-DD` boundary format.
//!
//! # Invariants
//! - `post_date` is always set; it carries no time-of-day component.
//! - Formatting a parsed date yields the exact input string.

use crate::model::category::CategoryId;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned post identifier. Monotonic, never reused.
pub type PostId = i64;

/// `chrono` format string for the post date boundary representation.
pub const POST_DATE_FORMAT: &str = "%Y-%m-%d";

// chrono alone accepts `2024-1-5`; zero padding is part of the contract.
static POST_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid post date regex"));

/// Persisted blog post.
///
/// Serialized with camelCase keys (`featureImage`, `postDate`, `categoryId`)
/// to match the presentation layer's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    /// Hosted image URL. `None` means the post has no image.
    pub feature_image: Option<String>,
    /// Creation day, serialized as `YYYY-MM-DD`.
    pub post_date: NaiveDate,
    pub published: bool,
    /// `None` means uncategorized. May point at a deleted category.
    pub category_id: Option<CategoryId>,
}

impl Post {
    /// Returns the post date in boundary format.
    pub fn post_date_string(&self) -> String {
        format_post_date(self.post_date)
    }
}

/// Caller-supplied post data that has not been persisted yet.
///
/// `published` holds the raw published-intent form field. Only its presence
/// matters: an HTML checkbox is submitted when ticked and omitted otherwise,
/// so any submitted value (even `"false"`) marks the post as published.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub feature_image: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_feature_image(mut self, url: impl Into<String>) -> Self {
        self.feature_image = Some(url.into());
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Records the published-intent field as submitted.
    pub fn with_published_field(mut self, raw_value: impl Into<String>) -> Self {
        self.published = Some(raw_value.into());
        self
    }

    /// Whether the published-intent field was submitted at all.
    pub fn publish_requested(&self) -> bool {
        self.published.is_some()
    }
}

/// Fully resolved insert payload for the storage adapter.
///
/// Everything except the id is decided before the row is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub feature_image: Option<String>,
    pub post_date: NaiveDate,
    pub published: bool,
    pub category_id: Option<CategoryId>,
}

impl NewPost {
    /// Applies the creation defaults to a draft.
    ///
    /// # Contract
    /// - `post_date` is the supplied creation day.
    /// - `published` is `true` iff the draft carried a published-intent field.
    /// - A blank `feature_image` is stored as `None`.
    pub fn from_draft(draft: PostDraft, post_date: NaiveDate) -> Self {
        let published = draft.publish_requested();
        Self {
            title: draft.title,
            body: draft.body,
            feature_image: draft
                .feature_image
                .filter(|url| !url.trim().is_empty()),
            post_date,
            published,
            category_id: draft.category_id,
        }
    }
}

/// Error returned for dates not in strict `YYYY-MM-DD` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDateError {
    pub value: String,
}

impl Display for PostDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid post date `{}`; expected zero-padded YYYY-MM-DD",
            self.value
        )
    }
}

impl Error for PostDateError {}

/// Parses a boundary date string.
///
/// Rejects missing zero padding, surrounding whitespace, and impossible
/// calendar days such as `2023-02-29`.
pub fn parse_post_date(value: &str) -> Result<NaiveDate, PostDateError> {
    let invalid = || PostDateError {
        value: value.to_string(),
    };

    if !POST_DATE_RE.is_match(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, POST_DATE_FORMAT).map_err(|_| invalid())
}

/// Checks that `date` has a four-digit year, so its boundary form is exactly
/// ten characters and orders like the calendar.
pub fn check_post_date_range(date: NaiveDate) -> Result<NaiveDate, PostDateError> {
    if (0..=9999).contains(&date.year()) {
        return Ok(date);
    }
    Err(PostDateError {
        value: format_post_date(date),
    })
}

/// Formats a date in boundary form.
pub fn format_post_date(date: NaiveDate) -> String {
    date.format(POST_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{check_post_date_range, format_post_date, parse_post_date, NewPost, PostDraft};
    use chrono::NaiveDate;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn parse_post_date_round_trips_zero_padded_values() {
        let parsed = parse_post_date("2024-01-05").expect("padded date should parse");
        assert_eq!(parsed, day(2024, 1, 5));
        assert_eq!(format_post_date(parsed), "2024-01-05");
    }

    #[test]
    fn parse_post_date_rejects_unpadded_and_impossible_dates() {
        for value in ["2024-1-5", " 2024-01-05", "2023-02-29", "05/01/2024", ""] {
            let err = parse_post_date(value).expect_err("date should be rejected");
            assert_eq!(err.value, value);
        }
    }

    #[test]
    fn check_post_date_range_rejects_five_digit_and_negative_years() {
        assert_eq!(check_post_date_range(day(9999, 12, 31)), Ok(day(9999, 12, 31)));
        assert_eq!(check_post_date_range(day(0, 1, 1)), Ok(day(0, 1, 1)));

        let err =
            check_post_date_range(day(10000, 1, 1)).expect_err("year 10000 is out of range");
        assert_eq!(err.value, "+10000-01-01");
        assert!(check_post_date_range(day(-1, 1, 1)).is_err());
    }

    #[test]
    fn from_draft_without_published_field_stays_draft() {
        let draft = PostDraft::new("title", "body");
        let new_post = NewPost::from_draft(draft, day(2024, 3, 1));
        assert!(!new_post.published);
        assert_eq!(new_post.post_date, day(2024, 3, 1));
    }

    #[test]
    fn from_draft_publishes_on_field_presence_and_drops_blank_image() {
        let draft = PostDraft::new("title", "body")
            .with_published_field("false")
            .with_feature_image("   ");
        let new_post = NewPost::from_draft(draft, day(2024, 3, 1));
        assert!(new_post.published);
        assert!(new_post.feature_image.is_none());
    }
}

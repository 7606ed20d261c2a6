//! Study library items.
//!
//! Each content category carries only its own fields; the category tag is
//! the variant itself, so there is no "field unused for this kind" state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a study entry.
pub type StudyItemId = Uuid;

/// Category discriminant used for filtering and browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyCategory {
    Book,
    Course,
    Video,
    Article,
    Podcast,
    Paper,
}

impl StudyCategory {
    pub const ALL: [StudyCategory; 6] = [
        Self::Book,
        Self::Course,
        Self::Video,
        Self::Article,
        Self::Podcast,
        Self::Paper,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum StudyItem {
    Book {
        title: String,
        author: String,
        pages_total: u32,
        #[serde(default)]
        pages_read: u32,
    },
    Course {
        title: String,
        platform: String,
        lessons_total: u32,
        #[serde(default)]
        lessons_done: u32,
    },
    Video {
        title: String,
        channel: String,
        url: String,
        minutes: u32,
    },
    Article {
        title: String,
        url: String,
    },
    Podcast {
        title: String,
        host: String,
        #[serde(default)]
        episodes_done: u32,
    },
    Paper {
        title: String,
        authors: Vec<String>,
        url: Option<String>,
    },
}

impl StudyItem {
    pub fn category(&self) -> StudyCategory {
        match self {
            Self::Book { .. } => StudyCategory::Book,
            Self::Course { .. } => StudyCategory::Course,
            Self::Video { .. } => StudyCategory::Video,
            Self::Article { .. } => StudyCategory::Article,
            Self::Podcast { .. } => StudyCategory::Podcast,
            Self::Paper { .. } => StudyCategory::Paper,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Book { title, .. }
            | Self::Course { title, .. }
            | Self::Video { title, .. }
            | Self::Article { title, .. }
            | Self::Podcast { title, .. }
            | Self::Paper { title, .. } => title,
        }
    }

    /// Completion percentage (0-100) for categories that track one.
    pub fn progress(&self) -> Option<u8> {
        match self {
            Self::Book {
                pages_total,
                pages_read,
                ..
            } => Some(percent(*pages_read, *pages_total)),
            Self::Course {
                lessons_total,
                lessons_done,
                ..
            } => Some(percent(*lessons_done, *lessons_total)),
            _ => None,
        }
    }
}

/// Persisted study entry: identity plus one categorized item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyEntry {
    pub id: StudyItemId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    #[serde(flatten)]
    pub item: StudyItem,
}

impl StudyEntry {
    pub fn new(item: StudyItem, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            item,
        }
    }
}

fn percent(done: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = u64::from(done.min(total)) * 100 / u64::from(total);
    ratio as u8
}

#[cfg(test)]
mod tests {
    use super::{StudyCategory, StudyEntry, StudyItem};

    #[test]
    fn progress_is_clamped_and_category_specific() {
        let book = StudyItem::Book {
            title: "SICP".to_string(),
            author: "Abelson".to_string(),
            pages_total: 200,
            pages_read: 250,
        };
        assert_eq!(book.progress(), Some(100));
        assert_eq!(book.category(), StudyCategory::Book);

        let article = StudyItem::Article {
            title: "Ownership".to_string(),
            url: "https://example.com".to_string(),
        };
        assert_eq!(article.progress(), None);
    }

    #[test]
    fn entry_json_is_tagged_by_category() {
        let json = r#"{
            "id": "0d9f3a36-6c0c-4b53-9a3e-3cfb7f1ab3a1",
            "createdAt": 1700000000000,
            "category": "course",
            "title": "Rust basics",
            "platform": "web",
            "lessons_total": 10,
            "lessons_done": 4
        }"#;
        let entry: StudyEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.item.category(), StudyCategory::Course);
        assert_eq!(entry.item.progress(), Some(40));
        assert_eq!(entry.item.title(), "Rust basics");
    }

    #[test]
    fn fields_from_other_categories_do_not_deserialize_into_a_variant() {
        let json = r#"{"category": "video", "title": "x", "channel": "y"}"#;
        assert!(serde_json::from_str::<StudyItem>(json).is_err());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A validated book analysis, built once per search and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    /// Absent when the model gave no year or one that could not be read as an integer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    pub summary: String,
    #[serde(default)]
    pub main_content: String,
    #[serde(default)]
    pub insights: String,
    #[serde(default)]
    pub quotes: Vec<String>,
    pub id: String,
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Long-form material produced by an enrichment pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookContent {
    pub core_content: String,
    pub background_info: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    CoreContent,
    Background,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCard {
    pub id: String,
    pub book_id: String,
    pub card_type: CardType,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl BookContent {
    /// Split into display cards for `book`: its summary first, then core content
    /// and background. Blank sections produce no card.
    pub fn into_cards(self, book: &BookSummary) -> Vec<ContentCard> {
        let created_at = Utc::now();
        [
            (CardType::Summary, book.summary.clone()),
            (CardType::CoreContent, self.core_content),
            (CardType::Background, self.background_info),
        ]
        .into_iter()
        .filter(|(_, content)| !content.trim().is_empty())
        .map(|(card_type, content)| ContentCard {
            id: new_id(),
            book_id: book.id.clone(),
            card_type,
            content,
            created_at,
        })
        .collect()
    }
}

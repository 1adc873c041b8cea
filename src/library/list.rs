use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::media::StreamLayout;

/// A downloadable recording as shown in the list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingEntry {
    pub id: uuid::Uuid,
    /// Link text; also the suggested download file name
    pub label: String,
    /// Revocable reference to the artifact
    pub href: String,
    /// Secondary download action
    pub download_href: String,
    pub download_label: String,
    pub size_bytes: usize,
    pub mime_type: String,
    pub created_at: DateTime<Local>,
    pub layout: StreamLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ListItem {
    Placeholder { message: String },
    Recording(RecordingEntry),
}

/// Append-only recordings list that starts with a placeholder
#[derive(Debug, Clone)]
pub struct RecordingList {
    items: Vec<ListItem>,
}

impl RecordingList {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            items: vec![ListItem::Placeholder {
                message: placeholder.into(),
            }],
        }
    }

    /// Append an entry, replacing the placeholder if it is all the list shows
    pub fn append(&mut self, entry: RecordingEntry) {
        if matches!(self.items.as_slice(), [ListItem::Placeholder { .. }]) {
            self.items.clear();
        }
        self.items.push(ListItem::Recording(entry));
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn entries(&self) -> impl Iterator<Item = &RecordingEntry> {
        self.items.iter().filter_map(|item| match item {
            ListItem::Recording(entry) => Some(entry),
            ListItem::Placeholder { .. } => None,
        })
    }

    pub fn shows_placeholder(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, ListItem::Placeholder { .. }))
    }
}

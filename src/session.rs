//! In-memory dashboard state: keywords, the latest collection and pending
//! notices. Nothing here outlives the process.

use crate::keywords::KeywordSet;
use crate::models::Collection;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    /// Lowercase name, also used as the CSS class of the notice box.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

/// A message shown once, on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Session {
    pub keywords: KeywordSet,
    pub collection: Option<Collection>,
    notices: Vec<Notice>,
}

impl Session {
    pub fn new(keywords: KeywordSet) -> Self {
        Self {
            keywords,
            collection: None,
            notices: Vec::new(),
        }
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    /// Take all pending notices, leaving none behind.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

/// Severity of a transient notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A toast shown after a mutation completes.
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            title: title.into(),
            description: None,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            title: title.into(),
            description: Some(description.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

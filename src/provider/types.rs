//! Types exchanged between the host and a search provider

use crate::engines::IconHandle;
use std::fmt;
use std::sync::Arc;

/// Opaque result identifier
pub type ResultId = String;

/// Launchable application associated with a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub id: String,
    pub name: String,
}

/// Custom visual for a result; hosts fall back to their own rendering when absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultActor {
    pub result_id: ResultId,
}

/// Themed icon sized for the current display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultIcon {
    pub gicon: IconHandle,
    pub width: u32,
    pub height: u32,
    pub icon_size: u32,
}

impl ResultIcon {
    /// Square icon of `pixels` on each side
    pub fn square(gicon: IconHandle, pixels: u32) -> Self {
        Self {
            gicon,
            width: pixels,
            height: pixels,
            icon_size: pixels,
        }
    }
}

/// Builds an icon for a requested logical size
pub type IconFactory = Arc<dyn Fn(u32) -> ResultIcon + Send + Sync>;

/// Display metadata for one result
#[derive(Clone)]
pub struct ResultMeta {
    pub id: ResultId,
    pub name: String,
    pub description: String,
    icon_factory: IconFactory,
}

impl ResultMeta {
    pub fn new(
        id: impl Into<ResultId>,
        name: impl Into<String>,
        description: impl Into<String>,
        icon_factory: IconFactory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            icon_factory,
        }
    }

    /// Create the result icon for a logical pixel size
    pub fn create_icon(&self, size: u32) -> ResultIcon {
        (self.icon_factory)(size)
    }
}

impl fmt::Debug for ResultMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultMeta")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

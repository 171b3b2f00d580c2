//! Hand-off of the chosen template from the catalog to the editor.

use serde::{Deserialize, Serialize};

use crate::provider::CatalogItem;

/// What the editor needs to know about the chosen template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTemplate {
    pub name: String,
    pub url: String,
}

impl From<&CatalogItem> for SelectedTemplate {
    fn from(item: &CatalogItem) -> Self {
        Self {
            name: item.name.clone(),
            url: item.url.clone(),
        }
    }
}

/// Single-slot holder written by the catalog view and read by the editor.
///
/// Writes replace any unread selection; [`SelectionHolder::take`] consumes it
/// so the editor reads each selection exactly once.
#[derive(Debug, Default)]
pub struct SelectionHolder {
    slot: Option<SelectedTemplate>,
}

impl SelectionHolder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, template: SelectedTemplate) {
        tracing::debug!("Selected template {:?}", template.name);
        self.slot = Some(template);
    }

    pub fn peek(&self) -> Option<&SelectedTemplate> {
        self.slot.as_ref()
    }

    pub fn take(&mut self) -> Option<SelectedTemplate> {
        self.slot.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_reads_once() {
        let mut holder = SelectionHolder::new();
        holder.commit(SelectedTemplate {
            name: "Drake".into(),
            url: "https://i.imgflip.com/30b1gx.jpg".into(),
        });

        assert_eq!(holder.peek().map(|t| t.name.as_str()), Some("Drake"));
        assert!(holder.take().is_some());
        assert!(holder.take().is_none());
    }

    #[test]
    fn later_commit_replaces_unread_selection() {
        let mut holder = SelectionHolder::new();
        holder.commit(SelectedTemplate { name: "a".into(), url: "u1".into() });
        holder.commit(SelectedTemplate { name: "b".into(), url: "u2".into() });
        assert_eq!(holder.take().unwrap().url, "u2");
    }
}

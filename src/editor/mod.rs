//! Edit session state machine.
//!
//! The in-memory document is the source of truth and the rendered page a
//! projection of it. A session starts in view mode; entering edit snapshots
//! the current document for rollback and opens a draft on the edit surface.
//! Scalar fields mutate in place; structured items (site cards, social
//! links) are replaced wholesale — the modal-dialog path — because their
//! multiple sub-fields cannot be disambiguated by inline edits.

mod collect;

pub use collect::*;

use chrono::Utc;

use crate::models::ProfileDocument;

/// Session mode. Always `View` on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    View,
    Edit,
}

/// Transition attempted from the wrong mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorError {
    AlreadyEditing,
    NotEditing,
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::AlreadyEditing => write!(f, "session is already in edit mode"),
            EditorError::NotEditing => write!(f, "session is not in edit mode"),
        }
    }
}

impl std::error::Error for EditorError {}

/// An edit session over one configuration document.
#[derive(Debug, Clone)]
pub struct EditorSession {
    mode: EditorMode,
    current: ProfileDocument,
    snapshot: Option<ProfileDocument>,
    draft: Option<DraftDocument>,
}

impl EditorSession {
    /// A fresh session always starts in view mode, token or no token.
    pub fn new(current: ProfileDocument) -> Self {
        Self {
            mode: EditorMode::View,
            current,
            snapshot: None,
            draft: None,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// The document the page currently projects.
    pub fn document(&self) -> &ProfileDocument {
        &self.current
    }

    /// The draft under edit, if the session is in edit mode.
    pub fn draft(&self) -> Option<&DraftDocument> {
        self.draft.as_ref()
    }

    /// Mutable access to the draft for inline field edits.
    pub fn draft_mut(&mut self) -> Result<&mut DraftDocument, EditorError> {
        self.draft.as_mut().ok_or(EditorError::NotEditing)
    }

    /// `view → edit`: snapshot the current document and open the draft.
    pub fn enter_edit(&mut self) -> Result<(), EditorError> {
        if self.mode == EditorMode::Edit {
            return Err(EditorError::AlreadyEditing);
        }

        self.snapshot = Some(self.current.clone());
        self.draft = Some(DraftDocument::from_document(&self.current));
        self.mode = EditorMode::Edit;
        Ok(())
    }

    // ==================== EDIT-MODE MUTATIONS ====================

    /// Append a new timeline row with a today-like placeholder date.
    pub fn add_timeline_event(&mut self) -> Result<(), EditorError> {
        let date = Utc::now().format("%Y.%-m").to_string();
        self.draft_mut()?.timeline.push(TimelineDraft {
            id: Some(generate_id()),
            date: Some(date),
            title: Some("New event".to_string()),
            highlight: false,
        });
        Ok(())
    }

    /// Append a new site card with empty defaults (filled in via the modal).
    pub fn add_site(&mut self) -> Result<(), EditorError> {
        self.draft_mut()?.sites.push(SiteDraft {
            id: Some(generate_id()),
            ..Default::default()
        });
        Ok(())
    }

    /// Append a new social link with empty defaults (filled in via the modal).
    pub fn add_social_link(&mut self) -> Result<(), EditorError> {
        self.draft_mut()?.social_links.push(SocialDraft {
            id: Some(generate_id()),
            ..Default::default()
        });
        Ok(())
    }

    /// Append a new tag.
    pub fn add_tag(&mut self) -> Result<(), EditorError> {
        self.draft_mut()?.tags.push("New tag".to_string());
        Ok(())
    }

    /// Replace a site card wholesale (the modal submit path).
    pub fn update_site(&mut self, id: &str, site: SiteDraft) -> Result<bool, EditorError> {
        let draft = self.draft_mut()?;
        for row in &mut draft.sites {
            if row.id.as_deref() == Some(id) {
                let kept_id = row.id.clone();
                *row = SiteDraft { id: kept_id, ..site };
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Replace a social link wholesale (the modal submit path).
    pub fn update_social_link(
        &mut self,
        id: &str,
        link: SocialDraft,
    ) -> Result<bool, EditorError> {
        let draft = self.draft_mut()?;
        for row in &mut draft.social_links {
            if row.id.as_deref() == Some(id) {
                let kept_id = row.id.clone();
                *row = SocialDraft { id: kept_id, ..link };
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Delete a timeline row by id. The caller confirms before calling.
    pub fn remove_timeline_event(&mut self, id: &str) -> Result<bool, EditorError> {
        let draft = self.draft_mut()?;
        let before = draft.timeline.len();
        draft.timeline.retain(|row| row.id.as_deref() != Some(id));
        Ok(draft.timeline.len() < before)
    }

    /// Delete a site card by id. The caller confirms before calling.
    pub fn remove_site(&mut self, id: &str) -> Result<bool, EditorError> {
        let draft = self.draft_mut()?;
        let before = draft.sites.len();
        draft.sites.retain(|row| row.id.as_deref() != Some(id));
        Ok(draft.sites.len() < before)
    }

    /// Delete a social link by id. The caller confirms before calling.
    pub fn remove_social_link(&mut self, id: &str) -> Result<bool, EditorError> {
        let draft = self.draft_mut()?;
        let before = draft.social_links.len();
        draft
            .social_links
            .retain(|row| row.id.as_deref() != Some(id));
        Ok(draft.social_links.len() < before)
    }

    /// Delete a tag by position (tags carry no id).
    pub fn remove_tag(&mut self, index: usize) -> Result<bool, EditorError> {
        let draft = self.draft_mut()?;
        if index < draft.tags.len() {
            draft.tags.remove(index);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // ==================== SAVE / CANCEL ====================

    /// Collect the draft into the document the caller should persist.
    pub fn save_payload(&self) -> Result<ProfileDocument, EditorError> {
        let draft = self.draft.as_ref().ok_or(EditorError::NotEditing)?;
        Ok(collect(draft, &self.current))
    }

    /// `edit → view` after a successful put: the saved document, stamped with
    /// the server's timestamp, becomes current.
    pub fn complete_save(
        &mut self,
        mut saved: ProfileDocument,
        updated_at: i64,
    ) -> Result<(), EditorError> {
        if self.mode != EditorMode::Edit {
            return Err(EditorError::NotEditing);
        }

        saved.updated_at = Some(updated_at);
        self.current = saved;
        self.snapshot = None;
        self.draft = None;
        self.mode = EditorMode::View;
        Ok(())
    }

    /// `edit → view` after a 401 on save: implicit logout. The unsaved draft
    /// stays on screen as the current projection.
    pub fn save_rejected_unauthorized(&mut self) -> Result<(), EditorError> {
        let unsaved = self.save_payload()?;
        self.current = unsaved;
        self.snapshot = None;
        self.draft = None;
        self.mode = EditorMode::View;
        Ok(())
    }

    /// `edit → view` without saving: reload the last persisted state.
    pub fn cancel(&mut self) -> Result<(), EditorError> {
        let snapshot = self.snapshot.take().ok_or(EditorError::NotEditing)?;
        self.current = snapshot;
        self.draft = None;
        self.mode = EditorMode::View;
        Ok(())
    }
}

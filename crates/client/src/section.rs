//! Per-section load/edit/submit state machine.
//!
//! Every independent panel (profile, security, payment, the dashboards, and
//! the standalone listing/transaction/dispute pages) runs the same lifecycle:
//!
//! ```text
//! Unloaded -> Loading -> Loaded -> Editing -> Submitting -> Loaded
//!                                     ^                        |
//!                                     +---- submit failed -----+
//! ```
//!
//! `data` always holds the last server-confirmed snapshot. It is the rollback
//! target while editing and stays visible ("stale but available") when a
//! later fetch fails. Errors are section-scoped and cleared by the next
//! successful fetch; they never leak into another section.
//!
//! Requests are not cancelled on teardown or rapid tab switching, so a late
//! response from an abandoned fetch may still arrive. Each `begin_*` bumps an
//! epoch and hands out a token; a `finish_*` with a stale token is ignored.

use std::fmt;

/// Lifecycle phase of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unloaded,
    Loading,
    Loaded,
    Editing,
    Submitting,
}

/// Handle for an in-flight load. Stale once the section moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken {
    epoch: u64,
}

/// Handle for an in-flight submit, remembering where to fall back on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitToken {
    epoch: u64,
    resume: Phase,
}

/// One section's state: phase, last confirmed data, and a scoped error.
#[derive(Debug)]
pub struct Section<T> {
    phase: Phase,
    data: Option<T>,
    error: Option<String>,
    epoch: u64,
}

impl<T> Section<T> {
    /// A section that still needs its first fetch.
    pub fn new() -> Self {
        Self {
            phase: Phase::Unloaded,
            data: None,
            error: None,
            epoch: 0,
        }
    }

    /// A section with nothing to fetch (e.g. the security panel).
    pub fn loaded(data: T) -> Self {
        Self {
            phase: Phase::Loaded,
            data: Some(data),
            error: None,
            epoch: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The last server-confirmed snapshot, if any.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Mutable access for deliberate local updates (e.g. an optimistic
    /// status edit that skips the refetch).
    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    /// Replace the snapshot outright.
    pub fn set_data(&mut self, data: T) {
        self.data = Some(data);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record a locally detected error (validation) without changing phase.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Start a fetch. Refused while an edit or submit is in progress.
    pub fn begin_load(&mut self) -> Option<LoadToken> {
        match self.phase {
            Phase::Unloaded | Phase::Loading | Phase::Loaded => {
                self.epoch += 1;
                self.phase = Phase::Loading;
                Some(LoadToken { epoch: self.epoch })
            }
            Phase::Editing | Phase::Submitting => None,
        }
    }

    /// Resolve a fetch. Returns `false` when the token was superseded, in
    /// which case nothing changes.
    pub fn finish_load(&mut self, token: LoadToken, result: Result<T, String>) -> bool {
        if token.epoch != self.epoch {
            tracing::debug!("ignoring stale load response (epoch {})", token.epoch);
            return false;
        }

        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.phase = Phase::Loaded;
            }
            Err(message) => {
                self.error = Some(message);
                // Keep showing the previous snapshot if there is one.
                self.phase = if self.data.is_some() {
                    Phase::Loaded
                } else {
                    Phase::Unloaded
                };
            }
        }
        true
    }

    /// Enter edit mode. The current snapshot becomes the rollback target.
    pub fn begin_edit(&mut self) -> bool {
        if self.phase == Phase::Loaded && self.data.is_some() {
            self.phase = Phase::Editing;
            true
        } else {
            false
        }
    }

    /// Abandon the edit and show the snapshot again.
    pub fn cancel_edit(&mut self) -> bool {
        if self.phase == Phase::Editing {
            self.phase = Phase::Loaded;
            self.error = None;
            true
        } else {
            false
        }
    }

    /// Start a mutation. Allowed from `Editing` (form submit), `Loaded`
    /// (inline actions like delete), or `Unloaded` (creation flows). While
    /// `Submitting`, further submits are refused, which is what serializes
    /// add/delete on the payment section.
    pub fn begin_submit(&mut self) -> Option<SubmitToken> {
        match self.phase {
            Phase::Editing | Phase::Loaded | Phase::Unloaded => {
                let resume = self.phase;
                self.epoch += 1;
                self.phase = Phase::Submitting;
                Some(SubmitToken {
                    epoch: self.epoch,
                    resume,
                })
            }
            Phase::Loading | Phase::Submitting => None,
        }
    }

    /// Resolve a mutation. On failure the section falls back to where the
    /// submit started (editing keeps the draft; the snapshot is untouched).
    pub fn finish_submit(&mut self, token: SubmitToken, result: Result<(), String>) -> bool {
        if token.epoch != self.epoch {
            tracing::debug!("ignoring stale submit response (epoch {})", token.epoch);
            return false;
        }

        match result {
            Ok(()) => {
                self.error = None;
                self.phase = Phase::Loaded;
            }
            Err(message) => {
                self.error = Some(message);
                self.phase = token.resume;
            }
        }
        true
    }
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Unloaded => "unloaded",
            Phase::Loading => "loading",
            Phase::Loaded => "loaded",
            Phase::Editing => "editing",
            Phase::Submitting => "submitting",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_success_populates_data_and_clears_error() {
        let mut section: Section<i32> = Section::new();
        let token = section.begin_load().unwrap();
        assert_eq!(section.phase(), Phase::Loading);

        assert!(section.finish_load(token, Ok(7)));
        assert_eq!(section.phase(), Phase::Loaded);
        assert_eq!(section.data(), Some(&7));
        assert!(section.error().is_none());
    }

    #[test]
    fn failed_first_load_returns_to_unloaded() {
        let mut section: Section<i32> = Section::new();
        let token = section.begin_load().unwrap();
        section.finish_load(token, Err("boom".to_string()));
        assert_eq!(section.phase(), Phase::Unloaded);
        assert!(section.data().is_none());
        assert_eq!(section.error(), Some("boom"));
    }

    #[test]
    fn failed_refetch_keeps_stale_data_visible() {
        let mut section: Section<i32> = Section::new();
        let token = section.begin_load().unwrap();
        section.finish_load(token, Ok(7));

        let token = section.begin_load().unwrap();
        section.finish_load(token, Err("offline".to_string()));
        assert_eq!(section.phase(), Phase::Loaded);
        assert_eq!(section.data(), Some(&7));
        assert_eq!(section.error(), Some("offline"));
    }

    #[test]
    fn successful_fetch_clears_a_previous_error() {
        let mut section: Section<i32> = Section::new();
        let token = section.begin_load().unwrap();
        section.finish_load(token, Err("offline".to_string()));

        let token = section.begin_load().unwrap();
        section.finish_load(token, Ok(9));
        assert!(section.error().is_none());
        assert_eq!(section.data(), Some(&9));
    }

    #[test]
    fn superseded_load_response_is_ignored() {
        let mut section: Section<i32> = Section::new();
        let stale = section.begin_load().unwrap();
        let fresh = section.begin_load().unwrap();

        assert!(section.finish_load(fresh, Ok(2)));
        // The abandoned fetch resolves late; it must not clobber the result.
        assert!(!section.finish_load(stale, Ok(1)));
        assert_eq!(section.data(), Some(&2));
        assert_eq!(section.phase(), Phase::Loaded);
    }

    #[test]
    fn edit_requires_loaded_data() {
        let mut section: Section<i32> = Section::new();
        assert!(!section.begin_edit());

        let token = section.begin_load().unwrap();
        section.finish_load(token, Ok(7));
        assert!(section.begin_edit());
        assert_eq!(section.phase(), Phase::Editing);
    }

    #[test]
    fn failed_submit_rolls_back_to_editing_with_snapshot_intact() {
        let mut section: Section<i32> = Section::new();
        let token = section.begin_load().unwrap();
        section.finish_load(token, Ok(7));
        section.begin_edit();

        let token = section.begin_submit().unwrap();
        assert_eq!(section.phase(), Phase::Submitting);
        section.finish_submit(token, Err("rejected".to_string()));

        assert_eq!(section.phase(), Phase::Editing);
        // Displayed data still equals the pre-edit snapshot.
        assert_eq!(section.data(), Some(&7));
        assert_eq!(section.error(), Some("rejected"));
    }

    #[test]
    fn failed_inline_submit_falls_back_to_loaded() {
        let mut section: Section<i32> = Section::new();
        let token = section.begin_load().unwrap();
        section.finish_load(token, Ok(7));

        let token = section.begin_submit().unwrap();
        section.finish_submit(token, Err("rejected".to_string()));
        assert_eq!(section.phase(), Phase::Loaded);
    }

    #[test]
    fn submits_are_serialized_per_section() {
        let mut section: Section<i32> = Section::new();
        let token = section.begin_load().unwrap();
        section.finish_load(token, Ok(7));

        let first = section.begin_submit();
        assert!(first.is_some());
        // A second add/delete while one is in flight is refused.
        assert!(section.begin_submit().is_none());
        assert!(section.begin_load().is_none());
    }

    #[test]
    fn cancel_edit_restores_view_mode() {
        let mut section: Section<i32> = Section::new();
        let token = section.begin_load().unwrap();
        section.finish_load(token, Ok(7));
        section.begin_edit();
        section.set_error("draft problem");

        assert!(section.cancel_edit());
        assert_eq!(section.phase(), Phase::Loaded);
        assert!(section.error().is_none());
        assert_eq!(section.data(), Some(&7));
    }

    #[test]
    fn fetchless_section_starts_loaded() {
        let section = Section::loaded(());
        assert_eq!(section.phase(), Phase::Loaded);
        assert!(section.data().is_some());
    }
}

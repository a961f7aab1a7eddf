//! Progress tracker.
//!
//! Owns one junior's progress, applies the reducers and hands each new snapshot to the
//! profile store.

use jiff::Timestamp;
use tracing::{info, warn};

use crate::{
    persistence::{ProgressPersistence, StorageStatus},
    progress::{
        JuniorProgress, ProgressError, award_experience, award_skill_points, is_valid_user_id,
    },
};

/// Progress of a single junior, kept in sync with a profile store.
#[derive(Debug)]
pub struct ProgressTracker<P> {
    user_id: String,
    progress: JuniorProgress,
    store: P,
}

impl<P: ProgressPersistence> ProgressTracker<P> {
    /// Load the progress for `user_id`.
    ///
    /// Missing or corrupt profiles start from the default progress. If the store cannot be
    /// read the tracker still opens with the default progress and reports the failure.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::InvalidUserId`] if `user_id` is malformed. The store is not
    /// touched in that case.
    #[tracing::instrument(name = "progress.open", skip(store))]
    pub fn open(store: P, user_id: &str) -> Result<(Self, StorageStatus), ProgressError> {
        if !is_valid_user_id(user_id) {
            return Err(ProgressError::InvalidUserId(user_id.to_string()));
        }

        let (progress, status) = match store.load(user_id) {
            Ok(Some(progress)) => (progress, StorageStatus::InSync),
            Ok(None) => (JuniorProgress::default(), StorageStatus::InSync),
            Err(error) => {
                warn!(%error, "failed to load progress, starting fresh");

                (JuniorProgress::default(), StorageStatus::Degraded(error))
            }
        };

        let tracker = Self {
            user_id: user_id.to_string(),
            progress,
            store,
        };

        Ok((tracker, status))
    }

    /// The junior this tracker belongs to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Current progress.
    pub fn progress(&self) -> &JuniorProgress {
        &self.progress
    }

    /// Award experience and persist the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ProgressError`] if the award is invalid; nothing changes in that case.
    #[tracing::instrument(name = "progress.award_experience", skip(self), fields(user_id = %self.user_id))]
    pub fn award_experience(&mut self, amount: u32) -> Result<StorageStatus, ProgressError> {
        let next = award_experience(&self.progress, amount, Timestamp::now())?;

        Ok(self.apply(next))
    }

    /// Award skill points and persist the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ProgressError`] if the skill or amount is invalid; nothing changes in that
    /// case.
    #[tracing::instrument(name = "progress.award_skill_points", skip(self), fields(user_id = %self.user_id))]
    pub fn award_skill_points(
        &mut self,
        skill_name: &str,
        amount: u32,
    ) -> Result<StorageStatus, ProgressError> {
        let next = award_skill_points(&self.progress, skill_name, amount, Timestamp::now())?;

        Ok(self.apply(next))
    }

    /// Give back the store.
    pub fn into_store(self) -> P {
        self.store
    }

    fn apply(&mut self, next: JuniorProgress) -> StorageStatus {
        for badge in next.badges_since(&self.progress) {
            info!(badge = %badge.id, "badge earned");
        }

        if next.level() > self.progress.level() {
            info!(level = next.level(), "levelled up");
        }

        self.progress = next;

        let status = StorageStatus::from(self.store.save(&self.user_id, &self.progress));

        if let Some(error) = status.warning() {
            warn!(%error, "failed to persist progress");
        }

        status
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use testresult::TestResult;

    use crate::persistence::{MockProgressPersistence, PersistenceError};

    use super::*;

    fn unavailable() -> PersistenceError {
        PersistenceError::Unavailable(io::Error::other("profile store offline"))
    }

    #[test]
    fn open_without_profile_uses_defaults() -> TestResult {
        let mut store = MockProgressPersistence::new();
        store
            .expect_load()
            .withf(|user_id| user_id == "junior-1")
            .returning(|_| Ok(None));

        let (tracker, status) = ProgressTracker::open(store, "junior-1")?;

        assert!(status.is_in_sync());
        assert_eq!(tracker.progress(), &JuniorProgress::default());
        assert_eq!(tracker.user_id(), "junior-1");

        Ok(())
    }

    #[test]
    fn open_rejects_malformed_user_id_without_loading() {
        let mut store = MockProgressPersistence::new();
        store.expect_load().never();
        store.expect_save().never();

        let result = ProgressTracker::open(store, "../escape");

        assert!(matches!(
            result,
            Err(ProgressError::InvalidUserId(id)) if id == "../escape"
        ));
    }

    #[test]
    fn open_with_unreachable_store_degrades() -> TestResult {
        let mut store = MockProgressPersistence::new();
        store.expect_load().returning(|_| Err(unavailable()));

        let (tracker, status) = ProgressTracker::open(store, "junior-1")?;

        assert!(matches!(
            status.warning(),
            Some(PersistenceError::Unavailable(_))
        ));
        assert_eq!(tracker.progress(), &JuniorProgress::default());

        Ok(())
    }

    #[test]
    fn award_saves_new_progress() -> TestResult {
        let mut store = MockProgressPersistence::new();
        store.expect_load().returning(|_| Ok(None));
        store
            .expect_save()
            .withf(|user_id, progress| user_id == "junior-1" && progress.level() == 2)
            .times(1)
            .returning(|_, _| Ok(()));

        let (mut tracker, _) = ProgressTracker::open(store, "junior-1")?;

        let status = tracker.award_experience(120)?;

        assert!(status.is_in_sync());
        assert_eq!(tracker.progress().level(), 2);
        assert_eq!(tracker.progress().experience(), 20);

        Ok(())
    }

    #[test]
    fn failed_save_keeps_in_memory_progress() -> TestResult {
        let mut store = MockProgressPersistence::new();
        store.expect_load().returning(|_| Ok(None));
        store.expect_save().returning(|_, _| Err(unavailable()));

        let (mut tracker, _) = ProgressTracker::open(store, "junior-1")?;

        let status = tracker.award_skill_points("kicking", 100)?;

        assert!(!status.is_in_sync());
        assert!(tracker.progress().badges().contains("kicking-master"));

        Ok(())
    }

    #[test]
    fn invalid_award_changes_nothing_and_skips_save() -> TestResult {
        let mut store = MockProgressPersistence::new();
        store.expect_load().returning(|_| Ok(None));
        store.expect_save().never();

        let (mut tracker, _) = ProgressTracker::open(store, "junior-1")?;

        assert!(matches!(
            tracker.award_skill_points("jumping", 5),
            Err(ProgressError::InvalidSkillName(_))
        ));
        assert!(matches!(
            tracker.award_experience(0),
            Err(ProgressError::ZeroExperience)
        ));
        assert_eq!(tracker.progress(), &JuniorProgress::default());

        Ok(())
    }
}

//! Junior progression through the tracker and the JSON profile store.

use tempfile::tempdir;
use testresult::TestResult;

use aurfc_hub::prelude::*;

#[test]
fn experience_rolls_over_across_sessions() -> TestResult {
    let dir = tempdir()?;

    {
        let (mut tracker, status) =
            ProgressTracker::open(JsonFileStore::new(dir.path()), "junior-7")?;

        assert!(status.is_in_sync());
        assert!(tracker.award_experience(90)?.is_in_sync());
    }

    let (mut tracker, _) = ProgressTracker::open(JsonFileStore::new(dir.path()), "junior-7")?;

    assert_eq!(tracker.progress().experience(), 90);

    assert!(tracker.award_experience(30)?.is_in_sync());

    let progress = tracker.progress();

    assert_eq!(progress.level(), 2);
    assert_eq!(progress.experience(), 20);
    assert_eq!(progress.experience_to_next(), 150);
    assert!(progress.badges().contains("level-2"));

    Ok(())
}

#[test]
fn large_award_crosses_several_levels() -> TestResult {
    let dir = tempdir()?;
    let (mut tracker, _) = ProgressTracker::open(JsonFileStore::new(dir.path()), "junior-8")?;

    assert!(tracker.award_experience(260)?.is_in_sync());

    let progress = tracker.progress();

    assert_eq!(progress.level(), 3);
    assert_eq!(progress.experience(), 10);
    assert_eq!(progress.experience_to_next(), 225);

    let ids: Vec<_> = progress.badges().iter().map(|badge| badge.id.as_str()).collect();

    assert_eq!(ids, ["level-2", "level-3"]);

    Ok(())
}

#[test]
fn skill_clamps_and_mastery_is_awarded_once() -> TestResult {
    let dir = tempdir()?;
    let (mut tracker, _) = ProgressTracker::open(JsonFileStore::new(dir.path()), "junior-9")?;

    assert!(tracker.award_skill_points("Passing", 70)?.is_in_sync());
    assert!(tracker.award_skill_points("passing", 70)?.is_in_sync());
    assert!(tracker.award_skill_points("passing", 5)?.is_in_sync());

    let progress = tracker.progress();

    assert_eq!(progress.skills().get(Skill::Passing), 100);
    assert_eq!(progress.skills().get(Skill::Kicking), 0);
    assert_eq!(progress.badges().len(), 1);

    let badge = progress.badges().get("passing-master").ok_or("missing mastery badge")?;

    assert_eq!(badge.name, "Passing Master");

    Ok(())
}

#[test]
fn invalid_awards_leave_profile_untouched() -> TestResult {
    let dir = tempdir()?;
    let store = JsonFileStore::new(dir.path());
    let (mut tracker, _) = ProgressTracker::open(&store, "junior-10")?;

    assert!(matches!(
        tracker.award_skill_points("scrummaging", 10),
        Err(ProgressError::InvalidSkillName(_))
    ));
    assert!(matches!(
        tracker.award_skill_points("fitness", 0),
        Err(ProgressError::ZeroSkillPoints)
    ));
    assert!(matches!(
        tracker.award_experience(0),
        Err(ProgressError::ZeroExperience)
    ));

    assert_eq!(tracker.progress(), &JuniorProgress::default());
    assert!(ProgressPersistence::load(&store, "junior-10")?.is_none());

    Ok(())
}

#[test]
fn juniors_are_stored_separately() -> TestResult {
    let dir = tempdir()?;
    let store = JsonFileStore::new(dir.path());

    let (mut first, _) = ProgressTracker::open(&store, "junior-1")?;
    let (mut second, _) = ProgressTracker::open(&store, "junior-2")?;

    assert!(first.award_experience(50)?.is_in_sync());
    assert!(second.award_skill_points("teamwork", 40)?.is_in_sync());

    let first = ProgressPersistence::load(&store, "junior-1")?.ok_or("missing junior-1")?;
    let second = ProgressPersistence::load(&store, "junior-2")?.ok_or("missing junior-2")?;

    assert_eq!(first.experience(), 50);
    assert_eq!(first.skills().get(Skill::Teamwork), 0);
    assert_eq!(second.experience(), 0);
    assert_eq!(second.skills().get(Skill::Teamwork), 40);

    Ok(())
}

//! Integration tests for the onboarding wizards and their drafts

use std::fs;
use std::sync::Arc;

use civic_dpi::storage::{FileStore, KeyValueStore};
use civic_dpi::wizard::{
    DraftStore, FileSubmissionSink, FlowKind, Submission, Transition, WizardNavigator,
};
use tempfile::TempDir;

fn draft_store(temp_dir: &TempDir) -> DraftStore {
    let storage: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::new(temp_dir.path().join("storage.json")));
    DraftStore::new(storage)
}

#[test]
fn test_ngo_flow_end_to_end_navigation() {
    let mut wizard = WizardNavigator::new(FlowKind::Ngo);
    assert_eq!(wizard.progress().label(), "Step 1 of 4");
    assert_eq!(wizard.back(), Transition::Stay);

    // Identity is gated until something is picked
    assert_eq!(wizard.next(false), Transition::Blocked);
    assert_eq!(wizard.skip(), Transition::Blocked);
    assert_eq!(wizard.index(), 1);

    assert!(matches!(wizard.next(true), Transition::Moved(s) if s.key == "legal"));
    assert!(matches!(wizard.skip(), Transition::Moved(s) if s.key == "visibility"));
    assert!(matches!(wizard.next(false), Transition::Moved(s) if s.key == "verify"));
    assert!(wizard.is_terminal());
    assert_eq!(wizard.progress().percent(), 100);

    let completed: Vec<bool> = wizard.steps().iter().map(|s| s.completed).collect();
    assert_eq!(completed, vec![true, true, true, false]);

    assert_eq!(wizard.next(false), Transition::Finished);
    // Finishing does not move off the terminal step
    assert_eq!(wizard.index(), 4);
}

#[test]
fn test_navigator_from_route_and_back() {
    let mut wizard = WizardNavigator::from_route("/onboarding/donor/geography").unwrap();
    assert_eq!(wizard.flow(), FlowKind::Donor);
    assert_eq!(wizard.index(), 3);
    assert!(
        matches!(wizard.back(), Transition::Moved(s) if s.route == "/onboarding/donor/interests")
    );
    assert!(WizardNavigator::from_route("/onboarding/donor/unknown").is_none());
}

#[test]
fn test_drafts_survive_restart() {
    let temp_dir = TempDir::new().unwrap();

    let drafts = draft_store(&temp_dir);
    drafts
        .save_step(FlowKind::Talent, "identity", vec!["Volunteer".into()])
        .unwrap();
    drafts
        .save_step(FlowKind::Donor, "interests", vec!["Health".into()])
        .unwrap();

    let reopened = draft_store(&temp_dir);
    let talent = reopened.load(FlowKind::Talent).unwrap().unwrap();
    assert_eq!(talent.answers_for("identity"), ["Volunteer".to_string()]);
    assert!(reopened.load(FlowKind::Ngo).unwrap().is_none());

    let flows: Vec<FlowKind> = reopened.list().unwrap().iter().map(|d| d.flow).collect();
    assert_eq!(flows, vec![FlowKind::Donor, FlowKind::Talent]);

    reopened.discard(FlowKind::Donor).unwrap();
    assert!(draft_store(&temp_dir).load(FlowKind::Donor).unwrap().is_none());
}

#[test]
fn test_resaving_a_step_replaces_answers() {
    let temp_dir = TempDir::new().unwrap();
    let drafts = draft_store(&temp_dir);

    drafts
        .save_step(FlowKind::Donor, "interests", vec!["Health".into(), "Education".into()])
        .unwrap();
    let draft = drafts
        .save_step(FlowKind::Donor, "interests", vec!["Livelihoods".into()])
        .unwrap();

    assert_eq!(draft.answers_for("interests"), ["Livelihoods".to_string()]);
    assert_eq!(draft.answered_steps(), 1);
}

#[tokio::test]
async fn test_submission_written_and_draft_cleared() {
    let temp_dir = TempDir::new().unwrap();
    let drafts = draft_store(&temp_dir);
    let sink = FileSubmissionSink::new(temp_dir.path().join("submissions"));

    drafts
        .save_step(FlowKind::Ngo, "identity", vec!["Registered NGO".into()])
        .unwrap();
    let submission = drafts
        .submit(FlowKind::Ngo, Some("amara@kijani.org"), &sink)
        .await
        .unwrap();

    let written = fs::read_to_string(sink.path_for(&submission)).unwrap();
    let parsed: Submission = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed, submission);
    assert_eq!(parsed.email.as_deref(), Some("amara@kijani.org"));
    assert_eq!(parsed.answers["identity"], vec!["Registered NGO".to_string()]);

    assert!(drafts.load(FlowKind::Ngo).unwrap().is_none());
}

#[tokio::test]
async fn test_failed_delivery_keeps_draft() {
    let temp_dir = TempDir::new().unwrap();
    let drafts = draft_store(&temp_dir);

    // A regular file where the sink expects a directory
    let blocked = temp_dir.path().join("submissions");
    fs::write(&blocked, "not a directory").unwrap();
    let sink = FileSubmissionSink::new(&blocked);

    drafts
        .save_step(FlowKind::Talent, "identity", vec!["Volunteer".into()])
        .unwrap();
    assert!(drafts.submit(FlowKind::Talent, None, &sink).await.is_err());
    assert!(drafts.load(FlowKind::Talent).unwrap().is_some());
}

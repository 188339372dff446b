//! End-to-end wizard behavior through the public API: classification of a
//! full metadata record and a typical navigation session.

use metachecker::metadata::MetadataRecord;
use metachecker::wizard::{
    step_for_field, step_view, NavigationAction, WizardNavigator, WIZARD_STEPS,
};

fn full_record() -> MetadataRecord {
    let mut record = MetadataRecord::default();
    for field in [
        "title",
        "description",
        "keywords",
        "ogTitle",
        "ogDescription",
        "ogImage",
        "ogType",
        "twitterCard",
        "twitterSite",
        "fbAppId",
        "robots",
        "canonicalUrl",
        "themeColor",
    ] {
        assert!(record.set_field(field, format!("{} value", field)));
    }
    record
}

#[test]
fn test_every_present_field_lands_on_exactly_one_step() {
    let record = full_record();
    let total: usize = (0..WIZARD_STEPS.len())
        .map(|i| step_view(&record, i).unwrap().fields.len())
        .sum();
    assert_eq!(total, record.present_fields().len());
}

#[test]
fn test_fields_grouped_by_step() {
    let record = full_record();
    let names = |i: usize| -> Vec<String> {
        step_view(&record, i)
            .unwrap()
            .fields
            .into_iter()
            .map(|f| f.name)
            .collect()
    };

    assert_eq!(names(0), vec!["title", "ogTitle"]);
    assert_eq!(names(1), vec!["description", "keywords", "ogDescription"]);
    assert_eq!(
        names(2),
        vec!["ogImage", "ogType", "twitterCard", "twitterSite", "fbAppId"]
    );
    assert_eq!(names(3), vec!["robots", "canonicalUrl", "themeColor"]);
}

#[test]
fn test_classification_is_case_insensitive_for_patterns() {
    assert_eq!(step_for_field("PageTITLE"), 0);
    assert_eq!(step_for_field("OGfoo"), 2);
    assert_eq!(step_for_field("heroImageUrl"), 2);
    assert_eq!(step_for_field(""), 3);
}

#[test]
fn test_navigation_session() {
    let mut nav = WizardNavigator::new(WIZARD_STEPS.len(), None);
    assert!(nav.is_first_step());

    nav.apply(NavigationAction::Next);
    nav.apply(NavigationAction::Next);
    assert_eq!(nav.current_step(), 2);
    assert_eq!(nav.completed_steps(), vec![0, 1]);

    // Jumping back keeps completions; only completed or current steps are clickable
    nav.apply(NavigationAction::GoTo { step: 0 });
    assert_eq!(nav.current_step(), 0);
    assert!(nav.is_step_completed(1));
    assert!(nav.can_navigate_to(1));
    assert!(!nav.can_navigate_to(3));

    nav.apply(NavigationAction::Previous);
    assert_eq!(nav.current_step(), 0);

    nav.apply(NavigationAction::GoTo { step: 3 });
    nav.apply(NavigationAction::Next);
    assert!(nav.is_last_step());
    assert!(!nav.is_step_completed(3));
}

#[test]
fn test_snapshot_round_trip_through_json() {
    let mut nav = WizardNavigator::new(4, Some(1));
    nav.go_next();

    let json = serde_json::to_string(&nav.snapshot()).unwrap();
    let restored = WizardNavigator::from_snapshot(&serde_json::from_str(&json).unwrap());
    assert_eq!(restored, nav);
}

use super::*;

#[test]
fn begin_inserts_zero_and_drop_removes() {
    let reg = ProgressRegistry::new();
    let h = reg.begin("job-a").unwrap();
    assert_eq!(reg.get("job-a"), Some(0));
    assert_eq!(h.job_id(), "job-a");
    drop(h);
    assert_eq!(reg.get("job-a"), None);
}

#[test]
fn report_is_monotonic_and_clamped() {
    let reg = ProgressRegistry::new();
    let h = reg.begin("j").unwrap();
    assert_eq!(h.report(40), 40);
    assert_eq!(h.report(10), 40);
    assert_eq!(reg.get("j"), Some(40));
    assert_eq!(h.report(250), 100);
}

#[test]
fn complete_sets_hundred() {
    let reg = ProgressRegistry::new();
    let h = reg.begin("j").unwrap();
    h.report(99);
    h.complete();
    assert_eq!(reg.get("j"), Some(100));
}

#[test]
fn duplicate_active_job_is_rejected_until_released() {
    let reg = ProgressRegistry::new();
    let h = reg.begin("same").unwrap();
    let err = reg.begin("same").unwrap_err();
    assert!(matches!(err, NoiseError::Validation(_)));
    drop(h);
    assert!(reg.begin("same").is_ok());
}

#[test]
fn active_jobs_are_sorted() {
    let reg = ProgressRegistry::new();
    let _b = reg.begin("b").unwrap();
    let _a = reg.begin("a").unwrap();
    assert_eq!(reg.active_jobs(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn unknown_job_is_none() {
    assert_eq!(ProgressRegistry::new().get("nope"), None);
}

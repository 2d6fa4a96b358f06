use syllabus_core::db::open_db_in_memory;
use syllabus_core::{
    ChangeKind, DocumentTemplate, EntityRepository, RepoError, SaveOutcome, Session, Subject,
    Teacher,
};

fn template(id: i64, name: &str) -> DocumentTemplate {
    DocumentTemplate {
        id,
        name: name.to_string(),
        body: "body".to_string(),
    }
}

#[test]
fn saving_nothing_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let session = Session::try_new(&conn).unwrap();

    assert_eq!(session.save().unwrap(), SaveOutcome::default());
}

#[test]
fn failed_save_rolls_back_every_staged_change() {
    let conn = open_db_in_memory().unwrap();
    let session = Session::try_new(&conn).unwrap();
    let repo = session.repository::<Teacher>();

    repo.add(&Teacher::new("Ana", "Kovač", "shared@uni.example"))
        .unwrap();
    repo.add(&Teacher::new("Ivo", "Babić", "shared@uni.example"))
        .unwrap();

    let err = session.save().unwrap_err();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn failed_save_keeps_staged_changes_until_discarded() {
    let conn = open_db_in_memory().unwrap();
    let session = Session::try_new(&conn).unwrap();
    let repo = session.repository::<DocumentTemplate>();

    repo.add(&template(1, "kept")).unwrap();
    repo.update(&template(77, "missing")).unwrap();
    assert!(session.save().is_err());
    assert_eq!(session.pending_changes(), 2);
    assert!(!repo.exists(1).unwrap());

    session.discard();
    assert_eq!(session.pending_changes(), 0);
    assert_eq!(session.save().unwrap().rows_affected, 0);
}

#[test]
fn update_of_missing_record_is_a_stale_write() {
    let conn = open_db_in_memory().unwrap();
    let session = Session::try_new(&conn).unwrap();
    let repo = session.repository::<DocumentTemplate>();

    repo.update(&template(99, "ghost")).unwrap();
    match session.save().unwrap_err() {
        RepoError::StaleWrite { entity, id, kind } => {
            assert_eq!(entity, "document template");
            assert_eq!(id, 99);
            assert_eq!(kind, ChangeKind::Update);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn delete_of_missing_record_is_a_stale_write() {
    let conn = open_db_in_memory().unwrap();
    let session = Session::try_new(&conn).unwrap();

    session
        .repository::<DocumentTemplate>()
        .delete_by_id(12)
        .unwrap();
    assert!(matches!(
        session.save(),
        Err(RepoError::StaleWrite {
            id: 12,
            kind: ChangeKind::Delete,
            ..
        })
    ));
}

#[test]
fn staged_changes_apply_in_call_order() {
    let conn = open_db_in_memory().unwrap();
    let session = Session::try_new(&conn).unwrap();
    let repo = session.repository::<DocumentTemplate>();

    repo.add(&template(5, "first")).unwrap();
    repo.update(&template(5, "second")).unwrap();
    repo.delete_by_id(5).unwrap();
    repo.add(&template(5, "third")).unwrap();

    let outcome = session.save().unwrap();
    assert_eq!(outcome.rows_affected, 4);
    assert_eq!(outcome.inserted_ids(), vec![5, 5]);
    assert_eq!(repo.get_by_id(5).unwrap().name, "third");
}

#[test]
fn repositories_of_one_session_share_the_unit_of_work() {
    let conn = open_db_in_memory().unwrap();
    let session = Session::try_new(&conn).unwrap();
    let teachers = session.repository::<Teacher>();
    let templates = session.repository::<DocumentTemplate>();

    let pending_teacher = teachers
        .add(&Teacher::new("Ana", "Kovač", "ana@uni.example"))
        .unwrap();
    let pending_template = templates.add(&template(0, "letter")).unwrap();
    assert_eq!(session.pending_changes(), 2);

    let outcome = session.save().unwrap();
    let teacher_id = outcome.id_of(pending_teacher).unwrap();
    let template_id = outcome.id_of(pending_template).unwrap();
    assert!(teachers.exists(teacher_id).unwrap());
    assert!(templates.exists(template_id).unwrap());
}

#[test]
fn separate_sessions_see_only_committed_state() {
    let conn = open_db_in_memory().unwrap();
    let writer = Session::try_new(&conn).unwrap();
    let reader = Session::try_new(&conn).unwrap();

    writer
        .repository::<DocumentTemplate>()
        .add(&template(8, "shared"))
        .unwrap();
    assert!(!reader.repository::<DocumentTemplate>().exists(8).unwrap());

    writer.save().unwrap();
    assert!(reader.repository::<DocumentTemplate>().exists(8).unwrap());
}

#[test]
fn rows_affected_counts_direct_writes_only() {
    let conn = open_db_in_memory().unwrap();
    let session = Session::try_new(&conn).unwrap();
    let teachers = session.repository::<Teacher>();
    let subjects = session.repository::<Subject>();

    teachers
        .add(&Teacher {
            id: 3,
            ..Teacher::new("Ana", "Kovač", "ana@uni.example")
        })
        .unwrap();
    for (id, code) in [(10, "CS-101"), (11, "CS-102")] {
        subjects
            .add(&Subject {
                id,
                code: code.to_string(),
                name: "Databases".to_string(),
                ects_credits: 6,
                semester: 3,
                teacher_id: Some(3),
            })
            .unwrap();
    }
    assert_eq!(session.save().unwrap().rows_affected, 3);

    teachers.delete_by_id(3).unwrap();
    assert_eq!(session.save().unwrap().rows_affected, 1);
    assert_eq!(subjects.get_by_id(10).unwrap().teacher_id, None);
    assert_eq!(subjects.get_by_id(11).unwrap().teacher_id, None);
}

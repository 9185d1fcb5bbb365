use chrono::NaiveDate;
use folio_core::db::open_db_in_memory;
use folio_core::{
    ContentError, ContentService, FixedClock, PostDraft, SqliteCategoryRepository,
    SqlitePostRepository,
};
use rusqlite::Connection;

type Service<'conn> =
    ContentService<SqlitePostRepository<'conn>, SqliteCategoryRepository<'conn>>;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

fn service(conn: &Connection) -> Service<'_> {
    ContentService::with_clock(
        SqlitePostRepository::try_new(conn).unwrap(),
        SqliteCategoryRepository::try_new(conn).unwrap(),
        FixedClock(today()),
    )
}

#[test]
fn create_post_stamps_today_and_defaults_to_unpublished() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let post = service
        .create_post(Some(PostDraft::new("Hello", "First words").with_category(3)))
        .unwrap();

    assert_eq!(post.post_date, today());
    assert_eq!(post.post_date_string(), "2024-05-17");
    assert!(!post.published);
    assert_eq!(post.category_id, Some(3));
    assert_eq!(post.feature_image, None);
    assert_eq!(service.get_by_id(post.id).unwrap(), post);
}

#[test]
fn any_published_field_value_publishes() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    for raw in ["on", "true", "false", ""] {
        let post = service
            .create_post(Some(PostDraft::new("t", "b").with_published_field(raw)))
            .unwrap();
        assert!(post.published, "field value `{raw}` should publish");
    }
    assert_eq!(service.list_published().unwrap().len(), 4);
}

#[test]
fn missing_draft_is_invalid_input_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    match service.create_post(None) {
        Err(ContentError::InvalidInput(message)) => assert!(message.contains("draft")),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
    assert!(service.list_all().unwrap_err().is_empty_result());
}

#[test]
fn created_posts_get_distinct_ids_and_appear_in_listings() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let first = service
        .create_post(Some(
            PostDraft::new("one", "b").with_feature_image("https://img.example/one.png"),
        ))
        .unwrap();
    let second = service.create_post(Some(PostDraft::new("two", "b"))).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(
        first.feature_image.as_deref(),
        Some("https://img.example/one.png")
    );

    assert!(service.delete_post_by_id(second.id).unwrap());
    let third = service.create_post(Some(PostDraft::new("three", "b"))).unwrap();
    assert!(third.id > second.id);

    let titles = service
        .list_all()
        .unwrap()
        .into_iter()
        .map(|post| post.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["one", "three"]);
}

#[test]
fn drafts_deserialize_from_form_style_json() {
    let draft: PostDraft = serde_json::from_str(
        r#"{"title":"t","body":"b","featureImage":"","published":"on","categoryId":2}"#,
    )
    .unwrap();
    assert!(draft.publish_requested());

    let conn = open_db_in_memory().unwrap();
    let post = service(&conn).create_post(Some(draft)).unwrap();
    assert!(post.published);
    assert_eq!(post.feature_image, None);
    assert_eq!(post.category_id, Some(2));

    let unticked: PostDraft = serde_json::from_str(r#"{"title":"t","body":"b"}"#).unwrap();
    assert!(!unticked.publish_requested());
}

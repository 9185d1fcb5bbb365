use chrono::NaiveDate;
use folio_core::db::open_db_in_memory;
use folio_core::{
    ContentError, ContentService, Post, PostQuery, PostRepository, PostsView,
    SqliteCategoryRepository, SqlitePostRepository,
};

fn seeded_post(id: i64, date: &str, published: bool, category_id: Option<i64>) -> Post {
    Post {
        id,
        title: format!("post {id}"),
        body: String::new(),
        feature_image: None,
        post_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        published,
        category_id,
    }
}

#[test]
fn run_query_dispatches_each_variant() {
    let conn = open_db_in_memory().unwrap();
    let posts = SqlitePostRepository::try_new(&conn).unwrap();
    let first = seeded_post(1, "2024-01-10", true, Some(2));
    let second = seeded_post(2, "2024-02-01", false, Some(3));
    posts.import(&first).unwrap();
    posts.import(&second).unwrap();
    let service = ContentService::new(posts, SqliteCategoryRepository::try_new(&conn).unwrap());

    let all = PostQuery::from_params(None, None, None).unwrap();
    assert_eq!(
        service.run_query(&all).unwrap(),
        PostsView::List(vec![first.clone(), second.clone()])
    );

    let by_category = PostQuery::from_params(Some("3"), None, None).unwrap();
    assert_eq!(
        service.run_query(&by_category).unwrap(),
        PostsView::List(vec![second.clone()])
    );

    let by_id = PostQuery::from_params(None, Some("1"), None).unwrap();
    let view = service.run_query(&by_id).unwrap();
    assert_eq!(view, PostsView::Single(first));
    assert_eq!(view.len(), 1);

    let since = PostQuery::from_params(None, None, Some("2024-01-11")).unwrap();
    assert_eq!(
        service.run_query(&since).unwrap(),
        PostsView::List(vec![second])
    );

    let missing = PostQuery::from_params(None, Some("9"), None).unwrap();
    assert!(matches!(
        service.run_query(&missing),
        Err(ContentError::NotFound(9))
    ));

    let empty_category = PostQuery::from_params(Some("4"), None, None).unwrap();
    assert!(service.run_query(&empty_category).unwrap_err().is_empty_result());
}

#[test]
fn malformed_parameters_are_invalid_input() {
    for (category, id, min_date) in [
        (Some("two"), None, None),
        (None, Some("12abc"), None),
        (None, Some(""), None),
        (None, None, Some("15/01/2024")),
    ] {
        match PostQuery::from_params(category, id, min_date) {
            Err(ContentError::InvalidInput(_)) => {}
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}

#[test]
fn views_serialize_as_plain_json() {
    let post = seeded_post(5, "2024-03-09", true, None);
    let single = serde_json::to_value(PostsView::Single(post.clone())).unwrap();
    assert_eq!(single["id"], 5);
    assert_eq!(single["postDate"], "2024-03-09");
    assert_eq!(single["featureImage"], serde_json::Value::Null);
    assert_eq!(single["categoryId"], serde_json::Value::Null);

    let list = serde_json::to_value(PostsView::List(vec![post])).unwrap();
    assert!(list.is_array());
}

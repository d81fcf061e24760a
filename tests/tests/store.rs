use fce_client::{
    api::{Comment, CourseId, FetchError, Identity, Reply, UserId, WriteError},
    CommentStore, StoreConfig,
};
use fce_mock_store::MockStore;

fn course(n: &str) -> CourseId {
    CourseId(String::from(n))
}

fn user(name: &str) -> Identity {
    Identity::User(UserId(String::from(name)))
}

fn comment(author: &str, course_number: &str, header: &str) -> Comment {
    Comment::draft(
        UserId(String::from(author)),
        course(course_number),
        String::from(header),
        format!("{header} body"),
        false,
        String::from("Jun 18, 2019 at 3:04 PM"),
    )
}

fn reply(author: &str, text: &str) -> Reply {
    Reply::draft(
        UserId(String::from(author)),
        String::from(text),
        false,
        String::from("Jun 18, 2019 at 3:05 PM"),
    )
}

fn store(mock: &MockStore) -> CommentStore<MockStore, MockStore> {
    CommentStore::new(mock.clone(), mock.clone(), StoreConfig::default())
}

#[tokio::test]
async fn first_post_creates_the_document() {
    let mock = MockStore::new();
    let mut s = store(&mock);
    let c = course("15-122");

    let doc = s.load_comments(&c).await.expect("loading empty course");
    assert!(doc.comments.is_empty());
    assert_eq!(doc.object_id, None);
    assert!(mock.test_document(&c).is_none());

    let draft = comment("alice", "15-122", "Great course");
    let doc = s
        .post_comment(&user("alice"), &c, draft.clone())
        .await
        .expect("posting");
    assert_eq!(doc.comments, vec![draft]);
    assert!(doc.object_id.is_some());
    assert_eq!(mock.test_document(&c), Some(doc.clone()));
    assert_eq!(s.cached(&c), Some(&doc));
}

#[tokio::test]
async fn post_goes_to_the_top() {
    let mock = MockStore::new();
    let c = course("15-150");
    let old = vec![comment("bob", "15-150", "b"), comment("carol", "15-150", "c")];
    mock.admin_put_document(c.clone(), old.clone());
    let mut s = store(&mock);

    let draft = comment("alice", "15-150", "a");
    let doc = s
        .post_comment(&user("alice"), &c, draft.clone())
        .await
        .expect("posting");
    assert_eq!(doc.comments.len(), old.len() + 1);
    assert_eq!(doc.comments[0], draft);
    assert_eq!(&doc.comments[1..], &old[..]);
}

#[tokio::test]
async fn edit_replaces_in_place() {
    let mock = MockStore::new();
    let c = course("15-213");
    let mine = comment("alice", "15-213", "first take");
    let others = vec![comment("bob", "15-213", "b"), mine.clone(), comment("carol", "15-213", "c")];
    mock.admin_put_document(c.clone(), others.clone());
    let mut s = store(&mock);

    let updated = mine.edited(String::from("second take"), String::from("changed my mind"), true);
    let doc = s
        .edit_comment(&user("alice"), &c, 1, updated.clone())
        .await
        .expect("editing");
    assert_eq!(doc.comments.len(), 3);
    assert_eq!(doc.comments[0], others[0]);
    assert_eq!(doc.comments[1], updated);
    assert_eq!(doc.comments[2], others[2]);
}

#[tokio::test]
async fn edit_then_load_round_trips() {
    let mock = MockStore::new();
    let c = course("21-241");
    let mine = comment("alice", "21-241", "hard");
    mock.admin_put_document(c.clone(), vec![mine.clone()]);
    let mut s = store(&mock);

    let updated = mine.edited(String::from("fair"), String::from("it gets better"), false);
    s.edit_comment(&user("alice"), &c, 0, updated.clone())
        .await
        .expect("editing");

    // a fresh client sees the same thing
    let mut other = store(&mock);
    let doc = other.load_comments(&c).await.expect("loading");
    assert_eq!(doc.comments, vec![updated]);
}

#[tokio::test]
async fn reply_goes_to_the_top_of_its_comment() {
    let mock = MockStore::new();
    let c = course("15-122");
    let mut commented = comment("bob", "15-122", "Is the workload reasonable?");
    commented.replies = vec![reply("carol", "older reply")];
    let untouched = comment("carol", "15-122", "Other");
    mock.admin_put_document(c.clone(), vec![untouched.clone(), commented.clone()]);
    let mut s = store(&mock);

    let r = reply("alice", "Yes, mostly");
    let doc = s
        .post_reply(&user("alice"), &c, 1, r.clone())
        .await
        .expect("replying");
    assert_eq!(doc.comments[0], untouched);
    assert_eq!(doc.comments[1].replies.len(), 2);
    assert_eq!(doc.comments[1].replies[0], r);
    assert_eq!(doc.comments[1].replies[1], commented.replies[0]);
    assert_eq!(doc.comments[1].header, commented.header);
}

#[tokio::test]
async fn out_of_range_edit_leaves_everything_alone() {
    let mock = MockStore::new();
    let c = course("15-122");
    let comments = vec![
        comment("alice", "15-122", "a"),
        comment("alice", "15-122", "b"),
        comment("alice", "15-122", "c"),
    ];
    mock.admin_put_document(c.clone(), comments.clone());
    let mut s = store(&mock);
    s.load_comments(&c).await.expect("loading");
    let cached = s.cached(&c).cloned();

    let err = s
        .edit_comment(&user("alice"), &c, 5, comment("alice", "15-122", "x"))
        .await
        .expect_err("index 5 of 3");
    assert_eq!(err, WriteError::IndexOutOfRange { index: 5, len: 3 });
    assert_eq!(mock.test_num_saves(), 0);
    assert_eq!(mock.test_document(&c).map(|d| d.comments), Some(comments));
    assert_eq!(s.cached(&c).cloned(), cached);
}

#[tokio::test]
async fn failed_save_keeps_cache() {
    let mock = MockStore::new();
    let c = course("15-150");
    mock.admin_put_document(c.clone(), vec![comment("bob", "15-150", "b")]);
    let mut s = store(&mock);
    let before = s.load_comments(&c).await.expect("loading");

    mock.fail_next_save("disk on fire");
    let err = s
        .post_comment(&user("alice"), &c, comment("alice", "15-150", "a"))
        .await
        .expect_err("save was made to fail");
    match err {
        WriteError::RemoteError(msg) => assert!(msg.contains("disk on fire")),
        e => panic!("unexpected error {e:?}"),
    }
    assert_eq!(s.cached(&c), Some(&before));
    assert_eq!(mock.test_document(&c).map(|d| d.comments), Some(before.comments));
}

#[tokio::test]
async fn failed_refetch_aborts_the_write() {
    let mock = MockStore::new();
    let c = course("15-150");
    mock.admin_put_document(c.clone(), vec![]);
    let mut s = store(&mock);

    mock.fail_next_fetch("timeout");
    let err = s
        .post_comment(&user("alice"), &c, comment("alice", "15-150", "a"))
        .await
        .expect_err("fetch was made to fail");
    assert!(matches!(err, WriteError::RemoteError(_)));
    assert_eq!(mock.test_num_saves(), 0);
}

#[tokio::test]
async fn writes_see_other_clients_changes() {
    let mock = MockStore::new();
    let c = course("76-101");
    mock.admin_put_document(c.clone(), vec![comment("bob", "76-101", "b")]);
    let mut s = store(&mock);
    s.load_comments(&c).await.expect("loading");

    let theirs = comment("carol", "76-101", "c");
    mock.test_concurrent_insert(&c, theirs.clone());

    let mine = comment("alice", "76-101", "a");
    let doc = s
        .post_comment(&user("alice"), &c, mine.clone())
        .await
        .expect("posting");
    assert_eq!(doc.comments.len(), 3);
    assert_eq!(doc.comments[0], mine);
    assert_eq!(doc.comments[1], theirs);
}

#[tokio::test]
async fn edit_after_concurrent_insert_is_refused() {
    let mock = MockStore::new();
    let c = course("76-101");
    let mine = comment("alice", "76-101", "a");
    mock.admin_put_document(c.clone(), vec![mine.clone()]);
    let mut s = store(&mock);
    s.load_comments(&c).await.expect("loading");

    // index 0 now holds someone else's comment
    mock.test_concurrent_insert(&c, comment("alice", "76-101", "newer"));

    let err = s
        .edit_comment(&user("alice"), &c, 0, mine.edited(String::from("a2"), String::new(), false))
        .await
        .expect_err("entry moved");
    assert_eq!(err, WriteError::EntryMoved { index: 0 });
    assert_eq!(mock.test_num_saves(), 0);
}

#[tokio::test]
async fn edit_of_removed_comment_is_refused() {
    let mock = MockStore::new();
    let c = course("76-101");
    let mine = comment("alice", "76-101", "a");
    mock.admin_put_document(c.clone(), vec![mine.clone()]);
    let mut s = store(&mock);

    mock.test_concurrent_remove(&c, 0).expect("removing");
    let err = s
        .edit_comment(&user("alice"), &c, 0, mine.edited(String::from("a2"), String::new(), false))
        .await
        .expect_err("comment is gone");
    assert_eq!(err, WriteError::IndexOutOfRange { index: 0, len: 0 });
}

#[tokio::test]
async fn guests_and_strangers_cannot_write() {
    let mock = MockStore::new();
    let c = course("15-122");
    let bobs = comment("bob", "15-122", "b");
    mock.admin_put_document(c.clone(), vec![bobs.clone()]);
    let mut s = store(&mock);

    let err = s
        .post_comment(&Identity::Guest, &c, comment("bob", "15-122", "x"))
        .await
        .expect_err("guest post");
    assert_eq!(err, WriteError::NotAuthenticated);

    let err = s
        .post_comment(&user("alice"), &c, comment("bob", "15-122", "impersonating"))
        .await
        .expect_err("post as someone else");
    assert_eq!(err, WriteError::PermissionDenied);

    let mut forged = bobs.edited(String::from("mine now"), String::new(), false);
    forged.author_id = UserId(String::from("alice"));
    let err = s
        .edit_comment(&user("alice"), &c, 0, forged)
        .await
        .expect_err("edit of someone else's comment");
    assert_eq!(err, WriteError::PermissionDenied);

    let err = s
        .delete_comment(&user("alice"), &c, 0)
        .await
        .expect_err("delete of someone else's comment");
    assert_eq!(err, WriteError::PermissionDenied);

    let err = s
        .post_reply(&Identity::Guest, &c, 0, reply("bob", "hi"))
        .await
        .expect_err("guest reply");
    assert_eq!(err, WriteError::NotAuthenticated);

    assert_eq!(mock.test_num_saves(), 0);
    assert_eq!(mock.test_document(&c).map(|d| d.comments), Some(vec![bobs]));
}

#[tokio::test]
async fn invalid_drafts_are_refused_before_any_request() {
    let mock = MockStore::new();
    let c = course("15-122");
    let mut s = store(&mock);

    let err = s
        .post_comment(&user("alice"), &c, comment("alice", "15-122", "   "))
        .await
        .expect_err("blank header");
    assert!(matches!(err, WriteError::InvalidDraft(_)));
    assert_eq!(mock.test_num_fetches(), 0);
}

#[tokio::test]
async fn delete_removes_only_that_comment() {
    let mock = MockStore::new();
    let c = course("15-213");
    let comments = vec![
        comment("bob", "15-213", "b"),
        comment("alice", "15-213", "a"),
        comment("carol", "15-213", "c"),
    ];
    mock.admin_put_document(c.clone(), comments.clone());
    let mut s = store(&mock);

    let doc = s
        .delete_comment(&user("alice"), &c, 1)
        .await
        .expect("deleting");
    assert_eq!(doc.comments, vec![comments[0].clone(), comments[2].clone()]);
}

#[tokio::test]
async fn offline_loads_serve_the_cache() {
    let mock = MockStore::new();
    let c = course("15-122");
    mock.admin_put_document(c.clone(), vec![comment("bob", "15-122", "b")]);
    let mut s = store(&mock);

    mock.set_connected(false);
    assert_eq!(s.load_comments(&c).await, Err(FetchError::NetworkUnavailable));

    mock.set_connected(true);
    let online = s.load_comments(&c).await.expect("loading");
    let fetches = mock.test_num_fetches();

    mock.set_connected(false);
    assert_eq!(s.load_comments(&c).await, Ok(online));
    assert_eq!(mock.test_num_fetches(), fetches);

    s.teardown();
    assert_eq!(s.load_comments(&c).await, Err(FetchError::NetworkUnavailable));
}

#[tokio::test]
async fn offline_writes_are_refused() {
    let mock = MockStore::new();
    let c = course("15-122");
    mock.admin_put_document(c.clone(), vec![comment("alice", "15-122", "a")]);
    let mut s = store(&mock);
    s.load_comments(&c).await.expect("loading");
    mock.set_connected(false);

    let err = s
        .post_comment(&user("alice"), &c, comment("alice", "15-122", "b"))
        .await
        .expect_err("offline post");
    assert_eq!(err, WriteError::NetworkUnavailable);
    let err = s
        .delete_comment(&user("alice"), &c, 0)
        .await
        .expect_err("offline delete");
    assert_eq!(err, WriteError::NetworkUnavailable);
    assert_eq!(s.cached(&c).map(|d| d.comments.len()), Some(1));
}

#[tokio::test]
async fn courses_do_not_interfere() {
    let mock = MockStore::new();
    let a = course("15-122");
    let b = course("15-150");
    mock.admin_put_document(b.clone(), vec![comment("bob", "15-150", "b")]);
    let mut s = store(&mock);

    s.post_comment(&user("alice"), &a, comment("alice", "15-122", "a"))
        .await
        .expect("posting");
    assert_eq!(mock.test_document(&b).map(|d| d.comments.len()), Some(1));
    assert_eq!(mock.test_document(&a).map(|d| d.comments.len()), Some(1));
}

#[tokio::test]
async fn first_reply_on_a_comment() {
    let mock = MockStore::new();
    let c = course("15-122");
    let great = comment("bob", "15-122", "Great class");
    assert!(great.replies.is_empty());
    mock.admin_put_document(c.clone(), vec![great.clone()]);
    let mut s = store(&mock);

    let r = reply("alice", "Agreed");
    s.post_reply(&user("alice"), &c, 0, r.clone())
        .await
        .expect("replying");

    let stored = mock.test_document(&c).expect("document exists");
    assert_eq!(stored.comments.len(), 1);
    assert_eq!(stored.comments[0].header, "Great class");
    assert_eq!(stored.comments[0].replies, vec![r]);
}

#[tokio::test]
async fn comments_stay_in_their_course() {
    let mock = MockStore::new();
    let c = course("15-122");
    let mine = comment("alice", "15-122", "a");
    mock.admin_put_document(c.clone(), vec![mine.clone()]);
    let mut s = store(&mock);

    let err = s
        .post_comment(&user("alice"), &c, comment("alice", "99-999", "elsewhere"))
        .await
        .expect_err("post for another course");
    assert!(matches!(err, WriteError::InvalidDraft(_)));

    let mut moved = mine.edited(String::from("a2"), String::new(), false);
    moved.course_number = course("99-999");
    let err = s
        .edit_comment(&user("alice"), &c, 0, moved)
        .await
        .expect_err("edit moving the comment to another course");
    assert!(matches!(err, WriteError::InvalidDraft(_)));

    assert_eq!(mock.test_num_fetches(), 0);
    assert_eq!(mock.test_document(&c).map(|d| d.comments), Some(vec![mine]));
    assert!(mock.test_document(&course("99-999")).is_none());
}

//! Shared fixtures for record XML integration tests.

#![allow(dead_code)]

use helios_recxml::memory::{MemoryStore, StoredRecord, TypeDef};
use serde_json::json;

/// Users, posts and comments:
///
/// - post 1 has an author, two comments and no editor;
/// - post 2 has no author, no comments and a nil body;
/// - post 3 has an author and one comment.
pub fn blog_store() -> MemoryStore {
    MemoryStore::from_json_value(json!({
        "types": [
            {
                "name": "User",
                "columns": [
                    { "name": "id", "kind": "integer" },
                    { "name": "name", "kind": "string" },
                    { "name": "email", "kind": "string" }
                ],
                "associations": [
                    { "name": "posts", "kind": "has_many", "target": "Post", "foreign_key": "author_id" }
                ]
            },
            {
                "name": "Post",
                "columns": [
                    { "name": "id", "kind": "integer" },
                    { "name": "title", "kind": "string" },
                    { "name": "body", "kind": "text" },
                    { "name": "published", "kind": "boolean" },
                    { "name": "rating", "kind": "float" },
                    { "name": "author_id", "kind": "integer" },
                    { "name": "editor_id", "kind": "integer" },
                    { "name": "created_at", "kind": "datetime" },
                    { "name": "published_on", "kind": "date" }
                ],
                "methods": [
                    { "name": "comment_count", "kind": "integer" }
                ],
                "associations": [
                    { "name": "author", "kind": "belongs_to", "target": "User" },
                    { "name": "editor", "kind": "belongs_to", "target": "User" },
                    { "name": "comments", "kind": "has_many", "target": "Comment" }
                ]
            },
            {
                "name": "Comment",
                "columns": [
                    { "name": "id", "kind": "integer" },
                    { "name": "post_id", "kind": "integer" },
                    { "name": "user_id", "kind": "integer" },
                    { "name": "body", "kind": "text" }
                ],
                "associations": [
                    { "name": "post", "kind": "belongs_to", "target": "Post" },
                    { "name": "commenter", "kind": "belongs_to", "target": "User", "foreign_key": "user_id" }
                ]
            }
        ],
        "records": {
            "User": [
                { "id": 1, "name": "Ann", "email": "ann@example.com" },
                { "id": 2, "name": "Bob", "email": null }
            ],
            "Post": [
                {
                    "id": 1, "title": "Hello & welcome", "body": "First post", "published": true,
                    "rating": 4.5, "author_id": 1, "editor_id": null,
                    "created_at": "2008-01-01 12:00:00", "published_on": "2008-01-02",
                    "comment_count": 2
                },
                {
                    "id": 2, "title": "Draft", "body": null, "published": false,
                    "rating": null, "author_id": null, "editor_id": null,
                    "created_at": "2008-02-01T09:30:00", "published_on": null,
                    "comment_count": 0
                },
                {
                    "id": 3, "title": "Third", "body": "More", "published": true,
                    "rating": 3.0, "author_id": 2, "editor_id": 1,
                    "created_at": "2008-03-01 08:00:00", "published_on": "2008-03-01",
                    "comment_count": 1
                }
            ],
            "Comment": [
                { "id": 10, "post_id": 1, "user_id": 2, "body": "Nice" },
                { "id": 11, "post_id": 3, "user_id": 1, "body": "Thanks" },
                { "id": 12, "post_id": 1, "user_id": 1, "body": null }
            ]
        }
    }))
    .expect("blog fixture should load")
}

pub fn post(store: &MemoryStore, id: i64) -> StoredRecord<'_> {
    store.find("Post", id).expect("post fixture should exist")
}

pub fn post_type(store: &MemoryStore) -> &TypeDef {
    store.type_def("Post").expect("Post type should exist")
}

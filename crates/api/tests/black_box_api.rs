use reqwest::StatusCode;
use serde_json::{json, Value};

use mflix_api::app::{build_app, AppServices};

const UNKNOWN_ID: &str = "5a9427648b0beebeb69579e7";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, over a fresh in-memory store on an ephemeral port.
        let app = build_app(AppServices::in_memory());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create_movie(&self, body: &Value) -> String {
        let res = self
            .client
            .post(self.url("/api/movies"))
            .json(body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await.unwrap();
        body["data"]["_id"].as_str().unwrap().to_string()
    }

    async fn create_comment(&self, movie_id: &str) -> String {
        let res = self
            .client
            .post(self.url(&format!("/api/movie/{movie_id}/comments")))
            .json(&comment_body(movie_id))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["data"]["_id"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn movie_body() -> Value {
    json!({
        "plot": "A group of bandits stage a brazen train hold-up.",
        "genres": ["Short", "Western"],
        "runtime": 11,
        "cast": ["A.C. Abadie", "Gilbert M. 'Broncho Billy' Anderson"],
        "poster": "https://example.org/poster.jpg",
        "title": "The Great Train Robbery",
        "fullplot": "Among the earliest existing films in American cinema.",
        "languages": ["English"],
        "released": "1903-12-01T00:00:00Z",
        "directors": ["Edwin S. Porter"],
        "rated": "TV-G",
        "awards": "1 win.",
        "lastupdated": "2015-08-13 00:27:59.177000000",
        "year": 1903,
        "imdb": { "rating": 7.4, "votes": 9847, "id": 439 },
        "countries": ["USA"],
        "type": "movie",
        "tomatoes": {
            "viewer": { "rating": 3.7, "numReviews": 2559, "meter": 75 },
            "lastUpdated": "2015-08-08T19:16:10Z"
        },
        "num_mflix_comments": 0
    })
}

fn comment_body(movie_id: &str) -> Value {
    json!({
        "name": "Mercedes Tyler",
        "email": "mercedes_tyler@fakegmail.com",
        "movie_id": movie_id,
        "text": "Eius veritatis vero facilis quaerat fuga temporibus.",
        "date": "2002-08-18T04:56:07Z"
    })
}

#[tokio::test]
async fn health_pings_the_store() {
    let server = TestServer::spawn().await;

    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn created_movie_reads_back_with_canonical_dates() {
    let server = TestServer::spawn().await;

    let res = server
        .client
        .post(server.url("/api/movies"))
        .json(&movie_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["status"], 201);
    assert_eq!(created["message"], "Movie added successfully");
    let id = created["data"]["_id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let res = server
        .client
        .get(server.url(&format!("/api/movie/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let movie = &body["data"];
    assert_eq!(body["status"], 200);
    assert_eq!(movie["_id"], id.as_str());
    assert_eq!(movie["title"], "The Great Train Robbery");
    assert_eq!(movie["type"], "movie");
    assert_eq!(movie["released"], "1903-12-01T00:00:00.000Z");
    assert_eq!(movie["lastupdated"], "2015-08-13T00:27:59.177Z");
    assert_eq!(movie["tomatoes"]["viewer"]["numReviews"], 2559);

    let res = server.client.get(server.url("/api/movies")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list: Value = res.json().await.unwrap();
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn movie_list_is_capped_at_ten() {
    let server = TestServer::spawn().await;
    for _ in 0..12 {
        server.create_movie(&movie_body()).await;
    }

    let res = server.client.get(server.url("/api/movies")).send().await.unwrap();
    let list: Value = res.json().await.unwrap();
    assert_eq!(list["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn movie_missing_released_is_rejected() {
    let server = TestServer::spawn().await;

    let mut body = movie_body();
    body.as_object_mut().unwrap().remove("released");

    let res = server
        .client
        .post(server.url("/api/movies"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Bad Request. Missing required fields." }));

    // Null counts as missing.
    let mut body = movie_body();
    body["title"] = Value::Null;
    let res = server
        .client
        .post(server.url("/api/movies"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server.client.get(server.url("/api/movies")).send().await.unwrap();
    let list: Value = res.json().await.unwrap();
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_body_and_ids_are_bad_requests() {
    let server = TestServer::spawn().await;

    let res = server
        .client
        .post(server.url("/api/movies"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Bad Request. Invalid JSON body.");

    let bad_comment = format!("/api/movie/{UNKNOWN_ID}/comments/123");
    for path in [
        "/api/movie/not-an-id",
        "/api/movie/not-an-id/comments",
        bad_comment.as_str(),
    ] {
        let res = server.client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "Bad Request. Invalid identifier.");
    }
}

#[tokio::test]
async fn unknown_movie_is_not_found() {
    let server = TestServer::spawn().await;
    let url = server.url(&format!("/api/movie/{UNKNOWN_ID}"));

    let res = server.client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Movie not found" }));

    let res = server
        .client
        .put(&url)
        .json(&json!({ "title": "Ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server.client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server.client.get(server.url("/api/movies")).send().await.unwrap();
    let list: Value = res.json().await.unwrap();
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_merges_fields_into_the_movie() {
    let server = TestServer::spawn().await;
    let id = server.create_movie(&movie_body()).await;
    let url = server.url(&format!("/api/movie/{id}"));

    let res = server
        .client
        .put(&url)
        .json(&json!({ "title": "The Great Train Robbery (restored)", "runtime": 12 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "status": 200, "message": "Movie updated successfully" }));

    let movie: Value = server.client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(movie["data"]["title"], "The Great Train Robbery (restored)");
    assert_eq!(movie["data"]["runtime"], 12);
    assert_eq!(movie["data"]["year"], 1903);

    for bad in [json!({}), json!([1, 2]), json!({ "_id": UNKNOWN_ID })] {
        let res = server.client.put(&url).json(&bad).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{bad}");
    }
}

#[tokio::test]
async fn updated_dates_read_back_canonical() {
    let server = TestServer::spawn().await;
    let id = server.create_movie(&movie_body()).await;
    let url = server.url(&format!("/api/movie/{id}"));

    let res = server
        .client
        .put(&url)
        .json(&json!({
            "released": "2020-01-01",
            "tomatoes": { "lastUpdated": "2021-06-30 12:00:00" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let movie: Value = server.client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(movie["data"]["released"], "2020-01-01T00:00:00.000Z");
    assert_eq!(movie["data"]["tomatoes"]["lastUpdated"], "2021-06-30T12:00:00.000Z");

    let res = server
        .client
        .put(&url)
        .json(&json!({ "released": "sometime in 2020" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Bad Request. released is not a valid date.");

    let movie: Value = server.client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(movie["data"]["released"], "2020-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn unrepresentable_update_value_is_a_bad_request() {
    let server = TestServer::spawn().await;
    let id = server.create_movie(&movie_body()).await;

    let res = server
        .client
        .put(server.url(&format!("/api/movie/{id}")))
        .header("content-type", "application/json")
        .body(r#"{"votes": 18446744073709551615}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Bad Request. Update contains an unsupported value.");
}

#[tokio::test]
async fn deleted_movie_is_gone() {
    let server = TestServer::spawn().await;
    let id = server.create_movie(&movie_body()).await;
    let url = server.url(&format!("/api/movie/{id}"));

    let res = server.client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Movie deleted successfully");

    let res = server.client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server.client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_are_scoped_to_their_movie() {
    let server = TestServer::spawn().await;
    let first = server.create_movie(&movie_body()).await;
    let second = server.create_movie(&movie_body()).await;
    let comment = server.create_comment(&first).await;
    server.create_comment(&first).await;

    let list: Value = server
        .client
        .get(server.url(&format!("/api/movie/{first}/comments")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["data"].as_array().unwrap().len(), 2);

    let list: Value = server
        .client
        .get(server.url(&format!("/api/movie/{second}/comments")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list["data"].as_array().unwrap().is_empty());

    let res = server
        .client
        .get(server.url(&format!("/api/movie/{first}/comments/{comment}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["movie_id"], first.as_str());
    assert_eq!(body["data"]["date"], "2002-08-18T04:56:07.000Z");

    // Right comment id, wrong parent.
    let res = server
        .client
        .get(server.url(&format!("/api/movie/{second}/comments/{comment}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Comment not found" }));
}

#[tokio::test]
async fn comment_for_another_movie_is_rejected() {
    let server = TestServer::spawn().await;
    let movie = server.create_movie(&movie_body()).await;

    let res = server
        .client
        .post(server.url(&format!("/api/movie/{movie}/comments")))
        .json(&comment_body(UNKNOWN_ID))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut body = comment_body(&movie);
    body.as_object_mut().unwrap().remove("email");
    let res = server
        .client
        .post(server.url(&format!("/api/movie/{movie}/comments")))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Bad Request. Missing required fields.");
}

#[tokio::test]
async fn comment_update_and_delete() {
    let server = TestServer::spawn().await;
    let movie = server.create_movie(&movie_body()).await;
    let comment = server.create_comment(&movie).await;
    let url = server.url(&format!("/api/movie/{movie}/comments/{comment}"));

    let res = server
        .client
        .put(&url)
        .json(&json!({ "text": "Edited." }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Comment updated successfully");

    let read: Value = server.client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(read["data"]["text"], "Edited.");

    let res = server
        .client
        .put(server.url(&format!("/api/movie/{movie}/comments/{UNKNOWN_ID}")))
        .json(&json!({ "text": "Nobody home." }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server.client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "status": 200, "message": "Comment deleted successfully" }));

    let res = server.client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Comment not found");
}

#[tokio::test]
async fn comment_update_cannot_detach_it_from_its_movie() {
    let server = TestServer::spawn().await;
    let movie = server.create_movie(&movie_body()).await;
    let comment = server.create_comment(&movie).await;
    let url = server.url(&format!("/api/movie/{movie}/comments/{comment}"));

    // Restating the parent, as returned by GET, keeps the comment reachable.
    let res = server
        .client
        .put(&url)
        .json(&json!({ "movie_id": movie, "date": "2003-01-02" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let read: Value = server.client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(read["data"]["movie_id"], movie.as_str());
    assert_eq!(read["data"]["date"], "2003-01-02T00:00:00.000Z");

    let res = server
        .client
        .put(&url)
        .json(&json!({ "movie_id": UNKNOWN_ID }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let list: Value = server
        .client
        .get(server.url(&format!("/api/movie/{movie}/comments")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let res = server.client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn unsupported_method_is_405_plain_text() {
    let server = TestServer::spawn().await;

    let res = server
        .client
        .patch(server.url("/api/movies"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(
        res.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
    assert_eq!(res.text().await.unwrap(), "Method PATCH Not Allowed");

    let res = server
        .client
        .delete(server.url("/api/movies"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "Method DELETE Not Allowed");
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let server = TestServer::spawn().await;

    let res = server.client.get(server.url("/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Not Found" }));
}

#[tokio::test]
async fn responses_carry_cors_and_request_id_headers() {
    let server = TestServer::spawn().await;

    let res = server
        .client
        .get(server.url("/api/movies"))
        .header("origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert!(!res.headers()["x-request-id"].is_empty());

    let res = server
        .client
        .get(server.url("/health"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me-123");

    let res = server
        .client
        .request(reqwest::Method::OPTIONS, server.url("/api/movies"))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let server = TestServer::spawn().await;

    let res = server.client.get(server.url("/api/doc")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let doc: Value = res.json().await.unwrap();
    assert_eq!(doc["openapi"], "3.1.0");
    assert_eq!(doc["info"]["version"], "1.0.0");
    assert!(doc["paths"]["/api/movies"]["post"].is_object());
    assert!(doc["components"]["schemas"]["Comment"].is_object());
}

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use serde_json::{json, Value};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};
    use todoapp::db::db::Db;
    use todoapp::web::{start_server, AppState};
    use tokio::task::JoinHandle;

    struct WebTestContext {
        _temp_dir: TempDir,
        addr: SocketAddr,
        handle: JoinHandle<()>,
    }

    impl AsyncTestContext for WebTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(&temp_dir.path().join("todoapp.db")).unwrap();
            let state = Arc::new(AppState::new(db, chrono::Duration::minutes(30)));
            let (addr, handle) = start_server("127.0.0.1:0", state).await.unwrap();

            WebTestContext {
                _temp_dir: temp_dir,
                addr,
                handle,
            }
        }

        async fn teardown(self) {
            self.handle.abort();
        }
    }

    impl WebTestContext {
        fn url(&self, path: &str) -> String {
            format!("http://{}{}", self.addr, path)
        }

        /// A browser-like client that keeps the session cookie.
        fn client(&self) -> Client {
            Client::builder().cookie_store(true).build().unwrap()
        }

        async fn register(&self, client: &Client, username: &str, password: &str) -> Value {
            let response = client
                .post(self.url("/api/register"))
                .json(&json!({"username": username, "password": password}))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            response.json().await.unwrap()
        }

        async fn add(&self, client: &Client, name: &str) -> Value {
            let response = client
                .post(self.url("/api/tasks"))
                .json(&json!({ "name": name }))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            response.json().await.unwrap()
        }

        async fn tasks(&self, client: &Client) -> Value {
            let response = client.get(self.url("/api/tasks")).send().await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            response.json().await.unwrap()
        }
    }

    fn names(view: &Value) -> Vec<String> {
        view["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|task| task["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test_context(WebTestContext)]
    #[tokio::test]
    async fn test_api_task_lifecycle(ctx: &mut WebTestContext) {
        let client = ctx.client();
        let registered = ctx.register(&client, "ana", "12345").await;
        assert_eq!(registered["user"]["username"], "ana");
        assert_eq!(registered["view"]["tasks"], json!([]));

        let added = ctx.add(&client, "  Buy milk ").await;
        assert_eq!(added["sync"], json!({"status": "saved"}));
        assert_eq!(names(&added["view"]), ["Buy milk"]);
        assert_eq!(added["view"]["active_count"], 1);
        let id = added["id"].as_u64().unwrap();

        let toggled: Value = client
            .post(ctx.url(&format!("/api/tasks/{id}/toggle")))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(toggled["view"]["active_count"], 0);
        assert_eq!(toggled["view"]["tasks"][0]["completed"], true);

        let filtered: Value = client
            .put(ctx.url("/api/filter"))
            .json(&json!({"filter": "Active"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(filtered["sync"], json!({"status": "not_required"}));
        assert_eq!(filtered["view"]["filter"], "active");
        assert_eq!(filtered["view"]["tasks"][0]["visible"], false);

        let renamed: Value = client
            .put(ctx.url(&format!("/api/tasks/{id}")))
            .json(&json!({"name": "Buy oat milk", "completed": false}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(names(&renamed["view"]), ["Buy oat milk"]);
        assert_eq!(renamed["sync"], json!({"status": "saved"}));
        assert_eq!(renamed["view"]["tasks"][0]["visible"], true);

        let deleted: Value = client
            .delete(ctx.url(&format!("/api/tasks/{id}")))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(deleted["removed"], json!({"name": "Buy oat milk", "completed": false}));
        assert_eq!(deleted["view"]["tasks"], json!([]));
        assert_eq!(deleted["sync"]["status"], "saved");
    }

    #[test_context(WebTestContext)]
    #[tokio::test]
    async fn test_clear_completed(ctx: &mut WebTestContext) {
        let client = ctx.client();
        ctx.register(&client, "ana", "12345").await;
        for name in ["One", "Two", "Three"] {
            ctx.add(&client, name).await;
        }
        let view = ctx.tasks(&client).await;
        for task in view["view"]["tasks"].as_array().unwrap() {
            if task["name"] != "Two" {
                let id = task["id"].as_u64().unwrap();
                client.post(ctx.url(&format!("/api/tasks/{id}/toggle"))).send().await.unwrap();
            }
        }

        let cleared: Value = client
            .post(ctx.url("/api/tasks/clear-completed"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(names(&cleared["view"]), ["Two"]);
        assert_eq!(cleared["view"]["active_count"], 1);
    }

    #[test_context(WebTestContext)]
    #[tokio::test]
    async fn test_anonymous_requests_are_unauthorized(ctx: &mut WebTestContext) {
        let client = ctx.client();

        let response = client.get(ctx.url("/api/tasks")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("log in"));

        let response = client
            .post(ctx.url("/api/tasks"))
            .json(&json!({"name": "Sneaky"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test_context(WebTestContext)]
    #[tokio::test]
    async fn test_task_error_statuses(ctx: &mut WebTestContext) {
        let client = ctx.client();
        ctx.register(&client, "ana", "12345").await;
        let id = ctx.add(&client, "Real").await["id"].as_u64().unwrap();

        let blank = client.post(ctx.url("/api/tasks")).json(&json!({"name": "   "})).send().await.unwrap();
        assert_eq!(blank.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let unknown = client.post(ctx.url("/api/tasks/9999/toggle")).send().await.unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
        let body: Value = unknown.json().await.unwrap();
        assert_eq!(body["error"], "Task 9999 not found");

        let blank_rename = client
            .put(ctx.url(&format!("/api/tasks/{id}")))
            .json(&json!({"name": ""}))
            .send()
            .await
            .unwrap();
        assert_eq!(blank_rename.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let empty_update = client.put(ctx.url(&format!("/api/tasks/{id}"))).json(&json!({})).send().await.unwrap();
        assert_eq!(empty_update.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bad_filter = client.put(ctx.url("/api/filter")).json(&json!({"filter": "done"})).send().await.unwrap();
        assert_eq!(bad_filter.status(), StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(names(&ctx.tasks(&client).await["view"]), ["Real"]);
    }

    #[test_context(WebTestContext)]
    #[tokio::test]
    async fn test_auth_error_statuses(ctx: &mut WebTestContext) {
        let client = ctx.client();
        ctx.register(&client, "ana", "12345").await;

        let duplicate = ctx
            .client()
            .post(ctx.url("/api/register"))
            .json(&json!({"username": "ana", "password": "other"}))
            .send()
            .await
            .unwrap();
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let wrong_password = ctx
            .client()
            .post(ctx.url("/api/login"))
            .json(&json!({"username": "ana", "password": "nope"}))
            .send()
            .await
            .unwrap();
        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

        let missing = ctx
            .client()
            .post(ctx.url("/api/login"))
            .json(&json!({"username": "ana"}))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    }

    #[test_context(WebTestContext)]
    #[tokio::test]
    async fn test_tasks_survive_logout_and_login(ctx: &mut WebTestContext) {
        let client = ctx.client();
        ctx.register(&client, "ana", "12345").await;
        for name in ["First", "Second", "Third"] {
            ctx.add(&client, name).await;
        }

        let logout = client.post(ctx.url("/api/logout")).send().await.unwrap();
        assert_eq!(logout.status(), StatusCode::NO_CONTENT);
        let after = client.get(ctx.url("/api/tasks")).send().await.unwrap();
        assert_eq!(after.status(), StatusCode::UNAUTHORIZED);

        let login = client
            .post(ctx.url("/api/login"))
            .json(&json!({"username": "ana", "password": "12345"}))
            .send()
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::OK);
        let body: Value = login.json().await.unwrap();
        assert_eq!(names(&body["view"]), ["First", "Second", "Third"]);
    }

    #[test_context(WebTestContext)]
    #[tokio::test]
    async fn test_users_see_only_their_tasks(ctx: &mut WebTestContext) {
        let ana = ctx.client();
        let bob = ctx.client();
        ctx.register(&ana, "ana", "12345").await;
        ctx.register(&bob, "bob", "hunter2").await;

        ctx.add(&ana, "Ana's").await;
        ctx.add(&bob, "Bob's").await;

        assert_eq!(names(&ctx.tasks(&ana).await["view"]), ["Ana's"]);
        assert_eq!(names(&ctx.tasks(&bob).await["view"]), ["Bob's"]);
    }

    #[test_context(WebTestContext)]
    #[tokio::test]
    async fn test_html_pages(ctx: &mut WebTestContext) {
        let client = ctx.client();

        let login_page = client.get(ctx.url("/")).send().await.unwrap().text().await.unwrap();
        assert!(login_page.contains("action=\"/login\""));

        // Form posts answer 303 and the client follows back to the task page.
        let page = client
            .post(ctx.url("/register"))
            .form(&[("username", "ana"), ("password", "12345")])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(page.contains("<h1>Todos</h1>"));
        assert!(page.contains("0 active item(s) left"));

        let page = client
            .post(ctx.url("/tasks"))
            .form(&[("name", "Water <plants>")])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(page.contains("Water &lt;plants&gt;"));
        assert!(page.contains("1 active item(s) left"));

        let id = ctx.tasks(&client).await["view"]["tasks"][0]["id"].as_u64().unwrap();
        client.post(ctx.url(&format!("/tasks/{id}/toggle"))).send().await.unwrap();
        let page = client
            .post(ctx.url("/filter"))
            .form(&[("filter", "active")])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(!page.contains("Water &lt;plants&gt;</span>"));
        assert!(page.contains("0 active item(s) left"));

        let page = client
            .post(ctx.url("/tasks/9999/delete"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(page.contains("Task 9999 not found"));

        let page = client.post(ctx.url("/logout")).send().await.unwrap().text().await.unwrap();
        assert!(page.contains("action=\"/login\""));
    }

    #[test_context(WebTestContext)]
    #[tokio::test]
    async fn test_html_login_failure_shows_message(ctx: &mut WebTestContext) {
        let response = ctx
            .client()
            .post(ctx.url("/login"))
            .form(&[("username", "ghost"), ("password", "boo")])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.text().await.unwrap().contains("Incorrect username or password"));
    }
}

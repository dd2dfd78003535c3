use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use formdesk::auth::jwt::{self, Claims};
use formdesk::config::Config;
use formdesk::forms::export::ColumnPolicy;
use formdesk::forms::registry::FormTypeKey;

pub const JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough";

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Token for a principal holding the admin access capability.
    pub fn admin_token(&self) -> String {
        token(&["access_admin"], false)
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed")
    }

    /// GET as admin and return (status, body text).
    pub async fn get_text(&self, path: &str) -> (reqwest::StatusCode, String) {
        let resp = self.get_auth(path, &self.admin_token()).await;
        let status = resp.status();
        (status, resp.text().await.unwrap_or_default())
    }

    pub async fn create_content_type(&self, app_label: &str, model: &str) -> Uuid {
        let id = Uuid::now_v7();
        sqlx::query("INSERT INTO content_types (id, app_label, model) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(app_label)
            .bind(model)
            .execute(&self.pool)
            .await
            .expect("insert content type failed");
        id
    }

    pub async fn create_page(&self, title: &str, content_type_id: Uuid) -> Uuid {
        let id = Uuid::now_v7();
        let url_path = format!("/{}/", title.to_lowercase().replace(' ', "-"));
        sqlx::query(
            "INSERT INTO pages (id, title, url_path, content_type_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(title)
        .bind(url_path)
        .bind(content_type_id)
        .execute(&self.pool)
        .await
        .expect("insert page failed");
        id
    }

    pub async fn create_user(&self, username: &str) -> Uuid {
        let id = Uuid::now_v7();
        sqlx::query("INSERT INTO users (id, username) VALUES ($1, $2)")
            .bind(id)
            .bind(username)
            .execute(&self.pool)
            .await
            .expect("insert user failed");
        id
    }

    pub async fn create_submission(
        &self,
        page_id: Uuid,
        user_id: Option<Uuid>,
        form_data: &str,
        submit_time: DateTime<Utc>,
    ) -> Uuid {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO form_submissions (id, page_id, user_id, form_data, submit_time)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(page_id)
        .bind(user_id)
        .bind(form_data)
        .bind(submit_time)
        .execute(&self.pool)
        .await
        .expect("insert submission failed");
        id
    }

    /// A `forms.formpage` page ready to receive submissions.
    pub async fn create_form_page(&self, title: &str) -> Uuid {
        let content_type_id = match sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM content_types WHERE app_label = 'forms' AND model = 'formpage'",
        )
        .fetch_optional(&self.pool)
        .await
        .expect("content type lookup failed")
        {
            Some(id) => id,
            None => self.create_content_type("forms", "formpage").await,
        };
        self.create_page(title, content_type_id).await
    }
}

/// Mint a principal token with the given capabilities.
pub fn token(perms: &[&str], is_superuser: bool) -> String {
    let claims = Claims::new(
        Uuid::now_v7(),
        "tester".to_string(),
        perms.iter().map(|p| p.to_string()).collect(),
        is_superuser,
    );
    jwt::encode_token(&claims, JWT_SECRET).expect("token encode failed")
}

pub fn test_config(database_url: String) -> Config {
    Config {
        database_url,
        jwt_secret: JWT_SECRET.to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        log_level: "warn".to_string(),
        login_url: "/admin/login/".to_string(),
        form_types: vec![
            FormTypeKey::new("forms", "formpage"),
            FormTypeKey::new("events", "signuppage"),
        ],
        per_page: 20,
        csv_columns: ColumnPolicy::FirstRecord,
    }
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!("formdesk_test_{}", Uuid::now_v7().to_string().replace('-', ""));

    // Connect to default postgres DB to create test DB
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    // Connect to test DB and run migrations
    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let app = formdesk::build_app(pool.clone(), test_config(test_url));

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}

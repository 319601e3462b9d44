use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use leadrelay_api::setup;
use leadrelay_core::Config;
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test application with isolated upload and static directories
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: TempDir,
    pub static_dir: TempDir,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Files currently staged in the upload directory
    pub fn staged_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(self.upload_dir.path())
            .expect("Failed to read upload dir")
            .map(|entry| entry.expect("Failed to read dir entry").path())
            .collect();
        files.sort();
        files
    }
}

/// Setup a test application that sends email to `email_api_url`
pub async fn setup_test_app(email_api_url: &str) -> TestApp {
    setup_test_app_with(email_api_url, &[]).await
}

/// Setup a test application with extra configuration variables
pub async fn setup_test_app_with(email_api_url: &str, extra: &[(&str, &str)]) -> TestApp {
    let upload_dir = TempDir::new().expect("Failed to create upload dir");
    let static_dir = TempDir::new().expect("Failed to create static dir");
    std::fs::write(
        static_dir.path().join("index.html"),
        "<html><body><form action=\"/createlead\"></form></body></html>",
    )
    .expect("Failed to write index.html");

    let mut vars: HashMap<String, String> = HashMap::from([
        ("SENDGRID_API_KEY".to_string(), "SG.test-key".to_string()),
        ("EMAIL_ADDRESS_FROM".to_string(), "site@example.com".to_string()),
        ("EMAIL_ADDRESS_TO".to_string(), "sales@example.com".to_string()),
        ("EMAIL_API_BASE_URL".to_string(), email_api_url.to_string()),
        ("EMAIL_API_TIMEOUT_SECS".to_string(), "5".to_string()),
        (
            "UPLOAD_PATH".to_string(),
            upload_dir.path().display().to_string(),
        ),
        (
            "STATIC_PATH".to_string(),
            static_dir.path().display().to_string(),
        ),
    ]);
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }

    let config = Config::from_lookup(|key| vars.get(key).cloned()).expect("Invalid test config");
    let (_state, router) = setup::build_app(config)
        .await
        .expect("Failed to build app");

    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        upload_dir,
        static_dir,
    }
}

/// Fields of a complete, plausible lead
pub fn lead_fields() -> [(&'static str, &'static str); 7] {
    [
        ("ProjectType", "Web application"),
        ("WorkType", "Backend"),
        ("WhenStart", "Next month"),
        ("Fio", "Jane Doe"),
        ("PhoneOrSkype", "+1 555 0100"),
        ("Email", "jane@example.com"),
        ("Description", "We need an API for our shop"),
    ]
}

/// Multipart form carrying all lead fields
pub fn lead_form() -> MultipartForm {
    lead_fields()
        .into_iter()
        .fold(MultipartForm::new(), |form, (name, value)| {
            form.add_text(name, value)
        })
}

/// Multipart form carrying all lead fields and a file
pub fn lead_form_with_file(filename: &str, data: Vec<u8>) -> MultipartForm {
    lead_form().add_part(
        "File",
        Part::bytes(data)
            .file_name(filename.to_string())
            .mime_type("application/octet-stream"),
    )
}

use flate2::Compression;
use flate2::write::GzEncoder;
use template_sync::SourceError;
use template_sync_github::TarballClient;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a .tar.gz in memory. Each entry is (path_in_tar, content).
fn build_tarball(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut archive = tar::Builder::new(encoder);

    for (file_path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_path(file_path).unwrap();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        archive.append(&header, *data).unwrap();
    }

    archive.into_inner().unwrap().finish().unwrap()
}

async fn mount_tarball(server: &MockServer, tarball: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path("/repos/acme/templates/tarball/main"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(tarball, "application/gzip"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn strips_github_root_prefix() {
    let tarball = build_tarball(&[
        ("acme-templates-abc123/sets/starter/README.md", b"hello"),
        ("acme-templates-abc123/LICENSE", b"mit"),
    ]);

    let server = MockServer::start().await;
    mount_tarball(&server, tarball).await;

    let client = TarballClient::new(None, Some(server.uri()));
    let files = client.fetch("acme", "templates", "main").await.unwrap();

    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["sets/starter/README.md", "LICENSE"]);
}

#[tokio::test]
async fn keeps_binary_content_intact() {
    let png: &[u8] = &[0x89, b'P', b'N', b'G', 0x00, 0xff, 0xfe];
    let tarball = build_tarball(&[("root/assets/logo.png", png)]);

    let server = MockServer::start().await;
    mount_tarball(&server, tarball).await;

    let client = TarballClient::new(None, Some(server.uri()));
    let files = client.fetch("acme", "templates", "main").await.unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].content, png);
}

#[tokio::test]
async fn sends_user_agent_and_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/templates/tarball/main"))
        .and(header("User-Agent", "template-sync"))
        .and(header("Authorization", "Bearer s3cret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(build_tarball(&[("root/a.md", b"a")]), "application/gzip"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = TarballClient::new(Some("s3cret".into()), Some(server.uri()));
    let files = client.fetch("acme", "templates", "main").await.unwrap();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn missing_branch_is_repository_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/templates/tarball/main"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = TarballClient::new(None, Some(server.uri()));
    let result = client.fetch("acme", "templates", "main").await;
    assert!(matches!(result, Err(SourceError::RepositoryNotFound(_))));
}

#[tokio::test]
async fn server_error_is_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/templates/tarball/main"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = TarballClient::new(None, Some(server.uri()));
    let result = client.fetch("acme", "templates", "main").await;
    assert!(matches!(result, Err(SourceError::Network(_))));
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let client = TarballClient::new(None, Some("http://127.0.0.1:1".into()));

    let result = client.fetch("acme", "templates", "main").await;
    assert!(matches!(result, Err(SourceError::Network(_))));
}

#[tokio::test]
async fn garbage_body_is_extraction_error() {
    let server = MockServer::start().await;
    mount_tarball(&server, b"definitely not gzip".to_vec()).await;

    let client = TarballClient::new(None, Some(server.uri()));
    let result = client.fetch("acme", "templates", "main").await;
    assert!(matches!(result, Err(SourceError::Extraction(_))));
}

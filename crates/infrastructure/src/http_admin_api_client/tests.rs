use reqwest::Method;
use url::Url;

use darchiva_application::{MatrixQuery, RoleListQuery};
use darchiva_core::{AppError, TenantId};
use darchiva_domain::EntityType;

use super::{HttpAdminApiClient, TENANT_HEADER, status_error};

fn client(base: &str) -> HttpAdminApiClient {
    let base_url = match Url::parse(base) {
        Ok(url) => url,
        Err(error) => panic!("fixture base URL should parse: {error}"),
    };
    HttpAdminApiClient::new(reqwest::Client::new(), base_url)
}

fn built(builder: super::AppResult<reqwest::RequestBuilder>) -> reqwest::Request {
    match builder.map(reqwest::RequestBuilder::build) {
        Ok(Ok(request)) => request,
        Ok(Err(error)) => panic!("request should build: {error}"),
        Err(error) => panic!("request builder should be created: {error}"),
    }
}

#[test]
fn status_mapping_follows_http_semantics() {
    assert!(matches!(status_error(400, ""), AppError::Validation(_)));
    assert!(matches!(status_error(422, ""), AppError::Validation(_)));
    assert!(matches!(status_error(401, ""), AppError::Unauthorized(_)));
    assert!(matches!(status_error(403, ""), AppError::Forbidden(_)));
    assert!(matches!(status_error(404, ""), AppError::NotFound(_)));
    assert!(matches!(status_error(409, ""), AppError::Conflict(_)));
    assert!(matches!(status_error(500, ""), AppError::Internal(_)));
    assert!(matches!(status_error(418, ""), AppError::Internal(_)));
}

#[test]
fn error_message_prefers_detail_then_message() {
    assert_eq!(
        status_error(409, r#"{"detail":"Role name already exists","message":"ignored"}"#)
            .to_string(),
        AppError::Conflict("Role name already exists".to_owned()).to_string()
    );
    assert_eq!(
        status_error(403, r#"{"message":"Missing permission"}"#).to_string(),
        AppError::Forbidden("Missing permission".to_owned()).to_string()
    );
}

#[test]
fn error_message_falls_back_to_status() {
    let fallback = AppError::Internal("API error: 502".to_owned()).to_string();

    assert_eq!(status_error(502, "<html>Bad Gateway</html>").to_string(), fallback);
    assert_eq!(status_error(502, r#"{"detail":"  "}"#).to_string(), fallback);
    assert_eq!(status_error(502, r#"{"detail":null}"#).to_string(), fallback);
}

#[test]
fn structured_detail_is_kept_as_json() {
    let error = status_error(422, r#"{"detail":[{"loc":["body","name"],"msg":"field required"}]}"#);

    assert!(matches!(
        error,
        AppError::Validation(message) if message.contains("field required")
    ));
}

#[test]
fn endpoints_join_onto_base_path_and_encode_identifiers() {
    let root = client("http://127.0.0.1:8000");
    let prefixed = client("https://archive.example/darchiva/");

    let role = built(root.iam(Method::GET, &["roles", "a/b c"]));
    let scanners = built(prefixed.v1(Method::GET, &["scanners"]));

    assert_eq!(role.url().as_str(), "http://127.0.0.1:8000/api/iam/roles/a%2Fb%20c");
    assert_eq!(
        scanners.url().as_str(),
        "https://archive.example/darchiva/api/v1/scanners"
    );
}

#[test]
fn requests_carry_token_and_tenant_when_configured() {
    let tenant_id = TenantId::new();
    let configured = client("http://127.0.0.1:8000")
        .with_bearer_token("secret-token")
        .with_tenant(tenant_id);
    let anonymous = client("http://127.0.0.1:8000");

    let request = built(configured.v1(Method::GET, &["users", "me", "preferences"]));
    let bare = built(anonymous.v1(Method::GET, &["users", "me", "preferences"]));

    assert_eq!(
        request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok()),
        Some("Bearer secret-token")
    );
    assert_eq!(
        request
            .headers()
            .get(TENANT_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(tenant_id.to_string().as_str())
    );
    assert!(bare.headers().get(reqwest::header::AUTHORIZATION).is_none());
    assert!(bare.headers().get(TENANT_HEADER).is_none());
}

#[test]
fn list_queries_skip_unset_filters() {
    let api = client("http://127.0.0.1:8000");
    let roles = RoleListQuery {
        search: Some("audit".to_owned()),
        ..RoleListQuery::default()
    };
    let matrix = MatrixQuery {
        entity_type: EntityType::Group,
        resource_type: None,
    };

    let roles_request = built(api.iam(Method::GET, &["roles"]).map(|builder| builder.query(&roles)));
    let matrix_request = built(
        api.iam(Method::GET, &["permission-matrix"])
            .map(|builder| builder.query(&matrix)),
    );

    assert_eq!(roles_request.url().query(), Some("page=1&pageSize=25&search=audit"));
    assert_eq!(matrix_request.url().query(), Some("entity_type=group"));
}

//! Static thumbnail serving.
//!
//! ```text
//! GET /images/0b6f3c1e-4f7e-4a4f-9d1c-1c2f4b8e9a10.png
//! ```
//!
//! Files are read through a capability handle on the screenshot directory,
//! so a request path can never escape it.

use std::io;
use std::path::Path;
use std::sync::Arc;

use actix_web::{HttpResponse, get, web};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::error;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::immutable_header;
use crate::inbound::http::schemas::ErrorSchema;

/// Read-only view of the screenshot directory.
#[derive(Clone)]
pub struct ImageStore {
    dir: Arc<Dir>,
}

impl ImageStore {
    /// Open `path`, which must already exist.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while opening the directory.
    pub fn open(path: &Path) -> io::Result<Self> {
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }

    fn read(&self, name: String) -> io::Result<Vec<u8>> {
        self.dir.read(name)
    }
}

/// Thumbnail names are `<uuid>.png` style tokens without separators.
fn is_safe_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".png") else {
        return false;
    };
    !stem.is_empty()
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Serve one thumbnail.
#[utoipa::path(
    get,
    path = "/images/{name}",
    params(("name" = String, Path, description = "Thumbnail file name")),
    responses(
        (status = 200, description = "PNG thumbnail", content_type = "image/png"),
        (status = 404, description = "No such image", body = ErrorSchema)
    ),
    tags = ["images"],
    operation_id = "getImage"
)]
#[get("/images/{name}")]
pub async fn serve_image(
    store: web::Data<ImageStore>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let name = path.into_inner();
    if !is_safe_name(&name) {
        return Err(Error::not_found("image not found"));
    }
    let store = store.get_ref().clone();
    let bytes = web::block(move || store.read(name))
        .await
        .map_err(|err| {
            error!(error = %err, "image read task failed");
            Error::internal("Failed to read image")
        })?
        .map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::not_found("image not found"),
            _ => {
                error!(error = %err, "image read failed");
                Error::internal("Failed to read image")
            }
        })?;
    Ok(HttpResponse::Ok()
        .content_type("image/png")
        .insert_header(immutable_header())
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    #[rstest]
    #[case("0b6f3c1e-4f7e.png", true)]
    #[case("thumb_1.png", true)]
    #[case(".png", false)]
    #[case("../secret.png", false)]
    #[case("a/b.png", false)]
    #[case("image.jpg", false)]
    fn names_are_restricted(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_safe_name(name), expected);
    }

    async fn get(dir: &Path, uri: &str) -> actix_web::dev::ServiceResponse {
        let store = ImageStore::open(dir).expect("open dir");
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(store))
                .service(serve_image),
        )
        .await;
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await
    }

    #[rstest]
    #[actix_web::test]
    async fn existing_image_is_served_as_png() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join("abc.png"), b"\x89PNG").expect("write");

        let response = get(tmp.path(), "/images/abc.png").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .and_then(|value| value.to_str().ok()),
            Some("image/png")
        );
        assert_eq!(
            actix_test::read_body(response).await.as_ref(),
            b"\x89PNG"
        );
    }

    #[rstest]
    #[case("/images/missing.png")]
    #[case("/images/notes.txt")]
    #[actix_web::test]
    async fn unknown_images_are_not_found(#[case] uri: &str) {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join("notes.txt"), b"hi").expect("write");

        let response = get(tmp.path(), uri).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

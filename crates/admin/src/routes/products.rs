//! Admin catalog routes: product CRUD and image uploads.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use boutique_core::{Product, ProductId, normalize_images};
use boutique_storefront::db::RepositoryError;
use boutique_storefront::db::products::{NewProduct, ProductFilter, ProductRepository};

use crate::error::AdminError;
use crate::middleware::RequireAdmin;
use crate::state::AdminState;

/// Extensions accepted for product image uploads.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Maximum upload size in bytes (5 MiB).
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Product fields as submitted by the admin panel.
///
/// `images` is deliberately untyped: historical clients sent strings,
/// arrays, or objects. [`normalize_images`] flattens whatever arrives
/// at this single ingestion point.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub images: Value,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

const fn default_in_stock() -> bool {
    true
}

impl ProductPayload {
    fn validate(&self) -> Result<NewProduct, AdminError> {
        if self.name.trim().is_empty() {
            return Err(AdminError::Validation("name is required".to_owned()));
        }
        if self.category.trim().is_empty() {
            return Err(AdminError::Validation("category is required".to_owned()));
        }
        if self.price < Decimal::ZERO {
            return Err(AdminError::Validation(
                "price must not be negative".to_owned(),
            ));
        }

        Ok(NewProduct {
            name: self.name.trim().to_owned(),
            description: self.description.clone(),
            category: self.category.trim().to_owned(),
            price: self.price,
            sizes: self.sizes.clone(),
            images: normalize_images(&self.images),
            featured: self.featured,
            in_stock: self.in_stock,
        })
    }
}

/// `GET /api/admin/products` - Full catalog, newest first.
pub async fn list(
    State(state): State<AdminState>,
    RequireAdmin(_user): RequireAdmin,
) -> Result<Json<Vec<Product>>, AdminError> {
    let products = ProductRepository::new(state.pool())
        .list(&ProductFilter::default())
        .await?;
    Ok(Json(products))
}

/// `POST /api/admin/products` - Create a product.
pub async fn create(
    State(state): State<AdminState>,
    RequireAdmin(user): RequireAdmin,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), AdminError> {
    let new = payload.validate()?;
    let product = ProductRepository::new(state.pool()).create(&new).await?;

    tracing::info!(product_id = %product.id, admin = %user.id, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/admin/products/{id}` - Replace a product's fields.
pub async fn update(
    State(state): State<AdminState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, AdminError> {
    let new = payload.validate()?;
    let product = ProductRepository::new(state.pool())
        .update(id, &new)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::NotFound("product"),
            other => AdminError::Repository(other),
        })?;

    Ok(Json(product))
}

/// `DELETE /api/admin/products/{id}` - Delete a product (reviews cascade).
///
/// Uploaded images are left on disk; the `cleanup-uploads` CLI command
/// reconciles them.
pub async fn delete(
    State(state): State<AdminState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, AdminError> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AdminError::NotFound("product"));
    }

    tracing::info!(product_id = %id, admin = %user.id, "product deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/admin/uploads` - Accept a product image upload.
///
/// The file is stored under the uploads directory with a random name and
/// the response carries the path to reference from a product's `images`.
pub async fn upload(
    State(state): State<AdminState>,
    RequireAdmin(_user): RequireAdmin,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), AdminError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AdminError::Validation(format!("invalid multipart payload: {e}")))?
        .ok_or_else(|| AdminError::Validation("no file in upload".to_owned()))?;

    let original_name = field.file_name().unwrap_or_default().to_owned();
    let extension = std::path::Path::new(&original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| AdminError::Validation("file has no extension".to_owned()))?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AdminError::Validation(format!(
            "unsupported file type .{extension}"
        )));
    }

    let data = field
        .bytes()
        .await
        .map_err(|e| AdminError::Validation(format!("failed to read upload: {e}")))?;

    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AdminError::Validation(format!(
            "file exceeds {MAX_UPLOAD_BYTES} bytes"
        )));
    }

    // Random server-side name; the client's filename never touches disk
    let filename = format!("{}.{extension}", Uuid::new_v4());
    let dir = &state.config().uploads_dir;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AdminError::Upload(format!("creating uploads dir: {e}")))?;
    tokio::fs::write(dir.join(&filename), &data)
        .await
        .map_err(|e| AdminError::Upload(format!("writing {filename}: {e}")))?;

    tracing::info!(%filename, bytes = data.len(), "image uploaded");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "image": format!("/uploads/{filename}") })),
    ))
}

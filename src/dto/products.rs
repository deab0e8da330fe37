use reqwest::multipart::{Form, Part};

use crate::{
    error::AppResult,
    models::{ImageUpload, Product},
};

/// Largest file the image picker accepts.
pub const MAX_UPLOAD_BYTES: usize = 2_000_000;

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> AppResult<Self> {
        let file_name = file_name.into();
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(crate::error::AppError::UploadTooLarge {
                name: file_name,
                size: bytes.len(),
                limit: MAX_UPLOAD_BYTES,
            });
        }
        Ok(Self {
            file_name,
            content_type: content_type.into(),
            bytes,
        })
    }

    pub async fn from_path(path: impl AsRef<std::path::Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let content_type = guess_image_type(&file_name);
        Self::new(file_name, content_type, bytes)
    }
}

fn guess_image_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// How a product travels to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductEncoding {
    Json,
    Multipart,
}

impl ProductEncoding {
    pub fn for_product(product: &Product) -> Self {
        if product.has_pending_uploads() {
            ProductEncoding::Multipart
        } else {
            ProductEncoding::Json
        }
    }
}

/// Form fields in the bracketed style the product endpoint parses:
/// `variants[0][size]`, `existing_images[0][image_path]`, `images[]` for files.
pub fn product_form_fields(product: &Product) -> Vec<(String, String)> {
    let mut fields = vec![
        ("name".to_string(), product.name.clone()),
        ("description".to_string(), product.description.clone()),
        ("price".to_string(), product.price.to_string()),
        (
            "site_id".to_string(),
            product
                .site_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        (
            "category_id".to_string(),
            product
                .category_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
    ];

    for (i, variant) in product.variants.iter().enumerate() {
        fields.push((format!("variants[{i}][size]"), variant.size.clone()));
        fields.push((format!("variants[{i}][color]"), variant.color.clone()));
        fields.push((format!("variants[{i}][price]"), variant.price.to_string()));
        fields.push((format!("variants[{i}][stock]"), variant.stock.to_string()));
    }

    let stored = product.images.iter().filter(|img| img.upload.is_none());
    for (i, image) in stored.enumerate() {
        fields.push((
            format!("existing_images[{i}][image_path]"),
            image.image_path.clone(),
        ));
        fields.push((
            format!("existing_images[{i}][is_primary]"),
            if image.is_primary { "1" } else { "0" }.to_string(),
        ));
    }
    fields
}

pub fn product_multipart(product: &Product) -> AppResult<Form> {
    let mut form = Form::new();
    for (name, value) in product_form_fields(product) {
        form = form.text(name, value);
    }
    for upload in product.images.iter().filter_map(|img| img.upload.as_ref()) {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)?;
        form = form.part("images[]", part);
    }
    Ok(form)
}

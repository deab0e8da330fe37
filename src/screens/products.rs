use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{Category, EntityId, ImageUpload, Product, ProductImage, ProductVariant, Site},
    routes::params::{ProductQuery, ProductSortBy},
    screens::{CrudForm, CrudScreen},
    services::{CategoryService, ProductService, SiteService},
    validation::{FieldErrors, ProductFormOptions, validate_product},
};

pub type ProductScreen = CrudScreen<Product, ProductService>;

impl CrudForm for Product {
    const LABEL: &'static str = "Product";
    const PLURAL: &'static str = "products";

    type Options = ProductFormOptions;

    fn validate(&self, options: ProductFormOptions) -> Result<(), FieldErrors> {
        validate_product(self, options)
    }
}

/// One scalar field of the product form.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductField {
    Name(String),
    Description(String),
    Price(Decimal),
    SiteId(Option<EntityId>),
    CategoryId(Option<EntityId>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariantField {
    Size(String),
    Color(String),
    Price(Decimal),
    Stock(i64),
}

pub fn update_field(mut product: Product, field: ProductField) -> Product {
    match field {
        ProductField::Name(v) => product.name = v,
        ProductField::Description(v) => product.description = v,
        ProductField::Price(v) => product.price = v,
        ProductField::SiteId(v) => product.site_id = v,
        ProductField::CategoryId(v) => product.category_id = v,
    }
    product
}

pub fn add_variant_row(mut product: Product) -> Product {
    product.variants.push(ProductVariant::default());
    product
}

pub fn update_variant_field(
    mut product: Product,
    index: usize,
    field: VariantField,
) -> AppResult<Product> {
    let len = product.variants.len();
    let variant = product
        .variants
        .get_mut(index)
        .ok_or(AppError::VariantIndexOutOfBounds { index, len })?;
    match field {
        VariantField::Size(v) => variant.size = v,
        VariantField::Color(v) => variant.color = v,
        VariantField::Price(v) => variant.price = v,
        VariantField::Stock(v) => variant.stock = v,
    }
    Ok(product)
}

/// Appends picked files as non-primary images, in pick order.
pub fn add_images(mut product: Product, files: Vec<ImageUpload>) -> Product {
    product
        .images
        .extend(files.into_iter().map(|upload| ProductImage {
            image_path: upload.file_name.clone(),
            is_primary: false,
            upload: Some(upload),
        }));
    product
}

impl ProductScreen {
    pub fn set_field(&mut self, field: ProductField) {
        self.edit(|p| update_field(p, field));
    }

    pub fn add_variant(&mut self) {
        self.edit(add_variant_row);
    }

    pub fn set_variant_field(&mut self, index: usize, field: VariantField) -> AppResult<()> {
        self.try_edit(|p| update_variant_field(p, index, field))
    }

    pub fn attach_images(&mut self, files: Vec<ImageUpload>) {
        self.edit(|p| add_images(p, files));
    }

    pub async fn set_name_filter(&mut self, name: impl Into<String>) -> AppResult<()> {
        let name = name.into();
        let query = self.query_mut();
        query.name = Some(name);
        query.page = 1;
        self.refresh().await
    }

    pub async fn set_category_filter(&mut self, category_id: Option<EntityId>) -> AppResult<()> {
        let query = self.query_mut();
        query.category_id = category_id;
        query.page = 1;
        self.refresh().await
    }

    pub async fn set_sort_by(&mut self, sort_by: ProductSortBy) -> AppResult<()> {
        self.query_mut().sort_by = sort_by;
        self.refresh().await
    }

    pub async fn toggle_sort_order(&mut self) -> AppResult<()> {
        let query = self.query_mut();
        query.sort_order = query.sort_order.toggle();
        self.refresh().await
    }

    /// 1-based page number, as the paginator reports it.
    pub async fn go_to_page(&mut self, page: u32) -> AppResult<()> {
        self.query_mut().page = page.max(1);
        self.refresh().await
    }

    pub async fn set_per_page(&mut self, per_page: u32) -> AppResult<()> {
        let query = self.query_mut();
        query.per_page = per_page;
        query.page = 1;
        self.refresh().await
    }

    /// Index of the first row on the current page, for "showing x of y".
    pub fn first_row(&self) -> usize {
        self.query().pagination().offset()
    }

    pub fn total_records(&self) -> u64 {
        self.store()
            .pagination
            .map(|meta| meta.total_items)
            .unwrap_or_default()
    }

    pub fn current_query(&self) -> ProductQuery {
        self.query().normalized()
    }
}

/// Dropdown options of the product dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub categories: Vec<Category>,
    pub sites: Vec<Site>,
}

impl ReferenceData {
    pub async fn load(categories: &CategoryService, sites: &SiteService) -> AppResult<Self> {
        let (categories, sites) = futures::try_join!(categories.list(), sites.list())?;
        Ok(Self { categories, sites })
    }

    pub fn category_name(&self, id: &EntityId) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.name.as_str())
    }

    pub fn site_name(&self, id: &EntityId) -> Option<&str> {
        self.sites
            .iter()
            .find(|s| &s.id == id)
            .map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> Product {
        Product {
            id: Some(EntityId::new("1")),
            name: "Shirt".into(),
            ..Product::default()
        }
    }

    #[test]
    fn update_field_leaves_other_fields() {
        let before = shirt();
        let after = update_field(before.clone(), ProductField::Price(Decimal::new(500, 2)));
        assert_eq!(after.price, Decimal::new(500, 2));
        assert_eq!(after.name, before.name);
        assert_eq!(after.id, before.id);
    }

    #[test]
    fn variant_rows_append_blank() {
        let p = add_variant_row(add_variant_row(shirt()));
        assert_eq!(p.variants.len(), 2);
        assert_eq!(p.variants[1], ProductVariant::default());
    }

    #[test]
    fn out_of_bounds_variant_update_is_an_error() {
        let p = add_variant_row(shirt());
        let p = update_variant_field(p, 0, VariantField::Color("blue".into())).unwrap();
        assert_eq!(p.variants[0].color, "blue");

        let err = update_variant_field(p, 1, VariantField::Stock(4)).unwrap_err();
        assert!(matches!(
            err,
            AppError::VariantIndexOutOfBounds { index: 1, len: 1 }
        ));
    }

    #[test]
    fn images_append_without_dedup() {
        let file = ImageUpload::new("a.png", "image/png", vec![1]).unwrap();
        let p = add_images(shirt(), vec![file.clone(), file]);
        assert_eq!(p.images.len(), 2);
        assert!(p.images.iter().all(|img| !img.is_primary));
        assert!(p.has_pending_uploads());
    }
}

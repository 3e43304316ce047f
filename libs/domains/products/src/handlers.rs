//! HTTP handlers for Products API

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestPathResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    IdPath, ValidatedJson, ValidatedPath,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, ProductDto, StockAdjusted, StockChange, UpdateProduct};
use crate::service::ProductService;
use crate::store::EntityStore;

const STOCK_DECREMENTED: &str = "Stock decremented successfully.";
const STOCK_ADDED: &str = "Stock added successfully.";

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        decrement_stock,
        add_to_stock,
    ),
    components(
        schemas(ProductDto, CreateProduct, UpdateProduct, StockAdjusted),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestPathResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product inventory endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<S: EntityStore<Product> + 'static>(service: ProductService<S>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/decrement-stock/{id}/{quantity}", put(decrement_stock))
        .route("/add-to-stock/{id}/{quantity}", put(add_to_stock))
        .with_state(shared_service)
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = Vec<ProductDto>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<S: EntityStore<Product>>(
    State(service): State<Arc<ProductService<S>>>,
) -> ProductResult<Json<Vec<ProductDto>>> {
    let products = service.list_all().await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<S: EntityStore<Product>>(
    State(service): State<Arc<ProductService<S>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<(StatusCode, Json<ProductDto>)> {
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<S: EntityStore<Product>>(
    State(service): State<Arc<ProductService<S>>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<ProductDto>> {
    let product = service.get_by_id(id).await?;
    Ok(Json(product))
}

/// Replace a product's name and stock
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 204, description = "Product updated"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<S: EntityStore<Product>>(
    State(service): State<Arc<ProductService<S>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<StatusCode> {
    service.update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<S: EntityStore<Product>>(
    State(service): State<Arc<ProductService<S>>>,
    IdPath(id): IdPath,
) -> ProductResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove units from a product's stock
#[utoipa::path(
    put,
    path = "/decrement-stock/{id}/{quantity}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("quantity" = i32, Path, description = "Units to remove, at least 1")
    ),
    responses(
        (status = 200, description = "Stock decremented", body = StockAdjusted),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn decrement_stock<S: EntityStore<Product>>(
    State(service): State<Arc<ProductService<S>>>,
    ValidatedPath(change): ValidatedPath<StockChange>,
) -> ProductResult<Json<StockAdjusted>> {
    service.decrement_stock(change.id, change.quantity).await?;
    Ok(Json(StockAdjusted::new(STOCK_DECREMENTED)))
}

/// Add units to a product's stock
#[utoipa::path(
    put,
    path = "/add-to-stock/{id}/{quantity}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("quantity" = i32, Path, description = "Units to add, at least 1")
    ),
    responses(
        (status = 200, description = "Stock added", body = StockAdjusted),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_to_stock<S: EntityStore<Product>>(
    State(service): State<Arc<ProductService<S>>>,
    ValidatedPath(change): ValidatedPath<StockChange>,
) -> ProductResult<Json<StockAdjusted>> {
    service.add_stock(change.id, change.quantity).await?;
    Ok(Json(StockAdjusted::new(STOCK_ADDED)))
}

use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::forgot_password,
        handlers::auth::verify_code,
        handlers::auth::reset_password,
        handlers::user::get_all_users,
        handlers::user::create_user,
        handlers::user::update_profile,
        handlers::user::update_user,
        handlers::user::delete_user,
        handlers::product::get_all_products,
        handlers::product::get_product,
        handlers::product::create_product,
        handlers::product::update_product,
        handlers::product::delete_product,
        handlers::order::create_order,
        handlers::order::get_all_orders,
        handlers::order::get_user_orders,
        handlers::order::update_order_status,
        handlers::order::get_sales_stats,
        handlers::cms::get_cms,
        handlers::cms::save_cms,
    ),
    components(
        schemas(
            User,
            UserResponse,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateUserRequest,
            UpdateUserRequest,
            UpdateProfileRequest,
            ForgotPasswordRequest,
            VerifyCodeRequest,
            ResetPasswordRequest,
            Product,
            SaveProductRequest,
            Order,
            OrderStatus,
            OrderLineView,
            OrderWithItems,
            AdminOrderRow,
            AdminOrderView,
            CartLine,
            CreateOrderRequest,
            OrderCreated,
            UpdateStatusRequest,
            MonthlySales,
            CmsSettings,
            SaveCmsRequest,
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "user", description = "User management API"),
        (name = "product", description = "Product catalog API"),
        (name = "order", description = "Order placement and tracking API"),
        (name = "cms", description = "Site branding API"),
    ),
    info(
        title = "FarmaVida Backend API",
        version = "1.0.0",
        description = "FarmaVida online pharmacy REST API documentation"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

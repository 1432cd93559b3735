use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub version: String }

#[derive(ToSchema)]
pub struct ErrorBody { pub error: String, pub code: Option<u16>, pub detail: Option<String> }

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub login_id: String,
    pub name: String,
    pub phone: String,
    pub password: String,
    /// `customer` (default) or `owner`
    pub user_type: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest { pub login_id: String, pub password: String }

#[derive(ToSchema)]
pub struct ProfileUpdateDoc { pub name: Option<String>, pub phone: Option<String> }

#[derive(ToSchema)]
pub struct NewBookLineDoc {
    /// 1..=20, see `/catalog`
    pub clothes_id: i16,
    /// 1..=9, see `/catalog`
    pub fabric_id: i16,
    pub fee: i64,
}

#[derive(ToSchema)]
pub struct NewBookDoc {
    pub user_id: Uuid,
    pub laundry_id: Uuid,
    pub memo: Option<String>,
    /// `on_site` or `metapay`
    pub method: String,
    pub lines: Vec<NewBookLineDoc>,
}

#[derive(ToSchema)]
pub struct StateChangeDoc {
    /// `in_progress`, `complete` or `canceled`
    pub state: String,
}

#[derive(ToSchema)]
pub struct NewLaundryDoc { pub name: String, pub address: String, pub tel: String }

#[derive(ToSchema)]
pub struct NewPayAccountDoc {
    /// 1..=4, see `/catalog`
    pub bank_id: i16,
    pub account_number: String,
}

#[derive(ToSchema)]
pub struct ChargeDoc { pub pay_account_id: Uuid, pub amount: i64 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::catalog,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::books,
        crate::routes::books::create,
        crate::routes::books::list,
        crate::routes::books::by_date,
        crate::routes::books::get,
        crate::routes::books::update_state,
        crate::routes::books::complete,
        crate::routes::books::cancel,
        crate::routes::laundries::create,
        crate::routes::laundries::mine,
        crate::routes::laundries::get,
        crate::routes::laundries::books,
        crate::routes::laundries::settlements,
        crate::routes::metapay::open,
        crate::routes::metapay::get,
        crate::routes::metapay::link_account,
        crate::routes::metapay::charge,
        crate::routes::metapay::logs,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            RegisterRequest,
            LoginRequest,
            ProfileUpdateDoc,
            NewBookLineDoc,
            NewBookDoc,
            StateChangeDoc,
            NewLaundryDoc,
            NewPayAccountDoc,
            ChargeDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "books"),
        (name = "laundries"),
        (name = "metapay")
    )
)]
pub struct ApiDoc;

use axum::handler::Handler;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use clubhouse_core::authorization::{OperationPolicy, Role};

use crate::api::authentication::auth;
use crate::api::handlers::admin::roles::{
    activate_role_handler, deactivate_role_handler, list_roles_handler, set_permission_handler,
};
use crate::api::handlers::bookings::get_booking_handler;
use crate::api::handlers::clubs::{get_club_handler, update_club_handler};
use crate::api::handlers::info::{health_handler, info_handler};
use crate::api::handlers::users::{get_user_handler, update_user_handler};
use crate::api::handlers::whoami::whoami_handler;
use crate::api::middleware::authorization::require_roles;
use crate::app_state::SharedAppState;

pub struct ApiRoutes;

impl ApiRoutes {
    pub fn create(state: SharedAppState) -> Router {
        let authenticated_router = Router::new()
            .route(
                "/api/v1/authenticated/whoami",
                get(whoami_handler).layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_roles("whoami", OperationPolicy::authenticated()),
                )),
            )
            .route(
                "/api/v1/authenticated/clubs/{club_id}",
                get(get_club_handler.layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_roles("view_club", OperationPolicy::authenticated()),
                )))
                .put(update_club_handler.layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_roles("edit_club", OperationPolicy::at_least(Role::Manager)),
                ))),
            )
            .route(
                "/api/v1/authenticated/users/{user_id}",
                get(get_user_handler.layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_roles("view_user", OperationPolicy::authenticated()),
                )))
                .put(update_user_handler.layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_roles("edit_user", OperationPolicy::authenticated()),
                ))),
            )
            .route(
                "/api/v1/authenticated/bookings/{booking_id}",
                get(get_booking_handler).layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_roles("view_booking", OperationPolicy::authenticated()),
                )),
            )
            .route(
                "/api/v1/authenticated/admin/roles",
                get(list_roles_handler).layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_roles("list_roles", OperationPolicy::at_least(Role::Admin)),
                )),
            )
            .route(
                "/api/v1/authenticated/admin/roles/{role}/activate",
                post(activate_role_handler).layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_roles("activate_role", OperationPolicy::roles([Role::SuperAdmin])),
                )),
            )
            .route(
                "/api/v1/authenticated/admin/roles/{role}/deactivate",
                post(deactivate_role_handler).layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_roles("deactivate_role", OperationPolicy::roles([Role::SuperAdmin])),
                )),
            )
            .route(
                "/api/v1/authenticated/admin/roles/{role}/permissions",
                put(set_permission_handler).layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_roles(
                        "set_role_permission",
                        OperationPolicy::roles([Role::SuperAdmin]),
                    ),
                )),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), auth));

        let public_router = Router::new()
            .route("/api/v1/health", get(health_handler))
            .route("/api/v1/info", get(info_handler));

        Router::new()
            .merge(authenticated_router)
            .merge(public_router)
            .with_state(state)
    }
}

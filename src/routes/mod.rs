pub mod auth;
pub mod filter;
pub mod health;
pub mod tasks;

use actix_web::web;

/// Registers every board endpoint. Meant to be mounted under the
/// `/api/v1/boards` scope behind `SessionGuard`; signup and signin are
/// exempted inside the guard itself.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::signup)
        .service(auth::signin)
        .service(tasks::create_task)
        .service(tasks::get_tasks)
        .service(tasks::toggle_important)
        .service(tasks::delete_task)
        .service(tasks::remove_assignee)
        .service(tasks::change_status)
        .service(tasks::add_assignee)
        .service(filter::filter_tasks);
}

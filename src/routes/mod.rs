pub mod debug;
pub mod health;
pub mod sessions;
pub mod subtasks;
pub mod tags;
pub mod tasks;
pub mod users;

use actix_web::web;

/// Registers every route. Protection is decided by `AuthMiddleware`'s
/// public-path table, not by where a route is mounted.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(users::register)
        .service(users::me)
        .service(sessions::login)
        .service(tasks::list_tasks)
        .service(tasks::create_task)
        .service(tasks::get_task)
        .service(tasks::update_task)
        .service(tasks::delete_task)
        .service(tags::list_tags)
        .service(tags::create_tag)
        .service(tags::get_tag)
        .service(tags::update_tag)
        .service(tags::delete_tag)
        .service(tags::attach_tag)
        .service(tags::detach_tag)
        .service(subtasks::create_subtask)
        .service(subtasks::list_subtasks)
        .service(subtasks::get_subtask)
        .service(subtasks::update_subtask)
        .service(subtasks::delete_subtask)
        .service(subtasks::toggle_subtask)
        .service(debug::data)
        .service(debug::reset);
}

/// Database models for tasknest
///
/// # Models
///
/// - `user`: User accounts (the credential store)
/// - `task`: Per-user to-do items (the task store)
///
/// Each model owns its CRUD operations as `async` methods over a
/// `sqlx::PgPool`, with ownership scoping baked into the task queries.

pub mod task;
pub mod user;

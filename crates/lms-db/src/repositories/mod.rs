// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut Transaction` (atomic operations).

pub mod achievement;
pub mod activity;
pub mod badge;
pub mod leaderboard;
pub mod note;
pub mod quiz;
pub mod user;
pub mod user_level;

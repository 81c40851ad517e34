// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut Transaction` (atomic
// operations). A multi-table write must create one transaction at the top level
// and pass `&mut *tx` to every participating call; repositories never open
// transactions of their own.

pub mod attendance;
pub mod device;
pub mod group;
pub mod person;
pub mod rule;
pub mod server;
pub mod user;

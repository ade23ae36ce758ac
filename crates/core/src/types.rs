/// Primary keys of the `dialplan` table are PostgreSQL `SERIAL` (INTEGER).
pub type DbId = i32;

//! `SeaORM` entity definitions.

pub mod attachments;
pub mod posts;

pub mod health;
pub mod identities;
pub mod replay;

pub mod available;
pub mod fund;
pub mod goals;
pub mod recommend;
pub mod search;
pub mod setup;
pub mod summary;
pub mod ui;

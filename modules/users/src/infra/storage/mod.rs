pub mod entity;
pub mod fields;
pub mod mapper;
pub mod migrations;
pub mod sea_orm_repo;

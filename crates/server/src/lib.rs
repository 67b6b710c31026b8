pub mod access;
pub mod api;
pub mod archive;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod repository;

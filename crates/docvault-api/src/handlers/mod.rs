//! Route handlers organized by domain.

pub mod document;
pub mod folder;
pub mod health;
pub mod pages;

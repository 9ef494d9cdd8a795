#![allow(dead_code)]

pub mod language_model;
pub mod scraper;
pub mod speech;

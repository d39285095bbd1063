pub mod model;
pub mod recipient;
pub mod rest;
pub mod service;
pub mod template;

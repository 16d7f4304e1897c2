// Middleware module - cross-cutting HTTP concerns

pub mod cors;

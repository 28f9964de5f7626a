//! Infrastructure layer.

pub mod db;

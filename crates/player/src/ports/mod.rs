//! Ports - seams between the client core and its transport

pub mod outbound;

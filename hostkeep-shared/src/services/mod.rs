//! Entity operations
//!
//! One module per entity kind, each exposing `add`, `list`, `get`, `update`
//! and `remove` (users add `register`, `login`, `profile` and
//! `reset_password`). Operations call the store in sequence and run the
//! integrity maintainers after the primary write; the maintainers' outcome
//! comes back as a [`ConsistencyReport`](crate::integrity::ConsistencyReport).

pub mod bookings;
pub mod customers;
pub mod houses;
pub mod tasks;
pub mod users;
pub mod works;

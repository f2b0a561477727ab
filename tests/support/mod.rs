#![allow(dead_code)]

pub mod site_fixture;
pub mod socket_guard;

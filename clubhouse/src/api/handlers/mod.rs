pub mod admin;
pub mod bookings;
pub mod clubs;
pub mod info;
pub mod users;
pub mod whoami;

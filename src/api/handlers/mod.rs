pub mod bookings;
pub mod couples;
pub mod gallery;
pub mod payments;
pub mod payouts;
pub mod root;
pub mod vendors;

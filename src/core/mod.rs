pub mod intake;
pub mod med;
pub mod reminder;
pub mod schedule;
pub mod trigger;
pub mod upcoming;

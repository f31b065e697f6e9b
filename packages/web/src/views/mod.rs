mod home;
pub use home::Home;

mod reminders;
pub use reminders::Reminders;

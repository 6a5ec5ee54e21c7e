pub mod geocoder;
pub mod mailer;
pub mod uploads;

pub use geocoder::{GeocodeError, Geocoder, MapQuestGeocoder, StaticGeocoder};
pub use mailer::{Email, MailError, Mailer};
pub use uploads::{ResumeStore, UploadError};

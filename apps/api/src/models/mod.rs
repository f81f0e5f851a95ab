pub mod application;
pub mod listing;
pub mod user;

pub use application::{Application, ApplicationStatus, NewApplication};
pub use listing::{Compensation, Listing, ListingDraft, ListingStatus, WorkMode};
pub use user::{NewProfile, ProfileUpdate, Role, UserProfile};

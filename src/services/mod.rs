pub mod itinerary;
pub mod planning;
pub mod storage;
pub mod store;
pub mod validation;

pub mod backup;
pub mod history;
pub mod record;
pub mod reviews;
pub mod stats;
pub mod subjects;

pub mod generate;
pub mod orgs;
pub mod readme;
pub mod reports;
